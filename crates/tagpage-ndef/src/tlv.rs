use tagpage_util::result_ext::ResultExt as _;
use tracing::debug;
use winnow::{
    ModalResult, Parser,
    binary::{be_u8, be_u16},
    error::StrContext,
    token::take,
};

use crate::{
    error::{NdefError, Result},
    event::{Event, EventSink},
    parser::stream::{self, Stream},
};

pub const NDEF_MESSAGE_TAG: u8 = 0x03;
pub const TERMINATOR_TAG: u8 = 0xFE;

/// Length byte announcing a 2 byte big-endian length
const LONG_LENGTH: u8 = 0xFF;

/// Largest value length the 3 byte form can hold, 0xFFFF is reserved
const MAX_LENGTH: usize = 0xFFFE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlvBlock<'i> {
    NdefMessage(&'i [u8]),
    Terminator,
    Other { tag: u8, value: &'i [u8] },
}

/// Walk the TLV stream after the capability container and return the value
/// of the first NDEF message block
///
/// Unknown blocks are skipped, the terminator ends the scan with
/// [`NdefError::NoNdefMessage`], running out of bytes is [`NdefError::MalformedTlv`].
///
/// A length byte of 0xFF is not a length of 255, it marks the 3 byte form and
/// the real length follows as a big endian u16
pub fn find_ndef_message<'i>(content: &'i [u8], sink: &mut dyn EventSink) -> Result<&'i [u8]> {
    let mut input = stream::new(content);

    loop {
        let offset = stream::offset(content, input) as u32;
        if input.is_empty() {
            return Err(NdefError::MalformedTlv(format!(
                "tlv stream ended at offset {offset} without an ndef message or terminator"
            )));
        }

        let block = parse_block(&mut input).map_err_str(NdefError::MalformedTlv)?;

        match block {
            TlvBlock::NdefMessage(value) => {
                sink.record(Event::NdefTlvFound {
                    offset,
                    length: value.len() as u16,
                });

                return Ok(value);
            }

            TlvBlock::Terminator => {
                sink.record(Event::TerminatorReached { offset });
                return Err(NdefError::NoNdefMessage);
            }

            TlvBlock::Other { tag, value } => {
                debug!("skipping tlv 0x{tag:02X} of {} bytes at {offset}", value.len());
                sink.record(Event::TlvSkipped {
                    offset,
                    tag,
                    length: value.len() as u16,
                });
            }
        }
    }
}

pub fn parse_block<'i>(input: &mut Stream<'i>) -> ModalResult<TlvBlock<'i>> {
    let tag = be_u8
        .context(StrContext::Label("tlv tag"))
        .parse_next(input)?;

    if tag == TERMINATOR_TAG {
        return Ok(TlvBlock::Terminator);
    }

    let length = parse_length(input)?;
    let value: &[u8] = take(length as usize)
        .context(StrContext::Label("tlv value"))
        .parse_next(input)?;

    match tag {
        NDEF_MESSAGE_TAG => Ok(TlvBlock::NdefMessage(value)),
        tag => Ok(TlvBlock::Other { tag, value }),
    }
}

fn parse_length(input: &mut Stream<'_>) -> ModalResult<u16> {
    let length_indicator = be_u8
        .context(StrContext::Label("tlv length"))
        .parse_next(input)?;

    if length_indicator == LONG_LENGTH {
        be_u16
            .context(StrContext::Label("tlv long length"))
            .parse_next(input)
    } else {
        Ok(length_indicator as u16)
    }
}

/// Append a TLV block, lengths over 254 use the 3 byte form
pub fn encode_block(tag: u8, value: &[u8], out: &mut Vec<u8>) -> Result<()> {
    if value.len() > MAX_LENGTH {
        return Err(NdefError::MessageTooLong(value.len() as u32));
    }

    out.push(tag);
    if value.len() < LONG_LENGTH as usize {
        out.push(value.len() as u8);
    } else {
        out.push(LONG_LENGTH);
        out.extend_from_slice(&(value.len() as u16).to_be_bytes());
    }

    out.extend_from_slice(value);
    Ok(())
}
