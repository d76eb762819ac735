pub mod stream;

use stream::Stream;
use tagpage_util::{hex_spaced, result_ext::ResultExt as _};
use winnow::{
    ModalResult, Parser,
    binary::{be_u8, be_u32},
    error::StrContext,
    token::take,
};

use crate::{
    error::{NdefError, Result},
    event::{Event, EventSink},
    header::{NdefHeader, RecordFlags},
    ndef_type::NdefType,
    payload::{NdefPayload, expand_uri},
    record::{NdefRecord, TEXT_TYPE, URI_TYPE},
    text::decode_text,
};

/// Record fields sliced out of the message, payload not yet interpreted
#[derive(Debug)]
struct RawRecord<'i> {
    header: NdefHeader,
    type_: &'i [u8],
    id: Option<&'i [u8]>,
    payload: &'i [u8],
}

/// Decode every record of an NDEF message
///
/// Stops after a record with the message end flag, or when the bytes run out
pub fn decode_records(message: &[u8], sink: &mut dyn EventSink) -> Result<Vec<NdefRecord>> {
    let mut input = stream::new(message);
    let mut records = Vec::new();

    while !input.is_empty() {
        let index = records.len() as u32;
        let raw = parse_raw_record(&mut input).map_err_str(NdefError::MalformedTlv)?;

        sink.record(Event::RecordDecoded {
            index,
            type_name_format: raw.header.type_name_format(),
            type_: raw.type_.to_vec(),
            id: raw.id.map(<[u8]>::to_vec),
            payload_length: raw.header.payload_length,
        });

        let payload = interpret_payload(index, &raw, sink)?;
        let record = NdefRecord {
            header: raw.header,
            type_: raw.type_.to_vec(),
            id: raw.id.map(<[u8]>::to_vec),
            payload,
        };

        let message_end = record.header.message_end();
        records.push(record);

        if message_end {
            break;
        }
    }

    Ok(records)
}

pub fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let flags = be_u8
        .map(RecordFlags::from)
        .context(StrContext::Label("record header"))
        .parse_next(input)?;

    let type_length = be_u8
        .context(StrContext::Label("type length"))
        .parse_next(input)?;

    let payload_length = if flags.short_record {
        be_u8
            .map(u32::from)
            .context(StrContext::Label("payload length"))
            .parse_next(input)?
    } else {
        be_u32
            .context(StrContext::Label("payload length"))
            .parse_next(input)?
    };

    let id_length = if flags.has_id_length {
        Some(
            be_u8
                .context(StrContext::Label("id length"))
                .parse_next(input)?,
        )
    } else {
        None
    };

    Ok(NdefHeader {
        flags,
        type_length,
        payload_length,
        id_length,
    })
}

// private
fn parse_raw_record<'i>(input: &mut Stream<'i>) -> ModalResult<RawRecord<'i>> {
    let header = parse_header(input)?;

    let type_: &[u8] = take(header.type_length as usize)
        .context(StrContext::Label("record type"))
        .parse_next(input)?;

    let id: Option<&[u8]> = match header.id_length {
        Some(id_length) => Some(
            take(id_length as usize)
                .context(StrContext::Label("record id"))
                .parse_next(input)?,
        ),
        None => None,
    };

    let payload: &[u8] = take(header.payload_length as usize)
        .context(StrContext::Label("record payload"))
        .parse_next(input)?;

    Ok(RawRecord {
        header,
        type_,
        id,
        payload,
    })
}

fn interpret_payload(
    index: u32,
    raw: &RawRecord<'_>,
    sink: &mut dyn EventSink,
) -> Result<NdefPayload> {
    let well_known = raw.header.type_name_format() == NdefType::WellKnown;

    if well_known && raw.type_ == TEXT_TYPE {
        let text = decode_text(raw.payload)?;

        sink.record(Event::TextDecoded {
            index,
            language: text.language.clone(),
            format: text.format,
            text_length: text.text.len() as u32,
        });

        return Ok(NdefPayload::Text(text));
    }

    if well_known && raw.type_ == URI_TYPE {
        if let Some(uri) = expand_uri(raw.payload) {
            sink.record(Event::UriDecoded {
                index,
                uri: uri.clone(),
            });

            return Ok(NdefPayload::Uri(uri));
        }
    }

    sink.record(Event::RecordPassthrough {
        index,
        type_name_format: raw.header.type_name_format(),
        type_: String::from_utf8_lossy(raw.type_).to_string(),
        payload_hex: hex_spaced(raw.payload),
    });

    Ok(NdefPayload::Data(raw.payload.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::TextPayloadFormat;

    fn decode(bytes: &[u8]) -> Result<Vec<NdefRecord>> {
        decode_records(bytes, &mut Vec::new())
    }

    #[test]
    fn known_header_parse() {
        let mut header_bytes = stream::new(&[0xD1, 0x01, 0x0D, 0x55, 0x02]);
        let header = parse_header(&mut header_bytes).unwrap();

        assert!(header.flags.message_begin);
        assert!(header.flags.message_end);
        assert!(!header.flags.chunked);
        assert!(header.flags.short_record);
        assert!(!header.flags.has_id_length);
        assert_eq!(header.flags.type_name_format, NdefType::WellKnown);
        assert_eq!(header.type_length, 1);
        assert_eq!(header.payload_length, 13);
        assert_eq!(header.id_length, None);
        assert_eq!(header_bytes.len(), 2);
    }

    #[test]
    fn long_header_parse() {
        let mut header_bytes = stream::new(&[0xC2, 0x10, 0x00, 0x00, 0x0B, 0xC1]);
        let header = parse_header(&mut header_bytes).unwrap();

        assert!(!header.flags.short_record);
        assert_eq!(header.flags.type_name_format, NdefType::Mime);
        assert_eq!(header.type_length, 16);
        assert_eq!(header.payload_length, 3009);
    }

    #[test]
    fn header_with_id_length() {
        let mut header_bytes = stream::new(&[0xD9, 0x01, 0x03, 0x02]);
        let header = parse_header(&mut header_bytes).unwrap();

        assert!(header.flags.has_id_length);
        assert_eq!(header.id_length, Some(2));
    }

    #[test]
    fn single_text_record() {
        let bytes = [0xD1, 0x01, 0x07, 0x54, 0x02, 0x65, 0x6E, 0x74, 0x65, 0x73, 0x74];
        let records = decode(&bytes).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].type_, b"T");
        assert_eq!(records[0].id, None);

        let NdefPayload::Text(text) = &records[0].payload else {
            panic!("payload is not text")
        };

        assert_eq!(text.text, "test");
        assert_eq!(text.language, "en");
        assert_eq!(text.format, TextPayloadFormat::Utf8);
    }

    #[test]
    fn empty_record() {
        let records = decode(&[0xD1, 0x00, 0x00]).unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].type_.is_empty());
        assert_eq!(records[0].payload, NdefPayload::Data(vec![]));
    }

    #[test]
    fn record_with_id() {
        let bytes = [0xD9, 0x01, 0x03, 0x02, b'T', b'i', b'd', 0x00, b'h', b'i'];
        let records = decode(&bytes).unwrap();

        assert_eq!(records[0].id, Some(b"id".to_vec()));
        assert_eq!(records[0].payload.text().unwrap().text, "hi");
    }

    #[test]
    fn stops_at_message_end() {
        // second record would be garbage, never looked at
        let bytes = [0xD1, 0x00, 0x00, 0xFF, 0xFF];
        let records = decode(&bytes).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn runs_until_bytes_exhausted_without_message_end() {
        let bytes = [
            0x91, 0x01, 0x03, b'T', 0x00, b'a', b'b', // MB only
            0x11, 0x01, 0x02, b'T', 0x00, b'c', // neither flag
        ];

        let records = decode(&bytes).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn payload_past_end_is_malformed() {
        let bytes = [0xD1, 0x01, 0x07, 0x54, 0x02, 0x65];
        let error = decode(&bytes).unwrap_err();
        assert!(matches!(error, NdefError::MalformedTlv(_)));
    }

    #[test]
    fn truncated_long_payload_length() {
        let error = decode(&[0xC1, 0x01, 0x00, 0x00]).unwrap_err();
        assert!(matches!(error, NdefError::MalformedTlv(_)));
    }

    #[test]
    fn text_type_needs_well_known_tnf() {
        // mime record with type "T"
        let bytes = [0xD2, 0x01, 0x03, b'T', 0x00, b'h', b'i'];
        let records = decode(&bytes).unwrap();

        assert_eq!(records[0].payload, NdefPayload::Data(vec![0x00, b'h', b'i']));
        assert!(!records[0].is_text());
    }

    #[test]
    fn uri_record_expanded() {
        let mut bytes = vec![0xD1, 0x01, 0x0C, b'U', 0x04];
        bytes.extend_from_slice(b"example.com");

        let mut events = Vec::new();
        let records = decode_records(&bytes, &mut events).unwrap();

        assert_eq!(
            records[0].payload,
            NdefPayload::Uri("https://example.com".to_string())
        );
        assert!(events.contains(&Event::UriDecoded {
            index: 0,
            uri: "https://example.com".to_string()
        }));
    }

    #[test]
    fn passthrough_event_for_other_records() {
        let mut events = Vec::new();
        let bytes = [0xD2, 0x03, 0x02, b'a', b'/', b'b', 0xAB, 0xCD];
        decode_records(&bytes, &mut events).unwrap();

        assert_eq!(
            events.last().unwrap(),
            &Event::RecordPassthrough {
                index: 0,
                type_name_format: NdefType::Mime,
                type_: "a/b".to_string(),
                payload_hex: "AB CD".to_string(),
            }
        );
    }

    #[test]
    fn bad_language_length_inside_record() {
        let bytes = [0xD1, 0x01, 0x03, b'T', 0x3F, b'e', b'n'];
        let error = decode(&bytes).unwrap_err();
        assert!(matches!(error, NdefError::MalformedTlv(_)));
    }
}
