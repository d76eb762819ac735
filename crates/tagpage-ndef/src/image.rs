//! Whole tag images, capability container followed by the TLV content

use crate::{
    BYTES_PER_PAGE, CAPABILITY_CONTAINER_LENGTH, DEFAULT_CAPABILITY_CONTAINER,
    capability::CapabilityContainer,
    error::{NdefError, Result},
    event::EventSink,
    message::NdefMessage,
    payload::TextPayload,
    tlv::{self, NDEF_MESSAGE_TAG, TERMINATOR_TAG},
};

/// Full page image for `text`, default capability container included
pub fn encode_text_image(text: &str) -> Result<Vec<u8>> {
    encode_image(&NdefMessage::from_text(text))
}

pub fn encode_image(message: &NdefMessage) -> Result<Vec<u8>> {
    let content = encode_content(message)?;

    let mut image = Vec::with_capacity(CAPABILITY_CONTAINER_LENGTH + content.len());
    image.extend_from_slice(&DEFAULT_CAPABILITY_CONTAINER);
    image.extend(content);
    Ok(image)
}

/// The bytes that go after the capability container: NDEF TLV, terminator,
/// zero padding up to a whole page
pub fn encode_content(message: &NdefMessage) -> Result<Vec<u8>> {
    let records = message.encode()?;

    let mut content = Vec::with_capacity(records.len() + 8);
    tlv::encode_block(NDEF_MESSAGE_TAG, &records, &mut content)?;
    content.push(TERMINATOR_TAG);

    let page = BYTES_PER_PAGE as usize;
    let padded = content.len().div_ceil(page) * page;
    content.resize(padded, 0);

    Ok(content)
}

pub fn decode_image(image: &[u8], sink: &mut dyn EventSink) -> Result<NdefMessage> {
    let capability = CapabilityContainer::from_image(image)?;
    sink.record(capability.to_event());

    let content = &image[CAPABILITY_CONTAINER_LENGTH..];
    let message = tlv::find_ndef_message(content, sink)?;

    NdefMessage::decode(message, sink)
}

/// Decode an image down to its text, see [`NdefMessage::text`] for which record is used
pub fn decode_text_image(image: &[u8], sink: &mut dyn EventSink) -> Result<TextPayload> {
    let message = decode_image(image, sink)?;
    message.text().cloned().ok_or(NdefError::NoNdefContent)
}
