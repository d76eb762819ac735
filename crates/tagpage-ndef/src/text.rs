use tagpage_util::result_ext::ResultExt as _;
use winnow::{
    ModalResult, Parser,
    binary::be_u8,
    error::StrContext,
    token::{rest, take},
};

use crate::{
    error::{NdefError, Result},
    parser::stream::{self, Stream},
    payload::{TextPayload, TextPayloadFormat},
};

/// Language written by [`encode_text`]
pub const DEFAULT_LANGUAGE: &str = "en";

const UTF16: u8 = 0b1000_0000;
const LANGUAGE_LENGTH_MASK: u8 = 0b0011_1111;

/// Status byte of a text record, bit 7 is the encoding, bits 0-5 the language length
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextStatus {
    pub format: TextPayloadFormat,
    pub language_length: u8,
}

impl From<u8> for TextStatus {
    fn from(byte: u8) -> Self {
        let format = if byte & UTF16 != 0 {
            TextPayloadFormat::Utf16
        } else {
            TextPayloadFormat::Utf8
        };

        Self {
            format,
            language_length: byte & LANGUAGE_LENGTH_MASK,
        }
    }
}

impl From<TextStatus> for u8 {
    fn from(status: TextStatus) -> Self {
        let utf16 = match status.format {
            TextPayloadFormat::Utf8 => 0,
            TextPayloadFormat::Utf16 => UTF16,
        };

        utf16 | (status.language_length & LANGUAGE_LENGTH_MASK)
    }
}

/// Decode a text record payload
///
/// The text is always read as UTF-8, the UTF-16 bit is only reported back in
/// [`TextPayload::format`]
pub fn decode_text(payload: &[u8]) -> Result<TextPayload> {
    let mut input = stream::new(payload);
    parse_text
        .parse_next(&mut input)
        .map_err_str(NdefError::MalformedTlv)
}

fn parse_text(input: &mut Stream<'_>) -> ModalResult<TextPayload> {
    let status = be_u8
        .map(TextStatus::from)
        .context(StrContext::Label("text status"))
        .parse_next(input)?;

    let language: &[u8] = take(status.language_length as usize)
        .context(StrContext::Label("language code"))
        .parse_next(input)?;

    let text: &[u8] = rest.parse_next(input)?;

    Ok(TextPayload {
        format: status.format,
        language: String::from_utf8_lossy(language).to_string(),
        text: String::from_utf8_lossy(text).to_string(),
    })
}

/// Encode `text` as a UTF-8 text record payload in [`DEFAULT_LANGUAGE`]
pub fn encode_text(text: &str) -> Vec<u8> {
    encode_with_language(DEFAULT_LANGUAGE, text)
}

fn encode_with_language(language: &str, text: &str) -> Vec<u8> {
    let language = language.as_bytes();
    let language = &language[..language.len().min(LANGUAGE_LENGTH_MASK as usize)];

    let status = TextStatus {
        format: TextPayloadFormat::Utf8,
        language_length: language.len() as u8,
    };

    let mut payload = Vec::with_capacity(1 + language.len() + text.len());
    payload.push(u8::from(status));
    payload.extend_from_slice(language);
    payload.extend_from_slice(text.as_bytes());
    payload
}

impl TextPayload {
    /// Payload bytes for this text, always written as UTF-8
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_with_language(&self.language, &self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_english_text() {
        let payload = [0x02, b'e', b'n', b't', b'e', b's', b't'];
        let text = decode_text(&payload).unwrap();

        assert_eq!(text.format, TextPayloadFormat::Utf8);
        assert_eq!(text.language, "en");
        assert_eq!(text.text, "test");
    }

    #[test]
    fn encode_english_text() {
        assert_eq!(
            encode_text("test"),
            vec![0x02, b'e', b'n', b't', b'e', b's', b't']
        );
    }

    #[test]
    fn decode_empty_text() {
        let text = decode_text(&[0x02, b'e', b'n']).unwrap();
        assert_eq!(text.language, "en");
        assert_eq!(text.text, "");
    }

    #[test]
    fn status_reserved_bit_is_ignored() {
        let status = TextStatus::from(0b0100_0010);
        assert_eq!(status.format, TextPayloadFormat::Utf8);
        assert_eq!(status.language_length, 2);
    }

    #[test]
    fn utf16_flag_is_reported_but_text_read_as_utf8() {
        let payload = [0x82, b'e', b'n', b'h', b'i'];
        let text = decode_text(&payload).unwrap();

        assert_eq!(text.format, TextPayloadFormat::Utf16);
        assert_eq!(text.text, "hi");
    }

    #[test]
    fn language_length_past_payload_end() {
        let mut payload = vec![0x3F];
        payload.extend_from_slice(b"en-US plus a bit");
        assert!(payload.len() < 1 + 63);

        let error = decode_text(&payload).unwrap_err();
        assert!(matches!(error, NdefError::MalformedTlv(_)));
    }

    #[test]
    fn missing_status_byte() {
        let error = decode_text(&[]).unwrap_err();
        assert!(matches!(error, NdefError::MalformedTlv(_)));
    }

    #[test]
    fn multibyte_text() {
        let encoded = encode_text("héllo wörld ✓");
        assert_eq!(decode_text(&encoded).unwrap().text, "héllo wörld ✓");
    }

    #[test]
    fn other_language_is_kept_when_re_encoded() {
        let payload = [0x05, b'p', b't', b'-', b'B', b'R', b'o', b'l', b'a'];
        let text = decode_text(&payload).unwrap();

        assert_eq!(text.language, "pt-BR");
        assert_eq!(text.to_bytes(), payload.to_vec());
    }
}
