use crate::{
    error::{NdefError, Result},
    header::{NdefHeader, RecordFlags},
    ndef_type::NdefType,
    payload::{NdefPayload, TextPayload, TextPayloadFormat},
    text::DEFAULT_LANGUAGE,
};

/// Type of a well known text record
pub const TEXT_TYPE: &[u8] = b"T";

/// Type of a well known URI record
pub const URI_TYPE: &[u8] = b"U";

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NdefRecord {
    pub header: NdefHeader,
    pub type_: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: NdefPayload,
}

impl NdefRecord {
    /// A single record message holding `text` in the default language
    pub fn text(text: &str) -> Self {
        let payload = TextPayload {
            format: TextPayloadFormat::Utf8,
            language: DEFAULT_LANGUAGE.to_string(),
            text: text.to_string(),
        };

        let payload_length = (1 + DEFAULT_LANGUAGE.len() + text.len()) as u32;

        let flags = RecordFlags {
            message_begin: true,
            message_end: true,
            chunked: false,
            short_record: payload_length <= u8::MAX as u32,
            has_id_length: false,
            type_name_format: NdefType::WellKnown,
        };

        Self {
            header: NdefHeader {
                flags,
                type_length: TEXT_TYPE.len() as u8,
                payload_length,
                id_length: None,
            },
            type_: TEXT_TYPE.to_vec(),
            id: None,
            payload: NdefPayload::Text(payload),
        }
    }

    /// Serialize the record, lengths are taken from the fields rather than the header
    ///
    /// The short record flag is dropped when the payload does not fit in one byte
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload = self.payload.to_bytes();
        let payload_length =
            u32::try_from(payload.len()).map_err(|_| NdefError::MessageTooLong(u32::MAX))?;

        let type_length = u8::try_from(self.type_.len())
            .map_err(|_| NdefError::MessageTooLong(self.type_.len() as u32))?;

        let id_length = match &self.id {
            Some(id) => Some(
                u8::try_from(id.len()).map_err(|_| NdefError::MessageTooLong(id.len() as u32))?,
            ),
            None => None,
        };

        let flags = RecordFlags {
            short_record: self.header.flags.short_record && payload_length <= u8::MAX as u32,
            has_id_length: id_length.is_some(),
            ..self.header.flags
        };

        let mut bytes = Vec::with_capacity(7 + self.type_.len() + payload.len());
        bytes.push(u8::from(flags));
        bytes.push(type_length);

        if flags.short_record {
            bytes.push(payload_length as u8);
        } else {
            bytes.extend_from_slice(&payload_length.to_be_bytes());
        }

        if let Some(id_length) = id_length {
            bytes.push(id_length);
        }

        bytes.extend_from_slice(&self.type_);
        if let Some(id) = &self.id {
            bytes.extend_from_slice(id);
        }
        bytes.extend_from_slice(&payload);

        Ok(bytes)
    }

    pub fn is_text(&self) -> bool {
        self.header.type_name_format() == NdefType::WellKnown && self.type_ == TEXT_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_record_bytes() {
        let bytes = NdefRecord::text("test").encode().unwrap();
        assert_eq!(
            bytes,
            vec![0xD1, 0x01, 0x07, 0x54, 0x02, 0x65, 0x6E, 0x74, 0x65, 0x73, 0x74]
        );
    }

    #[test]
    fn long_text_uses_four_byte_length() {
        let text = "a".repeat(300);
        let record = NdefRecord::text(&text);
        assert!(!record.header.flags.short_record);

        let bytes = record.encode().unwrap();
        assert_eq!(bytes[0], 0xC1);
        assert_eq!(&bytes[2..6], &303_u32.to_be_bytes());
        assert_eq!(bytes[6], b'T');
        assert_eq!(bytes.len(), 7 + 303);
    }

    #[test]
    fn largest_short_text() {
        let text = "a".repeat(252);
        let bytes = NdefRecord::text(&text).encode().unwrap();

        assert_eq!(bytes[0], 0xD1);
        assert_eq!(bytes[2], 0xFF);
    }

    #[test]
    fn id_sets_il_flag() {
        let mut record = NdefRecord::text("x");
        record.id = Some(b"id".to_vec());

        let bytes = record.encode().unwrap();
        assert_eq!(bytes[0], 0xD9);
        assert_eq!(&bytes[..7], &[0xD9, 0x01, 0x04, 0x02, b'T', b'i', b'd']);
    }
}
