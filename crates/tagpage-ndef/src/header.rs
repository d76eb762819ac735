use crate::ndef_type::NdefType;

const MESSAGE_BEGIN: u8 = 0b1000_0000;
const MESSAGE_END: u8 = 0b0100_0000;
const CHUNKED: u8 = 0b0010_0000;
const SHORT_RECORD: u8 = 0b0001_0000;
const HAS_ID_LENGTH: u8 = 0b0000_1000;

/// The first byte of every record, five flags and the type name format
///
/// Both the decoder and the encoder go through the `u8` conversions here
#[derive(Debug, Copy, Clone, PartialEq, Eq, uniffi::Record)]
pub struct RecordFlags {
    pub message_begin: bool,
    pub message_end: bool,
    pub chunked: bool,
    pub short_record: bool,
    pub has_id_length: bool,
    pub type_name_format: NdefType,
}

impl From<u8> for RecordFlags {
    fn from(byte: u8) -> Self {
        Self {
            message_begin: byte & MESSAGE_BEGIN != 0,
            message_end: byte & MESSAGE_END != 0,
            chunked: byte & CHUNKED != 0,
            short_record: byte & SHORT_RECORD != 0,
            has_id_length: byte & HAS_ID_LENGTH != 0,
            type_name_format: NdefType::from(byte),
        }
    }
}

impl From<RecordFlags> for u8 {
    fn from(flags: RecordFlags) -> Self {
        let mut byte = u8::from(flags.type_name_format);

        for (set, bit) in [
            (flags.message_begin, MESSAGE_BEGIN),
            (flags.message_end, MESSAGE_END),
            (flags.chunked, CHUNKED),
            (flags.short_record, SHORT_RECORD),
            (flags.has_id_length, HAS_ID_LENGTH),
        ] {
            if set {
                byte |= bit;
            }
        }

        byte
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NdefHeader {
    pub flags: RecordFlags,
    pub type_length: u8,
    pub payload_length: u32,
    pub id_length: Option<u8>,
}

impl NdefHeader {
    pub fn message_end(&self) -> bool {
        self.flags.message_end
    }

    pub fn type_name_format(&self) -> NdefType {
        self.flags.type_name_format
    }
}
