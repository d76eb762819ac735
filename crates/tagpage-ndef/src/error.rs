#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum NdefError {
    /// A length field points outside the buffer, or the TLV stream ran out
    /// before an NDEF message or a terminator was found
    #[error("malformed tlv: {0}")]
    MalformedTlv(String),

    #[error("terminator reached before any ndef message")]
    NoNdefMessage,

    #[error("ndef message has no text record")]
    NoNdefContent,

    #[error("message of {0} bytes does not fit in a tlv block")]
    MessageTooLong(u32),
}

pub type Error = NdefError;
pub type Result<T, E = Error> = std::result::Result<T, E>;
