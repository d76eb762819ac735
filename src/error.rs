use tagpage_ndef::NdefError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum TagError {
    #[error("tag does not expose page addressed memory")]
    UnsupportedTag,

    #[error("unable to connect to tag: {0}")]
    ConnectionFailed(String),

    /// The capability container could not be read before writing
    #[error("unable to read page {page}: {error}")]
    ReadFailed { page: u16, error: String },

    #[error("malformed tag content: {0}")]
    MalformedTlv(String),

    #[error("tag has no ndef text content")]
    NoNdefContent,

    #[error("tag is write protected")]
    WriteProtected,

    /// Pages before `page` were already written and are not rolled back
    #[error("writing page {page} failed: {error}")]
    WriteFailed { page: u16, error: String },

    #[error("message needs {needed} bytes, tag holds {capacity}")]
    MessageTooLarge { needed: u32, capacity: u32 },
}

impl From<NdefError> for TagError {
    fn from(error: NdefError) -> Self {
        match error {
            NdefError::MalformedTlv(error) => Self::MalformedTlv(error),
            NdefError::NoNdefMessage | NdefError::NoNdefContent => Self::NoNdefContent,
            NdefError::MessageTooLong(needed) => Self::MessageTooLarge {
                needed,
                capacity: u16::MAX as u32 - 1,
            },
        }
    }
}
