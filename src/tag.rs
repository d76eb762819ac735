use std::{fmt::Debug, sync::Arc};

use tracing::debug;

use crate::error::TagError;

/// Page read/write primitive implemented by the host platform
///
/// `read_pages` returns the 16 bytes of 4 consecutive pages starting at
/// `start_page`, `write_page` writes exactly one 4 byte page
#[uniffi::export(callback_interface)]
pub trait PageTagAccess: Send + Sync + Debug + 'static {
    fn connect(&self) -> Result<(), TagAccessError>;
    fn read_pages(&self, start_page: u16) -> Result<Vec<u8>, TagAccessError>;
    fn write_page(&self, page: u16, data: Vec<u8>) -> Result<(), TagAccessError>;
    fn close(&self);
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum TagAccessError {
    #[error("tag does not expose page addressed memory")]
    Unsupported,

    #[error("tag i/o failed: {0}")]
    Io(String),
}

/// The host threw something other than a `TagAccessError`, usually the tag
/// leaving the field mid call
impl From<uniffi::UnexpectedUniFFICallbackError> for TagAccessError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Io(error.reason)
    }
}

#[derive(Debug, Clone)]
pub struct Tag(Arc<Box<dyn PageTagAccess>>);

impl Tag {
    pub fn new(access: Box<dyn PageTagAccess>) -> Self {
        Self(Arc::new(access))
    }

    /// Connect to the tag, the connection is closed when the session is dropped
    pub fn connect(&self) -> Result<Session<'_>, TagError> {
        let access: &dyn PageTagAccess = &**self.0;

        if let Err(error) = access.connect() {
            debug!("unable to connect to tag: {error}");
            access.close();

            return Err(match error {
                TagAccessError::Unsupported => TagError::UnsupportedTag,
                TagAccessError::Io(error) => TagError::ConnectionFailed(error),
            });
        }

        debug!("tag session opened");
        Ok(Session { access })
    }
}

/// One connection to a tag, never shared between threads
#[derive(Debug)]
pub struct Session<'a> {
    access: &'a dyn PageTagAccess,
}

impl Session<'_> {
    pub fn read_pages(&self, start_page: u16) -> Result<Vec<u8>, TagAccessError> {
        self.access.read_pages(start_page)
    }

    pub fn write_page(&self, page: u16, data: &[u8]) -> Result<(), TagAccessError> {
        self.access.write_page(page, data.to_vec())
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.access.close();
        debug!("tag session closed");
    }
}
