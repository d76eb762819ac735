//! Read and write NDEF text on page addressed proximity tags
//!
//! The host platform discovers the tag and implements [`tag::PageTagAccess`],
//! everything above the raw page calls lives here and in `tagpage-ndef`

pub mod config;
pub mod error;
pub mod ffi;
pub mod reader;
pub mod tag;
pub mod writer;

pub(crate) mod logging;

pub use config::TagConfig;
pub use error::TagError;
pub use reader::{PageReader, read_text};
pub use tag::{PageTagAccess, Tag, TagAccessError};
pub use tagpage_ndef as ndef;
pub use writer::{PageWriter, write_text};

uniffi::setup_scaffolding!();
