//! Codec for NDEF text on page addressed tags
//!
//! Read path: [`image::decode_image`] takes the raw page image, reads the
//! capability container, walks the TLV stream ([`tlv`]) to the NDEF message,
//! decodes its records ([`parser`]) and the text payload ([`text`]).
//! The write path in [`image::encode_text_image`] is the exact inverse.

pub mod capability;
pub mod error;
pub mod event;
pub mod header;
pub mod image;
pub mod message;
pub mod ndef_type;
pub mod parser;
pub mod payload;
pub mod record;
pub mod text;
pub mod tlv;

pub use error::NdefError;
pub use event::{Event, EventSink, TraceSink};
pub use message::NdefMessage;

uniffi::setup_scaffolding!();

/// Number of bytes per page of tag memory
pub const BYTES_PER_PAGE: u16 = 4;

/// Number of pages returned by one read call
pub const PAGES_PER_READ: u16 = 4;

/// Pages 0 to 3 hold the capability container
pub const CAPABILITY_CONTAINER_LENGTH: usize = 16;

/// First page after the capability container
pub const FIRST_DATA_PAGE: u16 = 4;

/// Pages 0 to 3 as written into every encoded image
pub const DEFAULT_CAPABILITY_CONTAINER: [u8; CAPABILITY_CONTAINER_LENGTH] = [
    0x04, 0x35, 0x79, 0xC0, // page 0
    0x52, 0x4A, 0x74, 0x80, // page 1
    0xEC, 0x48, 0x00, 0x00, // page 2
    0xE1, 0x11, 0x12, 0x00, // page 3, ndef magic, version 1.1, 144 bytes, read/write
];
