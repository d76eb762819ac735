//! Diagnostic events emitted while reading, decoding and writing a tag
//!
//! Events are advisory, nothing in the codec reads them back

use crate::{ndef_type::NdefType, payload::TextPayloadFormat};

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum Event {
    /// A block of pages was read starting at `start_page`
    PagesRead { start_page: u16, length: u32 },

    /// The read loop stopped early, the bytes read so far are still parsed
    ReadStopped { page: u16, reason: String },

    CapabilityContainer {
        magic: u8,
        version: u8,
        size: u8,
        access: u8,
    },

    TlvSkipped { offset: u32, tag: u8, length: u16 },
    NdefTlvFound { offset: u32, length: u16 },
    TerminatorReached { offset: u32 },

    RecordDecoded {
        index: u32,
        type_name_format: NdefType,
        type_: Vec<u8>,
        id: Option<Vec<u8>>,
        payload_length: u32,
    },

    TextDecoded {
        index: u32,
        language: String,
        format: TextPayloadFormat,
        text_length: u32,
    },

    UriDecoded { index: u32, uri: String },

    /// A record that carries no text, kept only for logging
    RecordPassthrough {
        index: u32,
        type_name_format: NdefType,
        type_: String,
        payload_hex: String,
    },

    PageWritten { page: u16 },
}

/// Ordered destination for diagnostic events
pub trait EventSink {
    fn record(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn record(&mut self, event: Event) {
        self.push(event);
    }
}

/// Forwards every event to `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceSink;

impl EventSink for TraceSink {
    fn record(&mut self, event: Event) {
        tracing::debug!(?event, "tag event");
    }
}
