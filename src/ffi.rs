use parking_lot::Mutex;
use tagpage_ndef::{BYTES_PER_PAGE, Event, EventSink as _, TraceSink, image};
use tagpage_util::hex_pages;

use crate::{
    config::TagConfig,
    error::TagError,
    reader::{self, TagText},
    tag::{PageTagAccess, Tag},
    writer::{self, WriteReport},
};

/// Entry point for the host, one client per discovered tag
///
/// Calls from different threads are serialized, only one session is ever open
#[derive(Debug, uniffi::Object)]
pub struct TagClient {
    tag: Mutex<Tag>,
    config: TagConfig,
    last_events: Mutex<Vec<Event>>,
}

#[uniffi::export]
impl TagClient {
    #[uniffi::constructor(default(config = None))]
    pub fn new(access: Box<dyn PageTagAccess>, config: Option<TagConfig>) -> Self {
        Self {
            tag: Mutex::new(Tag::new(access)),
            config: config.unwrap_or_default(),
            last_events: Mutex::new(Vec::new()),
        }
    }

    #[uniffi::method]
    pub fn read_text(&self) -> Result<TagText, TagError> {
        self.with_session(|tag, events| reader::read_text(tag, &self.config, events))
    }

    #[uniffi::method]
    pub fn write_text(&self, text: String) -> Result<WriteReport, TagError> {
        self.with_session(|tag, events| writer::write_text(tag, &text, events))
    }

    /// Raw pages as hex, one page per line
    #[uniffi::method]
    pub fn read_page_dump(&self) -> Result<String, TagError> {
        let image =
            self.with_session(|tag, events| reader::read_image(tag, &self.config, events))?;
        Ok(hex_pages(&image.bytes, BYTES_PER_PAGE as usize))
    }

    /// Events from the last read or write, in the order they happened
    #[uniffi::method]
    pub fn last_events(&self) -> Vec<Event> {
        self.last_events.lock().clone()
    }
}

impl TagClient {
    /// Run one tag operation holding the tag lock, its events replace the last ones
    /// before the lock is released
    fn with_session<T>(
        &self,
        operation: impl FnOnce(&Tag, &mut Vec<Event>) -> Result<T, TagError>,
    ) -> Result<T, TagError> {
        let tag = self.tag.lock();

        let mut events = Vec::new();
        let result = operation(&tag, &mut events);

        let mut trace = TraceSink;
        for event in &events {
            trace.record(event.clone());
        }

        *self.last_events.lock() = events;
        drop(tag);

        result
    }
}

#[uniffi::export]
fn decode_text_image(image: Vec<u8>) -> Result<String, TagError> {
    let payload = image::decode_text_image(&image, &mut TraceSink)?;
    Ok(payload.text)
}

#[uniffi::export]
fn encode_text_image(text: String) -> Result<Vec<u8>, TagError> {
    Ok(image::encode_text_image(&text)?)
}

#[uniffi::export]
fn page_dump(image: Vec<u8>) -> String {
    hex_pages(&image, BYTES_PER_PAGE as usize)
}

#[uniffi::export]
fn init_logging() {
    crate::logging::init();
}
