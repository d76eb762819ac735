use tagpage_ndef::{
    BYTES_PER_PAGE, CAPABILITY_CONTAINER_LENGTH, Event, EventSink, FIRST_DATA_PAGE,
    capability::CapabilityContainer, image,
};
use tracing::{debug, warn};

use crate::{
    error::TagError,
    tag::{Session, Tag},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct WriteReport {
    pub pages_written: u16,
    pub bytes_written: u32,
}

/// Writes encoded content page by page after the capability container
#[derive(Debug)]
pub struct PageWriter<'a> {
    session: &'a Session<'a>,
}

impl<'a> PageWriter<'a> {
    pub fn new(session: &'a Session<'a>) -> Self {
        Self { session }
    }

    /// Read the capability container and refuse a write protected tag
    pub fn check_writable(
        &self,
        sink: &mut dyn EventSink,
    ) -> Result<CapabilityContainer, TagError> {
        let header = self
            .session
            .read_pages(0)
            .map_err(|error| TagError::ReadFailed {
                page: 0,
                error: error.to_string(),
            })?;

        let capability = CapabilityContainer::from_image(&header)?;
        sink.record(capability.to_event());

        if capability.is_write_protected() {
            warn!("tag is write protected, access byte 0x{:02X}", capability.access);
            return Err(TagError::WriteProtected);
        }

        Ok(capability)
    }

    /// Write `content` starting at the first data page, the last page is zero padded
    ///
    /// Stops at the first failed page, pages already written stay written
    pub fn write_content(
        &self,
        content: &[u8],
        sink: &mut dyn EventSink,
    ) -> Result<WriteReport, TagError> {
        let mut pages_written = 0_u16;

        for (index, chunk) in content.chunks(BYTES_PER_PAGE as usize).enumerate() {
            let page = FIRST_DATA_PAGE + index as u16;

            let mut data = [0_u8; BYTES_PER_PAGE as usize];
            data[..chunk.len()].copy_from_slice(chunk);

            if let Err(error) = self.session.write_page(page, &data) {
                warn!("write failed at page {page} after {pages_written} pages: {error}");
                return Err(TagError::WriteFailed {
                    page,
                    error: error.to_string(),
                });
            }

            sink.record(Event::PageWritten { page });
            pages_written += 1;
        }

        Ok(WriteReport {
            pages_written,
            bytes_written: pages_written as u32 * BYTES_PER_PAGE as u32,
        })
    }
}

/// Encode `text` and write it to the tag
///
/// Nothing is written when the tag is write protected or the message does not fit
pub fn write_text(tag: &Tag, text: &str, sink: &mut dyn EventSink) -> Result<WriteReport, TagError> {
    let image = image::encode_text_image(text)?;
    let content = &image[CAPABILITY_CONTAINER_LENGTH..];

    let session = tag.connect()?;
    let writer = PageWriter::new(&session);
    let capability = writer.check_writable(sink)?;

    if capability.is_ndef_formatted() {
        let capacity = capability.data_area_size();
        if content.len() > capacity {
            return Err(TagError::MessageTooLarge {
                needed: content.len() as u32,
                capacity: capacity as u32,
            });
        }
    } else {
        debug!("tag is not ndef formatted, magic 0x{:02X}", capability.magic);
    }

    writer.write_content(content, sink)
}
