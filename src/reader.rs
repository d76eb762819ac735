use tagpage_ndef::{BYTES_PER_PAGE, Event, EventSink, image};
use tracing::{debug, warn};

use crate::{
    config::TagConfig,
    error::TagError,
    tag::{Session, Tag},
};

/// Raw bytes read from a tag, in page order starting at page 0
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct PageImage {
    pub bytes: Vec<u8>,

    /// First page that could not be read, `None` if the ceiling was reached
    pub truncated_at: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TagText {
    pub text: String,
    pub language: String,

    /// The read stopped early, the text came from a partial image
    pub truncated: bool,
}

/// Pulls the memory image of a tag block by block
#[derive(Debug)]
pub struct PageReader<'a> {
    session: &'a Session<'a>,
    config: TagConfig,
}

impl<'a> PageReader<'a> {
    pub fn new(session: &'a Session<'a>, config: TagConfig) -> Self {
        Self { session, config }
    }

    /// Read from page 0 until the page ceiling or the first failed read
    ///
    /// A failed read is not an error, everything read before it is returned.
    /// Failing pages are not retried
    pub fn read_image(&self, sink: &mut dyn EventSink) -> PageImage {
        let max_pages = self.config.max_pages;
        let pages_per_read = self.config.pages_per_read();
        let bytes_per_read = self.config.bytes_per_read();

        let mut bytes = Vec::with_capacity(self.config.max_bytes());
        let mut truncated_at = None;
        let mut page = 0_u16;

        while page < max_pages {
            let block = match self.session.read_pages(page) {
                Ok(block) => block,
                Err(error) => {
                    warn!("read stopped at page {page}: {error}");
                    sink.record(Event::ReadStopped {
                        page,
                        reason: error.to_string(),
                    });

                    truncated_at = Some(page);
                    break;
                }
            };

            sink.record(Event::PagesRead {
                start_page: page,
                length: block.len() as u32,
            });

            let short = block.len() < bytes_per_read;
            let pages_in_block = (block.len() / BYTES_PER_PAGE as usize) as u16;
            bytes.extend(block);

            if short {
                let next_page = page.saturating_add(pages_in_block);
                warn!("short read at page {page}, stopping at {next_page}");
                sink.record(Event::ReadStopped {
                    page: next_page,
                    reason: "short read".to_string(),
                });

                truncated_at = Some(next_page);
                break;
            }

            page = page.saturating_add(pages_per_read);
        }

        bytes.truncate(self.config.max_bytes());
        debug!("read {} bytes from tag", bytes.len());

        PageImage {
            bytes,
            truncated_at,
        }
    }
}

/// Connect and read the raw image, the session is closed before returning
pub fn read_image(
    tag: &Tag,
    config: &TagConfig,
    sink: &mut dyn EventSink,
) -> Result<PageImage, TagError> {
    let session = tag.connect()?;
    let image = PageReader::new(&session, *config).read_image(sink);

    Ok(image)
}

/// Read the tag and decode its text, a truncated read is parsed with what was read
pub fn read_text(
    tag: &Tag,
    config: &TagConfig,
    sink: &mut dyn EventSink,
) -> Result<TagText, TagError> {
    let image = read_image(tag, config, sink)?;
    let payload = image::decode_text_image(&image.bytes, sink)?;

    Ok(TagText {
        text: payload.text,
        language: payload.language,
        truncated: image.truncated_at.is_some(),
    })
}
