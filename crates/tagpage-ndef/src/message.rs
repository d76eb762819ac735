use tagpage_macros::impl_default_for;

use crate::{
    error::Result,
    event::EventSink,
    parser,
    payload::{NdefPayload, TextPayload},
    record::NdefRecord,
};

impl_default_for!(NdefMessage);

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NdefMessage {
    pub records: Vec<NdefRecord>,
}

impl NdefMessage {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            records: vec![NdefRecord::text(text)],
        }
    }

    pub fn decode(bytes: &[u8], sink: &mut dyn EventSink) -> Result<Self> {
        let records = parser::decode_records(bytes, sink)?;
        Ok(Self { records })
    }

    /// The text of the message
    ///
    /// Every text record overwrites the previous one, so the last text record wins
    pub fn text(&self) -> Option<&TextPayload> {
        let mut text = None;
        for record in &self.records {
            if let NdefPayload::Text(payload) = &record.payload {
                if record.is_text() {
                    text = Some(payload);
                }
            }
        }

        text
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        for record in &self.records {
            bytes.extend(record.encode()?);
        }

        Ok(bytes)
    }
}
