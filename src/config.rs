use serde::{Deserialize, Serialize};
use tagpage_macros::impl_default_for;
use tagpage_ndef::{BYTES_PER_PAGE, PAGES_PER_READ};

/// Page count of the tag class declared by the default capability container
pub const DEFAULT_MAX_PAGES: u16 = 45;

impl_default_for!(TagConfig);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct TagConfig {
    /// Reading stops once this many pages have been read
    pub max_pages: u16,

    /// Pages returned by one read call of the host primitive
    pub pages_per_read: u16,
}

impl TagConfig {
    pub fn new() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            pages_per_read: PAGES_PER_READ,
        }
    }

    /// Never 0, so the read loop always advances
    pub fn pages_per_read(&self) -> u16 {
        self.pages_per_read.max(1)
    }

    pub fn max_bytes(&self) -> usize {
        self.max_pages as usize * BYTES_PER_PAGE as usize
    }

    pub fn bytes_per_read(&self) -> usize {
        self.pages_per_read() as usize * BYTES_PER_PAGE as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TagConfig::default();
        assert_eq!(config.max_pages, 45);
        assert_eq!(config.pages_per_read, 4);
        assert_eq!(config.max_bytes(), 180);
        assert_eq!(config.bytes_per_read(), 16);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: TagConfig = serde_json::from_str(r#"{ "max_pages": 231 }"#).unwrap();

        assert_eq!(config.max_pages, 231);
        assert_eq!(config.pages_per_read, 4);
    }

    #[test]
    fn zero_pages_per_read() {
        let config = TagConfig {
            pages_per_read: 0,
            ..TagConfig::default()
        };

        assert_eq!(config.pages_per_read(), 1);
    }
}
