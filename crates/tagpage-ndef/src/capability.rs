use crate::{
    CAPABILITY_CONTAINER_LENGTH,
    error::{NdefError, Result},
    event::Event,
};

/// Magic number of a container formatted for NDEF
pub const NDEF_MAGIC: u8 = 0xE1;

/// Low nibble of the access byte, 0 means writes are allowed
const WRITE_ACCESS_MASK: u8 = 0x0F;

/// Bytes of data area per unit of the size byte
const SIZE_UNIT: usize = 8;

/// The 4 byte capability container held in page 3
#[derive(Debug, Copy, Clone, PartialEq, Eq, uniffi::Record)]
pub struct CapabilityContainer {
    pub magic: u8,
    pub version: u8,
    pub size: u8,
    pub access: u8,
}

impl CapabilityContainer {
    /// Read the container from the first 16 bytes of a tag image
    pub fn from_image(image: &[u8]) -> Result<Self> {
        if image.len() < CAPABILITY_CONTAINER_LENGTH {
            return Err(NdefError::MalformedTlv(format!(
                "image of {} bytes is shorter than the capability container",
                image.len()
            )));
        }

        let [magic, version, size, access] = [image[12], image[13], image[14], image[15]];
        Ok(Self {
            magic,
            version,
            size,
            access,
        })
    }

    pub fn is_ndef_formatted(&self) -> bool {
        self.magic == NDEF_MAGIC
    }

    pub fn is_write_protected(&self) -> bool {
        self.access & WRITE_ACCESS_MASK != 0
    }

    /// Bytes available for TLV content after the container
    pub fn data_area_size(&self) -> usize {
        self.size as usize * SIZE_UNIT
    }

    pub fn to_event(&self) -> Event {
        Event::CapabilityContainer {
            magic: self.magic,
            version: self.version,
            size: self.size,
            access: self.access,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_CAPABILITY_CONTAINER;

    #[test]
    fn default_container() {
        let cc = CapabilityContainer::from_image(&DEFAULT_CAPABILITY_CONTAINER).unwrap();

        assert!(cc.is_ndef_formatted());
        assert!(!cc.is_write_protected());
        assert_eq!(cc.version, 0x11);
        assert_eq!(cc.data_area_size(), 144);
    }

    #[test]
    fn read_only_container() {
        let mut image = DEFAULT_CAPABILITY_CONTAINER;
        image[15] = 0x0F;

        let cc = CapabilityContainer::from_image(&image).unwrap();
        assert!(cc.is_write_protected());
    }

    #[test]
    fn read_restriction_alone_does_not_block_writes() {
        let mut image = DEFAULT_CAPABILITY_CONTAINER;
        image[15] = 0x80;

        let cc = CapabilityContainer::from_image(&image).unwrap();
        assert!(!cc.is_write_protected());
    }

    #[test]
    fn blank_container() {
        let cc = CapabilityContainer::from_image(&[0; 16]).unwrap();
        assert!(!cc.is_ndef_formatted());
    }

    #[test]
    fn short_image() {
        let error = CapabilityContainer::from_image(&[0xE1; 15]).unwrap_err();
        assert!(matches!(error, NdefError::MalformedTlv(_)));
    }
}
