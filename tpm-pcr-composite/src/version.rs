//! TPM_CAP_VERSION_INFO
//!
//! The structure ends in a vendor-specific blob without its own length. Its size follows from the
//! length of the enclosing frame, e.g. the `versionInfoSize` field of a TPM_Quote2 response.

use crate::{tags, wire, Error};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CapVersionInfoFixed {
    pub tag: u16,
    pub version: u32,
    pub spec_level: u16,
    pub errata_rev: u8,
    pub vendor_id: u8,
}

impl CapVersionInfoFixed {
    pub const ENCODED_LEN: usize = 2 + 4 + 2 + 1 + 1;
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CapVersionInfo {
    pub fixed: CapVersionInfoFixed,
    pub vendor_specific: Vec<u8>,
}

impl CapVersionInfo {
    /// Parses a complete version info frame, everything after the fixed part is vendor specific
    pub fn parse(frame: &[u8]) -> Result<Self, Error> {
        let mut reader = wire::Reader::new(frame);

        let fixed = CapVersionInfoFixed {
            tag: reader.read_u16()?,
            version: reader.read_u32()?,
            spec_level: reader.read_u16()?,
            errata_rev: reader.read_u8()?,
            vendor_id: reader.read_u8()?,
        };

        if fixed.tag != tags::TPM_TAG_CAP_VERSION_INFO {
            log::debug!("Unexpected capability version tag {:#06x}", fixed.tag);
        }

        Ok(Self {
            fixed,
            vendor_specific: reader.read_rest().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_specific_takes_rest_of_frame() {
        let frame = [
            0x00, 0x30, // tag
            0x01, 0x02, 0x03, 0x05, // version
            0x00, 0x02, // spec level
            0x03, // errata revision
            0x49, // vendor ID
            0xde, 0xad, 0xbe, 0xef,
        ];

        let version_info = CapVersionInfo::parse(&frame).unwrap();

        assert_eq!(
            version_info.fixed,
            CapVersionInfoFixed {
                tag: tags::TPM_TAG_CAP_VERSION_INFO,
                version: 0x01020305,
                spec_level: 2,
                errata_rev: 3,
                vendor_id: 0x49,
            }
        );
        assert_eq!(version_info.vendor_specific, [0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn empty_vendor_specific() {
        let frame = [0u8; CapVersionInfoFixed::ENCODED_LEN];

        assert!(CapVersionInfo::parse(&frame)
            .unwrap()
            .vendor_specific
            .is_empty());
    }

    #[test]
    fn short_frame_is_rejected() {
        assert!(matches!(
            CapVersionInfo::parse(&[0x00, 0x30, 0x01]),
            Err(Error::Serialization(wire::Error::Truncated))
        ));
    }
}
