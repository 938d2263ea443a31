//! TPM_PCR_COMPOSITE hashing
//!
//! The composite is `TPM_PCR_SELECTION || UINT32 valueSize || TPM_PCRVALUE[]`, hashed with SHA-1.
//! A single byte off here silently yields a digest the TPM will never reproduce.

use crate::{wire, Error, PcrMask, PcrSelection};

/// Size of a single PCR value
pub const PCR_SIZE: usize = 20;

const DIGEST_SIZE: usize = 20;

/// A SHA-1 digest as used by TPM 1.2 structures
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    pub const SIZE: usize = DIGEST_SIZE;

    pub fn sha1(data: &[u8]) -> Self {
        let digest = aws_lc_rs::digest::digest(&aws_lc_rs::digest::SHA1_FOR_LEGACY_USE_ONLY, data);
        let mut bytes = [0u8; Self::SIZE];

        bytes.copy_from_slice(digest.as_ref());

        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }

    pub(crate) fn decode(reader: &mut wire::Reader<'_>) -> Result<Self, wire::Error> {
        reader.read_array::<{ Self::SIZE }>().map(Self)
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&wire::HexBytes(&self.0), formatter)
    }
}

/// Serializes the composite pre-image for a mask and the concatenated values of the selected PCRs
pub fn composite_buffer(mask: PcrMask, pcr_values: &[u8]) -> Result<Vec<u8>, Error> {
    if pcr_values.len() % PCR_SIZE != 0 {
        return Err(Error::MalformedPcrValues(pcr_values.len()));
    }

    let writer = wire::Writer::with_capacity(
        PcrSelection::ENCODED_LEN + std::mem::size_of::<u32>() + pcr_values.len(),
    );

    Ok(PcrSelection::from(mask)
        .encode(writer)
        .add_sized_bytes_u32(pcr_values)?
        .build())
}

/// Computes the composite digest the TPM compares against for the given PCR state
pub fn composite(mask: PcrMask, pcr_values: &[u8]) -> Result<Digest, Error> {
    let buffer = composite_buffer(mask, pcr_values)?;

    log::debug!("Composite buffer for mask {mask}: {}", wire::HexBytes(&buffer));

    let digest = Digest::sha1(&buffer);

    log::debug!("SHA-1 of composite buffer: {digest}");

    Ok(digest)
}
