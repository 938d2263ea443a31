use crate::Error;

/// Number of addressable PCRs
pub const PCR_COUNT: u32 = 24;

const MASK_SIZE: usize = (PCR_COUNT / 8) as usize;

/// A set of PCRs, one bit per PCR
///
/// PCR `i` is bit `i % 8` of byte `i / 8`, least significant bit first. This matches the
/// `pcrSelect` bit order of the TPM.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct PcrMask([u8; MASK_SIZE]);

impl PcrMask {
    pub const SIZE: usize = MASK_SIZE;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pcr(&mut self, index: u32) -> Result<(), Error> {
        let (byte, bit) = Self::locate(index)?;

        self.0[byte] |= bit;

        Ok(())
    }

    pub fn is_pcr_set(&self, index: u32) -> Result<bool, Error> {
        let (byte, bit) = Self::locate(index)?;

        Ok(self.0[byte] & bit == bit)
    }

    /// Selected PCRs in ascending order
    pub fn indices(&self) -> Vec<u32> {
        (0..PCR_COUNT)
            .filter(|&index| self.0[(index / 8) as usize] & (1 << (index % 8)) != 0)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == [0; Self::SIZE]
    }

    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }

    fn locate(index: u32) -> Result<(usize, u8), Error> {
        if index >= PCR_COUNT {
            return Err(Error::InvalidIndex(index));
        }

        Ok(((index / 8) as usize, 1 << (index % 8)))
    }
}

impl From<[u8; MASK_SIZE]> for PcrMask {
    fn from(bytes: [u8; MASK_SIZE]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for PcrMask {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{:02x} {:02x} {:02x}", self.0[0], self.0[1], self.0[2])
    }
}
