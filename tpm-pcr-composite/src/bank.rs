//! A software model of the SHA-1 PCR bank
//!
//! Lets a verifier precompute the values a TPM should hold after a known sequence of
//! measurements, without access to the TPM itself.

use crate::{Digest, Error, PcrValueSource, PCR_COUNT};

#[derive(Clone, Default, Debug)]
pub struct SoftwarePcrs {
    digests: [Digest; PCR_COUNT as usize],
}

impl SoftwarePcrs {
    /// All PCRs start out zeroed, like after a TPM reset
    pub fn new() -> Self {
        Self::default()
    }

    /// `PCR[index] = SHA-1(PCR[index] || measurement)`
    pub fn extend(&mut self, index: u32, measurement: &Digest) -> Result<&Digest, Error> {
        let pcr = self
            .digests
            .get_mut(index as usize)
            .ok_or(Error::InvalidIndex(index))?;

        *pcr = Digest::sha1(
            &[
                pcr.as_bytes().as_slice(),
                measurement.as_bytes().as_slice(),
            ]
            .concat(),
        );

        log::debug!("[PCR{index}] extended with {measurement}: {pcr}");

        Ok(pcr)
    }

    pub fn value(&self, index: u32) -> Result<&Digest, Error> {
        self.digests
            .get(index as usize)
            .ok_or(Error::InvalidIndex(index))
    }
}

impl PcrValueSource for SoftwarePcrs {
    type Error = Error;

    fn read_pcr_values(&mut self, indices: &[u32]) -> Result<Vec<u8>, Self::Error> {
        indices
            .iter()
            .map(|&index| self.value(index).map(|digest| digest.as_bytes().to_vec()))
            .collect::<Result<Vec<_>, _>>()
            .map(|values| values.concat())
    }
}
