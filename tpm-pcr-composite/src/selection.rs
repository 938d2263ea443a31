use crate::{wire, Error, PcrMask};

/// TPM_PCR_SELECTION
///
/// The size field is always the byte length of the mask, it only exists because the TPM expects
/// it on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PcrSelection {
    pub size: u16,
    pub mask: PcrMask,
}

impl PcrSelection {
    pub const SIZE: u16 = PcrMask::SIZE as u16;
    /// Encoded length of the size field plus the mask
    pub const ENCODED_LEN: usize = std::mem::size_of::<u16>() + PcrMask::SIZE;

    /// Selects the given PCRs, the order of the indices does not matter
    pub fn new(indices: impl IntoIterator<Item = u32>) -> Result<Self, Error> {
        let mut mask = PcrMask::new();

        for index in indices {
            mask.set_pcr(index)?;
        }

        Ok(mask.into())
    }

    pub(crate) fn encode(&self, writer: wire::Writer) -> wire::Writer {
        writer.add_u16(self.size).add_bytes(self.mask.as_bytes())
    }

    pub(crate) fn decode(reader: &mut wire::Reader<'_>) -> Result<Self, wire::Error> {
        let size = reader.read_u16()?;

        if size != Self::SIZE {
            return Err(wire::Error::UnexpectedSelectionSize(size));
        }

        let mask = PcrMask::from(reader.read_array::<{ PcrMask::SIZE }>()?);

        Ok(Self { size, mask })
    }
}

impl From<PcrMask> for PcrSelection {
    fn from(mask: PcrMask) -> Self {
        Self {
            size: Self::SIZE,
            mask,
        }
    }
}

impl std::fmt::Display for PcrSelection {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "PcrSelection {{ size: {:x}, mask: {} }}",
            self.size, self.mask
        )
    }
}
