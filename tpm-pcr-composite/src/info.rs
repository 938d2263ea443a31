//! TPM_PCR_INFO_LONG and TPM_PCR_INFO_SHORT

use crate::{composite, tags, wire, Digest, Error, PcrMask, PcrSelection, PcrValueSource};

/// PCR state an object is bound to, at creation and at release
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PcrInfoLong {
    pub tag: u16,
    pub locality_at_creation: u8,
    pub locality_at_release: u8,
    pub creation_pcr_selection: PcrSelection,
    pub release_pcr_selection: PcrSelection,
    pub digest_at_creation: Digest,
    pub digest_at_release: Digest,
}

impl PcrInfoLong {
    pub const ENCODED_LEN: usize = std::mem::size_of::<u16>()
        + 2
        + 2 * PcrSelection::ENCODED_LEN
        + 2 * Digest::SIZE;

    pub fn to_bytes(&self) -> Vec<u8> {
        let writer = wire::Writer::with_capacity(Self::ENCODED_LEN)
            .add_u16(self.tag)
            .add_u8(self.locality_at_creation)
            .add_u8(self.locality_at_release);
        let writer = self.creation_pcr_selection.encode(writer);

        self.release_pcr_selection
            .encode(writer)
            .add_bytes(self.digest_at_creation.as_ref())
            .add_bytes(self.digest_at_release.as_ref())
            .build()
    }
}

impl std::fmt::Display for PcrInfoLong {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "PcrInfoLong {{ tag: {:x}, locality_at_creation: {:x}, locality_at_release: {:x}, \
             creation_pcr_selection: {}, release_pcr_selection: {}, digest_at_creation: {}, \
             digest_at_release: {} }}",
            self.tag,
            self.locality_at_creation,
            self.locality_at_release,
            self.creation_pcr_selection,
            self.release_pcr_selection,
            self.digest_at_creation,
            self.digest_at_release,
        )
    }
}

/// PCR state at release, as reported by quote responses
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PcrInfoShort {
    pub locality_at_release: u8,
    pub release_pcr_selection: PcrSelection,
    pub digest_at_release: Digest,
}

impl PcrInfoShort {
    pub const ENCODED_LEN: usize = 1 + PcrSelection::ENCODED_LEN + Digest::SIZE;

    pub fn to_bytes(&self) -> Vec<u8> {
        let writer = wire::Writer::with_capacity(Self::ENCODED_LEN).add_u8(self.locality_at_release);

        self.release_pcr_selection
            .encode(writer)
            .add_bytes(self.digest_at_release.as_ref())
            .build()
    }

    /// Parses the structure from the start of `data`, returning the unread remainder
    pub fn try_parse(data: &[u8]) -> Result<(Self, &[u8]), Error> {
        let mut reader = wire::Reader::new(data);

        let pcr_info_short = Self {
            locality_at_release: reader.read_u8()?,
            release_pcr_selection: PcrSelection::decode(&mut reader)?,
            digest_at_release: Digest::decode(&mut reader)?,
        };

        Ok((pcr_info_short, reader.read_rest()))
    }

    /// Checks the reported digest against independently obtained values of the selected PCRs
    pub fn matches(&self, pcr_values: &[u8]) -> Result<bool, Error> {
        Ok(composite::composite(self.release_pcr_selection.mask, pcr_values)?
            == self.digest_at_release)
    }
}

impl From<&PcrInfoLong> for PcrInfoShort {
    fn from(pcr_info_long: &PcrInfoLong) -> Self {
        Self {
            locality_at_release: pcr_info_long.locality_at_release,
            release_pcr_selection: pcr_info_long.release_pcr_selection,
            digest_at_release: pcr_info_long.digest_at_release,
        }
    }
}

impl std::fmt::Display for PcrInfoShort {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "PcrInfoShort {{ locality_at_release: {:x}, release_pcr_selection: {}, \
             digest_at_release: {} }}",
            self.locality_at_release, self.release_pcr_selection, self.digest_at_release,
        )
    }
}

/// One-hot locality encoding used by TPM_LOCALITY_SELECTION
///
/// Localities the TPM cannot represent end up as an empty selection.
pub fn locality_selection(locality: u8) -> u8 {
    1u8.checked_shl(locality.into()).unwrap_or(0)
}

/// Builds a PCR info record from a mask and the values of the PCRs it selects
///
/// Creation and release state are identical, both are taken from the same values.
pub fn build_info_long(
    locality: u8,
    mask: PcrMask,
    pcr_values: &[u8],
    tag: u16,
) -> Result<PcrInfoLong, Error> {
    let digest = composite::composite(mask, pcr_values)?;
    let locality_selection = locality_selection(locality);
    let pcr_selection = PcrSelection::from(mask);

    let pcr_info_long = PcrInfoLong {
        tag,
        locality_at_creation: locality_selection,
        locality_at_release: locality_selection,
        creation_pcr_selection: pcr_selection,
        release_pcr_selection: pcr_selection,
        digest_at_creation: digest,
        digest_at_release: digest,
    };

    log::debug!("Created {pcr_info_long}");

    Ok(pcr_info_long)
}

/// Builds a PCR info record for the current values of the given PCRs
pub fn new_info_long<Source: PcrValueSource>(
    indices: impl IntoIterator<Item = u32>,
    locality: u8,
    source: &mut Source,
) -> Result<PcrInfoLong, Error> {
    let mask = PcrSelection::new(indices)?.mask;

    log::debug!("PCR mask: {mask}");

    // The composite expects values in ascending PCR order, whatever order the caller used
    let pcr_values = source
        .read_pcr_values(&mask.indices())
        .map_err(|error| Error::ValueSource(error.into()))?;

    log::debug!("PCR values: {}", wire::HexBytes(&pcr_values));

    build_info_long(locality, mask, &pcr_values, tags::TPM_TAG_PCR_INFO_LONG)
}
