//! TPM 1.2 structure and command tags

pub const TPM_TAG_PCR_INFO_LONG: u16 = 0x0006;
pub const TPM_TAG_CAP_VERSION_INFO: u16 = 0x0030;

pub const TPM_TAG_RQU_COMMAND: u16 = 0x00c1;
pub const TPM_TAG_RSP_COMMAND: u16 = 0x00c4;
