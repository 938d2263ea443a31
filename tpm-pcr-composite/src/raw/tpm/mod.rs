// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

mod response_buffer;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid TPM response")]
    InvalidTpmResponse,
    #[error("TPM error response: {0:#x}")]
    TpmErrorResponse(u32),
    #[error(transparent)]
    Wire(#[from] crate::wire::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub(super) const TPM_ORD_PCR_READ: u32 = 0x00000015;

/// A TPM 1.2 character device, e.g. `/dev/tpm0`
pub struct Tpm<Device = std::fs::File> {
    device: Device,
}

impl Tpm {
    pub fn new(device_path: &std::path::Path) -> Result<Self, Error> {
        let device = std::fs::File::options()
            .read(true)
            .write(true)
            .open(device_path)?;

        Ok(Self { device })
    }

    /// Device path from the `TPM_DEVICE` environment variable, falling back to `/dev/tpm0`
    pub fn default_device_path() -> std::path::PathBuf {
        std::path::PathBuf::from(std::env::var_os("TPM_DEVICE").unwrap_or("/dev/tpm0".into()))
    }
}

impl<Device> Tpm<Device>
where
    Device: std::io::Read + std::io::Write,
{
    pub fn from_device(device: Device) -> Self {
        Self { device }
    }

    /// TPM_PCRRead
    pub fn pcr_read(&mut self, pcr_index: u32) -> Result<crate::Digest, Error> {
        const TPM_PARAM_SIZE_OFFSET: usize = 2;

        let command_buffer = crate::wire::Writer::new()
            .add_u16(crate::tags::TPM_TAG_RQU_COMMAND)
            .add_u32(0)
            .add_u32(TPM_ORD_PCR_READ)
            // Parameters
            .add_u32(pcr_index)
            .build_with_size_at(TPM_PARAM_SIZE_OFFSET)?;

        let response = self.send_command_buffer(&command_buffer)?;
        let mut response_parser = response_buffer::parse(&response)?;

        let digest: crate::Digest = response_parser
            .read_array::<{ crate::Digest::SIZE }>()
            .map_err(|_| Error::InvalidTpmResponse)?
            .into();

        log::debug!("[PCR{pcr_index}] {digest}");

        Ok(digest)
    }

    fn send_command_buffer(&mut self, command_buffer: &[u8]) -> Result<Vec<u8>, std::io::Error> {
        log::trace!("TPM command: {}", crate::wire::HexBytes(command_buffer));

        std::io::Write::write_all(&mut self.device, command_buffer)?;

        let mut response = Vec::new();

        std::io::Read::read_to_end(&mut self.device, &mut response)?;

        log::trace!("TPM response: {}", crate::wire::HexBytes(&response));

        Ok(response)
    }
}

impl<Device> crate::PcrValueSource for Tpm<Device>
where
    Device: std::io::Read + std::io::Write,
{
    type Error = Error;

    fn read_pcr_values(&mut self, indices: &[u32]) -> Result<Vec<u8>, Self::Error> {
        let mut pcr_values = Vec::with_capacity(indices.len() * crate::PCR_SIZE);

        for &pcr_index in indices {
            pcr_values.extend_from_slice(self.pcr_read(pcr_index)?.as_ref());
        }

        Ok(pcr_values)
    }
}
