//! Big-endian encoding of the TPM structures used by this crate
//!
//! Only the shapes needed for PCR selections, info records and the capability version record are
//! covered, there is no generic packer.

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("truncated structure")]
    Truncated,
    #[error("byte field of {0} bytes does not fit a 32-bit length")]
    TooLong(usize),
    #[error("unexpected PCR selection size {0}")]
    UnexpectedSelectionSize(u16),
}

#[derive(Default)]
pub struct Writer {
    buffer: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn add_u8(mut self, value: u8) -> Self {
        self.buffer.push(value);

        self
    }

    pub fn add_u16(mut self, value: u16) -> Self {
        self.buffer.extend_from_slice(&value.to_be_bytes());

        self
    }

    pub fn add_u32(mut self, value: u32) -> Self {
        self.buffer.extend_from_slice(&value.to_be_bytes());

        self
    }

    pub fn add_bytes(mut self, data: &[u8]) -> Self {
        self.buffer.extend_from_slice(data);

        self
    }

    /// Appends a 32-bit length followed by the data itself
    pub fn add_sized_bytes_u32(self, data: &[u8]) -> Result<Self, Error> {
        let size = u32::try_from(data.len()).map_err(|_| Error::TooLong(data.len()))?;

        Ok(self.add_u32(size).add_bytes(data))
    }

    pub fn build(self) -> Vec<u8> {
        self.buffer
    }

    /// Like `build`, but overwrites the `u32` at `offset` with the length of the whole buffer
    ///
    /// Used for command frames whose header carries their own total size.
    pub fn build_with_size_at(mut self, offset: usize) -> Result<Vec<u8>, Error> {
        let length = self.buffer.len();
        let size = u32::try_from(length).map_err(|_| Error::TooLong(length))?;

        self.buffer
            .get_mut(offset..)
            .and_then(|rest| rest.get_mut(..std::mem::size_of::<u32>()))
            .ok_or(Error::Truncated)?
            .copy_from_slice(&size.to_be_bytes());

        Ok(self.buffer)
    }
}

pub struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn read_bytes(&mut self, size: usize) -> Result<&'a [u8], Error> {
        let (value, rest) = self.data.split_at_checked(size).ok_or(Error::Truncated)?;

        self.data = rest;

        Ok(value)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        self.read_bytes(N)?
            .try_into()
            .map_err(|_| Error::Truncated)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.read_array::<1>().map(|[value]| value)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.read_array().map(u16::from_be_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// Takes everything that has not been read yet
    pub fn read_rest(&mut self) -> &'a [u8] {
        std::mem::take(&mut self.data)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Lazy lowercase hex rendering, for log statements
pub(crate) struct HexBytes<'a>(pub(crate) &'a [u8]);

impl std::fmt::Display for HexBytes<'_> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0
            .iter()
            .try_for_each(|byte| write!(formatter, "{byte:02x}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_is_big_endian() {
        let buffer = Writer::new()
            .add_u8(0xaa)
            .add_u16(0x0102)
            .add_u32(0x03040506)
            .add_bytes(&[0xff])
            .build();

        assert_eq!(buffer, [0xaa, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0xff]);
    }

    #[test]
    fn sized_bytes_have_a_32_bit_prefix() {
        let buffer = Writer::new()
            .add_sized_bytes_u32(&[0x11; 3])
            .unwrap()
            .build();

        assert_eq!(buffer, [0x00, 0x00, 0x00, 0x03, 0x11, 0x11, 0x11]);
    }

    #[test]
    fn size_is_patched_in_place() {
        let buffer = Writer::new()
            .add_u16(0x00c1)
            .add_u32(0)
            .add_u32(0x15)
            .build_with_size_at(2)
            .unwrap();

        assert_eq!(
            buffer,
            [0x00, 0xc1, 0x00, 0x00, 0x00, 0x0a, 0x00, 0x00, 0x00, 0x15]
        );
    }

    #[test]
    fn size_field_must_fit_in_the_buffer() {
        assert_eq!(
            Writer::new().add_u16(0x00c1).build_with_size_at(0),
            Err(Error::Truncated)
        );
        assert_eq!(
            Writer::new().add_u32(0).build_with_size_at(1),
            Err(Error::Truncated)
        );
    }

    #[test]
    fn hex_bytes_are_lowercase_and_unseparated() {
        assert_eq!(HexBytes(&[0x00, 0xab, 0x7f]).to_string(), "00ab7f");
        assert_eq!(HexBytes(&[]).to_string(), "");
    }

    #[test]
    fn reader_reports_truncation() {
        let mut reader = Reader::new(&[0x00, 0x03, 0x01]);

        assert_eq!(reader.read_u16(), Ok(3));
        assert_eq!(reader.read_u32(), Err(Error::Truncated));
        // A failed read does not consume anything
        assert_eq!(reader.read_u8(), Ok(1));
        assert!(reader.is_empty());
    }
}
