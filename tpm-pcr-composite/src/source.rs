/// Supplies the current values of PCRs
///
/// Implementations return the concatenated 20-byte values of `indices`, in the order given.
/// Reading is a single blocking operation, retries and timeouts are up to the implementation.
pub trait PcrValueSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn read_pcr_values(&mut self, indices: &[u32]) -> Result<Vec<u8>, Self::Error>;
}
