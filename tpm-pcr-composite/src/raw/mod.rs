//! Encapsulates all raw TPM device operations

pub mod tpm;

pub use tpm::Tpm;
