// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! TPM 1.2 PCR selection and composite digests
//!
//! Provides the PCR mask and selection types, the TPM_PCR_COMPOSITE digest and the PCR info
//! records that embed it, as consumed by sealing and quoting. PCR values come from any
//! [`PcrValueSource`], e.g. the raw TPM device or a software PCR bank.

pub mod bank;
mod composite;
pub mod info;
mod mask;
pub mod raw;
mod selection;
mod source;
pub mod tags;
pub mod version;
pub mod wire;

pub use bank::SoftwarePcrs;
pub use composite::{composite, composite_buffer, Digest, PCR_SIZE};
pub use info::{build_info_long, new_info_long, PcrInfoLong, PcrInfoShort};
pub use mask::{PcrMask, PCR_COUNT};
pub use selection::PcrSelection;
pub use source::PcrValueSource;
pub use version::{CapVersionInfo, CapVersionInfoFixed};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("PCR index {0} out of range")]
    InvalidIndex(u32),
    #[error("PCR values of {0} bytes are not a multiple of 20")]
    MalformedPcrValues(usize),
    #[error("could not read PCR values")]
    ValueSource(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error(transparent)]
    Serialization(#[from] wire::Error),
}
