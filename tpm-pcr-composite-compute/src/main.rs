// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

mod report;

use anyhow::Context as _;
use report::Report;
use tpm_pcr_composite::{Digest, PcrSelection, SoftwarePcrs};

/// Compute the TPM 1.2 PCR composite digest and PCR info record for a set of PCRs
#[derive(clap::Parser)]
struct Arguments {
    /// PCR index to select
    ///
    /// Accepts a comma-separated list or can be repeated.
    #[arg(long = "pcr", short, required = true, value_delimiter = ',')]
    pcrs: Vec<u32>,
    /// Locality the PCR info is bound to
    #[arg(long, short, default_value_t = 0)]
    locality: u8,
    #[command(flatten)]
    source: SourceArguments,
}

#[derive(clap::Args)]
#[group(multiple = false)]
struct SourceArguments {
    /// Path of the TPM device [default: $TPM_DEVICE or /dev/tpm0]
    #[arg(long)]
    device: Option<std::path::PathBuf>,
    /// Path of a file with the concatenated 20-byte values of the selected PCRs
    ///
    /// The values have to be in ascending PCR order.
    #[arg(long)]
    values: Option<std::path::PathBuf>,
    /// SHA-1 measurement to extend into a zeroed software PCR, as INDEX=HEX
    ///
    /// Measurements are extended in argument order.
    #[arg(long, value_parser = parse_extension)]
    extend: Vec<(u32, Digest)>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let arguments: Arguments = clap::Parser::parse();
    let source = &arguments.source;
    let pcrs = arguments.pcrs.iter().copied();

    let pcr_info_long = if let Some(path) = &source.values {
        log::info!("Reading PCR values from {}", path.display());

        let pcr_values = std::fs::read(path)
            .with_context(|| format!("Could not read PCR values from {}", path.display()))?;
        let mask = PcrSelection::new(pcrs)?.mask;
        let expected_len = mask.indices().len() * tpm_pcr_composite::PCR_SIZE;

        anyhow::ensure!(
            pcr_values.len() == expected_len,
            "Expected {expected_len} bytes of PCR values for mask {mask}, got {}",
            pcr_values.len()
        );

        tpm_pcr_composite::build_info_long(
            arguments.locality,
            mask,
            &pcr_values,
            tpm_pcr_composite::tags::TPM_TAG_PCR_INFO_LONG,
        )?
    } else if !source.extend.is_empty() {
        log::info!(
            "Computing PCR values from {} software extensions",
            source.extend.len()
        );

        let mut software_pcrs = SoftwarePcrs::new();

        for (index, measurement) in &source.extend {
            software_pcrs.extend(*index, measurement)?;
        }

        tpm_pcr_composite::new_info_long(pcrs, arguments.locality, &mut software_pcrs)?
    } else {
        let device_path = source
            .device
            .clone()
            .unwrap_or_else(tpm_pcr_composite::raw::Tpm::default_device_path);

        log::info!("Reading PCR values from TPM device {}", device_path.display());

        let mut tpm = tpm_pcr_composite::raw::Tpm::new(&device_path)
            .with_context(|| format!("Could not open TPM device {}", device_path.display()))?;

        tpm_pcr_composite::new_info_long(pcrs, arguments.locality, &mut tpm)?
    };

    log::debug!("Release digest: {}", pcr_info_long.digest_at_release);

    println!("{}", Report::new(arguments.locality, &pcr_info_long));

    Ok(())
}

fn parse_extension(argument: &str) -> anyhow::Result<(u32, Digest)> {
    let (index, measurement) = argument
        .split_once('=')
        .context("Expected INDEX=HEX")?;
    let index = index
        .parse()
        .with_context(|| format!("Invalid PCR index {index}"))?;
    let mut digest = [0u8; Digest::SIZE];

    hex::decode_to_slice(measurement, &mut digest)
        .with_context(|| format!("Invalid SHA-1 measurement {measurement}"))?;

    Ok((index, digest.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_are_consistent() {
        <Arguments as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn extension_argument() {
        let (index, measurement) =
            parse_extension("7=a9993e364706816aba3e25717850c26c9cd0d89d").unwrap();

        assert_eq!(index, 7);
        assert_eq!(measurement, Digest::sha1(b"abc"));
    }

    #[test]
    fn malformed_extension_argument() {
        assert!(parse_extension("7").is_err());
        assert!(parse_extension("x=a9993e364706816aba3e25717850c26c9cd0d89d").is_err());
        assert!(parse_extension("7=a999").is_err());
    }

    #[test]
    fn sources_are_exclusive() {
        let result = <Arguments as clap::Parser>::try_parse_from([
            "tpm-pcr-composite-compute",
            "--pcr",
            "0,7",
            "--values",
            "values.bin",
            "--extend",
            "7=a9993e364706816aba3e25717850c26c9cd0d89d",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn pcr_list() {
        let arguments = <Arguments as clap::Parser>::try_parse_from([
            "tpm-pcr-composite-compute",
            "-p",
            "23,0",
            "--pcr",
            "17",
            "-l",
            "3",
        ])
        .unwrap();

        assert_eq!(arguments.pcrs, [23, 0, 17]);
        assert_eq!(arguments.locality, 3);
        assert!(arguments.source.device.is_none());
    }
}
