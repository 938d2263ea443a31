/// JSON summary of a computed PCR info record
#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Report {
    locality: u8,
    pcrs: Vec<u32>,
    pcr_mask: String,
    composite_digest: String,
    pcr_info_long: String,
}

impl Report {
    pub(crate) fn new(locality: u8, pcr_info_long: &tpm_pcr_composite::PcrInfoLong) -> Self {
        let mask = pcr_info_long.release_pcr_selection.mask;

        Self {
            locality,
            pcrs: mask.indices(),
            pcr_mask: hex::encode(mask.as_bytes()),
            composite_digest: hex::encode(pcr_info_long.digest_at_release),
            pcr_info_long: hex::encode(pcr_info_long.to_bytes()),
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string_pretty(&self).map_err(|_| std::fmt::Error)?;

        write!(formatter, "{json}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_fields() {
        let mask = tpm_pcr_composite::PcrSelection::new([0, 17, 23]).unwrap().mask;
        let pcr_info_long = tpm_pcr_composite::build_info_long(
            1,
            mask,
            &[0u8; 60],
            tpm_pcr_composite::tags::TPM_TAG_PCR_INFO_LONG,
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&Report::new(1, &pcr_info_long).to_string()).unwrap();

        assert_eq!(json["Locality"], 1);
        assert_eq!(json["Pcrs"], serde_json::json!([0, 17, 23]));
        assert_eq!(json["PcrMask"], "010082");
        assert_eq!(
            json["CompositeDigest"],
            "d151b54b3ec98deffe8ec88c9f2fc2d632455f85"
        );
        assert_eq!(
            json["PcrInfoLong"].as_str().map(str::len),
            Some(2 * tpm_pcr_composite::PcrInfoLong::ENCODED_LEN)
        );
    }
}
