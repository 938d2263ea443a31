use super::Error;

/// Checks the response header and returns a reader positioned at the output parameters
///
/// The header is `tag || paramSize || returnCode`, with `paramSize` covering the whole response.
pub(super) fn parse(data: &[u8]) -> Result<crate::wire::Reader<'_>, Error> {
    let mut reader = crate::wire::Reader::new(data);
    let (tag, param_size, return_code) =
        read_header(&mut reader).map_err(|_| Error::InvalidTpmResponse)?;

    if tag != crate::tags::TPM_TAG_RSP_COMMAND {
        return Err(Error::InvalidTpmResponse);
    }

    if usize::try_from(param_size).ok() != Some(data.len()) {
        log::debug!("TPM response claims {param_size} bytes, got {}", data.len());

        return Err(Error::InvalidTpmResponse);
    }

    if return_code != 0 {
        return Err(Error::TpmErrorResponse(return_code));
    }

    Ok(reader)
}

fn read_header(
    reader: &mut crate::wire::Reader<'_>,
) -> Result<(u16, u32, u32), crate::wire::Error> {
    Ok((reader.read_u16()?, reader.read_u32()?, reader.read_u32()?))
}
