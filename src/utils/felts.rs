//! Felt codec
//! Little-endian conversions between 8-byte chunks and felts

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::Felt;
use crate::utils::constants::FELT_BYTES;

/// Interpret the first 8 bytes as a little-endian u64
pub fn bytes_to_felt(bytes: &[u8]) -> AppResult<Felt> {
    let chunk: [u8; FELT_BYTES] = bytes
        .get(..FELT_BYTES)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| AppError::invalid_length(FELT_BYTES, bytes.len()))?;
    Ok(u64::from_le_bytes(chunk))
}

/// Inverse of [`bytes_to_felt`]
#[inline]
pub fn felt_to_bytes(value: Felt) -> [u8; FELT_BYTES] {
    value.to_le_bytes()
}

/// Decode a hex identifier, `0x` prefix optional.
///
/// Non-hex characters are a format error. An odd digit count can never
/// decode to a fixed width, so it is reported as a length error.
pub(crate) fn hex_to_bytes(input: &str) -> AppResult<Vec<u8>> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::invalid_format(format!("not a hex string: {}", input)));
    }
    if digits.len() % 2 != 0 {
        return Err(AppError::new(
            ErrorCode::InvalidLength,
            format!("odd number of hex digits: {}", input),
        ));
    }

    hex::decode(digits).map_err(|e| {
        AppError::with_source(ErrorCode::InvalidFormat, format!("not a hex string: {}", input), e)
    })
}

/// Decode hex and require an exact byte width
pub(crate) fn hex_to_fixed_bytes(input: &str, expected: usize) -> AppResult<Vec<u8>> {
    let bytes = hex_to_bytes(input)?;
    if bytes.len() != expected {
        return Err(AppError::invalid_length(expected, bytes.len()));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_felt_little_endian() {
        let bytes = [0x01, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(bytes_to_felt(&bytes).unwrap(), 1);

        let bytes = [0, 0, 0, 0, 0, 0, 0, 0x80];
        assert_eq!(bytes_to_felt(&bytes).unwrap(), 1u64 << 63);
    }

    #[test]
    fn test_bytes_to_felt_short_input() {
        let err = bytes_to_felt(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidLength);
    }

    #[test]
    fn test_bytes_to_felt_reads_first_chunk() {
        let bytes = [0xff, 0, 0, 0, 0, 0, 0, 0, 0xaa];
        assert_eq!(bytes_to_felt(&bytes).unwrap(), 0xff);
    }

    #[test]
    fn test_felt_to_bytes_inverse() {
        for value in [0u64, 1, 0xdead_beef, u64::MAX, 3897750583] {
            assert_eq!(bytes_to_felt(&felt_to_bytes(value)).unwrap(), value);
        }
        // small values pad with trailing (high-order) zero bytes
        assert_eq!(felt_to_bytes(0x0102), [0x02, 0x01, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_hex_to_bytes_prefix_optional() {
        assert_eq!(hex_to_bytes("0xabCD").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(hex_to_bytes("abcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(hex_to_bytes("0x").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_hex_to_bytes_errors() {
        assert_eq!(hex_to_bytes("0xzz").unwrap_err().code, ErrorCode::InvalidFormat);
        assert_eq!(hex_to_bytes("0x-1").unwrap_err().code, ErrorCode::InvalidFormat);
        assert_eq!(hex_to_bytes("0xabc").unwrap_err().code, ErrorCode::InvalidLength);
        assert_eq!(
            hex_to_fixed_bytes("0xabcd", 3).unwrap_err().code,
            ErrorCode::InvalidLength
        );
    }
}
