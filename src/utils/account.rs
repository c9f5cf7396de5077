//! Account id codec
//!
//! A Miden account id is 15 bytes packed into two felts. The first felt is
//! the byte-reversed first 8 bytes; the second is a zero byte followed by the
//! reversed remaining 7 bytes.

use crate::models::errors::{AppError, AppResult};
use crate::models::types::Felt;
use crate::utils::constants::{ACCOUNT_ID_BYTES, FELT_BYTES};
use crate::utils::felts::{bytes_to_felt, hex_to_fixed_bytes};

/// Decode a 15-byte account id hex into its felt pair
pub fn account_id_hex_to_felts(account_id_hex: &str) -> AppResult<[Felt; 2]> {
    let account_id = hex_to_fixed_bytes(account_id_hex, ACCOUNT_ID_BYTES)?;
    account_id_to_felts(&account_id)
}

/// Pack raw account id bytes into their felt pair
pub fn account_id_to_felts(account_id: &[u8]) -> AppResult<[Felt; 2]> {
    if account_id.len() != ACCOUNT_ID_BYTES {
        return Err(AppError::invalid_length(ACCOUNT_ID_BYTES, account_id.len()));
    }
    let (head, tail) = account_id.split_at(FELT_BYTES);

    let felt1_bytes: Vec<u8> = head.iter().rev().copied().collect();
    let felt2_bytes: Vec<u8> = std::iter::once(0u8)
        .chain(tail.iter().rev().copied())
        .collect();

    Ok([bytes_to_felt(&felt1_bytes)?, bytes_to_felt(&felt2_bytes)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;

    #[test]
    fn test_account_id_to_felts() {
        let felts = account_id_hex_to_felts("0x63c9d7af451fda2000fa06ce0bdefd").unwrap();
        assert_eq!(felts, [7190515427852671520, 70376226209856768]);
    }

    #[test]
    fn test_account_id_without_prefix() {
        let with = account_id_hex_to_felts("0x63c9d7af451fda2000fa06ce0bdefd").unwrap();
        let without = account_id_hex_to_felts("63c9d7af451fda2000fa06ce0bdefd").unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_account_id_second_felt_high_byte_zero() {
        let felts = account_id_hex_to_felts("0xffffffffffffffffffffffffffffff").unwrap();
        assert_eq!(felts[0], u64::MAX);
        assert_eq!(felts[1], u64::MAX << 8);
    }

    #[test]
    fn test_account_id_wrong_length() {
        let err = account_id_hex_to_felts("0x63c9d7af451fda2000fa06ce0bde").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidLength);

        let err = account_id_to_felts(&[0u8; 16]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidLength);
    }

    #[test]
    fn test_account_id_not_hex() {
        let err = account_id_hex_to_felts("0x63c9d7af451fda2000fa06ce0bdefx").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_account_id_bytes_match_hex() {
        let bytes = hex::decode("63c9d7af451fda2000fa06ce0bdefd").unwrap();
        assert_eq!(
            account_id_to_felts(&bytes).unwrap(),
            account_id_hex_to_felts("0x63c9d7af451fda2000fa06ce0bdefd").unwrap()
        );
    }
}
