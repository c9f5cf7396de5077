//! EVM address codec
//!
//! Splits a 20-byte address into three little-endian felts without any byte
//! reversal; the last felt carries 4 address bytes and 4 zero bytes.

use alloy_primitives::Address;
use std::str::FromStr;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::Felt;
use crate::utils::constants::{EVM_ADDRESS_BYTES, FELT_BYTES};
use crate::utils::felts::{bytes_to_felt, felt_to_bytes};

/// Validate an address string.
///
/// Expects 40 hex digits, `0x` prefix optional. All-lowercase input is
/// accepted as is; anything with upper-case letters must carry a valid
/// EIP-55 checksum.
pub fn parse_evm_address(address: &str) -> AppResult<Address> {
    let digits = address.strip_prefix("0x").unwrap_or(address);

    if digits.len() != EVM_ADDRESS_BYTES * 2 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::invalid_address(format!("Invalid EVM address: {}", address)));
    }

    if !digits.chars().any(|c| c.is_ascii_uppercase()) {
        return Address::from_str(digits)
            .map_err(|_| AppError::invalid_address(format!("Invalid EVM address: {}", address)));
    }

    Address::parse_checksummed(format!("0x{}", digits), None)
        .map_err(|_| AppError::invalid_address(format!("Bad checksum: {}", address)))
}

/// Split a validated address into three felts
pub fn evm_address_to_felts(address: &str) -> AppResult<[Felt; 3]> {
    let address = parse_evm_address(address)?;
    address_to_felts(&address)
}

/// Same split for an already parsed address
pub fn address_to_felts(address: &Address) -> AppResult<[Felt; 3]> {
    let bytes = address.as_slice();

    let mut felt3_bytes = [0u8; FELT_BYTES];
    felt3_bytes[..4].copy_from_slice(&bytes[16..20]);

    Ok([
        bytes_to_felt(&bytes[0..8])?,
        bytes_to_felt(&bytes[8..16])?,
        bytes_to_felt(&felt3_bytes)?,
    ])
}

/// Reassemble an address from its three felts.
/// Only the low 4 bytes of the last felt are meaningful.
pub fn felts_to_evm_address(felts: &[Felt; 3]) -> Address {
    let mut bytes = [0u8; EVM_ADDRESS_BYTES];
    bytes[0..8].copy_from_slice(&felt_to_bytes(felts[0]));
    bytes[8..16].copy_from_slice(&felt_to_bytes(felts[1]));
    bytes[16..20].copy_from_slice(&felt_to_bytes(felts[2])[..4]);
    Address::from(bytes)
}
