//! Uniswap V2 pricing math
//! Constant-product exact-output pricing, slippage and pair addressing

use alloy_primitives::{keccak256, Address, U256};

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{SINGLE_HOP_SWAP_GAS_LIMIT, UNISWAP_V2_INIT_CODE_HASH};

/// Pool fee numerator (0.3% fee)
const FEE_NUMERATOR: u64 = 997;
const FEE_DENOMINATOR: u64 = 1000;
const BPS_DENOMINATOR: u64 = 10_000;

/// Input required to receive exactly `amount_out`
pub fn get_amount_in(amount_out: U256, reserve_in: U256, reserve_out: U256) -> AppResult<U256> {
    if amount_out.is_zero() {
        return Err(AppError::insufficient_liquidity("INSUFFICIENT_OUTPUT_AMOUNT"));
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AppError::insufficient_liquidity("INSUFFICIENT_LIQUIDITY"));
    }
    if amount_out >= reserve_out {
        return Err(AppError::insufficient_liquidity("EXCESSIVE_OUTPUT_AMOUNT"));
    }

    let numerator = reserve_in
        .checked_mul(amount_out)
        .and_then(|v| v.checked_mul(U256::from(FEE_DENOMINATOR)))
        .ok_or_else(|| AppError::math_overflow("amount in numerator"))?;
    let denominator = (reserve_out - amount_out)
        .checked_mul(U256::from(FEE_NUMERATOR))
        .ok_or_else(|| AppError::math_overflow("amount in denominator"))?;

    Ok(numerator / denominator + U256::from(1u64))
}

/// Upper bound on the input after applying slippage, rounded down
pub fn max_amount_in(amount_in: U256, slippage_bps: u32) -> AppResult<U256> {
    amount_in
        .checked_mul(U256::from(BPS_DENOMINATOR + slippage_bps as u64))
        .map(|v| v / U256::from(BPS_DENOMINATOR))
        .ok_or_else(|| AppError::math_overflow("slippage bound"))
}

/// Order two tokens the way the factory does
pub fn sort_tokens(a: Address, b: Address) -> (Address, Address) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// CREATE2 address of the pair for two tokens
pub fn pair_address(factory: Address, token_a: Address, token_b: Address) -> Address {
    let (token0, token1) = sort_tokens(token_a, token_b);
    let mut packed = [0u8; 40];
    packed[..20].copy_from_slice(token0.as_slice());
    packed[20..].copy_from_slice(token1.as_slice());
    let salt = keccak256(packed);
    factory.create2(salt, UNISWAP_V2_INIT_CODE_HASH)
}

/// Map pair reserves onto (reserve_in, reserve_out) for a trade direction
pub fn orient_reserves(
    token_in: Address,
    token_out: Address,
    reserve0: U256,
    reserve1: U256,
) -> (U256, U256) {
    let (token0, _) = sort_tokens(token_in, token_out);
    if token0 == token_in {
        (reserve0, reserve1)
    } else {
        (reserve1, reserve0)
    }
}

/// Gas cost estimate of a single-hop swap.
///
/// Takes the first non-zero base fee and the first non-zero median reward
/// from a fee history sample, each defaulting to 1 wei.
pub fn estimate_gas_fee(base_fees: &[u128], rewards: Option<&[Vec<u128>]>) -> U256 {
    let fee_per_gas = base_fees.iter().copied().find(|fee| *fee != 0).unwrap_or(1);
    let priority_fee = rewards
        .and_then(|rewards| {
            rewards
                .iter()
                .filter_map(|reward| reward.first().copied())
                .find(|reward| *reward != 0)
        })
        .unwrap_or(1);

    U256::from(SINGLE_HOP_SWAP_GAS_LIMIT)
        * (U256::from(fee_per_gas) + U256::from(priority_fee))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use std::str::FromStr;

    #[test]
    fn test_get_amount_in() {
        // 1000 * 100 * 1000 / (900 * 997) + 1 = 111 + 1
        let amount_in =
            get_amount_in(U256::from(100u64), U256::from(1000u64), U256::from(1000u64)).unwrap();
        assert_eq!(amount_in, U256::from(112u64));
    }

    #[test]
    fn test_get_amount_in_liquidity_errors() {
        let err = get_amount_in(U256::from(1000u64), U256::from(1000u64), U256::from(1000u64))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientLiquidity);

        let err = get_amount_in(U256::from(1u64), U256::ZERO, U256::from(1000u64)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientLiquidity);

        let err = get_amount_in(U256::ZERO, U256::from(1u64), U256::from(1u64)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientLiquidity);
    }

    #[test]
    fn test_get_amount_in_overflow() {
        let err = get_amount_in(U256::from(1u64), U256::MAX, U256::from(10u64)).unwrap_err();
        assert_eq!(err.code, ErrorCode::MathOverflow);
    }

    #[test]
    fn test_max_amount_in() {
        let bound = max_amount_in(U256::from(10_000u64), 50).unwrap();
        assert_eq!(bound, U256::from(10_050u64));

        // rounds down
        let bound = max_amount_in(U256::from(199u64), 50).unwrap();
        assert_eq!(bound, U256::from(199u64));
    }

    #[test]
    fn test_pair_address_usdc_weth() {
        let factory = Address::from_str("0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f").unwrap();
        let usdc = Address::from_str("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48").unwrap();
        let weth = Address::from_str("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap();
        let expected = Address::from_str("0xB4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc").unwrap();

        assert_eq!(pair_address(factory, weth, usdc), expected);
        assert_eq!(pair_address(factory, usdc, weth), expected);
    }

    #[test]
    fn test_orient_reserves() {
        let low = Address::from_str("0x0000000000000000000000000000000000000001").unwrap();
        let high = Address::from_str("0x0000000000000000000000000000000000000002").unwrap();
        let (r0, r1) = (U256::from(10u64), U256::from(20u64));

        assert_eq!(orient_reserves(low, high, r0, r1), (r0, r1));
        assert_eq!(orient_reserves(high, low, r0, r1), (r1, r0));
    }

    #[test]
    fn test_estimate_gas_fee() {
        let rewards = vec![vec![0u128], vec![2u128]];
        let fee = estimate_gas_fee(&[0, 10, 20], Some(&rewards));
        assert_eq!(fee, U256::from(127_000u64 * 12));

        // empty history falls back to 1 wei each
        let fee = estimate_gas_fee(&[], None);
        assert_eq!(fee, U256::from(127_000u64 * 2));
    }
}
