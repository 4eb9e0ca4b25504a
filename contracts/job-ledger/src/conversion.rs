use cosmwasm_std::{Uint128, Uint256};

use crate::error::ContractError;

/// Number of decimals of all USD amounts handled by the ledger
pub const USD_DECIMALS: u32 = 8;

/// Largest accepted number of native decimals. Beyond this every realistic reward
/// overflows the 128-bit result.
pub const MAX_NATIVE_DECIMALS: u32 = 36;

/// Converts a USD amount into the native amount it buys at `rate`.
///
/// `rate` is the price of one whole native unit in USD, scaled by `rate_decimals`.
/// The result is scaled by `native_decimals` and rounded down, so a payer is never
/// asked for more than the exact conversion.
///
/// native = usd_amount * 10^native_decimals * 10^rate_decimals / (rate * 10^usd_decimals)
pub fn usd_to_native(
    usd_amount: Uint128,
    usd_decimals: u32,
    rate: Uint128,
    rate_decimals: u32,
    native_decimals: u32,
) -> Result<Uint128, ContractError> {
    if rate.is_zero() {
        return Err(ContractError::InvalidRate);
    }

    let numerator = scale_up(
        Uint256::from(usd_amount),
        native_decimals.saturating_add(rate_decimals),
    )?;
    let denominator = scale_up(Uint256::from(rate), usd_decimals)?;

    // Integer division truncates the remainder below one native unit
    let native = numerator
        .checked_div(denominator)
        .map_err(|_| ContractError::InvalidRate)?;
    Uint128::try_from(native).map_err(|_| ContractError::ConversionOverflow)
}

/// Multiplies `value` by 10^decimals
fn scale_up(value: Uint256, decimals: u32) -> Result<Uint256, ContractError> {
    Uint256::from(10u32)
        .checked_pow(decimals)
        .and_then(|factor| value.checked_mul(factor))
        .map_err(|_| ContractError::ConversionOverflow)
}
