use cosmwasm_std::{Coin, StdError, Uint128};

use crate::error::ContractError;

/// Max length of data, script and result URLs in bytes
pub const MAX_URL_LEN: usize = 2048;

/// Returns the amount of `denom` attached to the call.
///
/// Any coin of a different denom fails the call, so it is returned to the sender instead of
/// getting stuck in the ledger.
pub fn paid_amount(funds: &[Coin], denom: &str) -> Result<Uint128, ContractError> {
    let mut paid = Uint128::zero();
    for fund in funds {
        if fund.denom != denom {
            return Err(ContractError::WrongDenom);
        }
        paid = paid.checked_add(fund.amount).map_err(StdError::from)?;
    }
    Ok(paid)
}

/// Returns the part of `paid` exceeding `required`, which goes back to the payer.
pub fn excess_payment(paid: Uint128, required: Uint128) -> Result<Uint128, ContractError> {
    if paid < required {
        return Err(ContractError::InsufficientPayment { required, paid });
    }
    Ok(paid - required)
}

pub fn validate_url(url: &str) -> Result<(), ContractError> {
    if url.len() > MAX_URL_LEN {
        Err(ContractError::UrlTooLong)
    } else {
        Ok(())
    }
}
