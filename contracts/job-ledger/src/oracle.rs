use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Deps, Env, Int128, Timestamp, Uint128};
use price_feed::{DecimalsResponse, PriceFeedQueryMsg, RoundDataResponse};

use crate::error::ContractError;
use crate::state::Config;

/// A validated reading of the price feed
#[cw_serde]
pub struct Rate {
    /// USD per whole native unit, scaled by `decimals`. Always positive.
    pub price: Uint128,
    pub decimals: u32,
    pub updated_at: Timestamp,
}

/// Reads the current USD price of the native denom from the configured feed.
pub fn current_rate(deps: Deps, env: &Env, config: &Config) -> Result<Rate, ContractError> {
    let DecimalsResponse { decimals } = deps
        .querier
        .query_wasm_smart(&config.price_feed, &PriceFeedQueryMsg::Decimals {})
        .map_err(|err| unavailable(format!("decimals query failed: {err}")))?;
    let round: RoundDataResponse = deps
        .querier
        .query_wasm_smart(&config.price_feed, &PriceFeedQueryMsg::LatestRoundData {})
        .map_err(|err| unavailable(format!("round query failed: {err}")))?;

    if round.answer <= Int128::zero() {
        return Err(unavailable(format!("invalid answer {}", round.answer)));
    }

    if let Some(max_age) = config.max_price_age {
        let age = env
            .block
            .time
            .seconds()
            .saturating_sub(round.updated_at.seconds());
        if age > max_age {
            return Err(unavailable(format!(
                "answer of round {} is {age} seconds old",
                round.round_id
            )));
        }
    }

    Ok(Rate {
        price: Uint128::new(round.answer.i128().unsigned_abs()),
        decimals,
        updated_at: round.updated_at,
    })
}

fn unavailable(reason: String) -> ContractError {
    ContractError::OracleUnavailable { reason }
}
