//! Query interface of a USD price feed contract.
//!
//! The shape follows the common aggregator interface: a feed publishes rounds, each
//! with a signed answer scaled by `decimals` and the time it was last updated.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Int128, Timestamp};

#[cw_serde]
#[derive(QueryResponses)]
pub enum PriceFeedQueryMsg {
    /// The most recent round
    #[returns(RoundDataResponse)]
    LatestRoundData {},
    /// Number of decimals the answer is scaled by
    #[returns(DecimalsResponse)]
    Decimals {},
}

#[cw_serde]
pub struct RoundDataResponse {
    pub round_id: u64,
    /// Price of one whole unit of the base asset in the quote currency, scaled by `decimals`.
    /// Feeds may report zero or negative values when broken.
    pub answer: Int128,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
}

#[cw_serde]
pub struct DecimalsResponse {
    pub decimals: u32,
}
