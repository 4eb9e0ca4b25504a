use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Int128, Timestamp};

pub use price_feed::PriceFeedQueryMsg as QueryMsg;

#[cw_serde]
pub struct InstantiateMsg {
    pub decimals: u32,
    pub initial_answer: Int128,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Publishes a new round with the current block time
    UpdateAnswer { answer: Int128 },
    /// Publishes a round with arbitrary data, e.g. to simulate an outdated feed
    UpdateRoundData {
        round_id: u64,
        answer: Int128,
        started_at: Timestamp,
        updated_at: Timestamp,
    },
}
