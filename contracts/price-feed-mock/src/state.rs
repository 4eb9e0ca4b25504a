use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::Item;
use price_feed::RoundDataResponse;

#[cw_serde]
pub struct Config {
    /// The only address allowed to publish rounds
    pub owner: Addr,
    pub decimals: u32,
}

pub const CONFIG: Item<Config> = Item::new("config");

pub const LATEST_ROUND: Item<RoundDataResponse> = Item::new("latest_round");
