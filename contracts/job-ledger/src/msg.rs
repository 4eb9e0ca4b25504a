use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Coin, Timestamp, Uint128};

use crate::state::{Config, Job};

#[cw_serde]
pub struct InstantiateMsg {
    pub manager: String,
    /// Address of the USD price feed contract
    pub price_feed: String,
    /// The denom rewards are escrowed and paid in
    pub denom: String,
    /// Decimals of one whole unit of `denom`
    pub native_decimals: u32,
    /// Maximum accepted age of a feed answer in seconds. Use None to disable.
    pub max_price_age: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Posts a new job. The reward is converted to the native denom at the current
    /// price and must be attached as funds. Excess funds are sent back.
    PostJob {
        data_url: String,
        script_url: Option<String>,
        /// USD with 8 decimals, i.e. 10_00000000 is $10
        reward_usd: Uint128,
    },
    /// Claims an open job. The first caller wins.
    AcceptJob { job_id: u64 },
    /// Delivers the result of an accepted job. Only the assigned provider can do that.
    SubmitResult { job_id: u64, result_url: String },
    /// Releases the escrowed reward to the provider. Only the requester can do that.
    ApproveAndPay { job_id: u64 },
    /// Withdraws a job nobody accepted yet and refunds the reward to the requester.
    CancelJob { job_id: u64 },
    /// Set the config
    SetConfig {
        manager: Option<String>,
        price_feed: Option<String>,
        /// Updates the `max_price_age`. Send Some(0) to disable the staleness check.
        max_price_age: Option<u64>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Get the config state
    #[returns(ConfigResponse)]
    Config {},
    /// Gets a single job. Fails if the job does not exist.
    #[returns(JobResponse)]
    Job { job_id: u64 },
    /// Gets jobs in ascending ID order
    #[returns(JobsResponse)]
    JobsAsc {
        /// The job ID after which to start
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Gets jobs in descending ID order
    #[returns(JobsResponse)]
    JobsDesc {
        /// The job ID after which to start
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Number of jobs and the total amount held in escrow
    #[returns(StatsResponse)]
    Stats {},
    /// The current validated price feed reading
    #[returns(RateResponse)]
    CurrentRate {},
    /// Estimates the native amount `PostJob` requires for a USD reward at the current price
    #[returns(ConversionResponse)]
    ConvertUsdToNative { usd_amount: Uint128 },
}

// We define a custom struct for each query response
pub type ConfigResponse = Config;

pub type JobResponse = Job;

#[cw_serde]
pub struct JobsResponse {
    pub jobs: Vec<Job>,
}

#[cw_serde]
pub struct StatsResponse {
    /// Number of jobs ever posted
    pub jobs: u64,
    /// Sum of rewards of jobs that are not completed or cancelled
    pub escrowed: Coin,
}

#[cw_serde]
pub struct RateResponse {
    /// USD per whole native unit, scaled by `decimals`
    pub price: Uint128,
    pub decimals: u32,
    pub updated_at: Timestamp,
}

#[cw_serde]
pub struct ConversionResponse {
    pub usd_amount: Uint128,
    pub native: Coin,
}

/// Data set on the `PostJob` response
#[cw_serde]
pub struct PostJobResponse {
    pub job_id: u64,
}
