//! Stable event types and attributes
//!
//! The names here should only be changed very carefully as off-chain indexers
//! replay them to rebuild their view of the ledger.

/// Which entry point/message type was executed
pub const ATTR_ACTION: &str = "action";

pub const EVENT_TYPE_JOB_POSTED: &str = "job_posted";
pub const EVENT_TYPE_JOB_ACCEPTED: &str = "job_accepted";
pub const EVENT_TYPE_JOB_RESULT_SUBMITTED: &str = "job_result_submitted";
pub const EVENT_TYPE_JOB_APPROVED: &str = "job_approved";
pub const EVENT_TYPE_JOB_CANCELLED: &str = "job_cancelled";

pub const ATTR_JOB_ID: &str = "job_id";
pub const ATTR_REQUESTER: &str = "requester";
pub const ATTR_PROVIDER: &str = "provider";
/// USD amount with 8 decimals
pub const ATTR_REWARD_USD: &str = "reward_usd";
/// Escrowed coin, e.g. "3333333333333333aeth"
pub const ATTR_REWARD_NATIVE: &str = "reward_native";
pub const ATTR_DATA_URL: &str = "data_url";
/// Only present when a script was attached
pub const ATTR_SCRIPT_URL: &str = "script_url";
pub const ATTR_RESULT_URL: &str = "result_url";
/// Coin paid out to the provider
pub const ATTR_AMOUNT: &str = "amount";
/// Coin returned to the requester
pub const ATTR_REFUND: &str = "refund";
