use thiserror::Error;

use cosmwasm_std::{StdError, Uint128};

use crate::state::JobStatus;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Job {job_id} not found")]
    JobNotFound { job_id: u64 },

    #[error("Job is not {expected}")]
    InvalidJobState {
        job_id: u64,
        expected: JobStatus,
        actual: JobStatus,
    },

    #[error("Only assigned provider can submit")]
    UnauthorizedSubmit,

    #[error("Only requester can approve")]
    UnauthorizedApprove,

    #[error("Only requester can cancel")]
    UnauthorizedCancel,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Insufficient payment for this USD value: required {required}, paid {paid}")]
    InsufficientPayment { required: Uint128, paid: Uint128 },

    #[error("Payment must be sent in the ledger denom only")]
    WrongDenom,

    #[error("Reward must be greater than zero")]
    ZeroReward,

    #[error("Data URL must not be empty")]
    EmptyDataUrl,

    #[error("Result URL must not be empty")]
    EmptyResultUrl,

    #[error("URL exceeds length limit")]
    UrlTooLong,

    #[error("Exchange rate must be greater than zero")]
    InvalidRate,

    #[error("Conversion result out of range")]
    ConversionOverflow,

    #[error("Native decimals must not exceed {max}")]
    NativeDecimalsTooHigh { max: u32 },

    #[error("Price oracle unavailable: {reason}")]
    OracleUnavailable { reason: String },
}
