pub mod attributes;
pub mod contract;
pub mod conversion;
pub mod error;
pub mod msg;
pub mod oracle;
pub mod payment;
pub mod state;

pub use crate::error::ContractError;
pub use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
pub use crate::state::{Job, JobStatus};
