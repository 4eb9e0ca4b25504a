use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin, StdResult, Storage, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

use crate::error::ContractError;

#[cw_serde]
pub struct Config {
    /// Manager allowed to change the price feed and staleness limit
    pub manager: Addr,
    /// Address of the USD price feed contract
    pub price_feed: Addr,
    /// The denom rewards are escrowed and paid in
    pub denom: String,
    /// Number of decimals of one whole unit of `denom`, e.g. 18 for an atto denom
    /// or 6 for a micro denom.
    pub native_decimals: u32,
    /// Maximum age of a feed answer in seconds. None disables the staleness check.
    pub max_price_age: Option<u64>,
}

pub const CONFIG: Item<Config> = Item::new("config");

#[cw_serde]
#[derive(Copy, Eq)]
pub enum JobStatus {
    Open,
    InProgress,
    PendingApproval,
    Completed,
    Cancelled,
}

impl JobStatus {
    /// Completed and cancelled jobs hold no escrow and never change again
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Open => "open",
            JobStatus::InProgress => "in progress",
            JobStatus::PendingApproval => "pending approval",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[cw_serde]
pub struct Job {
    pub id: u64,
    pub requester: Addr,
    /// Set by the first successful accept. None while the job is open.
    pub provider: Option<Addr>,
    pub data_url: String,
    pub script_url: Option<String>,
    pub result_url: Option<String>,
    /// USD amount with `USD_DECIMALS` decimals
    pub reward_usd: Uint128,
    /// The amount locked at posting time. This is what gets paid out, not `reward_usd`.
    pub reward_native: Coin,
    pub status: JobStatus,
    pub posted_at: Timestamp,
}

impl Job {
    /// Fails unless the job is in the `expected` state
    pub fn ensure_status(&self, expected: JobStatus) -> Result<(), ContractError> {
        if self.status != expected {
            return Err(ContractError::InvalidJobState {
                job_id: self.id,
                expected,
                actual: self.status,
            });
        }
        Ok(())
    }
}

/// Map from job ID to job. Jobs are never removed.
pub const JOBS: Map<u64, Job> = Map::new("jobs");

/// The ID the next posted job gets. Equal to the number of jobs posted so far.
const NEXT_JOB_ID: Item<u64> = Item::new("next_job_id");

/// Sum of the rewards of all jobs that are not terminal
pub const TOTAL_ESCROWED: Item<Uint128> = Item::new("total_escrowed");

pub fn job_count(storage: &dyn Storage) -> StdResult<u64> {
    Ok(NEXT_JOB_ID.may_load(storage)?.unwrap_or_default())
}

/// Returns a fresh job ID and advances the counter
pub fn allocate_job_id(storage: &mut dyn Storage) -> StdResult<u64> {
    let id = job_count(storage)?;
    NEXT_JOB_ID.save(storage, &(id + 1))?;
    Ok(id)
}

pub fn load_job(storage: &dyn Storage, job_id: u64) -> Result<Job, ContractError> {
    JOBS.may_load(storage, job_id)?
        .ok_or(ContractError::JobNotFound { job_id })
}

pub fn total_escrowed(storage: &dyn Storage) -> StdResult<Uint128> {
    Ok(TOTAL_ESCROWED.may_load(storage)?.unwrap_or_default())
}

pub fn lock_escrow(storage: &mut dyn Storage, amount: Uint128) -> StdResult<()> {
    let current = total_escrowed(storage)?;
    TOTAL_ESCROWED.save(storage, &current.checked_add(amount)?)
}

pub fn release_escrow(storage: &mut dyn Storage, amount: Uint128) -> StdResult<()> {
    let current = total_escrowed(storage)?;
    TOTAL_ESCROWED.save(storage, &current.checked_sub(amount)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;

    #[test]
    fn allocate_job_id_is_sequential() {
        let mut storage = MockStorage::new();
        assert_eq!(job_count(&storage).unwrap(), 0);
        assert_eq!(allocate_job_id(&mut storage).unwrap(), 0);
        assert_eq!(allocate_job_id(&mut storage).unwrap(), 1);
        assert_eq!(allocate_job_id(&mut storage).unwrap(), 2);
        assert_eq!(job_count(&storage).unwrap(), 3);
    }

    #[test]
    fn escrow_accounting_works() {
        let mut storage = MockStorage::new();
        assert_eq!(total_escrowed(&storage).unwrap(), Uint128::zero());
        lock_escrow(&mut storage, Uint128::new(70)).unwrap();
        lock_escrow(&mut storage, Uint128::new(30)).unwrap();
        assert_eq!(total_escrowed(&storage).unwrap(), Uint128::new(100));
        release_escrow(&mut storage, Uint128::new(70)).unwrap();
        assert_eq!(total_escrowed(&storage).unwrap(), Uint128::new(30));

        // Releasing more than locked is an accounting bug and must fail
        release_escrow(&mut storage, Uint128::new(31)).unwrap_err();
    }

    #[test]
    fn job_status_display() {
        assert_eq!(JobStatus::Open.to_string(), "open");
        assert_eq!(JobStatus::PendingApproval.to_string(), "pending approval");
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
    }
}
