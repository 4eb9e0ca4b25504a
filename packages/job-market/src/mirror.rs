use std::collections::BTreeMap;
use std::str::FromStr;

use cosmwasm_std::{Addr, Attribute, Coin, Event, Uint128};
use job_ledger::attributes::{
    ATTR_AMOUNT, ATTR_DATA_URL, ATTR_JOB_ID, ATTR_PROVIDER, ATTR_REFUND, ATTR_REQUESTER,
    ATTR_RESULT_URL, ATTR_REWARD_NATIVE, ATTR_REWARD_USD, ATTR_SCRIPT_URL, EVENT_TYPE_JOB_ACCEPTED,
    EVENT_TYPE_JOB_APPROVED, EVENT_TYPE_JOB_CANCELLED, EVENT_TYPE_JOB_POSTED,
    EVENT_TYPE_JOB_RESULT_SUBMITTED,
};
use job_ledger::JobStatus;

use crate::error::MirrorError;

/// Attribute the chain adds to every custom event, naming the emitting contract
const CONTRACT_ADDRESS_ATTR: &str = "_contract_address";
/// Prefix the chain puts in front of custom event types
const WASM_EVENT_PREFIX: &str = "wasm-";

/// A state change of the ledger as announced by its events
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    Posted {
        job_id: u64,
        requester: Addr,
        reward_usd: Uint128,
        reward_native: Coin,
        data_url: String,
        script_url: Option<String>,
    },
    Accepted {
        job_id: u64,
        provider: Addr,
    },
    ResultSubmitted {
        job_id: u64,
        provider: Addr,
        result_url: String,
    },
    Approved {
        job_id: u64,
        provider: Addr,
        amount: Coin,
    },
    Cancelled {
        job_id: u64,
        requester: Addr,
        refund: Coin,
    },
}

impl LedgerEvent {
    /// Parses one event. Works with both the type set by the contract (`job_posted`) and
    /// the one seen on chain (`wasm-job_posted`).
    ///
    /// Returns `Ok(None)` for events that are not ledger events.
    pub fn from_event(event: &Event) -> Result<Option<Self>, MirrorError> {
        let ty = event.ty.strip_prefix(WASM_EVENT_PREFIX).unwrap_or(&event.ty);
        let attrs = Attrs {
            event: ty,
            attributes: &event.attributes,
        };
        let parsed = match ty {
            EVENT_TYPE_JOB_POSTED => LedgerEvent::Posted {
                job_id: attrs.parse(ATTR_JOB_ID)?,
                requester: attrs.addr(ATTR_REQUESTER)?,
                reward_usd: attrs.parse(ATTR_REWARD_USD)?,
                reward_native: attrs.coin(ATTR_REWARD_NATIVE)?,
                data_url: attrs.get(ATTR_DATA_URL)?.to_string(),
                script_url: attrs.find(ATTR_SCRIPT_URL).map(str::to_string),
            },
            EVENT_TYPE_JOB_ACCEPTED => LedgerEvent::Accepted {
                job_id: attrs.parse(ATTR_JOB_ID)?,
                provider: attrs.addr(ATTR_PROVIDER)?,
            },
            EVENT_TYPE_JOB_RESULT_SUBMITTED => LedgerEvent::ResultSubmitted {
                job_id: attrs.parse(ATTR_JOB_ID)?,
                provider: attrs.addr(ATTR_PROVIDER)?,
                result_url: attrs.get(ATTR_RESULT_URL)?.to_string(),
            },
            EVENT_TYPE_JOB_APPROVED => LedgerEvent::Approved {
                job_id: attrs.parse(ATTR_JOB_ID)?,
                provider: attrs.addr(ATTR_PROVIDER)?,
                amount: attrs.coin(ATTR_AMOUNT)?,
            },
            EVENT_TYPE_JOB_CANCELLED => LedgerEvent::Cancelled {
                job_id: attrs.parse(ATTR_JOB_ID)?,
                requester: attrs.addr(ATTR_REQUESTER)?,
                refund: attrs.coin(ATTR_REFUND)?,
            },
            _ => return Ok(None),
        };
        Ok(Some(parsed))
    }

    pub fn job_id(&self) -> u64 {
        match self {
            LedgerEvent::Posted { job_id, .. }
            | LedgerEvent::Accepted { job_id, .. }
            | LedgerEvent::ResultSubmitted { job_id, .. }
            | LedgerEvent::Approved { job_id, .. }
            | LedgerEvent::Cancelled { job_id, .. } => *job_id,
        }
    }
}

struct Attrs<'a> {
    event: &'a str,
    attributes: &'a [Attribute],
}

impl<'a> Attrs<'a> {
    fn find(&self, key: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }

    fn get(&self, key: &str) -> Result<&'a str, MirrorError> {
        self.find(key).ok_or_else(|| MirrorError::MissingAttribute {
            event: self.event.to_string(),
            key: key.to_string(),
        })
    }

    fn malformed(&self, key: &str, value: &str) -> MirrorError {
        MirrorError::MalformedAttribute {
            event: self.event.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn parse<T: FromStr>(&self, key: &str) -> Result<T, MirrorError> {
        let value = self.get(key)?;
        value.parse().map_err(|_| self.malformed(key, value))
    }

    fn addr(&self, key: &str) -> Result<Addr, MirrorError> {
        let value = self.get(key)?;
        if value.is_empty() {
            return Err(self.malformed(key, value));
        }
        Ok(Addr::unchecked(value))
    }

    /// Parses the `{amount}{denom}` format of `Coin`'s `Display`
    fn coin(&self, key: &str) -> Result<Coin, MirrorError> {
        let value = self.get(key)?;
        let split = value
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| self.malformed(key, value))?;
        let (amount, denom) = value.split_at(split);
        let amount: Uint128 = amount.parse().map_err(|_| self.malformed(key, value))?;
        Ok(Coin::new(amount, denom))
    }
}

/// What the mirror knows about a job
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MirroredJob {
    pub id: u64,
    pub requester: Addr,
    pub provider: Option<Addr>,
    pub data_url: String,
    pub script_url: Option<String>,
    pub result_url: Option<String>,
    pub reward_usd: Uint128,
    pub reward_native: Coin,
    pub status: JobStatus,
}

/// A read model of one ledger contract, built from its events.
///
/// Events must be fed in the order they were emitted. The mirror follows the ledger
/// and never rejects a transition the ledger accepted. It only fails on events that
/// cannot belong to a consistent history.
#[derive(Clone, Debug)]
pub struct JobMirror {
    ledger: Addr,
    jobs: BTreeMap<u64, MirroredJob>,
}

impl JobMirror {
    pub fn new(ledger: Addr) -> Self {
        Self {
            ledger,
            jobs: BTreeMap::new(),
        }
    }

    /// Builds a mirror from the full event history of `ledger`
    pub fn replay<'a>(
        ledger: Addr,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Result<Self, MirrorError> {
        let mut mirror = Self::new(ledger);
        mirror.ingest(events)?;
        Ok(mirror)
    }

    pub fn ledger(&self) -> &Addr {
        &self.ledger
    }

    /// Applies all ledger events in `events`, e.g. the events of a transaction.
    /// Events emitted by other contracts are skipped. Returns the number of applied events.
    pub fn ingest<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Result<usize, MirrorError> {
        let mut applied = 0;
        for event in events {
            if !self.is_own(event) {
                continue;
            }
            if let Some(ledger_event) = LedgerEvent::from_event(event)? {
                self.apply(ledger_event)?;
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Events without a contract address are assumed to come from this ledger
    fn is_own(&self, event: &Event) -> bool {
        event
            .attributes
            .iter()
            .find(|attr| attr.key == CONTRACT_ADDRESS_ATTR)
            .map_or(true, |attr| attr.value == self.ledger.as_str())
    }

    pub fn apply(&mut self, event: LedgerEvent) -> Result<(), MirrorError> {
        match event {
            LedgerEvent::Posted {
                job_id,
                requester,
                reward_usd,
                reward_native,
                data_url,
                script_url,
            } => {
                if self.jobs.contains_key(&job_id) {
                    return Err(MirrorError::DuplicateJob { job_id });
                }
                self.jobs.insert(
                    job_id,
                    MirroredJob {
                        id: job_id,
                        requester,
                        provider: None,
                        data_url,
                        script_url,
                        result_url: None,
                        reward_usd,
                        reward_native,
                        status: JobStatus::Open,
                    },
                );
            }
            LedgerEvent::Accepted { job_id, provider } => {
                let job = self.job_mut(job_id)?;
                job.provider = Some(provider);
                job.status = JobStatus::InProgress;
            }
            LedgerEvent::ResultSubmitted {
                job_id, result_url, ..
            } => {
                let job = self.job_mut(job_id)?;
                job.result_url = Some(result_url);
                job.status = JobStatus::PendingApproval;
            }
            LedgerEvent::Approved { job_id, .. } => {
                self.job_mut(job_id)?.status = JobStatus::Completed;
            }
            LedgerEvent::Cancelled { job_id, .. } => {
                self.job_mut(job_id)?.status = JobStatus::Cancelled;
            }
        }
        Ok(())
    }

    /// The job an event refers to. Completed and cancelled jobs never change again.
    fn job_mut(&mut self, job_id: u64) -> Result<&mut MirroredJob, MirrorError> {
        let job = self
            .jobs
            .get_mut(&job_id)
            .ok_or(MirrorError::UnknownJob { job_id })?;
        if job.status.is_terminal() {
            return Err(MirrorError::JobClosed {
                job_id,
                status: job.status,
            });
        }
        Ok(job)
    }

    pub fn get(&self, job_id: u64) -> Option<&MirroredJob> {
        self.jobs.get(&job_id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Jobs in the given status, newest first
    pub fn by_status(&self, status: JobStatus) -> Vec<&MirroredJob> {
        self.newest_first()
            .filter(|job| job.status == status)
            .collect()
    }

    /// Jobs waiting for a provider, newest first
    pub fn open_jobs(&self) -> Vec<&MirroredJob> {
        self.by_status(JobStatus::Open)
    }

    /// Jobs `party` takes part in as requester or provider, newest first
    pub fn jobs_of(&self, party: &Addr) -> Vec<&MirroredJob> {
        self.newest_first()
            .filter(|job| &job.requester == party || job.provider.as_ref() == Some(party))
            .collect()
    }

    fn newest_first(&self) -> impl Iterator<Item = &MirroredJob> {
        self.jobs.values().rev()
    }
}
