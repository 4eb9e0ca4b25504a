use cosmwasm_std::StdError;
use job_ledger::JobStatus;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum EncodeError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("resultUrl is required for submit action")]
    MissingResultUrl,
}

#[derive(Error, Debug, PartialEq)]
pub enum MirrorError {
    #[error("Event {event} misses attribute {key}")]
    MissingAttribute { event: String, key: String },

    #[error("Event {event} has malformed attribute {key}: {value}")]
    MalformedAttribute {
        event: String,
        key: String,
        value: String,
    },

    #[error("Job {job_id} was already posted")]
    DuplicateJob { job_id: u64 },

    #[error("Job {job_id} is unknown to the mirror")]
    UnknownJob { job_id: u64 },

    #[error("Job {job_id} is {status} and cannot change anymore")]
    JobClosed { job_id: u64, status: JobStatus },
}
