//! Off-chain helpers for applications built around the job ledger.
//!
//! Nothing in here decides anything. The ledger contract is the only source of truth;
//! these types only encode calls to it and project its events.

mod action;
mod error;
mod mirror;

pub use action::{encode_action, encode_post_job, Action, ActionRequest};
pub use error::{EncodeError, MirrorError};
pub use mirror::{JobMirror, LedgerEvent, MirroredJob};
