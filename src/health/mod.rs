//! MySQL health evaluation
//!
//! This module provides:
//! - A snapshot of the server values the check reads
//! - Threshold rules turning a snapshot into named check results
//! - The [`Checker`] driving a single run

mod checker;
mod evaluator;
mod snapshot;
mod state;

pub use checker::Checker;
pub use evaluator::{
    evaluate, summarize, ACTIVE_CONNECTIONS, MAX_USED_CONNECTIONS, SLAVE_IO_THREAD, SLAVE_LAG,
    SLAVE_LAST_ERRNO, SLAVE_SQL_THREAD,
};
pub use snapshot::{ReplicationLag, ReplicationStatus, ServerSnapshot};
pub use state::{CheckResult, Outcome, Status};
