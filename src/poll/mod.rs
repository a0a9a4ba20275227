//! Concurrent per-check polling.
//!
//! Every non-terminal history record gets its own polling loop: an
//! independent timer that fetches the record at a fixed cadence and stops
//! the instant a terminal status is observed. Loops share nothing but the
//! store handle and the snapshot cache -- a slow or failing fetch for one
//! check never delays another.
//!
//! The [`PollingCoordinator`] owns the registry of live loops and the
//! cache of last-observed records; presentation reads snapshots
//! synchronously and never touches the store.

mod coordinator;
mod registry;

pub use coordinator::{CheckSnapshot, PollingCoordinator};
pub use registry::PollRegistry;

use std::time::Duration;

/// Polling cadence and failure policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollConfig {
    /// Fixed interval between status fetches for one record.
    pub interval: Duration,

    /// Consecutive failed fetches tolerated before a loop gives up and
    /// flags its snapshot stale. `None` retries forever. Failed fetches
    /// never transition the record's status; a successful fetch resets
    /// the counter.
    pub max_consecutive_failures: Option<u32>,
}

impl Default for PollConfig {
    /// 2 s cadence, 30 consecutive failures (about one minute of a dead
    /// endpoint) before a loop flags its snapshot stale and stops.
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            max_consecutive_failures: Some(30),
        }
    }
}
