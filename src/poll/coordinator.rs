//! The polling coordinator: one independent loop per non-terminal record.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::context::ClinicContext;
use crate::error::ApiError;
use crate::store::HistoryStore;
use crate::types::history::EligibilityHistoryItem;

use super::registry::{PollHandle, PollRegistry};
use super::PollConfig;

/// Last-observed state of one check, as cached by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSnapshot {
    /// The record as last fetched.
    pub item: EligibilityHistoryItem,
    /// Set when the loop gave up after the consecutive-failure cap; the
    /// item may lag the remote state.
    pub stale: bool,
    /// When the record was last successfully fetched.
    pub observed_at: DateTime<Utc>,
}

/// Maintains one polling loop per non-terminal history record.
///
/// Loops are spawned onto the ambient tokio runtime. Each loop fetches its
/// record at the configured cadence, caches what it observes, and exits on
/// the first terminal observation -- no fetch is ever issued for a record
/// after its loop ended. Teardown (view dismissed, clinic switched,
/// shutdown) is cooperative through per-loop cancellation tokens and
/// idempotent.
///
/// The coordinator is presentation-agnostic: callers read
/// [`snapshot`](Self::snapshot)/[`snapshots`](Self::snapshots)
/// synchronously and re-render on their own schedule.
pub struct PollingCoordinator {
    store: Arc<dyn HistoryStore>,
    config: PollConfig,
    registry: Arc<PollRegistry>,
    cache: Arc<DashMap<String, CheckSnapshot>>,
}

impl PollingCoordinator {
    /// Creates a coordinator over a history store.
    pub fn new(store: Arc<dyn HistoryStore>, config: PollConfig) -> Self {
        Self {
            store,
            config,
            registry: Arc::new(PollRegistry::new()),
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Reconciles the set of live loops with the clinic's active checks.
    ///
    /// Discovers every non-terminal record belonging to `ctx` and attaches
    /// a loop to each that lacks one (bootstrapping after process restart
    /// included), and tears down loops whose records are no longer in the
    /// active set or belong to a different clinic. Returns the number of
    /// live loops after reconciliation.
    ///
    /// # Errors
    ///
    /// Propagates the store failure when the active-check listing itself
    /// fails; existing loops are left untouched in that case.
    pub async fn sync_active(&self, ctx: &ClinicContext) -> Result<usize, ApiError> {
        let active = self.store.list_active_checks(&ctx.clinic_id).await?;
        let active_ids: HashSet<&str> = active.iter().map(|item| item.id.as_str()).collect();

        for id in self.registry.ids() {
            if !active_ids.contains(id.as_str()) {
                debug!(%id, "check left the active set, tearing loop down");
                self.registry.teardown(&id);
            }
        }

        for item in active {
            self.track(item);
        }

        let live = self.registry.len();
        info!(clinic = %ctx.clinic_id, live, "active checks reconciled");
        Ok(live)
    }

    /// Starts tracking one record.
    ///
    /// Terminal records are cached but get no loop. Non-terminal records
    /// get a loop unless one is already live -- a record never has two.
    pub fn track(&self, item: EligibilityHistoryItem) {
        let id = item.id.clone();
        let terminal = item.is_terminal();
        self.cache.insert(
            id.clone(),
            CheckSnapshot {
                item,
                stale: false,
                observed_at: Utc::now(),
            },
        );
        if terminal || self.registry.contains(&id) {
            return;
        }
        self.spawn_loop(id);
    }

    /// Cancels the loop for `id`, if any. Idempotent; the cached snapshot
    /// is retained.
    pub fn teardown(&self, id: &str) {
        self.registry.teardown(id);
    }

    /// Cancels every loop. Snapshots are retained.
    pub fn shutdown(&self) {
        self.registry.shutdown();
    }

    /// Last-observed state of one check.
    pub fn snapshot(&self, id: &str) -> Option<CheckSnapshot> {
        self.cache.get(id).map(|entry| entry.clone())
    }

    /// Last-observed state of every tracked check.
    pub fn snapshots(&self) -> Vec<CheckSnapshot> {
        self.cache.iter().map(|entry| entry.clone()).collect()
    }

    /// Number of live polling loops.
    pub fn active_loops(&self) -> usize {
        self.registry.len()
    }

    fn spawn_loop(&self, id: String) {
        let token = CancellationToken::new();
        let join = tokio::spawn(poll_loop(
            id.clone(),
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            Arc::clone(&self.registry),
            token.clone(),
            self.config,
        ));
        self.registry.register(&id, PollHandle { token, join });
    }
}

impl Drop for PollingCoordinator {
    fn drop(&mut self) {
        self.registry.shutdown();
    }
}

/// One record's polling loop.
///
/// Runs until cancellation, a terminal observation, or the
/// consecutive-failure cap. Exits by discarding its registry entry;
/// cancellation between the fetch and the next tick is honored before any
/// further fetch.
async fn poll_loop(
    id: String,
    store: Arc<dyn HistoryStore>,
    cache: Arc<DashMap<String, CheckSnapshot>>,
    registry: Arc<PollRegistry>,
    token: CancellationToken,
    config: PollConfig,
) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut consecutive_failures: u32 = 0;
    let mut attempts: u32 = 0;

    loop {
        tokio::select! {
            () = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if token.is_cancelled() {
            break;
        }

        attempts = attempts.saturating_add(1);
        match store.get_item(&id).await {
            Ok(mut item) => {
                consecutive_failures = 0;
                item.polling_attempts = attempts;
                let terminal = item.is_terminal();
                cache.insert(
                    id.clone(),
                    CheckSnapshot {
                        item,
                        stale: false,
                        observed_at: Utc::now(),
                    },
                );
                if terminal {
                    debug!(%id, attempts, "terminal status observed, loop ends");
                    break;
                }
            }
            Err(err) => {
                // Transient: the record's status is never touched by a
                // failed fetch.
                consecutive_failures = consecutive_failures.saturating_add(1);
                debug!(%id, %err, consecutive_failures, "status fetch failed, will retry");
                if let Some(cap) = config.max_consecutive_failures {
                    if consecutive_failures >= cap {
                        warn!(%id, cap, "failure cap reached, flagging snapshot stale");
                        if let Some(mut snapshot) = cache.get_mut(&id) {
                            snapshot.stale = true;
                        }
                        break;
                    }
                }
            }
        }
    }

    registry.discard(&id);
}
