//! Registry of live polling loops.

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Cancellation handle for one polling loop.
#[derive(Debug)]
pub(crate) struct PollHandle {
    pub(crate) token: CancellationToken,
    pub(crate) join: JoinHandle<()>,
}

/// Map from history-record id to its loop's cancellation handle.
///
/// Teardown is idempotent: cancelling an id that is not (or no longer)
/// registered is a no-op, and a loop that exits on its own discards its
/// entry without touching the token.
#[derive(Debug, Default)]
pub struct PollRegistry {
    handles: DashMap<String, PollHandle>,
}

impl PollRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a loop handle. Returns `false` (and cancels the incoming
    /// handle) when the id already has a live loop, so a record never has
    /// two.
    pub(crate) fn register(&self, id: &str, handle: PollHandle) -> bool {
        use dashmap::mapref::entry::Entry;
        match self.handles.entry(id.to_string()) {
            Entry::Occupied(_) => {
                handle.token.cancel();
                handle.join.abort();
                false
            }
            Entry::Vacant(vacant) => {
                vacant.insert(handle);
                true
            }
        }
    }

    /// Cancels and removes the loop for `id`. Idempotent.
    pub fn teardown(&self, id: &str) {
        if let Some((_, handle)) = self.handles.remove(id) {
            trace!(id, "polling loop torn down");
            handle.token.cancel();
        }
    }

    /// Removes the entry for `id` without cancelling -- called by a loop
    /// that is exiting on its own (terminal status, failure cap).
    pub(crate) fn discard(&self, id: &str) {
        self.handles.remove(id);
    }

    /// Returns `true` when `id` has a live loop.
    pub fn contains(&self, id: &str) -> bool {
        self.handles.contains_key(id)
    }

    /// Number of live loops.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` when no loops are live.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Ids of all live loops.
    pub fn ids(&self) -> Vec<String> {
        self.handles.iter().map(|e| e.key().clone()).collect()
    }

    /// Cancels every loop.
    pub fn shutdown(&self) {
        let ids = self.ids();
        for id in ids {
            self.teardown(&id);
        }
    }
}

impl Drop for PollRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}
