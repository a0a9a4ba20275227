//! In-memory store implementations.
//!
//! [`InMemoryHistoryStore`] is a thread-safe [`HistoryStore`] over
//! `DashMap`, used by tests and the local runner. It also exposes the
//! worker-side mutators (`mark_processing`, `complete_with_result`,
//! `fail_with_error`) so a scripted "remote worker" can drive records
//! through the state machine -- transitions are validated, the monotonic
//! order is enforced at the store boundary.

use chrono::Utc;
use dashmap::DashMap;

use async_trait::async_trait;

use crate::error::{ApiError, EligibilityError};
use crate::types::history::{EligibilityHistoryItem, NewHistoryItem};
use crate::types::result::RawProviderResult;
use crate::types::status::CheckStatus;

use super::{HistoryStore, MarkerState, MarkerStore, ProcessedMarker};

/// Thread-safe in-memory history store.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    items: DashMap<String, EligibilityHistoryItem>,
}

impl InMemoryHistoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Worker-side transition to `processing`.
    ///
    /// # Errors
    ///
    /// [`EligibilityError::NotFound`] for unknown ids,
    /// [`EligibilityError::InvalidTransition`] when the record is already
    /// past `pending`.
    pub fn mark_processing(&self, id: &str) -> Result<(), EligibilityError> {
        self.transition(id, CheckStatus::Processing, |_| {})
    }

    /// Worker-side terminal transition to `complete` with a result.
    pub fn complete_with_result(
        &self,
        id: &str,
        result: RawProviderResult,
    ) -> Result<(), EligibilityError> {
        self.transition(id, CheckStatus::Complete, move |item| {
            item.result = Some(result);
        })
    }

    /// Worker-side terminal transition to `error` with a message.
    pub fn fail_with_error(&self, id: &str, message: &str) -> Result<(), EligibilityError> {
        let message = message.to_string();
        self.transition(id, CheckStatus::Error, move |item| {
            item.error = Some(message);
        })
    }

    fn transition(
        &self,
        id: &str,
        next: CheckStatus,
        apply: impl FnOnce(&mut EligibilityHistoryItem),
    ) -> Result<(), EligibilityError> {
        let mut entry = self
            .items
            .get_mut(id)
            .ok_or_else(|| EligibilityError::NotFound { id: id.to_string() })?;
        let item = entry.value_mut();
        item.status.validate_transition(id, next)?;
        item.status = next;
        apply(item);
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn create_item(
        &self,
        fields: NewHistoryItem,
    ) -> Result<EligibilityHistoryItem, ApiError> {
        let item = fields.into_item();
        self.items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn get_item(&self, id: &str) -> Result<EligibilityHistoryItem, ApiError> {
        self.items
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| ApiError::NotFound {
                key: id.to_string(),
            })
    }

    async fn list_active_checks(
        &self,
        clinic_id: &str,
    ) -> Result<Vec<EligibilityHistoryItem>, ApiError> {
        Ok(self
            .items
            .iter()
            .filter(|entry| entry.clinic_id == clinic_id && !entry.is_terminal())
            .map(|entry| entry.clone())
            .collect())
    }

    async fn list_for_clinic(
        &self,
        clinic_id: &str,
    ) -> Result<Vec<EligibilityHistoryItem>, ApiError> {
        let mut items: Vec<EligibilityHistoryItem> = self
            .items
            .iter()
            .filter(|entry| entry.clinic_id == clinic_id)
            .map(|entry| entry.clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}

/// Thread-safe in-memory processed-appointment ledger.
///
/// Error markers are reclaimable: `try_mark_processing` succeeds over an
/// error marker so a later sweep can retry a failed appointment. (The
/// production ledger gets the same effect by expiring error markers early.)
#[derive(Debug, Default)]
pub struct InMemoryMarkerStore {
    markers: DashMap<i64, ProcessedMarker>,
}

impl InMemoryMarkerStore {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarkerStore for InMemoryMarkerStore {
    async fn get(&self, appointment_id: i64) -> Result<Option<ProcessedMarker>, ApiError> {
        Ok(self.markers.get(&appointment_id).map(|m| m.clone()))
    }

    async fn try_mark_processing(&self, appointment_id: i64) -> Result<bool, ApiError> {
        use dashmap::mapref::entry::Entry;
        match self.markers.entry(appointment_id) {
            Entry::Occupied(mut occupied) if occupied.get().state == MarkerState::Error => {
                occupied.insert(ProcessedMarker {
                    state: MarkerState::Processing,
                    task_id: None,
                    error: None,
                    created_at: Utc::now(),
                });
                Ok(true)
            }
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(vacant) => {
                vacant.insert(ProcessedMarker {
                    state: MarkerState::Processing,
                    task_id: None,
                    error: None,
                    created_at: Utc::now(),
                });
                Ok(true)
            }
        }
    }

    async fn mark_completed(&self, appointment_id: i64, task_id: &str) -> Result<(), ApiError> {
        self.markers.insert(
            appointment_id,
            ProcessedMarker {
                state: MarkerState::Completed,
                task_id: Some(task_id.to_string()),
                error: None,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn mark_error(&self, appointment_id: i64, message: &str) -> Result<(), ApiError> {
        self.markers.insert(
            appointment_id,
            ProcessedMarker {
                state: MarkerState::Error,
                task_id: None,
                error: Some(message.to_string()),
                created_at: Utc::now(),
            },
        );
        Ok(())
    }
}
