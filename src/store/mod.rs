//! History and marker persistence interfaces.
//!
//! The console's history records live behind [`HistoryStore`], an opaque
//! key-value contract implemented by the embedding application; the
//! in-memory implementation in [`memory`] backs tests and the local
//! runner. [`MarkerStore`] is the processed-appointment ledger used by the
//! automatic checker to keep sweeps idempotent.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::history::{EligibilityHistoryItem, NewHistoryItem};

pub use memory::{InMemoryHistoryStore, InMemoryMarkerStore};

/// Persisted history records, keyed by the console-side id.
///
/// The engine writes a record exactly once (at submission); afterwards the
/// remote worker mutates status/result/error and the engine only reads.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persists a new record, returning it with its assigned key.
    async fn create_item(&self, fields: NewHistoryItem)
        -> Result<EligibilityHistoryItem, ApiError>;

    /// Fetches one record by console-side id.
    async fn get_item(&self, id: &str) -> Result<EligibilityHistoryItem, ApiError>;

    /// Records for the clinic still in a non-terminal status.
    async fn list_active_checks(
        &self,
        clinic_id: &str,
    ) -> Result<Vec<EligibilityHistoryItem>, ApiError>;

    /// All records for the clinic, newest first.
    async fn list_for_clinic(
        &self,
        clinic_id: &str,
    ) -> Result<Vec<EligibilityHistoryItem>, ApiError>;
}

/// Lifecycle state of a processed-appointment marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerState {
    /// A sweep instance claimed the appointment and is working on it.
    Processing,
    /// The appointment was processed and a check was created.
    Completed,
    /// Processing failed; a later sweep may retry.
    Error,
}

/// One processed-appointment marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedMarker {
    /// State of the marker.
    pub state: MarkerState,
    /// Task created for the appointment, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Failure message for error markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the marker was written.
    pub created_at: DateTime<Utc>,
}

/// Processed-appointment ledger for the automatic checker.
///
/// `try_mark_processing` must be atomic set-if-absent so concurrent sweep
/// instances cannot both claim an appointment.
#[async_trait]
pub trait MarkerStore: Send + Sync {
    /// Fetches the marker for an appointment, if any.
    async fn get(&self, appointment_id: i64) -> Result<Option<ProcessedMarker>, ApiError>;

    /// Atomically claims an appointment. Returns `false` when a marker
    /// already exists (another instance got there first).
    async fn try_mark_processing(&self, appointment_id: i64) -> Result<bool, ApiError>;

    /// Marks an appointment completed with its created task.
    async fn mark_completed(&self, appointment_id: i64, task_id: &str) -> Result<(), ApiError>;

    /// Marks an appointment failed; error markers allow a later retry.
    async fn mark_error(&self, appointment_id: i64, message: &str) -> Result<(), ApiError>;

    /// Whether a sweep should process the appointment: yes when it has no
    /// marker, or when the previous attempt errored.
    async fn should_process(&self, appointment_id: i64) -> Result<bool, ApiError> {
        Ok(match self.get(appointment_id).await? {
            None => true,
            Some(marker) => marker.state == MarkerState::Error,
        })
    }
}
