//! History records tracking a task's lifecycle and outcome.
//!
//! The console owns [`EligibilityHistoryItem`]; the remote worker owns the
//! task. After creation, a record's `status`/`result`/`error` are mutated
//! only by the remote worker and observed here via polling -- the engine
//! never writes them locally except to cache the fetched value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::RawProviderResult;
use super::status::CheckStatus;

/// A persisted record tracking one eligibility check's outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityHistoryItem {
    /// Persistence key, distinct from the remote task id.
    pub id: String,

    /// Remote task this record tracks (foreign reference, not ownership).
    pub task_id: String,

    /// Clinic the check belongs to.
    pub clinic_id: String,

    /// Current lifecycle status, as last observed.
    pub status: CheckStatus,

    /// Raw result payload; set only once status is `complete`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<RawProviderResult>,

    /// Remote failure message; set only once status is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Creation timestamp. Records migrated from older systems may lack
    /// one; history bucketing places those in "older".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Patient identifier, denormalized at creation.
    pub patient_id: String,

    /// Patient master-person-index, denormalized at creation.
    #[serde(
        rename = "patientMPI",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub patient_mpi: Option<String>,

    /// Patient display name, denormalized at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,

    /// Patient date of birth, denormalized at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    /// Appointment the check belongs to, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<i64>,

    /// Encounter the check belongs to, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter_id: Option<i64>,

    /// Provider (payer) code the check ran against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_payer: Option<String>,

    /// Number of status fetches performed for this record.
    #[serde(default)]
    pub polling_attempts: u32,
}

impl EligibilityHistoryItem {
    /// Returns `true` once the record is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Fields for a history record about to be created.
///
/// The submitter fills this in after the remote task exists; the store
/// assigns the persistence key.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryItem {
    /// Remote task the record will track.
    pub task_id: String,
    /// Clinic the check belongs to.
    pub clinic_id: String,
    /// Patient identifier.
    pub patient_id: String,
    /// Patient master-person-index.
    pub patient_mpi: Option<String>,
    /// Patient display name.
    pub patient_name: Option<String>,
    /// Patient date of birth.
    pub date_of_birth: Option<String>,
    /// Appointment the check belongs to.
    pub appointment_id: Option<i64>,
    /// Encounter the check belongs to.
    pub encounter_id: Option<i64>,
    /// Provider (payer) code the check ran against.
    pub insurance_payer: Option<String>,
}

impl NewHistoryItem {
    /// Materializes the record with a fresh persistence key, status
    /// `pending`, and the current UTC timestamp.
    pub fn into_item(self) -> EligibilityHistoryItem {
        EligibilityHistoryItem {
            id: Uuid::new_v4().to_string(),
            task_id: self.task_id,
            clinic_id: self.clinic_id,
            status: CheckStatus::Pending,
            result: None,
            error: None,
            created_at: Some(Utc::now()),
            patient_id: self.patient_id,
            patient_mpi: self.patient_mpi,
            patient_name: self.patient_name,
            date_of_birth: self.date_of_birth,
            appointment_id: self.appointment_id,
            encounter_id: self.encounter_id,
            insurance_payer: self.insurance_payer,
            polling_attempts: 0,
        }
    }
}
