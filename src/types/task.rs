//! Task and payload wire types.
//!
//! [`ProviderPayload`] is the request body sent to the remote task-creation
//! API. Its field naming mirrors the worker's wire contract exactly: the
//! check parameters are snake_case while the patient metadata block is
//! camelCase, so the renames here are per-field and deliberate.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::form::{IdType, VisitType};

/// Canonical provider request payload built from the form values.
///
/// Built exclusively by [`crate::payload::build_payload`]; immutable once
/// submitted. Optional fields are omitted from the wire when absent, and
/// a field hidden by the provider's rules is never present at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPayload {
    /// Identity-document value used for the lookup.
    pub id_value: String,

    /// Identity-document type.
    pub id_type: IdType,

    /// Provider (TPA) code the check runs against, or the search-all code.
    pub tpa_name: String,

    /// Visit type of the encounter being verified.
    pub visit_type: VisitType,

    /// Treating doctor's display name, when the provider asks for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,

    /// Treating doctor's external directory identity, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_uid: Option<String>,

    /// Patient contact phone, when the provider asks for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Referral code, when the provider asks for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,

    /// Object URL of the uploaded referral document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_document_url: Option<String>,

    /// Free-text referring physician, when the provider asks for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referring_physician: Option<String>,

    /// Payer sub-selection for providers fronting multiple payers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_subselection: Option<String>,

    /// Nested extra-argument sub-payload (maternity treatment type, member
    /// presence, dental sub-option, POD). Omitted entirely when empty;
    /// insertion order is preserved on the wire.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra_args: IndexMap<String, Value>,

    /// Patient master-person-index, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpi: Option<String>,

    /// Patient identifier, when known.
    #[serde(rename = "patientId", default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,

    /// Patient display name, when known.
    #[serde(rename = "patientName", default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,

    /// Appointment the check belongs to, when known.
    #[serde(
        rename = "appointmentId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub appointment_id: Option<i64>,

    /// Encounter the check belongs to, when known.
    #[serde(
        rename = "encounterId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub encounter_id: Option<i64>,
}

/// One remote verification attempt, as known to the console.
///
/// Created by the submitter at task-creation time and never mutated; the
/// remote worker owns the task itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityCheckTask {
    /// Opaque remote identifier assigned on creation.
    pub task_id: String,

    /// Provider code the task was submitted against.
    pub provider_code: String,

    /// The payload that was submitted, kept for audit and resubmission.
    pub submitted_payload: ProviderPayload,
}

/// Response of the task-creation API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTask {
    /// Opaque identifier of the newly created remote task.
    pub task_id: String,
}
