//! Patient identity, patient search results, and clinic doctors.

use serde::{Deserialize, Serialize};

/// Patient identity as known at submission time.
///
/// May be partial; the submitter runs it through the context resolver
/// best-effort before building the payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientIdentity {
    /// Patient identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,

    /// Master-person-index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpi: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Date of birth, as the upstream system formats it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    /// Appointment the check belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<i64>,

    /// Encounter the check belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter_id: Option<i64>,
}

impl PatientIdentity {
    /// Returns `true` when both the patient identifier and MPI are present,
    /// i.e. context resolution has nothing left to add.
    pub fn is_complete(&self) -> bool {
        self.patient_id.is_some() && self.mpi.is_some()
    }
}

/// One row of a patient search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    /// Patient identifier (deduplication key).
    pub patient_id: String,

    /// Master-person-index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpi: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Date of birth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

/// A doctor from the clinic directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Directory identifier.
    pub id: String,

    /// Display name shown in the doctor picker.
    pub name: String,

    /// External-identity field some providers require alongside the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_completeness() {
        let mut identity = PatientIdentity::default();
        assert!(!identity.is_complete());
        identity.patient_id = Some("p-1".to_string());
        assert!(!identity.is_complete());
        identity.mpi = Some("MPI-1".to_string());
        assert!(identity.is_complete());
    }
}
