//! Appointment rows as fetched from the scheduling system.
//!
//! The upstream feed is loose about both casing (snake_case and camelCase
//! variants coexist) and numeric typing (ids arrive as numbers or numeric
//! strings), so this type carries serde aliases and tolerant deserializers
//! rather than assuming a clean contract.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserializes a field that may be a string, a number, or absent into
/// `Option<String>`.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Deserializes a field that may be a number, a numeric string, or absent
/// into `Option<i64>`.
fn i64_or_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// One appointment row from the scheduling feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Appointment identifier.
    #[serde(
        default,
        alias = "appointment_id",
        deserialize_with = "i64_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub appointment_id: Option<i64>,

    /// Patient identifier.
    #[serde(
        default,
        alias = "patient_id",
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub patient_id: Option<String>,

    /// Patient master-person-index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpi: Option<String>,

    /// Patient full name.
    #[serde(
        default,
        alias = "full_name",
        alias = "patientName",
        alias = "patient_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_name: Option<String>,

    /// Patient date of birth.
    #[serde(
        default,
        alias = "dateOfBirth",
        skip_serializing_if = "Option::is_none"
    )]
    pub dob: Option<String>,

    /// Encounter identifier.
    #[serde(
        default,
        alias = "encounter_id",
        deserialize_with = "i64_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub encounter_id: Option<i64>,

    /// National identity number from the demographics block.
    #[serde(
        default,
        alias = "nationality_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub nationality_id: Option<String>,

    /// Alternate national-id field some sites populate instead.
    #[serde(default, alias = "uid_value", skip_serializing_if = "Option::is_none")]
    pub uid_value: Option<String>,

    /// Receiver (TPA) code on the appointment's insurance block.
    #[serde(
        default,
        alias = "receiver_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub receiver_code: Option<String>,

    /// Receiver (TPA) display name.
    #[serde(
        default,
        alias = "receiver_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub receiver_name: Option<String>,

    /// Payer code on the appointment's insurance block.
    #[serde(default, alias = "payer_code", skip_serializing_if = "Option::is_none")]
    pub payer_code: Option<String>,

    /// Payer display name.
    #[serde(default, alias = "payer_name", skip_serializing_if = "Option::is_none")]
    pub payer_name: Option<String>,

    /// Specialisation of the booked doctor, used for visit-type inference.
    #[serde(
        default,
        alias = "specialisation_name",
        alias = "specializationName",
        alias = "specialization_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub specialisation_name: Option<String>,

    /// Emergency flag on the appointment.
    #[serde(
        default,
        alias = "isEmergencyAppointment",
        alias = "is_emergency_appointment",
        alias = "emergency",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_emergency: Option<bool>,

    /// Health-authority member id, when the demographics block carries one.
    #[serde(
        default,
        alias = "dha_member_id",
        alias = "memberId",
        alias = "member_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub dha_member_id: Option<String>,
}

impl Appointment {
    /// Returns `true` when the appointment carries any payer/receiver code
    /// or name, i.e. there is insurance information to verify against.
    pub fn has_insurance_info(&self) -> bool {
        let has_code = self.receiver_code.as_deref().is_some_and(|s| !s.trim().is_empty())
            || self.payer_code.as_deref().is_some_and(|s| !s.trim().is_empty());
        let has_name = self.receiver_name.as_deref().is_some_and(|s| !s.trim().is_empty())
            || self.payer_name.as_deref().is_some_and(|s| !s.trim().is_empty());
        has_code || has_name
    }

    /// Returns `true` when the demographics block carries a usable national
    /// identity number.
    pub fn has_national_id(&self) -> bool {
        self.nationality_id
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
            || self.uid_value.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}
