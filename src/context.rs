//! Explicit clinic context threaded through every operation.
//!
//! The current clinic is never ambient state: each submit, poll sync, and
//! sweep call receives the context it operates under, so switching clinics
//! is a caller-side concern and testable without global fixtures.

use serde::{Deserialize, Serialize};

/// Identifies the clinic an operation runs for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicContext {
    /// Clinic identifier.
    pub clinic_id: String,

    /// Scheduling-system site id, when the clinic maps to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_site_id: Option<i64>,
}

impl ClinicContext {
    /// Context for a clinic with no scheduling-site mapping.
    pub fn new(clinic_id: impl Into<String>) -> Self {
        Self {
            clinic_id: clinic_id.into(),
            customer_site_id: None,
        }
    }

    /// Context for a clinic with a scheduling-site mapping.
    pub fn with_site(clinic_id: impl Into<String>, customer_site_id: i64) -> Self {
        Self {
            clinic_id: clinic_id.into(),
            customer_site_id: Some(customer_site_id),
        }
    }
}
