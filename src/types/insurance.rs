//! Patient insurance records as read from the clinic's patient profile.

use serde::{Deserialize, Serialize};

/// Coverage status of an insurance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsuranceStatus {
    /// Coverage is currently active.
    Active,
    /// Coverage has lapsed.
    Expired,
    /// Any other status the upstream system reports.
    #[serde(other)]
    Other,
}

/// One insurance record on a patient's profile.
///
/// The policy-identifier fields feed member-id (CARDNUMBER) determination;
/// `status` and `valid` drive default-record selection before a check is
/// triggered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceRecord {
    /// Coverage status.
    pub status: InsuranceStatus,

    /// Whether the record passed the clinic's own validation.
    #[serde(default)]
    pub valid: bool,

    /// Payer display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_name: Option<String>,

    /// Payer code, when the upstream system carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_code: Option<String>,

    /// TPA-scoped policy identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpa_policy_id: Option<String>,

    /// Insurer-scoped policy identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_policy_id: Option<String>,

    /// Plain policy number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,

    /// Holder identifier some payers use instead of a policy number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ins_holder_id: Option<String>,
}

impl InsuranceRecord {
    /// First non-empty member identifier in the documented priority order:
    /// TPA policy id, insurer policy id, policy number, holder id.
    pub fn member_id(&self) -> Option<&str> {
        [
            &self.tpa_policy_id,
            &self.insurance_policy_id,
            &self.policy_number,
            &self.ins_holder_id,
        ]
        .into_iter()
        .find_map(|field| {
            field
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_maps_to_other() {
        let status: InsuranceStatus = serde_json::from_value("suspended".into()).unwrap();
        assert_eq!(status, InsuranceStatus::Other);
    }

    #[test]
    fn member_id_priority_order() {
        let record = InsuranceRecord {
            status: InsuranceStatus::Active,
            valid: true,
            payer_name: None,
            payer_code: None,
            tpa_policy_id: Some("  ".to_string()),
            insurance_policy_id: Some("POL-77".to_string()),
            policy_number: Some("NUM-1".to_string()),
            ins_holder_id: None,
        };
        // Blank tpa_policy_id is skipped, not selected.
        assert_eq!(record.member_id(), Some("POL-77"));
    }

    #[test]
    fn member_id_none_when_all_blank() {
        let record = InsuranceRecord {
            status: InsuranceStatus::Expired,
            valid: false,
            payer_name: None,
            payer_code: None,
            tpa_policy_id: None,
            insurance_policy_id: None,
            policy_number: None,
            ins_holder_id: None,
        };
        assert_eq!(record.member_id(), None);
    }
}
