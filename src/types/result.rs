//! Raw and canonical eligibility result shapes.
//!
//! The remote worker returns one of two raw shapes: a single-provider
//! result, or (for search-all checks) an aggregated list of per-provider
//! sub-results. [`crate::normalize`] collapses both into
//! [`CanonicalEligibilityResult`], which the presentation layer consumes
//! uniformly.
//!
//! Every field that the remote side may omit is an `Option` with a serde
//! default: deserialization of a sparse result never fails.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sub-status value marking a provider result as found.
pub const RESULT_STATUS_FOUND: &str = "found";

/// Eligibility details reported for one provider.
///
/// Only `is_eligible` is interpreted by the engine; everything else the
/// worker reports (coverage class, network, co-pay notes, ...) is carried
/// through opaquely in `extra` for presentation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EligibilityData {
    /// Whether the patient is eligible under this provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_eligible: Option<bool>,

    /// Remaining worker-reported detail, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One per-provider entry inside an aggregated search-all result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchAllEntry {
    /// Sub-status for this provider (`"found"`, `"not_found"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Provider (TPA) name or code this entry belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpa_name: Option<String>,

    /// Eligibility details for this provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EligibilityData>,
}

impl SearchAllEntry {
    /// Returns `true` when this entry was found AND reports the patient as
    /// eligible -- the selection predicate for search-all normalization.
    pub fn is_eligible_hit(&self) -> bool {
        self.status.as_deref() == Some(RESULT_STATUS_FOUND)
            && self
                .data
                .as_ref()
                .and_then(|d| d.is_eligible)
                .unwrap_or(false)
    }
}

/// Raw result payload as fetched from the remote worker.
///
/// Covers both wire shapes. A single-provider result leaves
/// `aggregated_results` empty and `is_search_all` false.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawProviderResult {
    /// `true` when this is an aggregated search-all result.
    #[serde(default)]
    pub is_search_all: bool,

    /// Per-provider sub-results, in worker-reported order. Only populated
    /// for search-all results; order is significant for selection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregated_results: Vec<SearchAllEntry>,

    /// Result status for single-provider results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Provider name or code for single-provider results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpa_name: Option<String>,

    /// Eligibility details for single-provider results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EligibilityData>,

    /// Remote task id this result belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// Normalized eligibility result consumed by presentation.
///
/// Produced by [`crate::normalize::normalize`]; identical in meaning whether
/// the raw result was single-provider or aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEligibilityResult {
    /// Code of the provider the result applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_code: Option<String>,

    /// Result status (`"found"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Eligibility details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EligibilityData>,

    /// Remote task id the result came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl From<CanonicalEligibilityResult> for RawProviderResult {
    /// Re-wraps a canonical result in the single-provider raw shape.
    ///
    /// Used when a normalized result is fed back through normalization
    /// (which must be idempotent) or cached alongside raw results.
    fn from(canonical: CanonicalEligibilityResult) -> Self {
        Self {
            is_search_all: false,
            aggregated_results: Vec::new(),
            status: canonical.status,
            tpa_name: canonical.provider_code,
            data: canonical.data,
            task_id: canonical.task_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sparse_raw_result_deserializes() {
        let raw: RawProviderResult = serde_json::from_value(json!({})).unwrap();
        assert!(!raw.is_search_all);
        assert!(raw.aggregated_results.is_empty());
        assert!(raw.status.is_none());
        assert!(raw.data.is_none());
    }

    #[test]
    fn eligibility_data_keeps_unknown_fields() {
        let data: EligibilityData = serde_json::from_value(json!({
            "is_eligible": true,
            "network": "comprehensive",
            "copay": "20 AED",
        }))
        .unwrap();
        assert_eq!(data.is_eligible, Some(true));
        assert_eq!(data.extra["network"], json!("comprehensive"));
        assert_eq!(data.extra["copay"], json!("20 AED"));
    }

    #[test]
    fn eligible_hit_requires_found_and_eligible() {
        let found_not_eligible = SearchAllEntry {
            status: Some(RESULT_STATUS_FOUND.to_string()),
            tpa_name: Some("TPA001".to_string()),
            data: Some(EligibilityData {
                is_eligible: Some(false),
                extra: Map::new(),
            }),
        };
        assert!(!found_not_eligible.is_eligible_hit());

        let eligible_not_found = SearchAllEntry {
            status: Some("not_found".to_string()),
            tpa_name: Some("TPA001".to_string()),
            data: Some(EligibilityData {
                is_eligible: Some(true),
                extra: Map::new(),
            }),
        };
        assert!(!eligible_not_found.is_eligible_hit());

        let hit = SearchAllEntry {
            status: Some(RESULT_STATUS_FOUND.to_string()),
            tpa_name: Some("TPA001".to_string()),
            data: Some(EligibilityData {
                is_eligible: Some(true),
                extra: Map::new(),
            }),
        };
        assert!(hit.is_eligible_hit());
    }

    #[test]
    fn eligible_hit_tolerates_missing_data() {
        let entry = SearchAllEntry {
            status: Some(RESULT_STATUS_FOUND.to_string()),
            tpa_name: None,
            data: None,
        };
        assert!(!entry.is_eligible_hit());
    }

    #[test]
    fn canonical_serializes_camel_case() {
        let canonical = CanonicalEligibilityResult {
            provider_code: Some("TPA004".to_string()),
            status: Some(RESULT_STATUS_FOUND.to_string()),
            data: None,
            task_id: Some("t-1".to_string()),
        };
        let json = serde_json::to_value(&canonical).unwrap();
        assert_eq!(json["providerCode"], "TPA004");
        assert_eq!(json["taskId"], "t-1");
    }
}
