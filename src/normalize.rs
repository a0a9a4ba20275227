//! Result normalization: raw worker output to canonical shape.

use tracing::debug;

use crate::types::result::{CanonicalEligibilityResult, RawProviderResult};

/// Normalizes a raw worker result into the canonical shape.
///
/// For a search-all result, scans the aggregated entries in worker order
/// and selects the first whose sub-status is `"found"` AND whose data says
/// the patient is eligible; its TPA name becomes the canonical provider
/// code. `None` means "not eligible under any provider" -- the caller
/// presents that outcome, it is not an error.
///
/// Single-provider results already match the canonical shape and pass
/// through unchanged, which makes the function idempotent: feeding a
/// canonical result back (re-wrapped raw) yields the same canonical
/// result. Missing optional fields stay `None`; nothing here fails.
///
/// # Examples
///
/// ```
/// use eligibility_engine::normalize::normalize;
/// use eligibility_engine::types::RawProviderResult;
///
/// let raw: RawProviderResult = serde_json::from_value(serde_json::json!({
///     "is_search_all": true,
///     "aggregated_results": [
///         {"status": "found", "tpa_name": "TPA001", "data": {"is_eligible": false}},
///         {"status": "found", "tpa_name": "TPA004", "data": {"is_eligible": true}},
///     ],
/// })).unwrap();
///
/// let canonical = normalize(&raw).unwrap();
/// assert_eq!(canonical.provider_code.as_deref(), Some("TPA004"));
/// ```
pub fn normalize(raw: &RawProviderResult) -> Option<CanonicalEligibilityResult> {
    if raw.is_search_all {
        let hit = raw
            .aggregated_results
            .iter()
            .find(|entry| entry.is_eligible_hit())?;
        debug!(
            provider = hit.tpa_name.as_deref(),
            "search-all result selected an eligible provider"
        );
        return Some(CanonicalEligibilityResult {
            provider_code: hit.tpa_name.clone(),
            status: hit.status.clone(),
            data: hit.data.clone(),
            task_id: raw.task_id.clone(),
        });
    }

    Some(CanonicalEligibilityResult {
        provider_code: raw.tpa_name.clone(),
        status: raw.status.clone(),
        data: raw.data.clone(),
        task_id: raw.task_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawProviderResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn single_provider_passes_through() {
        let input = raw(json!({
            "status": "found",
            "tpa_name": "TPA005",
            "data": {"is_eligible": true, "network": "RN3"},
            "task_id": "t-1",
        }));
        let canonical = normalize(&input).unwrap();
        assert_eq!(canonical.provider_code.as_deref(), Some("TPA005"));
        assert_eq!(canonical.status.as_deref(), Some("found"));
        assert_eq!(canonical.task_id.as_deref(), Some("t-1"));
        assert_eq!(canonical.data.unwrap().is_eligible, Some(true));
    }

    #[test]
    fn search_all_picks_first_eligible_hit() {
        let input = raw(json!({
            "is_search_all": true,
            "task_id": "t-2",
            "aggregated_results": [
                {"status": "found", "tpa_name": "TPA001", "data": {"is_eligible": false}},
                {"status": "found", "tpa_name": "X", "data": {"is_eligible": true}},
                {"status": "found", "tpa_name": "TPA009", "data": {"is_eligible": true}},
            ],
        }));
        let canonical = normalize(&input).unwrap();
        assert_eq!(canonical.provider_code.as_deref(), Some("X"));
        assert_eq!(canonical.task_id.as_deref(), Some("t-2"));
    }

    #[test]
    fn search_all_with_no_hit_is_none_not_error() {
        let input = raw(json!({
            "is_search_all": true,
            "aggregated_results": [
                {"status": "not_found", "tpa_name": "TPA001"},
                {"status": "found", "tpa_name": "TPA002", "data": {"is_eligible": false}},
            ],
        }));
        assert_eq!(normalize(&input), None);
    }

    #[test]
    fn search_all_with_empty_list_is_none() {
        let input = raw(json!({"is_search_all": true}));
        assert_eq!(normalize(&input), None);
    }

    #[test]
    fn missing_fields_become_none_without_panic() {
        let canonical = normalize(&raw(json!({}))).unwrap();
        assert!(canonical.provider_code.is_none());
        assert!(canonical.status.is_none());
        assert!(canonical.data.is_none());
        assert!(canonical.task_id.is_none());
    }

    #[test]
    fn normalize_is_idempotent_on_canonical_input() {
        let inputs = [
            raw(json!({
                "status": "found",
                "tpa_name": "TPA005",
                "data": {"is_eligible": true},
                "task_id": "t-1",
            })),
            raw(json!({
                "is_search_all": true,
                "task_id": "t-2",
                "aggregated_results": [
                    {"status": "found", "tpa_name": "TPA004", "data": {"is_eligible": true}},
                ],
            })),
        ];
        for input in inputs {
            let once = normalize(&input).unwrap();
            let twice = normalize(&RawProviderResult::from(once.clone())).unwrap();
            assert_eq!(once, twice);
        }
    }
}
