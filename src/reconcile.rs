//! History reconciliation: day bucketing, default insurance selection,
//! deduplication.
//!
//! Pure functions over already-fetched data. The reference instant for
//! bucketing is an explicit parameter so the midnight boundary is
//! testable; [`bucket_today`] is the now()-based convenience.

use chrono::{DateTime, Local};

use crate::types::history::EligibilityHistoryItem;
use crate::types::insurance::{InsuranceRecord, InsuranceStatus};
use crate::types::patient::PatientSummary;

/// History entries partitioned around the local midnight boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryBuckets {
    /// Entries created on the reference day (local calendar day).
    pub today: Vec<EligibilityHistoryItem>,
    /// Everything else, including entries with no timestamp.
    pub older: Vec<EligibilityHistoryItem>,
}

/// Partitions history entries into "today" and "older" relative to
/// `reference`'s local calendar day. Entries with no timestamp always land
/// in "older". Relative order within each bucket is preserved.
pub fn bucket_by_day(
    items: Vec<EligibilityHistoryItem>,
    reference: DateTime<Local>,
) -> HistoryBuckets {
    let today = reference.date_naive();
    let mut buckets = HistoryBuckets::default();
    for item in items {
        let is_today = item
            .created_at
            .map(|at| at.with_timezone(&Local).date_naive() == today)
            .unwrap_or(false);
        if is_today {
            buckets.today.push(item);
        } else {
            buckets.older.push(item);
        }
    }
    buckets
}

/// [`bucket_by_day`] against the current local time.
pub fn bucket_today(items: Vec<EligibilityHistoryItem>) -> HistoryBuckets {
    bucket_by_day(items, Local::now())
}

/// Deduplicates history entries by task identity, keeping the first
/// occurrence per task id.
pub fn dedup_by_task(items: Vec<EligibilityHistoryItem>) -> Vec<EligibilityHistoryItem> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.task_id.clone()))
        .collect()
}

/// Selects the default insurance record to preselect before a check.
///
/// Priority order, first match wins:
/// 1. status active AND valid,
/// 2. status active,
/// 3. first record that is not expired.
///
/// `None` means no record qualifies; the console must prompt for an
/// explicit selection.
///
/// # Examples
///
/// ```
/// use eligibility_engine::reconcile::default_insurance;
/// use eligibility_engine::types::{InsuranceRecord, InsuranceStatus};
///
/// let records = vec![
///     InsuranceRecord { status: InsuranceStatus::Expired, valid: false,
///         payer_name: None, payer_code: None, tpa_policy_id: None,
///         insurance_policy_id: None, policy_number: None, ins_holder_id: None },
///     InsuranceRecord { status: InsuranceStatus::Active, valid: true,
///         payer_name: None, payer_code: None, tpa_policy_id: None,
///         insurance_policy_id: None, policy_number: None, ins_holder_id: None },
/// ];
/// assert_eq!(default_insurance(&records), Some(1));
/// ```
pub fn default_insurance(records: &[InsuranceRecord]) -> Option<usize> {
    records
        .iter()
        .position(|r| r.status == InsuranceStatus::Active && r.valid)
        .or_else(|| {
            records
                .iter()
                .position(|r| r.status == InsuranceStatus::Active)
        })
        .or_else(|| {
            records
                .iter()
                .position(|r| r.status != InsuranceStatus::Expired)
        })
}

/// Deduplicates patient search results by patient identifier, keeping the
/// first occurrence per identifier.
pub fn dedup_patients(results: Vec<PatientSummary>) -> Vec<PatientSummary> {
    let mut seen = std::collections::HashSet::new();
    results
        .into_iter()
        .filter(|patient| seen.insert(patient.patient_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    use crate::types::history::NewHistoryItem;

    fn item_at(created_at: Option<DateTime<Utc>>, task_id: &str) -> EligibilityHistoryItem {
        let mut item = NewHistoryItem {
            task_id: task_id.to_string(),
            clinic_id: "c-1".to_string(),
            patient_id: "p-1".to_string(),
            patient_mpi: None,
            patient_name: None,
            date_of_birth: None,
            appointment_id: None,
            encounter_id: None,
            insurance_payer: None,
        }
        .into_item();
        item.created_at = created_at;
        item
    }

    fn record(status: InsuranceStatus, valid: bool) -> InsuranceRecord {
        InsuranceRecord {
            status,
            valid,
            payer_name: None,
            payer_code: None,
            tpa_policy_id: None,
            insurance_policy_id: None,
            policy_number: None,
            ins_holder_id: None,
        }
    }

    #[test]
    fn buckets_split_at_local_midnight() {
        // Fixed local reference: some day at 12:00.
        let reference = Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let morning = reference - Duration::hours(3); // 09:00 today
        let late = Local.with_ymd_and_hms(2025, 3, 10, 23, 59, 0).unwrap();
        let yesterday = Local.with_ymd_and_hms(2025, 3, 9, 23, 59, 0).unwrap();

        let items = vec![
            item_at(Some(morning.with_timezone(&Utc)), "t-1"),
            item_at(Some(late.with_timezone(&Utc)), "t-2"),
            item_at(Some(yesterday.with_timezone(&Utc)), "t-3"),
            item_at(None, "t-4"),
        ];

        let buckets = bucket_by_day(items, reference);
        let today_tasks: Vec<&str> =
            buckets.today.iter().map(|i| i.task_id.as_str()).collect();
        let older_tasks: Vec<&str> =
            buckets.older.iter().map(|i| i.task_id.as_str()).collect();
        assert_eq!(today_tasks, vec!["t-1", "t-2"]);
        assert_eq!(older_tasks, vec!["t-3", "t-4"]);
    }

    #[test]
    fn missing_timestamp_is_always_older() {
        let buckets = bucket_by_day(vec![item_at(None, "t-1")], Local::now());
        assert!(buckets.today.is_empty());
        assert_eq!(buckets.older.len(), 1);
    }

    #[test]
    fn dedup_by_task_keeps_first() {
        let now = Utc::now();
        let items = vec![
            item_at(Some(now), "t-1"),
            item_at(Some(now), "t-2"),
            item_at(Some(now), "t-1"),
        ];
        let first_id = items[0].id.clone();
        let deduped = dedup_by_task(items);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].id, first_id);
    }

    #[test]
    fn default_selection_prefers_active_and_valid() {
        let records = vec![
            record(InsuranceStatus::Expired, false),
            record(InsuranceStatus::Active, false),
            record(InsuranceStatus::Active, true),
        ];
        assert_eq!(default_insurance(&records), Some(2));
    }

    #[test]
    fn default_selection_falls_back_to_active() {
        let records = vec![
            record(InsuranceStatus::Expired, false),
            record(InsuranceStatus::Active, false),
        ];
        assert_eq!(default_insurance(&records), Some(1));
    }

    #[test]
    fn default_selection_takes_first_non_expired() {
        let records = vec![
            record(InsuranceStatus::Expired, false),
            record(InsuranceStatus::Other, false),
            record(InsuranceStatus::Other, true),
        ];
        assert_eq!(default_insurance(&records), Some(1));
    }

    #[test]
    fn default_selection_none_when_all_expired() {
        let records = vec![
            record(InsuranceStatus::Expired, true),
            record(InsuranceStatus::Expired, false),
        ];
        assert_eq!(default_insurance(&records), None);
    }

    #[test]
    fn default_selection_none_on_empty() {
        assert_eq!(default_insurance(&[]), None);
    }

    #[test]
    fn dedup_patients_keeps_first_per_id() {
        let results = vec![
            PatientSummary {
                patient_id: "p-1".to_string(),
                mpi: Some("A".to_string()),
                name: None,
                date_of_birth: None,
            },
            PatientSummary {
                patient_id: "p-2".to_string(),
                mpi: None,
                name: None,
                date_of_birth: None,
            },
            PatientSummary {
                patient_id: "p-1".to_string(),
                mpi: Some("B".to_string()),
                name: None,
                date_of_birth: None,
            },
        ];
        let deduped = dedup_patients(results);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].mpi.as_deref(), Some("A"));
    }
}
