//! Status state-machine invariants across the crate's public surface.

use pretty_assertions::assert_eq;

use eligibility_engine::store::{HistoryStore, InMemoryHistoryStore};
use eligibility_engine::types::{CheckStatus, NewHistoryItem, RawProviderResult};

const ALL: [CheckStatus; 4] = [
    CheckStatus::Pending,
    CheckStatus::Processing,
    CheckStatus::Complete,
    CheckStatus::Error,
];

fn rank(status: CheckStatus) -> u8 {
    match status {
        CheckStatus::Pending => 0,
        CheckStatus::Processing => 1,
        CheckStatus::Complete | CheckStatus::Error => 2,
    }
}

#[test]
fn transitions_are_exactly_the_strictly_increasing_pairs() {
    for from in ALL {
        for to in ALL {
            let expected = !from.is_terminal() && rank(to) > rank(from);
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "{from} -> {to} should be {expected}"
            );
        }
    }
}

#[test]
fn every_valid_path_is_non_decreasing() {
    // Walk every valid transition chain from pending; ranks never decrease.
    fn walk(current: CheckStatus, mut path: Vec<CheckStatus>) {
        path.push(current);
        for window in path.windows(2) {
            assert!(rank(window[1]) > rank(window[0]));
        }
        for next in ALL {
            if current.can_transition_to(next) {
                walk(next, path.clone());
            }
        }
    }
    walk(CheckStatus::Pending, Vec::new());
}

fn fields() -> NewHistoryItem {
    NewHistoryItem {
        task_id: "task-1".to_string(),
        clinic_id: "c-1".to_string(),
        patient_id: "p-1".to_string(),
        patient_mpi: None,
        patient_name: None,
        date_of_birth: None,
        appointment_id: None,
        encounter_id: None,
        insurance_payer: None,
    }
}

#[tokio::test]
async fn store_rejects_every_reversal() {
    // Drive a record to each status in turn and verify the store refuses
    // anything that would move it backwards or out of a terminal state.
    let store = InMemoryHistoryStore::new();

    let item = store.create_item(fields()).await.unwrap();
    store.mark_processing(&item.id).unwrap();
    assert!(store.mark_processing(&item.id).is_err(), "self-transition");

    store
        .complete_with_result(&item.id, RawProviderResult::default())
        .unwrap();
    assert!(store.mark_processing(&item.id).is_err());
    assert!(store.fail_with_error(&item.id, "late failure").is_err());

    let finished = store.get_item(&item.id).await.unwrap();
    assert_eq!(finished.status, CheckStatus::Complete);
    assert!(finished.error.is_none(), "error never set on a complete record");
}

#[tokio::test]
async fn error_terminal_keeps_its_message() {
    let store = InMemoryHistoryStore::new();
    let item = store.create_item(fields()).await.unwrap();
    store.fail_with_error(&item.id, "payer gateway 502").unwrap();

    assert!(store
        .complete_with_result(&item.id, RawProviderResult::default())
        .is_err());
    let finished = store.get_item(&item.id).await.unwrap();
    assert_eq!(finished.status, CheckStatus::Error);
    assert_eq!(finished.error.as_deref(), Some("payer gateway 502"));
    assert!(finished.result.is_none());
}
