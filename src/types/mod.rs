//! Core data model: statuses, tasks, payloads, history records, results,
//! and the supporting patient/appointment/insurance types.

pub mod appointment;
pub mod form;
pub mod history;
pub mod insurance;
pub mod patient;
pub mod result;
pub mod status;
pub mod task;

pub use appointment::Appointment;
pub use form::{CheckFormValues, DocumentState, IdType, VisitType};
pub use history::{EligibilityHistoryItem, NewHistoryItem};
pub use insurance::{InsuranceRecord, InsuranceStatus};
pub use patient::{Doctor, PatientIdentity, PatientSummary};
pub use result::{
    CanonicalEligibilityResult, EligibilityData, RawProviderResult, SearchAllEntry,
    RESULT_STATUS_FOUND,
};
pub use status::CheckStatus;
pub use task::{CreatedTask, EligibilityCheckTask, ProviderPayload};
