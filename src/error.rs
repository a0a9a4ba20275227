//! Error types for the eligibility engine.
//!
//! The taxonomy separates three kinds of failure:
//!
//! - [`ValidationError`] -- the payload failed provider-specific field rules.
//!   Surfaced to the user immediately; submission is aborted and no history
//!   record is written.
//! - [`ApiError`] -- an external collaborator (task API, history store,
//!   document store, clinic configuration) failed. During submission this
//!   becomes [`EligibilityError::Submission`]; during polling it is treated
//!   as transient and retried on the next tick.
//! - A remote worker reporting `status = error` is **data** (a terminal
//!   [`CheckStatus`](crate::types::CheckStatus) value on the history record),
//!   never an `Err` anywhere in this crate.

use thiserror::Error;

use crate::types::form::{IdType, VisitType};
use crate::types::status::CheckStatus;

/// Payload-level validation failures.
///
/// Produced by the payload builder before anything leaves the process.
/// Every variant names the offending field so the console can highlight it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A field the provider marks required was not supplied.
    #[error("missing required field: {field}")]
    MissingField {
        /// Wire name of the missing field.
        field: &'static str,
    },

    /// The ID value does not match the format for its ID type.
    #[error("{id_type} value {value:?} does not match the expected format")]
    InvalidIdFormat {
        /// The ID type whose format check failed.
        id_type: IdType,
        /// The rejected value.
        value: String,
    },

    /// The selected visit type is not offered by the selected provider.
    #[error("provider {provider_code} does not offer visit type {visit_type}")]
    UnsupportedVisitType {
        /// Provider the user selected.
        provider_code: String,
        /// Visit type the provider does not offer.
        visit_type: VisitType,
    },

    /// The selected ID type is not accepted by the selected provider.
    #[error("provider {provider_code} does not accept id type {id_type}")]
    UnsupportedIdType {
        /// Provider the user selected.
        provider_code: String,
        /// ID type the provider does not accept.
        id_type: IdType,
    },

    /// A referral document upload is still in flight. Submission is blocked
    /// until the upload finishes or the user explicitly skips it.
    #[error("referral document upload has not finished")]
    DocumentPending,

    /// The referral document upload failed and the user has not skipped it.
    #[error("referral document upload failed: {message}")]
    DocumentFailed {
        /// Failure message from the document store.
        message: String,
    },
}

/// Failures reported by external collaborators -- the remote task API,
/// the persisted history store, the document store, the clinic
/// configuration store.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Network-level failure reaching the collaborator.
    #[error("transport error: {message}")]
    Transport {
        /// Human-readable transport failure description.
        message: String,
    },

    /// The collaborator understood the request and rejected it.
    #[error("request rejected: {message}")]
    Rejected {
        /// Rejection message from the collaborator.
        message: String,
    },

    /// A looked-up record does not exist.
    #[error("not found: {key}")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// Backend storage error.
    #[error("store error: {0}")]
    Store(String),
}

/// Top-level error type for engine operations.
#[derive(Debug, Error)]
pub enum EligibilityError {
    /// The payload failed provider-specific validation. Nothing was
    /// submitted and no history record exists.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The remote task-creation call failed. No history record exists;
    /// the user must resubmit.
    #[error("task submission failed: {source}")]
    Submission {
        /// The underlying collaborator failure.
        #[source]
        source: ApiError,
    },

    /// The remote task was created but the history record could not be
    /// written. Carries the task id so the caller can retry the history
    /// write without creating a second remote task.
    #[error("task {task_id} created but history write failed: {source}")]
    HistoryWrite {
        /// Id of the task that was already created remotely.
        task_id: String,
        /// The underlying store failure.
        #[source]
        source: ApiError,
    },

    /// Attempted an invalid status transition on a history record.
    ///
    /// Status is monotonic under `pending < processing < {complete, error}`;
    /// terminal states reject all transitions.
    #[error("invalid status transition from {from} to {to} for check {check_id}")]
    InvalidTransition {
        /// History record the transition was attempted on.
        check_id: String,
        /// Current status.
        from: CheckStatus,
        /// Rejected target status.
        to: CheckStatus,
    },

    /// A history record was not found.
    #[error("history item not found: {id}")]
    NotFound {
        /// The history item id.
        id: String,
    },

    /// A collaborator failed outside the submission path.
    #[error(transparent)]
    Api(#[from] ApiError),
}
