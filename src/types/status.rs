//! Check lifecycle status and its state machine.
//!
//! A history record's status is monotonic under the order
//! `pending < processing < {complete, error}`. Terminal states reject all
//! transitions and polling must stop the moment one is observed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EligibilityError;

/// Lifecycle status of an eligibility check.
///
/// # State Machine
///
/// ```text
/// pending    -> processing, complete, error
/// processing -> complete, error
/// complete   -> (terminal, no transitions)
/// error      -> (terminal, no transitions)
/// ```
///
/// `pending -> complete` is allowed: a fast remote worker may finish a check
/// between two polls, so the console can legitimately observe the jump. What
/// is never valid is a *decrease* (e.g. `processing -> pending`) or any
/// transition out of a terminal state.
///
/// # Examples
///
/// ```
/// use eligibility_engine::types::CheckStatus;
///
/// assert!(!CheckStatus::Pending.is_terminal());
/// assert!(CheckStatus::Pending.can_transition_to(CheckStatus::Complete));
/// assert!(!CheckStatus::Complete.can_transition_to(CheckStatus::Processing));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// The task has been created remotely; no worker has picked it up yet.
    Pending,
    /// A remote worker is executing the check.
    Processing,
    /// The check finished and a result is available (terminal).
    Complete,
    /// The remote worker reported a failure (terminal).
    Error,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Complete => write!(f, "complete"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl CheckStatus {
    /// Position of this status in the monotonic order. Both terminal states
    /// share the top rank.
    fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Processing => 1,
            Self::Complete | Self::Error => 2,
        }
    }

    /// Returns `true` if this status is terminal (`complete` or `error`).
    ///
    /// # Examples
    ///
    /// ```
    /// use eligibility_engine::types::CheckStatus;
    ///
    /// assert!(!CheckStatus::Pending.is_terminal());
    /// assert!(!CheckStatus::Processing.is_terminal());
    /// assert!(CheckStatus::Complete.is_terminal());
    /// assert!(CheckStatus::Error.is_terminal());
    /// ```
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    /// Returns `true` if transitioning from this status to `next` is valid.
    ///
    /// A transition is valid iff the current status is non-terminal and the
    /// target status ranks strictly higher. Self-transitions are not
    /// transitions (observing the same status twice is fine, recording it as
    /// a transition is not).
    pub fn can_transition_to(self, next: Self) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }

    /// Validates a transition from this status to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`EligibilityError::InvalidTransition`] naming the record and
    /// both statuses when the transition is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use eligibility_engine::types::CheckStatus;
    ///
    /// assert!(CheckStatus::Pending
    ///     .validate_transition("h-1", CheckStatus::Processing)
    ///     .is_ok());
    /// assert!(CheckStatus::Error
    ///     .validate_transition("h-1", CheckStatus::Pending)
    ///     .is_err());
    /// ```
    pub fn validate_transition(self, check_id: &str, next: Self) -> Result<(), EligibilityError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(EligibilityError::InvalidTransition {
                check_id: check_id.to_string(),
                from: self,
                to: next,
            })
        }
    }
}
