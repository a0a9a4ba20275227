//! Asynchronous insurance-eligibility verification engine.
//!
//! A clinic console submits eligibility checks against third-party
//! insurance administrators ("providers"); a remote worker executes each
//! check out-of-process. This crate is the console-side lifecycle engine
//! around those checks:
//!
//! - [`rules`] -- the per-provider rule table: visit-type and id-type
//!   vocabularies plus the field visibility matrix, with clinic-level
//!   dynamic overrides. Lookup is total (unknown codes fall back to the
//!   search-all entry).
//! - [`payload`] -- pure payload construction from form values under the
//!   effective rules, with per-id-type format validation and stale-value
//!   hygiene across provider switches.
//! - [`submit`] -- the submission driver: best-effort identity resolution,
//!   payload build, remote task creation, then a `pending` history record.
//!   A history record exists iff the remote task was created.
//! - [`poll`] -- one independent polling loop per non-terminal history
//!   record, at a fixed cadence, stopping on the first terminal
//!   observation; cooperative, idempotent teardown.
//! - [`normalize`] -- collapses single-provider and aggregated search-all
//!   results into one canonical shape.
//! - [`reconcile`] -- history bucketing around local midnight, default
//!   insurance-record selection, deduplication.
//! - [`sweep`] -- the automatic checker that walks the day's appointments
//!   and submits checks for the ones nobody has handled yet.
//!
//! External systems (task API, history store, document store, clinic
//! configuration, context resolution, appointment feed) are consumed
//! through the traits in [`api`] and [`store`]; in-memory implementations
//! back tests and local runs.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use eligibility_engine::poll::{PollConfig, PollingCoordinator};
//! use eligibility_engine::store::{HistoryStore, InMemoryHistoryStore};
//! use eligibility_engine::types::NewHistoryItem;
//! use eligibility_engine::context::ClinicContext;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Arc::new(InMemoryHistoryStore::new());
//! store.create_item(NewHistoryItem {
//!     task_id: "task-1".into(),
//!     clinic_id: "clinic-a".into(),
//!     patient_id: "p-1".into(),
//!     patient_mpi: None,
//!     patient_name: None,
//!     date_of_birth: None,
//!     appointment_id: None,
//!     encounter_id: None,
//!     insurance_payer: None,
//! }).await.unwrap();
//!
//! let coordinator = PollingCoordinator::new(store, PollConfig::default());
//! let live = coordinator.sync_active(&ClinicContext::new("clinic-a")).await.unwrap();
//! assert_eq!(live, 1);
//! coordinator.shutdown();
//! # });
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod ident;
#[cfg(feature = "logging")]
pub mod logging;
pub mod normalize;
pub mod payload;
pub mod poll;
pub mod reconcile;
pub mod rules;
pub mod store;
pub mod submit;
pub mod sweep;
pub mod types;

pub use context::ClinicContext;
pub use error::{ApiError, EligibilityError, ValidationError};
pub use poll::{CheckSnapshot, PollConfig, PollingCoordinator};
pub use submit::{SubmitPhase, SubmittedCheck, TaskSubmitter};
pub use types::{CheckStatus, EligibilityHistoryItem};
