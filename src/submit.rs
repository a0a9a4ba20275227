//! Check submission: identity resolution, payload build, task creation,
//! history record.
//!
//! The submitter guarantees exactly one remote task per [`submit`]
//! call and atomicity between the remote task and the history record: a
//! history record exists iff task creation succeeded. There are no silent
//! retries anywhere on this path -- a retry is the user submitting again.
//!
//! [`submit`]: TaskSubmitter::submit

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::api::{ClinicConfigStore, ContextResolver, TaskApi};
use crate::context::ClinicContext;
use crate::error::EligibilityError;
use crate::payload::build_payload;
use crate::rules::RuleResolver;
use crate::store::HistoryStore;
use crate::types::form::CheckFormValues;
use crate::types::history::{EligibilityHistoryItem, NewHistoryItem};
use crate::types::patient::{Doctor, PatientIdentity};
use crate::types::task::EligibilityCheckTask;

/// Outcome of a successful submission: the immutable task record and the
/// `pending` history record now tracking it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedCheck {
    /// The remote task, with the payload exactly as submitted.
    pub task: EligibilityCheckTask,
    /// The history record created for the task.
    pub history: EligibilityHistoryItem,
}

/// Observable phase of the submitter.
///
/// `idle -> building -> submitting -> pending | failure`; a new submit
/// call restarts the machine from `building`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    /// No submission in flight.
    #[default]
    Idle,
    /// Resolving context and building the payload.
    Building,
    /// The remote task-creation call is in flight.
    Submitting,
    /// The task exists and its history record is written.
    Pending,
    /// The last submission failed.
    Failure,
}

/// Drives one check submission end to end.
pub struct TaskSubmitter {
    api: Arc<dyn TaskApi>,
    history: Arc<dyn HistoryStore>,
    clinic_config: Arc<dyn ClinicConfigStore>,
    resolver: Arc<dyn ContextResolver>,
    phase: Mutex<SubmitPhase>,
}

impl TaskSubmitter {
    /// Wires a submitter to its collaborators.
    pub fn new(
        api: Arc<dyn TaskApi>,
        history: Arc<dyn HistoryStore>,
        clinic_config: Arc<dyn ClinicConfigStore>,
        resolver: Arc<dyn ContextResolver>,
    ) -> Self {
        Self {
            api,
            history,
            clinic_config,
            resolver,
            phase: Mutex::new(SubmitPhase::Idle),
        }
    }

    /// Current phase, for presentation.
    pub fn phase(&self) -> SubmitPhase {
        *self.phase.lock()
    }

    fn set_phase(&self, phase: SubmitPhase) {
        *self.phase.lock() = phase;
    }

    /// Submits one check.
    ///
    /// Steps, in order: best-effort patient-context resolution (failure is
    /// logged and ignored), clinic rule-override fetch (failure falls back
    /// to the static table), payload build, remote task creation, history
    /// record creation with status `pending`.
    ///
    /// # Errors
    ///
    /// - [`EligibilityError::Validation`] -- nothing was submitted.
    /// - [`EligibilityError::Submission`] -- task creation failed, nothing
    ///   was written.
    /// - [`EligibilityError::HistoryWrite`] -- the task exists but the
    ///   history record could not be written; the error carries the task
    ///   id so the write can be retried without a second task.
    pub async fn submit(
        &self,
        ctx: &ClinicContext,
        form: &CheckFormValues,
        patient: &PatientIdentity,
    ) -> Result<SubmittedCheck, EligibilityError> {
        self.set_phase(SubmitPhase::Building);

        let patient = self.resolve_patient(patient).await;
        let rules = self.load_rules(ctx).await;
        let doctor = self.resolve_doctor(ctx, form).await;

        let effective = rules.effective(&form.provider_code);
        let payload = match build_payload(form, &effective, doctor.as_ref(), Some(&patient)) {
            Ok(payload) => payload,
            Err(err) => {
                self.set_phase(SubmitPhase::Failure);
                return Err(err.into());
            }
        };

        self.set_phase(SubmitPhase::Submitting);
        let created = match self.api.create_task(&payload).await {
            Ok(created) => created,
            Err(source) => {
                self.set_phase(SubmitPhase::Failure);
                return Err(EligibilityError::Submission { source });
            }
        };
        info!(task_id = %created.task_id, provider = %payload.tpa_name, "remote task created");

        let fields = NewHistoryItem {
            task_id: created.task_id.clone(),
            clinic_id: ctx.clinic_id.clone(),
            patient_id: patient
                .patient_id
                .clone()
                .or_else(|| patient.mpi.clone())
                .unwrap_or_default(),
            patient_mpi: patient.mpi.clone(),
            patient_name: patient.name.clone(),
            date_of_birth: patient.date_of_birth.clone(),
            appointment_id: patient.appointment_id,
            encounter_id: patient.encounter_id,
            insurance_payer: Some(payload.tpa_name.clone()),
        };
        let history = match self.history.create_item(fields).await {
            Ok(item) => item,
            Err(source) => {
                self.set_phase(SubmitPhase::Failure);
                return Err(EligibilityError::HistoryWrite {
                    task_id: created.task_id,
                    source,
                });
            }
        };

        self.set_phase(SubmitPhase::Pending);
        Ok(SubmittedCheck {
            task: EligibilityCheckTask {
                task_id: created.task_id,
                provider_code: payload.tpa_name.clone(),
                submitted_payload: payload,
            },
            history,
        })
    }

    /// Best-effort identity enrichment; resolution failure keeps the
    /// original identity.
    async fn resolve_patient(&self, patient: &PatientIdentity) -> PatientIdentity {
        if patient.is_complete() {
            return patient.clone();
        }
        match self.resolver.resolve(patient).await {
            Ok(enriched) => enriched,
            Err(err) => {
                warn!(%err, "patient context resolution failed, proceeding with original identity");
                patient.clone()
            }
        }
    }

    /// Clinic overrides, falling back to the static table when the
    /// configuration store is unreachable.
    async fn load_rules(&self, ctx: &ClinicContext) -> RuleResolver {
        match self.clinic_config.provider_overrides(&ctx.clinic_id).await {
            Ok(overrides) => RuleResolver::new(overrides),
            Err(err) => {
                warn!(%err, clinic = %ctx.clinic_id, "provider overrides unavailable, using static rules");
                RuleResolver::without_overrides()
            }
        }
    }

    /// Looks the selected doctor up in the clinic directory by name.
    async fn resolve_doctor(&self, ctx: &ClinicContext, form: &CheckFormValues) -> Option<Doctor> {
        let name = form.doctor_name.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        match self.clinic_config.doctors(&ctx.clinic_id).await {
            Ok(doctors) => {
                let found = doctors.into_iter().find(|d| d.name.eq_ignore_ascii_case(name));
                if found.is_none() {
                    debug!(doctor = name, "doctor not in clinic directory");
                }
                found
            }
            Err(err) => {
                warn!(%err, "doctor directory unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use crate::api::ClinicConfigStore;
    use crate::error::ApiError;
    use crate::rules::ProviderOverride;
    use crate::store::InMemoryHistoryStore;
    use crate::types::form::{IdType, VisitType};
    use crate::types::status::CheckStatus;
    use crate::types::task::{CreatedTask, ProviderPayload};

    struct FakeApi {
        calls: AtomicU32,
        fail: bool,
    }

    #[async_trait]
    impl TaskApi for FakeApi {
        async fn create_task(&self, _payload: &ProviderPayload) -> Result<CreatedTask, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ApiError::Transport {
                    message: "gateway unreachable".to_string(),
                })
            } else {
                Ok(CreatedTask {
                    task_id: "task-123".to_string(),
                })
            }
        }
    }

    struct EmptyConfig;

    #[async_trait]
    impl ClinicConfigStore for EmptyConfig {
        async fn provider_overrides(
            &self,
            _clinic_id: &str,
        ) -> Result<HashMap<String, ProviderOverride>, ApiError> {
            Ok(HashMap::new())
        }

        async fn doctors(&self, _clinic_id: &str) -> Result<Vec<Doctor>, ApiError> {
            Ok(vec![Doctor {
                id: "d-1".to_string(),
                name: "Dr. Known".to_string(),
                external_id: Some("EXT-1".to_string()),
            }])
        }

        async fn insurance_name_map(
            &self,
            _clinic_id: &str,
        ) -> Result<HashMap<String, String>, ApiError> {
            Ok(HashMap::new())
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl ContextResolver for FailingResolver {
        async fn resolve(
            &self,
            _partial: &PatientIdentity,
        ) -> Result<PatientIdentity, ApiError> {
            Err(ApiError::Transport {
                message: "resolver down".to_string(),
            })
        }
    }

    fn submitter(fail_api: bool) -> (Arc<TaskSubmitter>, Arc<InMemoryHistoryStore>) {
        let history = Arc::new(InMemoryHistoryStore::new());
        let submitter = Arc::new(TaskSubmitter::new(
            Arc::new(FakeApi {
                calls: AtomicU32::new(0),
                fail: fail_api,
            }),
            history.clone(),
            Arc::new(EmptyConfig),
            Arc::new(FailingResolver),
        ));
        (submitter, history)
    }

    fn valid_form() -> CheckFormValues {
        CheckFormValues {
            provider_code: "TPA002".to_string(),
            visit_type: Some(VisitType::Outpatient),
            id_type: Some(IdType::EmiratesId),
            id_value: "784-1990-1234567-1".to_string(),
            ..CheckFormValues::default()
        }
    }

    fn patient() -> PatientIdentity {
        PatientIdentity {
            patient_id: Some("p-1".to_string()),
            mpi: Some("MPI-1".to_string()),
            ..PatientIdentity::default()
        }
    }

    #[tokio::test]
    async fn successful_submit_writes_pending_history() {
        let ctx = ClinicContext::new("clinic-a");
        let (submitter, history) = submitter(false);

        let submitted = submitter.submit(&ctx, &valid_form(), &patient()).await.unwrap();
        assert_eq!(submitted.history.status, CheckStatus::Pending);
        assert_eq!(submitted.history.task_id, "task-123");
        assert_eq!(submitted.history.clinic_id, "clinic-a");
        assert_eq!(submitted.history.insurance_payer.as_deref(), Some("TPA002"));
        assert_eq!(submitted.task.task_id, "task-123");
        assert_eq!(submitted.task.provider_code, "TPA002");
        assert_eq!(submitted.task.submitted_payload.tpa_name, "TPA002");
        assert_eq!(history.len(), 1);
        assert_eq!(submitter.phase(), SubmitPhase::Pending);
    }

    #[tokio::test]
    async fn validation_failure_writes_nothing() {
        let ctx = ClinicContext::new("clinic-a");
        let (submitter, history) = submitter(false);

        let mut form = valid_form();
        form.id_value = "bogus".to_string();
        let err = submitter.submit(&ctx, &form, &patient()).await.unwrap_err();
        assert!(matches!(err, EligibilityError::Validation(_)));
        assert!(history.is_empty());
        assert_eq!(submitter.phase(), SubmitPhase::Failure);
    }

    #[tokio::test]
    async fn submission_failure_writes_nothing() {
        let ctx = ClinicContext::new("clinic-a");
        let (submitter, history) = submitter(true);

        let err = submitter
            .submit(&ctx, &valid_form(), &patient())
            .await
            .unwrap_err();
        assert!(matches!(err, EligibilityError::Submission { .. }));
        assert!(history.is_empty());
        assert_eq!(submitter.phase(), SubmitPhase::Failure);
    }

    #[tokio::test]
    async fn resolver_failure_is_nonfatal() {
        // The resolver always fails in these tests; an incomplete identity
        // still submits with what it has.
        let ctx = ClinicContext::new("clinic-a");
        let (submitter, _history) = submitter(false);

        let partial = PatientIdentity {
            mpi: Some("MPI-9".to_string()),
            ..PatientIdentity::default()
        };
        let submitted = submitter.submit(&ctx, &valid_form(), &partial).await.unwrap();
        // patient_id falls back to the MPI.
        assert_eq!(submitted.history.patient_id, "MPI-9");
    }

    #[tokio::test]
    async fn doctor_resolved_from_directory() {
        let ctx = ClinicContext::new("clinic-a");
        let (submitter, history) = submitter(false);

        // TPA006 requires a doctor.
        let mut form = valid_form();
        form.provider_code = "TPA006".to_string();
        form.doctor_name = Some("dr. known".to_string());

        let submitted = submitter.submit(&ctx, &form, &patient()).await.unwrap();
        assert_eq!(submitted.history.insurance_payer.as_deref(), Some("TPA006"));
        assert_eq!(
            submitted.task.submitted_payload.doctor_name.as_deref(),
            Some("Dr. Known")
        );
        assert_eq!(history.len(), 1);
    }
}
