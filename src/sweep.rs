//! Automatic eligibility sweep over the day's appointments.
//!
//! One sweep fetches today's appointments for the clinic and, for each
//! appointment that has not been handled yet, derives the check parameters
//! and submits through the same [`TaskSubmitter`] path the console uses.
//! The processed-appointment ledger keeps sweeps idempotent across runs
//! and across concurrent instances: an appointment is claimed atomically
//! before any work, completed markers block reprocessing, and error
//! markers allow a later retry.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::api::{AppointmentFeed, ClinicConfigStore};
use crate::context::ClinicContext;
use crate::error::EligibilityError;
use crate::ident::{determine_id, determine_visit_type, extract_provider_code, is_valid_provider_code};
use crate::rules::SEARCH_ALL_CODE;
use crate::store::MarkerStore;
use crate::submit::TaskSubmitter;
use crate::types::appointment::Appointment;
use crate::types::form::CheckFormValues;
use crate::types::patient::PatientIdentity;

/// Counters for one sweep run, logged at the end of the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepMetrics {
    /// Appointments returned by the feed.
    pub fetched: usize,
    /// Appointments that produced a check.
    pub processed: usize,
    /// Skipped: already claimed or completed by an earlier run/instance.
    pub skipped_already_processed: usize,
    /// Skipped: no insurance information and no national id.
    pub skipped_no_insurance: usize,
    /// Skipped: no provider code could be derived.
    pub skipped_no_code: usize,
    /// Skipped: no usable identity document.
    pub skipped_no_id: usize,
    /// Appointments that failed with an error.
    pub errors: usize,
}

/// Why one appointment did not produce a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    AlreadyProcessed,
    NoInsurance,
    NoProviderCode,
    NoId,
    MissingAppointmentId,
}

/// Automatic checker over the appointment feed.
pub struct AutoChecker {
    feed: Arc<dyn AppointmentFeed>,
    markers: Arc<dyn MarkerStore>,
    clinic_config: Arc<dyn ClinicConfigStore>,
    submitter: Arc<TaskSubmitter>,
}

impl AutoChecker {
    /// Wires the checker to its collaborators.
    pub fn new(
        feed: Arc<dyn AppointmentFeed>,
        markers: Arc<dyn MarkerStore>,
        clinic_config: Arc<dyn ClinicConfigStore>,
        submitter: Arc<TaskSubmitter>,
    ) -> Self {
        Self {
            feed,
            markers,
            clinic_config,
            submitter,
        }
    }

    /// Runs one sweep over today's appointments.
    ///
    /// Feed failure aborts the run; per-appointment failures are recorded
    /// on the ledger and counted, never propagated.
    pub async fn run_once(&self, ctx: &ClinicContext) -> Result<SweepMetrics, EligibilityError> {
        let appointments = self.feed.list_today(ctx).await?;
        let mut metrics = SweepMetrics {
            fetched: appointments.len(),
            ..SweepMetrics::default()
        };
        info!(clinic = %ctx.clinic_id, count = metrics.fetched, "sweep started");

        let name_map = match self.clinic_config.insurance_name_map(&ctx.clinic_id).await {
            Ok(map) => map,
            Err(err) => {
                warn!(%err, "insurance name mapping unavailable, code extraction limited");
                Default::default()
            }
        };

        for appointment in appointments {
            match self.process_appointment(ctx, &appointment, &name_map).await {
                Ok(None) => metrics.processed += 1,
                Ok(Some(skip)) => match skip {
                    Skip::AlreadyProcessed => metrics.skipped_already_processed += 1,
                    Skip::NoInsurance => metrics.skipped_no_insurance += 1,
                    Skip::NoProviderCode => metrics.skipped_no_code += 1,
                    Skip::NoId => metrics.skipped_no_id += 1,
                    Skip::MissingAppointmentId => metrics.errors += 1,
                },
                Err(err) => {
                    error!(%err, appointment_id = ?appointment.appointment_id, "appointment failed");
                    metrics.errors += 1;
                }
            }
        }

        info!(
            processed = metrics.processed,
            skipped_already = metrics.skipped_already_processed,
            skipped_no_insurance = metrics.skipped_no_insurance,
            skipped_no_code = metrics.skipped_no_code,
            skipped_no_id = metrics.skipped_no_id,
            errors = metrics.errors,
            "sweep finished"
        );
        Ok(metrics)
    }

    /// Handles one appointment. `Ok(None)` means a check was created;
    /// `Ok(Some(skip))` names the reason nothing was submitted.
    async fn process_appointment(
        &self,
        ctx: &ClinicContext,
        appointment: &Appointment,
        name_map: &std::collections::HashMap<String, String>,
    ) -> Result<Option<Skip>, EligibilityError> {
        let Some(appointment_id) = appointment.appointment_id else {
            warn!("appointment without an id, skipping");
            return Ok(Some(Skip::MissingAppointmentId));
        };

        if !self.markers.should_process(appointment_id).await? {
            return Ok(Some(Skip::AlreadyProcessed));
        }

        // No insurance block: a national id still allows a search-all
        // check; otherwise there is nothing to verify against.
        let provider_code = if appointment.has_insurance_info() {
            match extract_provider_code(appointment, name_map) {
                Some(code) if is_valid_provider_code(&code) => code,
                _ => {
                    self.markers
                        .mark_error(appointment_id, "no valid provider code")
                        .await?;
                    return Ok(Some(Skip::NoProviderCode));
                }
            }
        } else if appointment.has_national_id() {
            debug!(appointment_id, "no insurance info, using search-all");
            SEARCH_ALL_CODE.to_string()
        } else {
            return Ok(Some(Skip::NoInsurance));
        };

        let Some((id_type, id_value)) = determine_id(appointment, None) else {
            self.markers
                .mark_error(appointment_id, "no usable identity document")
                .await?;
            return Ok(Some(Skip::NoId));
        };

        if !self.markers.try_mark_processing(appointment_id).await? {
            return Ok(Some(Skip::AlreadyProcessed));
        }

        let form = CheckFormValues {
            provider_code,
            visit_type: Some(determine_visit_type(appointment)),
            id_type: Some(id_type),
            id_value,
            ..CheckFormValues::default()
        };
        let patient = PatientIdentity {
            patient_id: appointment.patient_id.clone(),
            mpi: appointment.mpi.clone(),
            name: appointment.full_name.clone(),
            date_of_birth: appointment.dob.clone(),
            appointment_id: Some(appointment_id),
            encounter_id: appointment.encounter_id,
        };

        match self.submitter.submit(ctx, &form, &patient).await {
            Ok(submitted) => {
                let task_id = submitted.task.task_id;
                self.markers.mark_completed(appointment_id, &task_id).await?;
                info!(appointment_id, %task_id, "check created");
                Ok(None)
            }
            Err(err) => {
                self.markers
                    .mark_error(appointment_id, &err.to_string())
                    .await?;
                Err(err)
            }
        }
    }
}
