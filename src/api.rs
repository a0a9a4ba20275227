//! External collaborator interfaces.
//!
//! The engine consumes these; it never implements the remote side. Each
//! trait is object-safe and taken as `Arc<dyn ...>` so the embedding
//! application (or a test) supplies the transport.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::rules::ProviderOverride;
use crate::types::appointment::Appointment;
use crate::types::patient::{Doctor, PatientIdentity};
use crate::types::task::{CreatedTask, ProviderPayload};
use crate::context::ClinicContext;

/// The remote task-creation API.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Creates one remote eligibility-verification task.
    ///
    /// # Errors
    ///
    /// Network or validation failures from the remote side.
    async fn create_task(&self, payload: &ProviderPayload) -> Result<CreatedTask, ApiError>;
}

/// Result of a document upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    /// Public object URL to embed in payloads.
    pub url: String,
    /// Storage key of the uploaded object.
    pub object_key: String,
}

/// The file-storage service for referral documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Uploads a document, returning its object URL and key.
    async fn upload(&self, bytes: Vec<u8>, path_hint: &str) -> Result<UploadedDocument, ApiError>;
}

/// The clinic configuration store: per-clinic provider overrides, the
/// doctor directory, and the insurance-name-to-code mapping.
#[async_trait]
pub trait ClinicConfigStore: Send + Sync {
    /// Per-provider dynamic overrides configured for the clinic.
    async fn provider_overrides(
        &self,
        clinic_id: &str,
    ) -> Result<HashMap<String, ProviderOverride>, ApiError>;

    /// Doctors practicing at the clinic.
    async fn doctors(&self, clinic_id: &str) -> Result<Vec<Doctor>, ApiError>;

    /// Normalized insurance-name to provider-code mapping for the clinic.
    /// Keys are normalized with
    /// [`normalize_insurance_name`](crate::ident::normalize_insurance_name).
    async fn insurance_name_map(
        &self,
        clinic_id: &str,
    ) -> Result<HashMap<String, String>, ApiError>;
}

/// Best-effort patient-context resolution.
#[async_trait]
pub trait ContextResolver: Send + Sync {
    /// Enriches a partial patient identity. Failure is non-fatal; callers
    /// proceed with the original identity.
    async fn resolve(&self, partial: &PatientIdentity) -> Result<PatientIdentity, ApiError>;
}

/// The scheduling feed consumed by the automatic checker.
#[async_trait]
pub trait AppointmentFeed: Send + Sync {
    /// Today's appointments for the clinic context.
    async fn list_today(&self, ctx: &ClinicContext) -> Result<Vec<Appointment>, ApiError>;
}
