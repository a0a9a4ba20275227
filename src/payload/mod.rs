//! Pure payload construction from form values and effective rules.
//!
//! [`build_payload`] is a pure function: no I/O, no clocks, no globals.
//! Everything it needs -- the collected form, the effective rules for the
//! selected provider, the resolved doctor identity, the patient context --
//! comes in as arguments, and the only outputs are a payload or a
//! [`ValidationError`].
//!
//! Stale-value hygiene: the form may hold values entered while a different
//! provider was selected. A field hidden under the current provider's rules
//! is never read, so a provider switch cannot leak stale values into the
//! payload.

mod validate;

pub use validate::validate_id;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ValidationError;
use crate::rules::{EffectiveRules, FieldRule, PayloadField};
use crate::types::form::{CheckFormValues, DocumentState};
use crate::types::patient::{Doctor, PatientIdentity};
use crate::types::task::ProviderPayload;

/// Resolves one optional text field against its rule.
///
/// Hidden fields yield `None` without reading the form value. Required
/// fields with no (or blank) value fail with the field's wire name.
fn gate(
    rule: FieldRule,
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    if !rule.is_visible() {
        return Ok(None);
    }
    let trimmed = value.map(str::trim).filter(|v| !v.is_empty());
    match trimmed {
        Some(v) => Ok(Some(v.to_string())),
        None if rule.is_required() => Err(ValidationError::MissingField { field }),
        None => Ok(None),
    }
}

/// Resolves the referral document against its rule.
///
/// A pending or failed upload is a hard blocker regardless of whether the
/// field is required; only an explicit skip (or no document at all, when
/// the field is optional) lets submission proceed without a URL.
fn gate_document(
    rule: FieldRule,
    state: &DocumentState,
) -> Result<Option<String>, ValidationError> {
    if !rule.is_visible() {
        return Ok(None);
    }
    match state {
        DocumentState::Uploaded { url } => Ok(Some(url.clone())),
        DocumentState::Pending => Err(ValidationError::DocumentPending),
        DocumentState::Failed { message } => Err(ValidationError::DocumentFailed {
            message: message.clone(),
        }),
        DocumentState::Skipped => Ok(None),
        DocumentState::None if rule.is_required() => Err(ValidationError::MissingField {
            field: "referral_document",
        }),
        DocumentState::None => Ok(None),
    }
}

/// Builds the provider request payload for one check submission.
///
/// # Errors
///
/// Any [`ValidationError`]: unsupported visit/id type for the provider,
/// id format failure, a required field missing, or a blocked referral
/// document.
///
/// # Examples
///
/// ```
/// use eligibility_engine::payload::build_payload;
/// use eligibility_engine::rules::RuleResolver;
/// use eligibility_engine::types::{CheckFormValues, IdType, VisitType};
///
/// let resolver = RuleResolver::without_overrides();
/// let form = CheckFormValues {
///     provider_code: "TPA002".to_string(),
///     visit_type: Some(VisitType::Outpatient),
///     id_type: Some(IdType::EmiratesId),
///     id_value: "784-1990-1234567-1".to_string(),
///     ..CheckFormValues::default()
/// };
///
/// let payload = build_payload(&form, &resolver.effective("TPA002"), None, None).unwrap();
/// assert_eq!(payload.tpa_name, "TPA002");
/// assert_eq!(payload.id_value, "784-1990-1234567-1");
/// ```
pub fn build_payload(
    form: &CheckFormValues,
    rules: &EffectiveRules,
    doctor: Option<&Doctor>,
    patient: Option<&PatientIdentity>,
) -> Result<ProviderPayload, ValidationError> {
    let visit_type = form.visit_type.ok_or(ValidationError::MissingField {
        field: "visit_type",
    })?;
    let id_type = form
        .id_type
        .ok_or(ValidationError::MissingField { field: "id_type" })?;

    if !rules.supports_visit_type(visit_type) {
        return Err(ValidationError::UnsupportedVisitType {
            provider_code: rules.code().to_string(),
            visit_type,
        });
    }
    if !rules.supports_id_type(id_type) {
        return Err(ValidationError::UnsupportedIdType {
            provider_code: rules.code().to_string(),
            id_type,
        });
    }
    validate_id(id_type, &form.id_value)?;

    // The doctor name prefers the resolved directory identity; a free-text
    // name from the form is the fallback.
    let doctor_rule = rules.field(PayloadField::Doctor);
    let doctor_name = gate(
        doctor_rule,
        doctor.map(|d| d.name.as_str()).or(form.doctor_name.as_deref()),
        "doctor_name",
    )?;
    let doctor_uid = if doctor_rule.is_visible() {
        doctor.and_then(|d| d.external_id.clone())
    } else {
        None
    };

    let phone = gate(rules.field(PayloadField::Phone), form.phone.as_deref(), "phone")?;
    let referral_code = gate(
        rules.field(PayloadField::ReferralCode),
        form.referral_code.as_deref(),
        "referral_code",
    )?;
    let referral_document_url =
        gate_document(rules.field(PayloadField::ReferralDocument), &form.referral_document)?;
    let referring_physician = gate(
        rules.field(PayloadField::ReferringPhysician),
        form.referring_physician.as_deref(),
        "referring_physician",
    )?;
    let payer_subselection = gate(
        rules.field(PayloadField::PayerSubselection),
        form.payer_subselection.as_deref(),
        "payer_subselection",
    )?;

    let mut extra_args: IndexMap<String, Value> = IndexMap::new();
    for question in rules.extra_questions(visit_type) {
        let answer = match question.key {
            "maternity_treatment_type" => form
                .maternity_treatment_type
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(Value::from),
            "dental_option" => form
                .dental_option
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(Value::from),
            _ => None,
        };
        match answer {
            Some(value) => {
                extra_args.insert(question.key.to_string(), value);
            }
            None if question.required => {
                return Err(ValidationError::MissingField {
                    field: question.key,
                })
            }
            None => {}
        }
    }

    let member_rule = rules.field(PayloadField::MemberPresence);
    if member_rule.is_visible() {
        match form.member_present {
            Some(present) => {
                extra_args.insert("member_present".to_string(), present.into());
            }
            None if member_rule.is_required() => {
                return Err(ValidationError::MissingField {
                    field: "member_present",
                })
            }
            None => {}
        }
    }

    if let Some(pod) = gate(rules.field(PayloadField::Pod), form.pod.as_deref(), "pod")? {
        extra_args.insert("pod".to_string(), pod.into());
    }

    let patient = patient.cloned().unwrap_or_default();

    Ok(ProviderPayload {
        id_value: form.id_value.trim().to_string(),
        id_type,
        tpa_name: rules.code().to_string(),
        visit_type,
        doctor_name,
        doctor_uid,
        phone,
        referral_code,
        referral_document_url,
        referring_physician,
        payer_subselection,
        extra_args,
        mpi: patient.mpi,
        patient_id: patient.patient_id,
        patient_name: patient.name,
        appointment_id: patient.appointment_id,
        encounter_id: patient.encounter_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleResolver;
    use crate::types::form::{IdType, VisitType};

    fn form_for(provider: &str) -> CheckFormValues {
        CheckFormValues {
            provider_code: provider.to_string(),
            visit_type: Some(VisitType::Outpatient),
            id_type: Some(IdType::EmiratesId),
            id_value: "784-1990-1234567-1".to_string(),
            ..CheckFormValues::default()
        }
    }

    fn rules_for(provider: &str) -> EffectiveRules {
        RuleResolver::without_overrides().effective(provider)
    }

    #[test]
    fn minimal_outpatient_payload() {
        let form = form_for("TPA002");
        let payload = build_payload(&form, &rules_for("TPA002"), None, None).unwrap();
        assert_eq!(payload.tpa_name, "TPA002");
        assert_eq!(payload.visit_type, VisitType::Outpatient);
        assert!(payload.extra_args.is_empty());
    }

    #[test]
    fn hidden_field_never_leaks_stale_value() {
        // TPA002 hides the doctor; a value left over from a previous
        // provider selection must not surface.
        let mut form = form_for("TPA002");
        form.doctor_name = Some("Dr. Stale".to_string());
        form.referral_code = Some("REF-OLD".to_string());
        let payload = build_payload(&form, &rules_for("TPA002"), None, None).unwrap();
        assert!(payload.doctor_name.is_none());
        assert!(payload.referral_code.is_none());
    }

    #[test]
    fn required_doctor_missing_fails() {
        // TPA006 requires the doctor.
        let form = form_for("TPA006");
        let err = build_payload(&form, &rules_for("TPA006"), None, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "doctor_name"
            }
        );
    }

    #[test]
    fn resolved_doctor_wins_over_free_text() {
        let mut form = form_for("TPA006");
        form.doctor_name = Some("Dr. Typed".to_string());
        let doctor = Doctor {
            id: "d-1".to_string(),
            name: "Dr. Directory".to_string(),
            external_id: Some("EXT-77".to_string()),
        };
        let payload =
            build_payload(&form, &rules_for("TPA006"), Some(&doctor), None).unwrap();
        assert_eq!(payload.doctor_name.as_deref(), Some("Dr. Directory"));
        assert_eq!(payload.doctor_uid.as_deref(), Some("EXT-77"));
    }

    #[test]
    fn unsupported_visit_type_rejected() {
        // TPA008 is medical-only; no dental.
        let mut form = form_for("TPA008");
        form.visit_type = Some(VisitType::Dental);
        let err = build_payload(&form, &rules_for("TPA008"), None, None).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedVisitType { .. }));
    }

    #[test]
    fn unsupported_id_type_rejected() {
        // TPA020 accepts card numbers only.
        let form = form_for("TPA020");
        let err = build_payload(&form, &rules_for("TPA020"), None, None).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedIdType { .. }));
    }

    #[test]
    fn maternity_requires_treatment_type() {
        let mut form = form_for("TPA001");
        form.visit_type = Some(VisitType::Maternity);
        let err = build_payload(&form, &rules_for("TPA001"), None, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "maternity_treatment_type"
            }
        );

        form.maternity_treatment_type = Some("NORMAL_DELIVERY".to_string());
        let payload = build_payload(&form, &rules_for("TPA001"), None, None).unwrap();
        assert_eq!(
            payload.extra_args["maternity_treatment_type"],
            serde_json::json!("NORMAL_DELIVERY")
        );
    }

    #[test]
    fn member_presence_lands_in_extra_args() {
        // TPA004 requires the member-presence flag.
        let mut form = form_for("TPA004");
        assert!(build_payload(&form, &rules_for("TPA004"), None, None).is_err());

        form.member_present = Some(true);
        let payload = build_payload(&form, &rules_for("TPA004"), None, None).unwrap();
        assert_eq!(payload.extra_args["member_present"], serde_json::json!(true));
    }

    #[test]
    fn pending_document_blocks_submission() {
        // TPA005 shows the referral document as optional; in-flight uploads
        // still block.
        let mut form = form_for("TPA005");
        form.referral_code = Some("REF-1".to_string());
        form.referral_document = DocumentState::Pending;
        let err = build_payload(&form, &rules_for("TPA005"), None, None).unwrap_err();
        assert_eq!(err, ValidationError::DocumentPending);
    }

    #[test]
    fn skipped_document_allows_submission() {
        let mut form = form_for("TPA005");
        form.referral_code = Some("REF-1".to_string());
        form.referral_document = DocumentState::Skipped;
        let payload = build_payload(&form, &rules_for("TPA005"), None, None).unwrap();
        assert!(payload.referral_document_url.is_none());
    }

    #[test]
    fn required_document_missing_fails() {
        // INS009 requires the referral document.
        let mut form = form_for("INS009");
        form.doctor_name = Some("Dr. A".to_string());
        form.referral_code = Some("REF-1".to_string());
        let err = build_payload(&form, &rules_for("INS009"), None, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "referral_document"
            }
        );
    }

    #[test]
    fn patient_metadata_flows_through() {
        let form = form_for("TPA002");
        let patient = PatientIdentity {
            patient_id: Some("p-9".to_string()),
            mpi: Some("MPI-9".to_string()),
            name: Some("Jane Roe".to_string()),
            date_of_birth: None,
            appointment_id: Some(42),
            encounter_id: Some(7),
        };
        let payload =
            build_payload(&form, &rules_for("TPA002"), None, Some(&patient)).unwrap();
        assert_eq!(payload.patient_id.as_deref(), Some("p-9"));
        assert_eq!(payload.mpi.as_deref(), Some("MPI-9"));
        assert_eq!(payload.appointment_id, Some(42));
    }

    #[test]
    fn search_all_accepts_any_visit_and_base_ids() {
        let mut form = form_for("BOTH");
        form.visit_type = Some(VisitType::TravelInsurance);
        let payload = build_payload(&form, &rules_for("BOTH"), None, None).unwrap();
        assert_eq!(payload.tpa_name, "BOTH");
    }
}
