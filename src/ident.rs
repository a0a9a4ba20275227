//! Mapping appointment and insurance data onto check parameters.
//!
//! Given an appointment row from the scheduling feed, these functions
//! derive the three parameters a check needs: the provider code, the visit
//! type, and the identity document. Each follows a documented priority
//! chain; none of them performs I/O -- the clinic's insurance-name mapping
//! is passed in by the caller.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::rules::SEARCH_ALL_CODE;
use crate::types::appointment::Appointment;
use crate::types::form::{IdType, VisitType};
use crate::types::insurance::InsuranceRecord;

static TPA_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^TPA[0-9A-Z]+$").unwrap());
static INS_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^INS[0-9A-Z]+$").unwrap());
static OTHER_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(D|DHPO|RIYATI)[0-9A-Z]*$").unwrap());

/// Normalizes an insurance display name for mapping lookups
/// (trimmed, uppercased).
pub fn normalize_insurance_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Returns `true` when `code` is a recognizable provider code, including
/// the search-all code.
pub fn is_valid_provider_code(code: &str) -> bool {
    let code = code.trim();
    if code == SEARCH_ALL_CODE {
        return true;
    }
    TPA_CODE.is_match(code) || INS_CODE.is_match(code) || OTHER_CODE.is_match(code)
}

fn code_if(value: Option<&str>, pattern: &Regex) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| pattern.is_match(v))
        .map(str::to_string)
}

fn name_lookup(value: Option<&str>, mapping: &HashMap<String, String>) -> Option<String> {
    let name = value.map(str::trim).filter(|v| !v.is_empty())?;
    mapping.get(&normalize_insurance_name(name)).cloned()
}

/// Extracts the provider code from an appointment's insurance block.
///
/// Priority order:
/// 1. receiver code matching a TPA/INS pattern,
/// 2. payer code matching a TPA/INS pattern,
/// 3. receiver code matching the gateway patterns (D / DHPO / RIYATI),
/// 4. payer code matching the gateway patterns,
/// 5. insurance-name mapping (receiver name, then payer name) against the
///    clinic's configured name-to-code table.
///
/// `name_mapping` keys must be normalized with
/// [`normalize_insurance_name`].
pub fn extract_provider_code(
    appointment: &Appointment,
    name_mapping: &HashMap<String, String>,
) -> Option<String> {
    let receiver = appointment.receiver_code.as_deref();
    let payer = appointment.payer_code.as_deref();

    let direct = |value: Option<&str>| {
        code_if(value, &TPA_CODE).or_else(|| code_if(value, &INS_CODE))
    };
    if let Some(code) = direct(receiver).or_else(|| direct(payer)) {
        debug!(%code, "provider code matched from appointment codes");
        return Some(code);
    }

    if let Some(code) =
        code_if(receiver, &OTHER_CODE).or_else(|| code_if(payer, &OTHER_CODE))
    {
        debug!(%code, "gateway code matched from appointment codes");
        return Some(code);
    }

    let by_name = name_lookup(appointment.receiver_name.as_deref(), name_mapping)
        .or_else(|| name_lookup(appointment.payer_name.as_deref(), name_mapping));
    if let Some(code) = by_name {
        debug!(%code, "provider code matched from insurance name");
        return Some(code);
    }

    debug!(
        receiver_code = appointment.receiver_code.as_deref(),
        payer_code = appointment.payer_code.as_deref(),
        "no provider code could be extracted"
    );
    None
}

/// Specialisation-name keywords mapping to visit types. Matched as
/// case-insensitive substrings, first hit wins.
const SPECIALISATION_KEYWORDS: &[(&str, VisitType)] = &[
    ("DENTAL", VisitType::Dental),
    ("DENTIST", VisitType::Dental),
    ("OPTICAL", VisitType::Optical),
    ("OPTOMETRIST", VisitType::Optical),
    ("OPHTHALMOLOGIST", VisitType::Optical),
    ("EYE", VisitType::Optical),
    ("MATERNITY", VisitType::Maternity),
    ("OBSTETRIC", VisitType::Maternity),
    ("GYNECOLOG", VisitType::Maternity),
    ("PSYCHIATRY", VisitType::Psychiatry),
    ("PSYCHIATRIST", VisitType::Psychiatry),
    ("MENTAL", VisitType::Psychiatry),
    ("WELLNESS", VisitType::Wellness),
];

/// Determines the visit type for an appointment.
///
/// Priority order: specialisation-name keywords, then the emergency flag,
/// then the OUTPATIENT default.
pub fn determine_visit_type(appointment: &Appointment) -> VisitType {
    if let Some(specialisation) = appointment.specialisation_name.as_deref() {
        let upper = specialisation.to_uppercase();
        for (keyword, visit_type) in SPECIALISATION_KEYWORDS {
            if upper.contains(keyword) {
                debug!(specialisation, %visit_type, "visit type from specialisation");
                return *visit_type;
            }
        }
    }

    if appointment.is_emergency == Some(true) {
        return VisitType::Emergency;
    }

    VisitType::Outpatient
}

fn nonblank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Determines the identity document to check with.
///
/// Priority order:
/// 1. member id (CARDNUMBER) from the insurance record's policy fields,
/// 2. national id (EMIRATESID) from the appointment demographics,
/// 3. health-authority member id (DHAMEMBERID).
pub fn determine_id(
    appointment: &Appointment,
    insurance: Option<&InsuranceRecord>,
) -> Option<(IdType, String)> {
    if let Some(member_id) = insurance.and_then(InsuranceRecord::member_id) {
        return Some((IdType::CardNumber, member_id.to_string()));
    }

    if let Some(national_id) = nonblank(appointment.nationality_id.as_deref())
        .or_else(|| nonblank(appointment.uid_value.as_deref()))
    {
        return Some((IdType::EmiratesId, national_id.to_string()));
    }

    if let Some(dha_id) = nonblank(appointment.dha_member_id.as_deref()) {
        return Some((IdType::DhaMemberId, dha_id.to_string()));
    }

    None
}
