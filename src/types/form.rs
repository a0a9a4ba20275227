//! Form-facing vocabularies and the collected form values.
//!
//! [`VisitType`] and [`IdType`] are the wire vocabularies the remote
//! verification workers accept. [`CheckFormValues`] is everything the
//! console collects before a check is submitted; which of its optional
//! fields actually reach the payload is decided by the provider rule table,
//! never by the form itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Visit type vocabulary accepted by the remote workers.
///
/// Individual providers offer a subset of these; the rule table decides
/// which. Some visit types carry nested extra-argument sub-questions
/// (maternity treatment type, dental sub-option).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitType {
    /// Standard outpatient consultation.
    Outpatient,
    /// Inpatient admission.
    Inpatient,
    /// Dental visit. May carry a dental sub-option extra argument.
    Dental,
    /// Optical / ophthalmic visit.
    Optical,
    /// Maternity visit. Carries a maternity treatment-type extra argument.
    Maternity,
    /// Psychiatry visit.
    Psychiatry,
    /// Wellness / screening visit.
    Wellness,
    /// Chronic outpatient program visit.
    ChronicOut,
    /// Emergency visit.
    Emergency,
    /// Life insurance verification.
    Life,
    /// Travel insurance verification.
    TravelInsurance,
}

impl VisitType {
    /// Wire spelling of this visit type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outpatient => "OUTPATIENT",
            Self::Inpatient => "INPATIENT",
            Self::Dental => "DENTAL",
            Self::Optical => "OPTICAL",
            Self::Maternity => "MATERNITY",
            Self::Psychiatry => "PSYCHIATRY",
            Self::Wellness => "WELLNESS",
            Self::ChronicOut => "CHRONIC_OUT",
            Self::Emergency => "EMERGENCY",
            Self::Life => "LIFE",
            Self::TravelInsurance => "TRAVEL_INSURANCE",
        }
    }
}

impl fmt::Display for VisitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity-document type used to look the patient up with a provider.
///
/// The base set every provider accepts is `{EMIRATESID, CARDNUMBER}`;
/// individual providers may extend it (currently with `DHAMEMBERID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdType {
    /// National identity number.
    #[serde(rename = "EMIRATESID")]
    EmiratesId,
    /// Insurance member / card number.
    #[serde(rename = "CARDNUMBER")]
    CardNumber,
    /// Health-authority member id, accepted by a subset of providers.
    #[serde(rename = "DHAMEMBERID")]
    DhaMemberId,
}

impl IdType {
    /// Wire spelling of this id type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmiratesId => "EMIRATESID",
            Self::CardNumber => "CARDNUMBER",
            Self::DhaMemberId => "DHAMEMBERID",
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upload state of the optional referral document.
///
/// The upload itself is a side-effecting external operation; the payload
/// builder only inspects the resulting state. `Pending` and `Failed` are
/// hard blockers for submission unless the user explicitly skipped the
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentState {
    /// No document was attached.
    #[default]
    None,
    /// An upload is in flight.
    Pending,
    /// The upload finished; the payload embeds the object URL.
    Uploaded {
        /// Remote object URL returned by the document store.
        url: String,
    },
    /// The upload failed.
    Failed {
        /// Failure message from the document store.
        message: String,
    },
    /// The user explicitly chose to submit without the document.
    Skipped,
}

/// Everything the console collects for one check submission.
///
/// Optional fields may hold stale values entered while a *different*
/// provider was selected; the payload builder consults the rule table and
/// silently drops anything the current provider hides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckFormValues {
    /// Selected provider code, or the search-all code.
    pub provider_code: String,
    /// Selected visit type.
    pub visit_type: Option<VisitType>,
    /// Selected id type.
    pub id_type: Option<IdType>,
    /// Entered id value.
    pub id_value: String,
    /// Doctor display name chosen from the clinic directory.
    pub doctor_name: Option<String>,
    /// Patient contact phone number.
    pub phone: Option<String>,
    /// Referral code from the referring facility.
    pub referral_code: Option<String>,
    /// State of the referral document upload.
    pub referral_document: DocumentState,
    /// Free-text referring physician name.
    pub referring_physician: Option<String>,
    /// Whether the member is physically present at the clinic.
    pub member_present: Option<bool>,
    /// Point-of-delivery detail for providers that ask for it.
    pub pod: Option<String>,
    /// Payer sub-selection for providers fronting multiple payers.
    pub payer_subselection: Option<String>,
    /// Maternity treatment type, asked only for maternity visits.
    pub maternity_treatment_type: Option<String>,
    /// Dental sub-option, asked only for dental visits.
    pub dental_option: Option<String>,
}
