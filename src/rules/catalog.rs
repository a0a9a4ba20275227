//! Static provider catalog.
//!
//! One row per insurance administrator the remote workers can verify
//! against. Rows are diffs against "everything hidden": a provider only
//! names the fields it actually asks for. The [`DEFAULT_ENTRY`] is the
//! search-all fallback returned for any code without an explicit row.

use crate::types::form::IdType::{CardNumber, DhaMemberId, EmiratesId};
use crate::types::form::VisitType::{
    ChronicOut, Dental, Emergency, Inpatient, Life, Maternity, Optical, Outpatient, Psychiatry,
    TravelInsurance, Wellness,
};
use crate::types::form::{IdType, VisitType};

use super::entry::{FieldMatrix, FieldRule, ProviderRuleEntry};

/// Provider code selecting the search-all flow.
pub const SEARCH_ALL_CODE: &str = "BOTH";

const ALL_VISITS: &[VisitType] = &[
    Outpatient,
    Inpatient,
    Dental,
    Optical,
    Maternity,
    Psychiatry,
    Wellness,
    ChronicOut,
    Emergency,
    Life,
    TravelInsurance,
];

const GENERAL_VISITS: &[VisitType] = &[
    Outpatient, Inpatient, Dental, Optical, Maternity, Psychiatry, Wellness, ChronicOut, Emergency,
];

const MEDICAL_VISITS: &[VisitType] = &[Outpatient, Inpatient, Emergency, ChronicOut];

const OUTPATIENT_DENTAL: &[VisitType] = &[Outpatient, Dental, Optical];

const GOVERNMENT_VISITS: &[VisitType] = &[Outpatient, Inpatient, Maternity, Emergency, Wellness];

const LIFE_VISITS: &[VisitType] = &[Life, TravelInsurance, Outpatient];

const BASE_IDS: &[IdType] = &[EmiratesId, CardNumber];
const EXTENDED_IDS: &[IdType] = &[EmiratesId, CardNumber, DhaMemberId];
const CARD_ONLY: &[IdType] = &[CardNumber];

const MINIMAL: FieldMatrix = FieldMatrix::hidden();

const CONTACT: FieldMatrix = FieldMatrix::hidden().with_phone(FieldRule::Optional);

const DOCTOR_OPTIONAL: FieldMatrix = FieldMatrix::hidden()
    .with_doctor(FieldRule::Optional)
    .with_phone(FieldRule::Optional);

const DOCTOR_REQUIRED: FieldMatrix = FieldMatrix::hidden()
    .with_doctor(FieldRule::Required)
    .with_phone(FieldRule::Optional);

const REFERRAL: FieldMatrix = FieldMatrix::hidden()
    .with_doctor(FieldRule::Optional)
    .with_referral_code(FieldRule::Required)
    .with_referral_document(FieldRule::Optional)
    .with_referring_physician(FieldRule::Optional);

const REFERRAL_STRICT: FieldMatrix = FieldMatrix::hidden()
    .with_doctor(FieldRule::Required)
    .with_referral_code(FieldRule::Required)
    .with_referral_document(FieldRule::Required)
    .with_referring_physician(FieldRule::Optional);

const MEMBER_PRESENCE: FieldMatrix = FieldMatrix::hidden()
    .with_member_presence(FieldRule::Required)
    .with_phone(FieldRule::Optional);

const POD: FieldMatrix = FieldMatrix::hidden()
    .with_pod(FieldRule::Required)
    .with_doctor(FieldRule::Optional);

const MULTI_PAYER: FieldMatrix = FieldMatrix::hidden()
    .with_payer_subselection(FieldRule::Required)
    .with_phone(FieldRule::Optional);

const DENTAL_NETWORK: FieldMatrix = FieldMatrix::hidden()
    .with_dental_option(FieldRule::Optional)
    .with_doctor(FieldRule::Optional);

const FULL_SERVICE: FieldMatrix = FieldMatrix::hidden()
    .with_doctor(FieldRule::Optional)
    .with_phone(FieldRule::Optional)
    .with_referral_code(FieldRule::Optional)
    .with_referral_document(FieldRule::Optional)
    .with_member_presence(FieldRule::Optional)
    .with_dental_option(FieldRule::Optional);

/// Fallback entry for unknown codes: the search-all flow asks only for the
/// identity document and visit type.
pub(super) const DEFAULT_ENTRY: ProviderRuleEntry = ProviderRuleEntry {
    code: SEARCH_ALL_CODE,
    name: "All providers",
    visit_types: ALL_VISITS,
    id_types: EXTENDED_IDS,
    fields: MINIMAL,
};

macro_rules! provider {
    ($code:literal, $name:literal, $visits:expr, $ids:expr, $fields:expr) => {
        ProviderRuleEntry {
            code: $code,
            name: $name,
            visit_types: $visits,
            id_types: $ids,
            fields: $fields,
        }
    };
}

/// Every provider with an explicit rule row.
pub(super) const CATALOG: &[ProviderRuleEntry] = &[
    // TPA administrators
    provider!("TPA001", "Neuron", GENERAL_VISITS, BASE_IDS, DOCTOR_OPTIONAL),
    provider!("TPA002", "NextCare", GENERAL_VISITS, BASE_IDS, CONTACT),
    provider!("TPA003", "NAS Administration", GENERAL_VISITS, EXTENDED_IDS, DOCTOR_OPTIONAL),
    provider!("TPA004", "Almadallah", GENERAL_VISITS, BASE_IDS, MEMBER_PRESENCE),
    provider!("TPA005", "MedNet", GENERAL_VISITS, BASE_IDS, REFERRAL),
    provider!("TPA006", "Oman Insurance TPA", MEDICAL_VISITS, BASE_IDS, DOCTOR_REQUIRED),
    provider!("TPA007", "FMC Network", GENERAL_VISITS, BASE_IDS, CONTACT),
    provider!("TPA008", "Inayah", MEDICAL_VISITS, BASE_IDS, MINIMAL),
    provider!("TPA009", "WhiteHealth", OUTPATIENT_DENTAL, BASE_IDS, DENTAL_NETWORK),
    provider!("TPA010", "Penta Care", GENERAL_VISITS, BASE_IDS, DOCTOR_OPTIONAL),
    provider!("TPA011", "Mednet Gulf", GENERAL_VISITS, EXTENDED_IDS, REFERRAL),
    provider!("TPA012", "Aafiya", MEDICAL_VISITS, BASE_IDS, CONTACT),
    provider!("TPA013", "Al Buhaira TPA", GENERAL_VISITS, BASE_IDS, MULTI_PAYER),
    provider!("TPA014", "Starwell", OUTPATIENT_DENTAL, BASE_IDS, DENTAL_NETWORK),
    provider!("TPA015", "Vidal Health", GENERAL_VISITS, BASE_IDS, DOCTOR_REQUIRED),
    provider!("TPA016", "GlobeMed", GENERAL_VISITS, EXTENDED_IDS, FULL_SERVICE),
    provider!("TPA017", "Amity Health", MEDICAL_VISITS, BASE_IDS, POD),
    provider!("TPA018", "Lifeline Administration", GENERAL_VISITS, BASE_IDS, CONTACT),
    provider!("TPA019", "Sehteq", MEDICAL_VISITS, BASE_IDS, MEMBER_PRESENCE),
    provider!("TPA020", "Gargash TPA", OUTPATIENT_DENTAL, CARD_ONLY, MINIMAL),
    // Direct insurers
    provider!("INS001", "Daman", GOVERNMENT_VISITS, EXTENDED_IDS, DOCTOR_OPTIONAL),
    provider!("INS002", "ADNIC", GENERAL_VISITS, BASE_IDS, REFERRAL),
    provider!("INS003", "Orient Insurance", GENERAL_VISITS, BASE_IDS, CONTACT),
    provider!("INS004", "Sukoon", GENERAL_VISITS, BASE_IDS, DOCTOR_OPTIONAL),
    provider!("INS005", "Watania Takaful", MEDICAL_VISITS, BASE_IDS, MINIMAL),
    provider!("INS006", "Salama", MEDICAL_VISITS, BASE_IDS, CONTACT),
    provider!("INS007", "Union Insurance", GENERAL_VISITS, BASE_IDS, MULTI_PAYER),
    provider!("INS008", "RAK Insurance", MEDICAL_VISITS, BASE_IDS, MINIMAL),
    provider!("INS009", "Fidelity United", GENERAL_VISITS, BASE_IDS, REFERRAL_STRICT),
    provider!("INS010", "Alliance Insurance", GENERAL_VISITS, BASE_IDS, CONTACT),
    provider!("INS011", "DNIRC", LIFE_VISITS, CARD_ONLY, MINIMAL),
    provider!("INS012", "Takaful Emarat", GENERAL_VISITS, EXTENDED_IDS, DOCTOR_OPTIONAL),
    // Government / platform gateways
    provider!("D001", "Dubai Care Network", GOVERNMENT_VISITS, EXTENDED_IDS, DOCTOR_REQUIRED),
    provider!("D002", "Enaya", GOVERNMENT_VISITS, EXTENDED_IDS, DOCTOR_OPTIONAL),
    provider!("DHPO", "Health Payment Gateway", GOVERNMENT_VISITS, EXTENDED_IDS, MINIMAL),
    provider!("RIYATI", "National Health Platform", GOVERNMENT_VISITS, EXTENDED_IDS, CONTACT),
];
