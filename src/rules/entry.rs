//! Per-provider rule records: field visibility matrix and vocabularies.

use serde::{Deserialize, Serialize};

use crate::types::form::{IdType, VisitType};

/// Visibility/requirement state of one optional payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRule {
    /// The field is not shown and must never reach the payload.
    #[default]
    Hidden,
    /// The field is shown; submitting without it is allowed.
    Optional,
    /// The field is shown and must be present to submit.
    Required,
}

impl FieldRule {
    /// Returns `true` unless the field is hidden.
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Returns `true` when the field must be present to submit.
    pub fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }
}

/// The optional payload fields governed by per-provider rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadField {
    /// Treating doctor name (and directory identity).
    Doctor,
    /// Patient contact phone.
    Phone,
    /// Referral code.
    ReferralCode,
    /// Referral document upload.
    ReferralDocument,
    /// Free-text referring physician.
    ReferringPhysician,
    /// Member-presence flag.
    MemberPresence,
    /// Point-of-delivery detail.
    Pod,
    /// Payer sub-selection.
    PayerSubselection,
    /// Dental sub-option.
    DentalOption,
}

/// Visibility matrix over all rule-governed payload fields.
///
/// Constructed with the `with_*` builders so catalog rows read as a diff
/// against "everything hidden".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldMatrix {
    doctor: FieldRule,
    phone: FieldRule,
    referral_code: FieldRule,
    referral_document: FieldRule,
    referring_physician: FieldRule,
    member_presence: FieldRule,
    pod: FieldRule,
    payer_subselection: FieldRule,
    dental_option: FieldRule,
}

impl FieldMatrix {
    /// Matrix with every field hidden.
    pub const fn hidden() -> Self {
        Self {
            doctor: FieldRule::Hidden,
            phone: FieldRule::Hidden,
            referral_code: FieldRule::Hidden,
            referral_document: FieldRule::Hidden,
            referring_physician: FieldRule::Hidden,
            member_presence: FieldRule::Hidden,
            pod: FieldRule::Hidden,
            payer_subselection: FieldRule::Hidden,
            dental_option: FieldRule::Hidden,
        }
    }

    /// Sets the doctor rule.
    pub const fn with_doctor(mut self, rule: FieldRule) -> Self {
        self.doctor = rule;
        self
    }

    /// Sets the phone rule.
    pub const fn with_phone(mut self, rule: FieldRule) -> Self {
        self.phone = rule;
        self
    }

    /// Sets the referral-code rule.
    pub const fn with_referral_code(mut self, rule: FieldRule) -> Self {
        self.referral_code = rule;
        self
    }

    /// Sets the referral-document rule.
    pub const fn with_referral_document(mut self, rule: FieldRule) -> Self {
        self.referral_document = rule;
        self
    }

    /// Sets the referring-physician rule.
    pub const fn with_referring_physician(mut self, rule: FieldRule) -> Self {
        self.referring_physician = rule;
        self
    }

    /// Sets the member-presence rule.
    pub const fn with_member_presence(mut self, rule: FieldRule) -> Self {
        self.member_presence = rule;
        self
    }

    /// Sets the POD rule.
    pub const fn with_pod(mut self, rule: FieldRule) -> Self {
        self.pod = rule;
        self
    }

    /// Sets the payer-sub-selection rule.
    pub const fn with_payer_subselection(mut self, rule: FieldRule) -> Self {
        self.payer_subselection = rule;
        self
    }

    /// Sets the dental sub-option rule.
    pub const fn with_dental_option(mut self, rule: FieldRule) -> Self {
        self.dental_option = rule;
        self
    }

    /// Rule for `field`.
    pub fn get(&self, field: PayloadField) -> FieldRule {
        match field {
            PayloadField::Doctor => self.doctor,
            PayloadField::Phone => self.phone,
            PayloadField::ReferralCode => self.referral_code,
            PayloadField::ReferralDocument => self.referral_document,
            PayloadField::ReferringPhysician => self.referring_physician,
            PayloadField::MemberPresence => self.member_presence,
            PayloadField::Pod => self.pod,
            PayloadField::PayerSubselection => self.payer_subselection,
            PayloadField::DentalOption => self.dental_option,
        }
    }

    /// Replaces the rule for `field`, returning the updated matrix.
    pub fn set(mut self, field: PayloadField, rule: FieldRule) -> Self {
        match field {
            PayloadField::Doctor => self.doctor = rule,
            PayloadField::Phone => self.phone = rule,
            PayloadField::ReferralCode => self.referral_code = rule,
            PayloadField::ReferralDocument => self.referral_document = rule,
            PayloadField::ReferringPhysician => self.referring_physician = rule,
            PayloadField::MemberPresence => self.member_presence = rule,
            PayloadField::Pod => self.pod = rule,
            PayloadField::PayerSubselection => self.payer_subselection = rule,
            PayloadField::DentalOption => self.dental_option = rule,
        }
        self
    }
}

/// One nested extra-argument sub-question attached to a visit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraQuestion {
    /// Wire key inside the payload's `extra_args` map.
    pub key: &'static str,
    /// Whether an answer is mandatory for the visit type.
    pub required: bool,
}

/// Static rule record for one provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderRuleEntry {
    /// Provider code this entry applies to.
    pub code: &'static str,
    /// Human-readable provider name.
    pub name: &'static str,
    /// Visit types the provider offers.
    pub visit_types: &'static [VisitType],
    /// ID types the provider accepts.
    pub id_types: &'static [IdType],
    /// Field visibility matrix.
    pub fields: FieldMatrix,
}

impl ProviderRuleEntry {
    /// Returns `true` when the provider offers `visit_type`.
    pub fn supports_visit_type(&self, visit_type: VisitType) -> bool {
        self.visit_types.contains(&visit_type)
    }

    /// Returns `true` when the provider accepts `id_type`.
    pub fn supports_id_type(&self, id_type: IdType) -> bool {
        self.id_types.contains(&id_type)
    }

    /// Extra-argument sub-questions carried by `visit_type` under this
    /// provider's rules. Dental questions only apply when the provider's
    /// matrix actually shows the dental sub-option.
    pub fn extra_questions(&self, visit_type: VisitType) -> &'static [ExtraQuestion] {
        const MATERNITY: &[ExtraQuestion] = &[ExtraQuestion {
            key: "maternity_treatment_type",
            required: true,
        }];
        const DENTAL: &[ExtraQuestion] = &[ExtraQuestion {
            key: "dental_option",
            required: false,
        }];

        match visit_type {
            VisitType::Maternity => MATERNITY,
            VisitType::Dental if self.fields.get(PayloadField::DentalOption).is_visible() => {
                DENTAL
            }
            _ => &[],
        }
    }
}
