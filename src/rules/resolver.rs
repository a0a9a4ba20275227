//! Combines the static rule table with clinic-level dynamic overrides.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::entry::{ExtraQuestion, FieldMatrix, FieldRule, PayloadField, ProviderRuleEntry};
use super::ProviderRuleTable;
use crate::types::form::{IdType, VisitType};

/// Clinic-level override for one provider, sourced from the external
/// clinic configuration store. When a flag is present it wins over the
/// static table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOverride {
    /// Forces the doctor field to required (`true`) or downgrades a
    /// required doctor to optional (`false`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_required: Option<bool>,
}

/// The rules in effect for one provider at one clinic: the static entry
/// with any dynamic overrides already applied to the field matrix.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveRules {
    entry: &'static ProviderRuleEntry,
    fields: FieldMatrix,
}

impl EffectiveRules {
    /// Provider code these rules apply to.
    pub fn code(&self) -> &'static str {
        self.entry.code
    }

    /// The underlying static entry.
    pub fn entry(&self) -> &'static ProviderRuleEntry {
        self.entry
    }

    /// Effective rule for `field`, overrides included.
    pub fn field(&self, field: PayloadField) -> FieldRule {
        self.fields.get(field)
    }

    /// Returns `true` when the provider offers `visit_type`.
    pub fn supports_visit_type(&self, visit_type: VisitType) -> bool {
        self.entry.supports_visit_type(visit_type)
    }

    /// Returns `true` when the provider accepts `id_type`.
    pub fn supports_id_type(&self, id_type: IdType) -> bool {
        self.entry.supports_id_type(id_type)
    }

    /// Extra-argument sub-questions for `visit_type`.
    pub fn extra_questions(&self, visit_type: VisitType) -> &'static [ExtraQuestion] {
        self.entry.extra_questions(visit_type)
    }
}

/// Resolves effective rules for a clinic: static table + that clinic's
/// overrides.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use eligibility_engine::rules::{
///     FieldRule, PayloadField, ProviderOverride, RuleResolver,
/// };
///
/// let mut overrides = HashMap::new();
/// overrides.insert(
///     "TPA002".to_string(),
///     ProviderOverride { doctor_required: Some(true) },
/// );
/// let resolver = RuleResolver::new(overrides);
///
/// // TPA002 hides the doctor statically; the clinic override wins.
/// let rules = resolver.effective("TPA002");
/// assert_eq!(rules.field(PayloadField::Doctor), FieldRule::Required);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleResolver {
    table: ProviderRuleTable,
    overrides: HashMap<String, ProviderOverride>,
}

impl RuleResolver {
    /// Creates a resolver over the built-in table with the given clinic
    /// overrides.
    pub fn new(overrides: HashMap<String, ProviderOverride>) -> Self {
        Self {
            table: ProviderRuleTable::new(),
            overrides,
        }
    }

    /// Creates a resolver with no overrides (static table only).
    pub fn without_overrides() -> Self {
        Self::new(HashMap::new())
    }

    /// The effective rules for `code`, total like
    /// [`ProviderRuleTable::lookup`].
    pub fn effective(&self, code: &str) -> EffectiveRules {
        let entry = self.table.lookup(code);
        let mut fields = entry.fields;

        if let Some(overridden) = self.overrides.get(entry.code) {
            if let Some(doctor_required) = overridden.doctor_required {
                // `true` forces the field visible and required; `false`
                // relaxes a static requirement but never reveals a field
                // the provider hides.
                let rule = if doctor_required {
                    FieldRule::Required
                } else if fields.get(PayloadField::Doctor).is_visible() {
                    FieldRule::Optional
                } else {
                    FieldRule::Hidden
                };
                fields = fields.set(PayloadField::Doctor, rule);
            }
        }

        EffectiveRules { entry, fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overrides_matches_static_table() {
        let resolver = RuleResolver::without_overrides();
        let table = ProviderRuleTable::new();
        for entry in table.entries() {
            let rules = resolver.effective(entry.code);
            assert_eq!(
                rules.field(PayloadField::Doctor),
                entry.fields.get(PayloadField::Doctor),
                "{}",
                entry.code
            );
        }
    }

    #[test]
    fn override_true_forces_required() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "TPA001".to_string(),
            ProviderOverride {
                doctor_required: Some(true),
            },
        );
        let resolver = RuleResolver::new(overrides);
        assert_eq!(
            resolver.effective("TPA001").field(PayloadField::Doctor),
            FieldRule::Required
        );
    }

    #[test]
    fn override_false_relaxes_requirement() {
        // TPA006 statically requires the doctor.
        let mut overrides = HashMap::new();
        overrides.insert(
            "TPA006".to_string(),
            ProviderOverride {
                doctor_required: Some(false),
            },
        );
        let resolver = RuleResolver::new(overrides);
        assert_eq!(
            resolver.effective("TPA006").field(PayloadField::Doctor),
            FieldRule::Optional
        );
    }

    #[test]
    fn override_false_keeps_hidden_hidden() {
        // TPA002 hides the doctor statically.
        let mut overrides = HashMap::new();
        overrides.insert(
            "TPA002".to_string(),
            ProviderOverride {
                doctor_required: Some(false),
            },
        );
        let resolver = RuleResolver::new(overrides);
        assert_eq!(
            resolver.effective("TPA002").field(PayloadField::Doctor),
            FieldRule::Hidden
        );
    }

    #[test]
    fn override_does_not_leak_to_other_providers() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "TPA001".to_string(),
            ProviderOverride {
                doctor_required: Some(true),
            },
        );
        let resolver = RuleResolver::new(overrides);
        assert_ne!(
            resolver.effective("TPA002").field(PayloadField::Doctor),
            FieldRule::Required
        );
    }
}
