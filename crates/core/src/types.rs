use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Classification tag attached to every exported row (e.g. "C2", "EXFIL")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Label(pub String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One membership condition: a field name and the values that qualify a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub field: String,
    pub values: Vec<String>,
}

impl Rule {
    pub fn new(field: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            field: field.into(),
            values,
        }
    }
}

/// Label mapping document: each label carries the rules that select its rows.
///
/// The JSON form is a single object keyed by label:
///
/// ```json
/// { "C2": [ { "field": "rule_name", "values": ["C2 Beaconing"] } ] }
/// ```
///
/// Labels iterate in sorted order so a harvest run is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMapping(BTreeMap<Label, Vec<Rule>>);

impl LabelMapping {
    /// Parse and validate a mapping document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let mapping: Self = serde_json::from_str(raw)?;
        mapping.validate()?;
        Ok(mapping)
    }

    /// Reject rules that could not produce a usable filter clause.
    ///
    /// An empty `values` list is allowed (the rule then matches nothing),
    /// but a blank `field` name would render as ` IN (...)` and is rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (label, rules) in &self.0 {
            for (index, rule) in rules.iter().enumerate() {
                if rule.field.trim().is_empty() {
                    return Err(ConfigError::EmptyRuleField {
                        label: label.to_string(),
                        index,
                    });
                }
            }
        }
        Ok(())
    }

    /// Labels in processing order (sorted).
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.0.keys()
    }

    /// Rules for a label; unknown labels map to no rules.
    pub fn rules_for(&self, label: &Label) -> &[Rule] {
        self.0.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, &[Rule])> {
        self.0.iter().map(|(label, rules)| (label, rules.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One harvested artifact: the label, the query that was sent, and the
/// endpoint's result payload exactly as returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestRecord {
    pub label: Label,
    pub spl: String,
    pub result: Value,
}

/// Errors in operator-supplied configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed label mapping: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("label {label:?} rule {index}: field name is empty")]
    EmptyRuleField { label: String, index: usize },
}
