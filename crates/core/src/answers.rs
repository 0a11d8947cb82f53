//! Pre-intake questionnaire answers.
//!
//! Answers arrive as a JSON object keyed by field name. Every value must be a
//! boolean, a number, a text or a list of texts; anything else (null, nested
//! objects, mixed lists) is rejected during deserialisation so the rest of the
//! crate can work with typed values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field keys understood by the red-flag rules and the HHSB mapping.
pub mod fields {
    pub const HELP_REQUEST: &str = "help_request";
    pub const GOALS: &str = "goals";
    pub const EXPECTATIONS: &str = "expectations";
    pub const COMPLAINT_LOCATION: &str = "complaint_location";
    pub const COMPLAINT_ONSET: &str = "complaint_onset";
    pub const COMPLAINT_COURSE: &str = "complaint_course";
    pub const PREVIOUS_TREATMENT: &str = "previous_treatment";
    pub const MEDICAL_HISTORY: &str = "medical_history";
    pub const MEDICATION: &str = "medication";
    pub const PAIN_INTENSITY: &str = "pain_intensity";
    pub const PAIN_DESCRIPTION: &str = "pain_description";
    pub const STIFFNESS: &str = "stiffness";
    pub const NIGHT_PAIN: &str = "night_pain";
    pub const SYMPTOMS: &str = "symptoms";
    pub const DAILY_LIMITATIONS: &str = "daily_limitations";
    pub const WORK_IMPACT: &str = "work_impact";
    pub const SPORT_IMPACT: &str = "sport_impact";
    pub const WEIGHT_LOSS: &str = "weight_loss";
    pub const GENERAL_HEALTH: &str = "general_health";
}

/// A single typed answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Number(f64),
    Text(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    /// True for blank text and empty lists. Flags and numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(t) => t.trim().is_empty(),
            AnswerValue::Choices(c) => c.iter().all(|s| s.trim().is_empty()),
            AnswerValue::Flag(_) | AnswerValue::Number(_) => false,
        }
    }

    /// Text fragments that keyword rules are evaluated against.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            AnswerValue::Text(t) => vec![t.as_str()],
            AnswerValue::Choices(c) => c.iter().map(String::as_str).collect(),
            AnswerValue::Flag(_) | AnswerValue::Number(_) => Vec::new(),
        }
    }

    /// Renders the value for a clinical note.
    pub fn display(&self) -> String {
        match self {
            AnswerValue::Flag(true) => "ja".into(),
            AnswerValue::Flag(false) => "nee".into(),
            AnswerValue::Number(n) => format_number(*n),
            AnswerValue::Text(t) => t.trim().to_string(),
            AnswerValue::Choices(c) => c
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// All answers of one questionnaire, ordered by field key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&AnswerValue> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: AnswerValue) {
        self.0.insert(field.into(), value);
    }

    /// Adds or replaces every answer from `other`. Existing keys that `other`
    /// does not mention are kept.
    pub fn merge(&mut self, other: Answers) {
        self.0.extend(other.0);
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, AnswerValue)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, AnswerValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
