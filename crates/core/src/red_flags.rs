//! Red-flag detection over pre-intake answers.
//!
//! A red flag is an answer pattern that may point at serious pathology and
//! needs the therapist's attention before treatment starts. Detection runs a
//! fixed, ordered rule list. Each rule that matches produces exactly one flag,
//! and flags are returned in rule order, so the output is deterministic.

use crate::answers::{fields, AnswerValue, Answers};
use crate::constants::MAX_MATCHED_TEXT_LEN;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One detected red flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedFlag {
    pub id: String,
    pub label: String,
    pub severity: Severity,
    /// Answer text (or rendered value) that triggered the rule.
    pub matched_text: String,
    /// Answer key that triggered the rule.
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedFlagSummary {
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_severity: Option<Severity>,
    pub requires_immediate_attention: bool,
    pub flags: Vec<RedFlag>,
}

enum Condition {
    Keywords {
        fields: &'static [&'static str],
        keywords: &'static [&'static str],
    },
    FlagSet(&'static str),
    AtLeast(&'static str, f64),
}

struct Rule {
    id: &'static str,
    label: &'static str,
    severity: Severity,
    conditions: &'static [Condition],
}

const FREE_TEXT_FIELDS: &[&str] = &[
    fields::GENERAL_HEALTH,
    fields::MEDICAL_HISTORY,
    fields::PAIN_DESCRIPTION,
    fields::COMPLAINT_COURSE,
    fields::SYMPTOMS,
];

const RULES: &[Rule] = &[
    Rule {
        id: "unexplained_weight_loss",
        label: "Onverklaard gewichtsverlies",
        severity: Severity::High,
        conditions: &[
            Condition::FlagSet(fields::WEIGHT_LOSS),
            Condition::Keywords {
                fields: FREE_TEXT_FIELDS,
                keywords: &["gewichtsverlies", "afgevallen", "weight loss"],
            },
        ],
    },
    Rule {
        id: "night_pain",
        label: "Nachtelijke pijn",
        severity: Severity::Medium,
        conditions: &[
            Condition::FlagSet(fields::NIGHT_PAIN),
            Condition::Keywords {
                fields: FREE_TEXT_FIELDS,
                keywords: &["nachtpijn", "pijn 's nachts", "night pain"],
            },
        ],
    },
    Rule {
        id: "cauda_equina",
        label: "Zadelanesthesie of blaas- en darmstoornissen",
        severity: Severity::High,
        conditions: &[Condition::Keywords {
            fields: FREE_TEXT_FIELDS,
            keywords: &[
                "zadelanesthesie",
                "incontinentie",
                "blaasproblemen",
                "saddle anaesthesia",
            ],
        }],
    },
    Rule {
        id: "progressive_neurological_deficit",
        label: "Progressieve neurologische uitval",
        severity: Severity::High,
        conditions: &[Condition::Keywords {
            fields: FREE_TEXT_FIELDS,
            keywords: &["krachtsverlies", "verlamming", "progressieve uitval"],
        }],
    },
    Rule {
        id: "malignancy_history",
        label: "Voorgeschiedenis van kanker",
        severity: Severity::High,
        conditions: &[Condition::Keywords {
            fields: &[fields::MEDICAL_HISTORY, fields::GENERAL_HEALTH],
            keywords: &["kanker", "tumor", "oncolog", "cancer"],
        }],
    },
    Rule {
        id: "fever",
        label: "Koorts of algemene malaise",
        severity: Severity::Medium,
        conditions: &[Condition::Keywords {
            fields: FREE_TEXT_FIELDS,
            keywords: &["koorts", "fever", "malaise"],
        }],
    },
    Rule {
        id: "recent_trauma",
        label: "Recent trauma",
        severity: Severity::Medium,
        conditions: &[Condition::Keywords {
            fields: &[fields::COMPLAINT_ONSET, fields::MEDICAL_HISTORY],
            keywords: &["ongeval", "trauma", "aanrijding", "val op", "gestruikeld"],
        }],
    },
    Rule {
        id: "corticosteroid_use",
        label: "Langdurig gebruik van corticosteroïden",
        severity: Severity::Low,
        conditions: &[Condition::Keywords {
            fields: &[fields::MEDICATION, fields::MEDICAL_HISTORY],
            keywords: &["prednison", "corticosteroïd", "corticosteroid"],
        }],
    },
    Rule {
        id: "severe_pain",
        label: "Zeer hevige pijn",
        severity: Severity::Low,
        conditions: &[Condition::AtLeast(fields::PAIN_INTENSITY, 9.0)],
    },
];

/// Runs every rule against `answers` and returns the flags in rule order.
pub fn detect_red_flags(answers: &Answers) -> Vec<RedFlag> {
    RULES
        .iter()
        .filter_map(|rule| {
            rule.conditions
                .iter()
                .find_map(|c| evaluate(c, answers))
                .map(|(field, matched)| RedFlag {
                    id: rule.id.to_string(),
                    label: rule.label.to_string(),
                    severity: rule.severity,
                    matched_text: truncate(matched),
                    field: field.to_string(),
                })
        })
        .collect()
}

/// Summarises a list of flags.
pub fn summarise(flags: &[RedFlag]) -> RedFlagSummary {
    let highest_severity = flags.iter().map(|f| f.severity).max();
    RedFlagSummary {
        total: flags.len(),
        highest_severity,
        requires_immediate_attention: highest_severity == Some(Severity::High),
        flags: flags.to_vec(),
    }
}

fn evaluate(condition: &Condition, answers: &Answers) -> Option<(&'static str, String)> {
    match condition {
        Condition::FlagSet(field) => match answers.get(field) {
            Some(AnswerValue::Flag(true)) => Some((*field, format!("{field}: ja"))),
            _ => None,
        },
        Condition::AtLeast(field, threshold) => match answers.get(field) {
            Some(AnswerValue::Number(n)) if *n >= *threshold => Some((
                *field,
                format!("{field}: {}", AnswerValue::Number(*n).display()),
            )),
            _ => None,
        },
        Condition::Keywords { fields, keywords } => fields.iter().find_map(|field| {
            let value = answers.get(field)?;
            value
                .texts()
                .into_iter()
                .find(|text| {
                    let lower = text.to_lowercase();
                    keywords.iter().any(|k| lower.contains(k))
                })
                .map(|text| (*field, text.trim().to_string()))
        }),
    }
}

fn truncate(text: String) -> String {
    if text.chars().count() <= MAX_MATCHED_TEXT_LEN {
        return text;
    }
    let mut cut: String = text.chars().take(MAX_MATCHED_TEXT_LEN).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, AnswerValue)]) -> Answers {
        pairs.iter().cloned().collect()
    }

    fn text(s: &str) -> AnswerValue {
        AnswerValue::Text(s.into())
    }

    #[test]
    fn test_no_flags_for_benign_answers() {
        let a = answers(&[
            (fields::MEDICAL_HISTORY, text("geen bijzonderheden")),
            (fields::PAIN_INTENSITY, AnswerValue::Number(4.0)),
            (fields::NIGHT_PAIN, AnswerValue::Flag(false)),
        ]);
        assert!(detect_red_flags(&a).is_empty());
    }

    #[test]
    fn test_high_severity_rule_yields_exactly_one_flag() {
        // Two keywords of the same rule in two fields still give one flag.
        let a = answers(&[
            (fields::GENERAL_HEALTH, text("Veel afgevallen de laatste maanden")),
            (fields::MEDICAL_HISTORY, text("onbedoeld gewichtsverlies")),
        ]);
        let flags = detect_red_flags(&a);
        let high: Vec<_> = flags.iter().filter(|f| f.severity == Severity::High).collect();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].id, "unexplained_weight_loss");
        assert_eq!(high[0].field, fields::GENERAL_HEALTH);
        assert_eq!(high[0].matched_text, "Veel afgevallen de laatste maanden");
    }

    #[test]
    fn test_multiple_rules_may_match_same_text() {
        let a = answers(&[(
            fields::MEDICAL_HISTORY,
            text("Na kanker veel gewichtsverlies en koorts"),
        )]);
        let ids: Vec<_> = detect_red_flags(&a).into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["unexplained_weight_loss", "malignancy_history", "fever"]);
    }

    #[test]
    fn test_output_follows_rule_order_and_is_deterministic() {
        let a = answers(&[
            (fields::PAIN_INTENSITY, AnswerValue::Number(10.0)),
            (fields::MEDICATION, text("Prednison 5mg")),
            (fields::NIGHT_PAIN, AnswerValue::Flag(true)),
            (fields::WEIGHT_LOSS, AnswerValue::Flag(true)),
        ]);
        let first = detect_red_flags(&a);
        let ids: Vec<_> = first.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["unexplained_weight_loss", "night_pain", "corticosteroid_use", "severe_pain"]
        );
        assert_eq!(first, detect_red_flags(&a));
    }

    #[test]
    fn test_keywords_are_case_insensitive_and_scan_choices() {
        let a = answers(&[(
            fields::SYMPTOMS,
            AnswerValue::Choices(vec!["Tintelingen".into(), "INCONTINENTIE".into()]),
        )]);
        let flags = detect_red_flags(&a);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].id, "cauda_equina");
        assert_eq!(flags[0].matched_text, "INCONTINENTIE");
    }

    #[test]
    fn test_keywords_only_scan_listed_fields() {
        // Trauma keywords are only checked in onset and history.
        let a = answers(&[(fields::GOALS, text("trauma verwerken"))]);
        assert!(detect_red_flags(&a).is_empty());
    }

    #[test]
    fn test_threshold_rule_ignores_non_numbers() {
        let a = answers(&[(fields::PAIN_INTENSITY, text("10"))]);
        assert!(detect_red_flags(&a).is_empty());

        let a = answers(&[(fields::PAIN_INTENSITY, AnswerValue::Number(9.0))]);
        let flags = detect_red_flags(&a);
        assert_eq!(flags[0].matched_text, "pain_intensity: 9");
    }

    #[test]
    fn test_matched_text_is_truncated() {
        let long = format!("koorts {}", "x".repeat(500));
        let a = answers(&[(fields::GENERAL_HEALTH, text(&long))]);
        let flags = detect_red_flags(&a);
        assert_eq!(flags[0].matched_text.chars().count(), MAX_MATCHED_TEXT_LEN + 1);
    }

    #[test]
    fn test_summarise() {
        let empty = summarise(&[]);
        assert_eq!(empty.total, 0);
        assert_eq!(empty.highest_severity, None);
        assert!(!empty.requires_immediate_attention);

        let a = answers(&[
            (fields::NIGHT_PAIN, AnswerValue::Flag(true)),
            (fields::WEIGHT_LOSS, AnswerValue::Flag(true)),
        ]);
        let summary = summarise(&detect_red_flags(&a));
        assert_eq!(summary.total, 2);
        assert_eq!(summary.highest_severity, Some(Severity::High));
        assert!(summary.requires_immediate_attention);
    }
}
