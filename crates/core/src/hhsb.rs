//! HHSB mapping.
//!
//! Projects pre-intake answers onto the four HHSB sections used in Dutch
//! physiotherapy notes:
//! - **Hulpvraag**: what the patient is asking for and hopes to achieve
//! - **Historie**: how the complaint started and developed
//! - **Stoornissen**: impairments in body function (pain, stiffness)
//! - **Beperkingen**: limitations in daily activities, work and sport
//!
//! The mapping is a static field table. Validation reports every missing or
//! malformed field at once.

use crate::answers::{fields, AnswerValue, Answers};
use crate::constants::MAX_PAIN_INTENSITY;
use crate::error::{CoreError, CoreResult, FieldIssue};
use crate::red_flags::{summarise, RedFlag, RedFlagSummary};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Hulpvraag,
    Historie,
    Stoornissen,
    Beperkingen,
}

impl Section {
    fn title(self) -> &'static str {
        match self {
            Section::Hulpvraag => "Hulpvraag",
            Section::Historie => "Historie",
            Section::Stoornissen => "Stoornissen",
            Section::Beperkingen => "Beperkingen",
        }
    }
}

/// Value type an answer must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    /// Free text or a list of choices.
    Text,
    /// A pain score on the 0-10 scale.
    Score,
    Flag,
}

struct FieldMapping {
    field: &'static str,
    label: &'static str,
    section: Section,
    kind: FieldKind,
    required: bool,
}

const fn map(
    field: &'static str,
    label: &'static str,
    section: Section,
    kind: FieldKind,
    required: bool,
) -> FieldMapping {
    FieldMapping {
        field,
        label,
        section,
        kind,
        required,
    }
}

const MAPPINGS: &[FieldMapping] = &[
    map(fields::HELP_REQUEST, "Hulpvraag", Section::Hulpvraag, FieldKind::Text, true),
    map(fields::GOALS, "Doelen", Section::Hulpvraag, FieldKind::Text, true),
    map(fields::EXPECTATIONS, "Verwachtingen", Section::Hulpvraag, FieldKind::Text, false),
    map(fields::COMPLAINT_LOCATION, "Locatie klacht", Section::Historie, FieldKind::Text, true),
    map(fields::COMPLAINT_ONSET, "Ontstaan", Section::Historie, FieldKind::Text, true),
    map(fields::COMPLAINT_COURSE, "Beloop", Section::Historie, FieldKind::Text, false),
    map(fields::PREVIOUS_TREATMENT, "Eerdere behandeling", Section::Historie, FieldKind::Text, false),
    map(fields::MEDICAL_HISTORY, "Medische voorgeschiedenis", Section::Historie, FieldKind::Text, false),
    map(fields::MEDICATION, "Medicatie", Section::Historie, FieldKind::Text, false),
    map(fields::PAIN_INTENSITY, "Pijnintensiteit (NPRS 0-10)", Section::Stoornissen, FieldKind::Score, true),
    map(fields::PAIN_DESCRIPTION, "Pijnbeschrijving", Section::Stoornissen, FieldKind::Text, false),
    map(fields::STIFFNESS, "Stijfheid", Section::Stoornissen, FieldKind::Text, false),
    map(fields::NIGHT_PAIN, "Nachtelijke pijn", Section::Stoornissen, FieldKind::Flag, false),
    map(fields::SYMPTOMS, "Overige symptomen", Section::Stoornissen, FieldKind::Text, false),
    map(fields::DAILY_LIMITATIONS, "Beperkingen in ADL", Section::Beperkingen, FieldKind::Text, true),
    map(fields::WORK_IMPACT, "Werk", Section::Beperkingen, FieldKind::Text, false),
    map(fields::SPORT_IMPACT, "Sport en hobby's", Section::Beperkingen, FieldKind::Text, false),
];

/// Answer keys that must be present for a questionnaire to be mapped.
pub fn required_fields() -> impl Iterator<Item = &'static str> {
    MAPPINGS.iter().filter(|m| m.required).map(|m| m.field)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HhsbEntry {
    pub field: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HhsbSection {
    pub title: String,
    pub entries: Vec<HhsbEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HhsbDocument {
    pub hulpvraag: HhsbSection,
    pub historie: HhsbSection,
    pub stoornissen: HhsbSection,
    pub beperkingen: HhsbSection,
    pub red_flags: RedFlagSummary,
}

impl HhsbDocument {
    /// Renders the document as a plain-text intake note.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for section in [
            &self.hulpvraag,
            &self.historie,
            &self.stoornissen,
            &self.beperkingen,
        ] {
            out.push_str(&section.title);
            out.push('\n');
            for entry in &section.entries {
                out.push_str(&format!("- {}: {}\n", entry.label, entry.value));
            }
            out.push('\n');
        }

        out.push_str("Rode vlaggen\n");
        if self.red_flags.flags.is_empty() {
            out.push_str("- Geen\n");
        }
        for flag in &self.red_flags.flags {
            out.push_str(&format!(
                "- [{:?}] {} ({})\n",
                flag.severity, flag.label, flag.matched_text
            ));
        }
        out
    }
}

/// Checks required fields and value types without building a document.
///
/// # Errors
///
/// Returns `CoreError::Validation` listing every problem in table order.
pub fn validate_answers(answers: &Answers) -> CoreResult<()> {
    let mut issues = Vec::new();

    for m in MAPPINGS {
        match answers.get(m.field) {
            None => {
                if m.required {
                    issues.push(FieldIssue::missing(m.field));
                }
            }
            Some(value) if value.is_blank() => {
                if m.required {
                    issues.push(FieldIssue::missing(m.field));
                }
            }
            Some(value) => {
                if let Some(problem) = type_problem(m.kind, value) {
                    issues.push(FieldIssue::invalid(m.field, problem));
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(issues))
    }
}

fn type_problem(kind: FieldKind, value: &AnswerValue) -> Option<String> {
    match (kind, value) {
        (FieldKind::Text, AnswerValue::Text(_) | AnswerValue::Choices(_)) => None,
        (FieldKind::Text, _) => Some("must be text".into()),
        (FieldKind::Score, AnswerValue::Number(n)) if (0.0..=MAX_PAIN_INTENSITY).contains(n) => {
            None
        }
        (FieldKind::Score, _) => Some(format!(
            "must be a number between 0 and {MAX_PAIN_INTENSITY}"
        )),
        (FieldKind::Flag, AnswerValue::Flag(_)) => None,
        (FieldKind::Flag, _) => Some("must be true or false".into()),
    }
}

/// Maps answers and red flags into an HHSB document.
///
/// Optional fields that are absent or blank are left out. Entries keep the
/// order of the mapping table.
///
/// # Errors
///
/// Returns `CoreError::Validation` if any required field is missing or any
/// field has the wrong type. Every problem is listed, not just the first.
pub fn map_to_hhsb(answers: &Answers, red_flags: &[RedFlag]) -> CoreResult<HhsbDocument> {
    validate_answers(answers)?;

    let section = |s: Section| HhsbSection {
        title: s.title().to_string(),
        entries: MAPPINGS
            .iter()
            .filter(|m| m.section == s)
            .filter_map(|m| {
                let value = answers.get(m.field).filter(|v| !v.is_blank())?;
                Some(HhsbEntry {
                    field: m.field.to_string(),
                    label: m.label.to_string(),
                    value: value.display(),
                })
            })
            .collect(),
    };

    Ok(HhsbDocument {
        hulpvraag: section(Section::Hulpvraag),
        historie: section(Section::Historie),
        stoornissen: section(Section::Stoornissen),
        beperkingen: section(Section::Beperkingen),
        red_flags: summarise(red_flags),
    })
}
