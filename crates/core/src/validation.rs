//! DCSPH code validation.
//!
//! Validation is a pure function of the input string and the static
//! [`knowledge_base`](crate::knowledge_base). A code is accepted only when it
//! is structurally sound, present in the table and not retired.

use crate::constants::MAX_CODE_SUGGESTIONS;
use crate::knowledge_base::{self, DiagnosisCodeEntry, ENTRIES};
use hysio_types::DcsphCode;
use serde::Serialize;
use utoipa::ToSchema;

/// Verdict for a single code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// The code as received, trimmed.
    pub code: String,
    pub is_valid: bool,
    pub reasons: Vec<String>,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ValidationResult {
    fn accepted(entry: &DiagnosisCodeEntry) -> Self {
        Self {
            code: entry.code.to_string(),
            is_valid: true,
            reasons: Vec::new(),
            suggestions: Vec::new(),
            category: Some(entry.category.to_string()),
            description: Some(entry.description.to_string()),
        }
    }

    fn rejected(code: &str, reasons: Vec<String>, suggestions: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            is_valid: false,
            reasons,
            suggestions,
            category: None,
            description: None,
        }
    }
}

/// Breakdown of a structurally valid code into its two halves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathology: Option<PathologyDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LocationDetails {
    pub code: String,
    pub name: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PathologyDetails {
    pub code: String,
    pub name: String,
}

/// Validates a single DCSPH code.
///
/// Never fails: structural problems and unknown codes are reported through
/// `is_valid = false` and the `reasons` list.
pub fn validate_code(input: &str) -> ValidationResult {
    let trimmed = input.trim();

    let code = match DcsphCode::parse(trimmed) {
        Ok(code) => code,
        Err(e) => return ValidationResult::rejected(trimmed, vec![e.to_string()], Vec::new()),
    };

    match knowledge_base::find_entry(code.as_str()) {
        Some(entry) if entry.is_valid => ValidationResult::accepted(entry),
        Some(entry) => ValidationResult::rejected(
            entry.code,
            vec![format!(
                "code {} ({}) is no longer accepted",
                entry.code, entry.description
            )],
            suggest_alternatives(&code),
        ),
        None => {
            let mut reasons = vec![format!(
                "code {code} was not found in the DCSPH knowledge base"
            )];
            if knowledge_base::find_location(code.location()).is_none() {
                reasons.push(format!("unknown body location '{}'", code.location()));
            }
            if knowledge_base::find_pathology(code.pathology()).is_none() {
                reasons.push(format!("unknown pathology '{}'", code.pathology()));
            }
            ValidationResult::rejected(code.as_str(), reasons, suggest_alternatives(&code))
        }
    }
}

/// Validates each code independently, preserving input order.
pub fn validate_codes<S: AsRef<str>>(codes: &[S]) -> Vec<ValidationResult> {
    codes.iter().map(|c| validate_code(c.as_ref())).collect()
}

/// Splits a structurally valid code into location and pathology metadata.
///
/// Returns `None` if the code is malformed. Halves that are not in the
/// tables are left empty.
pub fn code_details(input: &str) -> Option<CodeDetails> {
    let code = DcsphCode::parse(input).ok()?;

    Some(CodeDetails {
        location: knowledge_base::find_location(code.location()).map(|l| LocationDetails {
            code: l.code.to_string(),
            name: l.name.to_string(),
            region: l.region.to_string(),
        }),
        pathology: knowledge_base::find_pathology(code.pathology()).map(|p| {
            PathologyDetails {
                code: p.code.to_string(),
                name: p.name.to_string(),
            }
        }),
    })
}

/// Case-insensitive substring search over accepted codes.
///
/// Matches against the code, the description and the category. A blank query
/// matches every accepted code. Results keep table order.
pub fn search_codes(query: &str, limit: usize) -> Vec<&'static DiagnosisCodeEntry> {
    let needle = query.trim().to_lowercase();

    ENTRIES
        .iter()
        .filter(|e| e.is_valid)
        .filter(|e| {
            needle.is_empty()
                || e.code.contains(&needle)
                || e.description.to_lowercase().contains(&needle)
                || e.category.to_lowercase().contains(&needle)
        })
        .take(limit)
        .collect()
}

// Same location first, then same pathology.
fn suggest_alternatives(code: &DcsphCode) -> Vec<String> {
    let location = code.location();
    let pathology = code.pathology();
    let candidates = ENTRIES
        .iter()
        .filter(|e| e.is_valid && e.code != code.as_str());

    let same_location = candidates.clone().filter(|e| e.code.starts_with(location));
    let same_pathology =
        candidates.filter(|e| e.code.ends_with(pathology) && !e.code.starts_with(location));

    same_location
        .chain(same_pathology)
        .take(MAX_CODE_SUGGESTIONS)
        .map(|e| e.code.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_code_is_valid_with_table_category() {
        let result = validate_code("7920");
        assert!(result.is_valid);
        assert_eq!(result.category.as_deref(), Some("Onderste extremiteit"));
        assert_eq!(result.description.as_deref(), Some("Knieartrose"));
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_every_accepted_entry_validates_with_its_category() {
        for entry in ENTRIES.iter().filter(|e| e.is_valid) {
            let result = validate_code(entry.code);
            assert!(result.is_valid, "{} should be valid", entry.code);
            assert_eq!(result.category.as_deref(), Some(entry.category));
        }
    }

    #[test]
    fn test_absent_code_is_invalid_with_reasons() {
        let result = validate_code("0000");
        assert!(!result.is_valid);
        assert!(result.reasons[0].contains("not found"));
        assert!(result.reasons.iter().any(|r| r.contains("unknown body location '00'")));
        assert!(result.reasons.iter().any(|r| r.contains("unknown pathology '00'")));
        assert!(result.category.is_none());
    }

    #[test]
    fn test_every_absent_code_is_invalid() {
        for n in 0..10_000u32 {
            let code = format!("{n:04}");
            if knowledge_base::find_entry(&code).is_none() {
                assert!(!validate_code(&code).is_valid, "{code} should be invalid");
            }
        }
    }

    #[test]
    fn test_structural_failures() {
        let short = validate_code("792");
        assert!(!short.is_valid);
        assert!(short.reasons[0].contains("exactly 4 digits"));

        let letters = validate_code("79AB");
        assert!(!letters.is_valid);
        assert!(letters.reasons[0].contains("only contain digits"));

        let empty = validate_code("   ");
        assert!(!empty.is_valid);
        assert_eq!(empty.code, "");
    }

    #[test]
    fn test_input_is_trimmed() {
        assert!(validate_code(" 7920\n").is_valid);
    }

    #[test]
    fn test_retired_code_is_invalid_and_suggests_same_location() {
        let result = validate_code("7650");
        assert!(!result.is_valid);
        assert!(result.reasons[0].contains("no longer accepted"));
        assert_eq!(result.suggestions, vec!["7626", "7630", "3150"]);
    }

    #[test]
    fn test_unknown_code_in_known_location_suggests_neighbours() {
        let result = validate_code("7999");
        assert!(!result.is_valid);
        assert_eq!(result.suggestions.len(), MAX_CODE_SUGGESTIONS);
        assert!(result.suggestions.iter().all(|s| s.starts_with("79")));
    }

    #[test]
    fn test_unknown_location_falls_back_to_pathology_suggestions() {
        let result = validate_code("8820");
        assert!(!result.is_valid);
        assert!(!result.suggestions.is_empty());
        assert!(result.suggestions.iter().all(|s| s.ends_with("20")));
    }

    #[test]
    fn test_batch_preserves_length_and_order() {
        let input = ["0000", "7920", "abc", "3380", "7920"];
        let results = validate_codes(&input);
        assert_eq!(results.len(), input.len());
        let validity: Vec<bool> = results.iter().map(|r| r.is_valid).collect();
        assert_eq!(validity, vec![false, true, false, true, true]);
        assert_eq!(results[0].code, "0000");
        assert_eq!(results[3].code, "3380");
    }

    #[test]
    fn test_batch_of_nothing_is_empty() {
        let empty: [&str; 0] = [];
        assert!(validate_codes(&empty).is_empty());
    }

    #[test]
    fn test_code_details() {
        let details = code_details("7920").expect("well formed");
        assert_eq!(details.location.as_ref().map(|l| l.name.as_str()), Some("Knie"));
        assert_eq!(details.pathology.as_ref().map(|p| p.name.as_str()), Some("Artrose"));

        let partial = code_details("7901").expect("well formed");
        assert!(partial.location.is_some());
        assert!(partial.pathology.is_none());

        assert!(code_details("x").is_none());
    }

    #[test]
    fn test_search_codes() {
        let hits = search_codes("knie", 10);
        assert!(hits.iter().any(|e| e.code == "7920"));
        assert!(hits.iter().all(|e| e.is_valid));

        let by_code = search_codes("3380", 10);
        assert_eq!(by_code.len(), 1);

        assert_eq!(search_codes("", 5).len(), 5);
        assert!(search_codes("enkeldistorsie", 10).is_empty());
    }
}
