use crate::submission::SubmissionStatus;
use serde::Serialize;
use utoipa::ToSchema;

/// A single problem found while validating questionnaire answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldIssue {
    /// Answer key the problem applies to.
    pub field: String,
    /// Human readable description of the problem.
    pub problem: String,
}

impl FieldIssue {
    pub fn missing(field: &str) -> Self {
        Self {
            field: field.to_string(),
            problem: "is required".into(),
        }
    }

    pub fn invalid(field: &str, problem: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            problem: problem.into(),
        }
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.problem)
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("validation failed: {}", join_issues(.0))]
    Validation(Vec<FieldIssue>),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("cannot move submission from {from} to {to}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },
    #[error("submission store lock poisoned")]
    LockPoisoned,
}

impl CoreError {
    /// Field issues carried by a validation failure, empty for other variants.
    pub fn field_issues(&self) -> &[FieldIssue] {
        match self {
            CoreError::Validation(issues) => issues,
            _ => &[],
        }
    }
}

impl From<hysio_types::TypeError> for CoreError {
    fn from(err: hysio_types::TypeError) -> Self {
        CoreError::InvalidInput(err.to_string())
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
