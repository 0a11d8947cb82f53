//! Uniform error envelope.
//!
//! Every failure that leaves the service is described by an [`ErrorEnvelope`]:
//! a kind, a message, whether the client can fix it by changing its input, and
//! concrete suggestions. Building an envelope never fails.

use hysio_core::CoreError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Bad or missing input. The client can retry with corrected input.
    ValidationError,
    /// Unknown diagnosis code or submission id.
    NotFound,
    /// The operation is not allowed in the record's current state.
    Conflict,
    /// Unexpected internal failure.
    UnknownError,
}

impl ErrorKind {
    pub fn is_recoverable(self) -> bool {
        matches!(self, ErrorKind::ValidationError)
    }

    fn default_suggestions(self) -> Vec<String> {
        let s: &[&str] = match self {
            ErrorKind::ValidationError => &["Check the request body and parameters and try again"],
            ErrorKind::NotFound => &["Verify the identifier or code and try again"],
            ErrorKind::Conflict => &["Reload the submission to see its current status"],
            ErrorKind::UnknownError => &["Try again later or contact support if the problem persists"],
        };
        s.iter().map(|s| s.to_string()).collect()
    }
}

/// Error description returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub kind: ErrorKind,
    pub message: String,
    pub recoverable: bool,
    pub suggestions: Vec<String>,
    /// Answer keys the error refers to, for validation failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl ErrorEnvelope {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            recoverable: kind.is_recoverable(),
            suggestions: kind.default_suggestions(),
            fields: Vec::new(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Envelope for unexpected failures. The message is generic; details stay
    /// in the server log.
    pub fn unknown() -> Self {
        Self::new(ErrorKind::UnknownError, "An unexpected error occurred")
    }

    /// Replaces the default suggestions. An empty list keeps the defaults.
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        if !suggestions.is_empty() {
            self.suggestions = suggestions;
        }
        self
    }
}

impl From<&CoreError> for ErrorEnvelope {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::Validation(issues) => {
                let mut envelope = ErrorEnvelope::validation(format!(
                    "Missing or invalid fields: {}",
                    issues
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; ")
                ))
                .with_suggestions(
                    issues
                        .iter()
                        .map(|i| format!("Provide a valid answer for '{}'", i.field))
                        .collect(),
                );
                envelope.fields = issues.iter().map(|i| i.field.clone()).collect();
                envelope
            }
            CoreError::InvalidInput(msg) => ErrorEnvelope::validation(msg.clone()),
            CoreError::NotFound(what) => ErrorEnvelope::not_found(format!("{what} was not found")),
            CoreError::InvalidTransition { .. } => {
                ErrorEnvelope::new(ErrorKind::Conflict, err.to_string())
            }
            CoreError::LockPoisoned => ErrorEnvelope::unknown(),
        }
    }
}

impl From<CoreError> for ErrorEnvelope {
    fn from(err: CoreError) -> Self {
        ErrorEnvelope::from(&err)
    }
}
