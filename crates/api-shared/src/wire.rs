//! Request and response bodies for the Hysio APIs.
//!
//! All JSON uses camelCase keys. Response bodies carry `success` so clients
//! can branch without inspecting the HTTP status.

use crate::error::ErrorEnvelope;
use hysio_core::{
    Answers, CodeDetails, DiagnosisCodeEntry, HhsbDocument, QuestionnaireSubmission, RedFlag,
    RedFlagSummary, SessionId, SubmissionQuery, SubmissionStatus, ValidationResult,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Body of every failed request.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorEnvelope,
}

impl From<ErrorEnvelope> for ErrorResponse {
    fn from(error: ErrorEnvelope) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

/// Either a single `code` or a batch of `codes`; `codes` wins if both are set.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ValidateCodeReq {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub codes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCodeRes {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validations: Option<Vec<ValidationResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_count: Option<usize>,
}

impl ValidateCodeRes {
    pub fn single(validation: ValidationResult) -> Self {
        Self {
            success: true,
            validation: Some(validation),
            validations: None,
            valid_count: None,
        }
    }

    pub fn batch(validations: Vec<ValidationResult>) -> Self {
        let valid_count = validations.iter().filter(|v| v.is_valid).count();
        Self {
            success: true,
            validation: None,
            validations: Some(validations),
            valid_count: Some(valid_count),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CodeLookupRes {
    pub success: bool,
    pub validation: ValidationResult,
    pub details: Option<CodeDetails>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchCodesQuery {
    /// Text matched against code, description and category.
    pub q: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchCodesRes {
    pub success: bool,
    pub codes: Vec<DiagnosisCodeEntry>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AnswersReq {
    #[schema(value_type = Object)]
    pub answers: Answers,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedFlagsRes {
    pub success: bool,
    pub red_flags: Vec<RedFlag>,
    pub summary: RedFlagSummary,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HhsbRes {
    pub success: bool,
    pub hhsb: HhsbDocument,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SaveDraftReq {
    #[schema(value_type = String)]
    pub session_id: SessionId,
    #[schema(value_type = Object)]
    pub answers: Answers,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitQuestionnaireReq {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub session_id: Option<SessionId>,
    #[schema(value_type = Object)]
    pub answers: Answers,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionRes {
    pub success: bool,
    pub submission: QuestionnaireSubmission,
}

impl From<QuestionnaireSubmission> for SubmissionRes {
    fn from(submission: QuestionnaireSubmission) -> Self {
        Self {
            success: true,
            submission,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListSubmissionsQuery {
    pub status: Option<SubmissionStatus>,
    pub has_red_flags: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl From<ListSubmissionsQuery> for SubmissionQuery {
    fn from(q: ListSubmissionsQuery) -> Self {
        SubmissionQuery {
            status: q.status,
            has_red_flags: q.has_red_flags,
            limit: q.limit,
            offset: q.offset,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListSubmissionsRes {
    pub success: bool,
    pub submissions: Vec<QuestionnaireSubmission>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}
