//! Pre-intake questionnaire submissions.
//!
//! A submission moves through a fixed lifecycle:
//!
//! `draft --(auto-save)--> draft --(submit)--> submitted --(review)--> reviewed --(import)--> imported`
//!
//! While in `draft` the answer set may only grow (keys are added or their
//! values replaced, never removed). From `submitted` onwards the record is
//! frozen except for its status and transition timestamps.

use crate::answers::Answers;
use crate::hhsb::HhsbDocument;
use crate::red_flags::RedFlag;
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use hysio_types::SessionId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Draft,
    Submitted,
    Reviewed,
    Imported,
}

impl SubmissionStatus {
    /// Whether a therapist or patient action may move a record from `self` to `next`.
    pub fn can_transition_to(self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, next),
            (Draft, Draft) | (Draft, Submitted) | (Submitted, Reviewed) | (Reviewed, Imported)
        )
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubmissionStatus::Draft => "draft",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Reviewed => "reviewed",
            SubmissionStatus::Imported => "imported",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireSubmission {
    /// 32 lowercase hex characters.
    pub id: String,
    #[schema(value_type = String)]
    pub session_id: SessionId,
    #[schema(value_type = Object)]
    pub answers: Answers,
    pub red_flags: Vec<RedFlag>,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hhsb: Option<HhsbDocument>,
}

impl QuestionnaireSubmission {
    /// Creates an empty draft for a session.
    pub fn new_draft(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            session_id,
            answers: Answers::new(),
            red_flags: Vec::new(),
            status: SubmissionStatus::Draft,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            reviewed_at: None,
            imported_at: None,
            hhsb: None,
        }
    }

    /// Merges answers into a draft.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the record is no longer a draft.
    pub fn merge_answers(&mut self, answers: Answers, now: DateTime<Utc>) -> CoreResult<()> {
        self.ensure_transition(SubmissionStatus::Draft)?;
        self.answers.merge(answers);
        self.updated_at = now;
        Ok(())
    }

    /// Moves the record to `next`, stamping the matching timestamp.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the lifecycle does not allow it.
    pub fn transition(&mut self, next: SubmissionStatus, now: DateTime<Utc>) -> CoreResult<()> {
        self.ensure_transition(next)?;
        self.status = next;
        self.updated_at = now;
        match next {
            SubmissionStatus::Draft => {}
            SubmissionStatus::Submitted => self.submitted_at = Some(now),
            SubmissionStatus::Reviewed => self.reviewed_at = Some(now),
            SubmissionStatus::Imported => self.imported_at = Some(now),
        }
        Ok(())
    }

    pub fn has_red_flags(&self) -> bool {
        !self.red_flags.is_empty()
    }

    /// Timestamp used for newest-first ordering: submission time, or creation
    /// time for drafts.
    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        self.submitted_at.unwrap_or(self.created_at)
    }

    fn ensure_transition(&self, next: SubmissionStatus) -> CoreResult<()> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.status,
                to: next,
            })
        }
    }
}
