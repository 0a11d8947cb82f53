//! Questionnaire submission lifecycle.
//!
//! `SubmissionService` owns the state machine: auto-saving drafts, submitting
//! (red-flag detection + HHSB mapping), and the therapist transitions to
//! reviewed and imported. Storage is injected as a [`SubmissionRepository`].
//!
//! Mutating operations read a record, change it and write it back. They are
//! serialised through a service-wide write lock so that two concurrent saves
//! for one session cannot both create a draft.

use crate::answers::Answers;
use crate::config::CoreConfig;
use crate::hhsb::map_to_hhsb;
use crate::red_flags::detect_red_flags;
use crate::repositories::store::{
    InMemorySubmissionRepository, Page, SubmissionFilter, SubmissionRepository,
};
use crate::submission::{QuestionnaireSubmission, SubmissionStatus};
use crate::{CoreError, CoreResult};
use chrono::Utc;
use hysio_types::SessionId;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Listing parameters as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionQuery {
    pub status: Option<SubmissionStatus>,
    pub has_red_flags: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Service driving the pre-intake submission lifecycle.
#[derive(Clone)]
pub struct SubmissionService {
    cfg: Arc<CoreConfig>,
    repo: Arc<dyn SubmissionRepository>,
    writes: Arc<Mutex<()>>,
}

impl SubmissionService {
    pub fn new(cfg: Arc<CoreConfig>, repo: Arc<dyn SubmissionRepository>) -> Self {
        Self {
            cfg,
            repo,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Service backed by a fresh [`InMemorySubmissionRepository`].
    pub fn in_memory(cfg: Arc<CoreConfig>) -> Self {
        Self::new(cfg, Arc::new(InMemorySubmissionRepository::new()))
    }

    /// Auto-saves answers into the session's draft, creating it if needed.
    ///
    /// Red flags are re-evaluated on every save so therapists can see them
    /// before the patient submits.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the session's record has
    /// already been submitted.
    pub fn save_draft(
        &self,
        session_id: SessionId,
        answers: Answers,
    ) -> CoreResult<QuestionnaireSubmission> {
        let _guard = self.lock_writes()?;
        let (mut record, is_new) = self.load_or_create(session_id)?;

        record.merge_answers(answers, Utc::now())?;
        record.red_flags = detect_red_flags(&record.answers);
        self.persist(record.clone(), is_new)?;

        tracing::debug!(
            "saved draft {} ({} answers)",
            record.id,
            record.answers.len()
        );
        Ok(record)
    }

    /// Submits the session's questionnaire.
    ///
    /// `answers` are merged into any existing draft first. When `session_id`
    /// is `None` a new session is started. If validation fails the merged
    /// answers are still stored as a draft.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `CoreError::Validation` listing every missing or malformed field,
    /// - `CoreError::InvalidTransition` if the record was already submitted.
    pub fn submit(
        &self,
        session_id: Option<SessionId>,
        answers: Answers,
    ) -> CoreResult<QuestionnaireSubmission> {
        let session_id = match session_id {
            Some(id) => id,
            None => SessionId::new(Uuid::new_v4().simple().to_string())?,
        };

        let _guard = self.lock_writes()?;
        let (mut record, is_new) = self.load_or_create(session_id)?;
        let now = Utc::now();

        record.merge_answers(answers, now)?;
        record.red_flags = detect_red_flags(&record.answers);

        match map_to_hhsb(&record.answers, &record.red_flags) {
            Ok(doc) => {
                record.hhsb = Some(doc);
                record.transition(SubmissionStatus::Submitted, now)?;
                self.persist(record.clone(), is_new)?;
                tracing::info!(
                    "submission {} submitted with {} red flag(s)",
                    record.id,
                    record.red_flags.len()
                );
                Ok(record)
            }
            Err(e) => {
                self.persist(record.clone(), is_new)?;
                tracing::warn!("submission {} kept as draft: {}", record.id, e);
                Err(e)
            }
        }
    }

    /// Marks a submitted questionnaire as reviewed by a therapist.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown id and
    /// `CoreError::InvalidTransition` unless the record is `submitted`.
    pub fn mark_reviewed(&self, id: &str) -> CoreResult<QuestionnaireSubmission> {
        self.advance(id, SubmissionStatus::Reviewed)
    }

    /// Marks a reviewed questionnaire as imported into the intake workflow.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown id and
    /// `CoreError::InvalidTransition` unless the record is `reviewed`.
    pub fn mark_imported(&self, id: &str) -> CoreResult<QuestionnaireSubmission> {
        self.advance(id, SubmissionStatus::Imported)
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` for a malformed id and
    /// `CoreError::NotFound` if no record has it.
    pub fn get(&self, id: &str) -> CoreResult<QuestionnaireSubmission> {
        let id = parse_submission_id(id)?;
        self.repo
            .get(&id)?
            .ok_or_else(|| CoreError::NotFound(format!("submission {id}")))
    }

    /// Lists submissions newest-first.
    ///
    /// The limit defaults to the configured page limit and is capped at the
    /// configured maximum.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if `limit` is zero.
    pub fn list(&self, query: SubmissionQuery) -> CoreResult<Page<QuestionnaireSubmission>> {
        let limit = match query.limit {
            Some(0) => {
                return Err(CoreError::InvalidInput(
                    "limit must be greater than zero".into(),
                ))
            }
            Some(n) => n.min(self.cfg.max_page_limit()),
            None => self.cfg.default_page_limit(),
        };

        self.repo.list(&SubmissionFilter {
            status: query.status,
            has_red_flags: query.has_red_flags,
            limit,
            offset: query.offset.unwrap_or(0),
        })
    }

    fn advance(&self, id: &str, next: SubmissionStatus) -> CoreResult<QuestionnaireSubmission> {
        let _guard = self.lock_writes()?;
        let mut record = self.get(id)?;
        let from = record.status;

        record.transition(next, Utc::now())?;
        self.repo.update(record.clone())?;

        tracing::info!("submission {} moved from {} to {}", record.id, from, next);
        Ok(record)
    }

    fn load_or_create(&self, session_id: SessionId) -> CoreResult<(QuestionnaireSubmission, bool)> {
        match self.repo.find_by_session(&session_id)? {
            Some(existing) => Ok((existing, false)),
            None => Ok((
                QuestionnaireSubmission::new_draft(session_id, Utc::now()),
                true,
            )),
        }
    }

    fn persist(&self, record: QuestionnaireSubmission, is_new: bool) -> CoreResult<()> {
        if is_new {
            self.repo.insert(record)
        } else {
            self.repo.update(record)
        }
    }

    fn lock_writes(&self) -> CoreResult<MutexGuard<'_, ()>> {
        self.writes.lock().map_err(|_| CoreError::LockPoisoned)
    }
}

/// Accepts only the canonical form: 32 lowercase hex characters.
fn parse_submission_id(id: &str) -> CoreResult<String> {
    let canonical = Uuid::parse_str(id)
        .ok()
        .map(|u| u.simple().to_string())
        .filter(|c| c == id);

    canonical.ok_or_else(|| CoreError::InvalidInput(format!("invalid submission id '{id}'")))
}
