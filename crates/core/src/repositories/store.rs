//! Submission repository.
//!
//! The lifecycle service talks to storage only through
//! [`SubmissionRepository`], so a transactional datastore can replace the
//! in-memory implementation without touching request handling.

use crate::submission::{QuestionnaireSubmission, SubmissionStatus};
use crate::{CoreError, CoreResult};
use hysio_types::SessionId;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Filter and window applied when listing submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub status: Option<SubmissionStatus>,
    pub has_red_flags: Option<bool>,
    pub limit: usize,
    pub offset: usize,
}

impl SubmissionFilter {
    fn matches(&self, s: &QuestionnaireSubmission) -> bool {
        self.status.map_or(true, |status| s.status == status)
            && self
                .has_red_flags
                .map_or(true, |flagged| s.has_red_flags() == flagged)
    }
}

/// One page of a listing together with the number of matching records.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.items.len()) < self.total
    }
}

/// Storage for questionnaire submissions.
pub trait SubmissionRepository: Send + Sync {
    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if a record with the same id exists.
    fn insert(&self, submission: QuestionnaireSubmission) -> CoreResult<()>;

    /// Replaces an existing record.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if no record has the submission's id.
    fn update(&self, submission: QuestionnaireSubmission) -> CoreResult<()>;

    fn get(&self, id: &str) -> CoreResult<Option<QuestionnaireSubmission>>;

    /// Most recently stored record for a session.
    fn find_by_session(&self, session_id: &SessionId)
        -> CoreResult<Option<QuestionnaireSubmission>>;

    /// Matching records, newest first by [`QuestionnaireSubmission::sort_timestamp`].
    /// Records with equal timestamps are ordered most recently stored first.
    fn list(&self, filter: &SubmissionFilter) -> CoreResult<Page<QuestionnaireSubmission>>;
}

/// Process-local repository guarded by a read/write lock.
#[derive(Debug, Default)]
pub struct InMemorySubmissionRepository {
    // Insertion order.
    records: RwLock<Vec<QuestionnaireSubmission>>,
}

impl InMemorySubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> CoreResult<RwLockReadGuard<'_, Vec<QuestionnaireSubmission>>> {
        self.records.read().map_err(|_| CoreError::LockPoisoned)
    }

    fn write(&self) -> CoreResult<RwLockWriteGuard<'_, Vec<QuestionnaireSubmission>>> {
        self.records.write().map_err(|_| CoreError::LockPoisoned)
    }
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert(&self, submission: QuestionnaireSubmission) -> CoreResult<()> {
        let mut records = self.write()?;
        if records.iter().any(|r| r.id == submission.id) {
            return Err(CoreError::InvalidInput(format!(
                "submission {} already exists",
                submission.id
            )));
        }
        records.push(submission);
        Ok(())
    }

    fn update(&self, submission: QuestionnaireSubmission) -> CoreResult<()> {
        let mut records = self.write()?;
        match records.iter_mut().find(|r| r.id == submission.id) {
            Some(slot) => {
                *slot = submission;
                Ok(())
            }
            None => Err(CoreError::NotFound(format!("submission {}", submission.id))),
        }
    }

    fn get(&self, id: &str) -> CoreResult<Option<QuestionnaireSubmission>> {
        Ok(self.read()?.iter().find(|r| r.id == id).cloned())
    }

    fn find_by_session(
        &self,
        session_id: &SessionId,
    ) -> CoreResult<Option<QuestionnaireSubmission>> {
        Ok(self
            .read()?
            .iter()
            .rev()
            .find(|r| &r.session_id == session_id)
            .cloned())
    }

    fn list(&self, filter: &SubmissionFilter) -> CoreResult<Page<QuestionnaireSubmission>> {
        let records = self.read()?;

        // Reverse first so the stable sort leaves later insertions ahead on ties.
        let mut matching: Vec<&QuestionnaireSubmission> =
            records.iter().rev().filter(|r| filter.matches(r)).collect();
        matching.sort_by(|a, b| b.sort_timestamp().cmp(&a.sort_timestamp()));

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total,
            limit: filter.limit,
            offset: filter.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::red_flags::{RedFlag, Severity};
    use chrono::{Duration, TimeZone, Utc};

    fn record(session: &str, submitted_minute: Option<i64>) -> QuestionnaireSubmission {
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut s = QuestionnaireSubmission::new_draft(SessionId::new(session).unwrap(), base);
        if let Some(m) = submitted_minute {
            s.status = SubmissionStatus::Submitted;
            s.submitted_at = Some(base + Duration::minutes(m));
        }
        s
    }

    fn filter(limit: usize, offset: usize) -> SubmissionFilter {
        SubmissionFilter {
            status: None,
            has_red_flags: None,
            limit,
            offset,
        }
    }

    #[test]
    fn test_list_is_newest_first() {
        let repo = InMemorySubmissionRepository::new();
        // Inserted out of order: T2, T1, T3.
        repo.insert(record("t2", Some(2))).unwrap();
        repo.insert(record("t1", Some(1))).unwrap();
        repo.insert(record("t3", Some(3))).unwrap();

        let page = repo.list(&filter(10, 0)).unwrap();
        let sessions: Vec<_> = page.items.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(sessions, vec!["t3", "t2", "t1"]);
        assert_eq!(page.total, 3);
        assert!(!page.has_more());
    }

    #[test]
    fn test_ties_put_latest_insert_first() {
        let repo = InMemorySubmissionRepository::new();
        repo.insert(record("first", Some(5))).unwrap();
        repo.insert(record("second", Some(5))).unwrap();

        let page = repo.list(&filter(10, 0)).unwrap();
        assert_eq!(page.items[0].session_id.as_str(), "second");
    }

    #[test]
    fn test_pagination() {
        let repo = InMemorySubmissionRepository::new();
        for m in 0..5 {
            repo.insert(record(&format!("s{m}"), Some(m))).unwrap();
        }

        let page = repo.list(&filter(2, 1)).unwrap();
        let sessions: Vec<_> = page.items.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(sessions, vec!["s3", "s2"]);
        assert_eq!(page.total, 5);
        assert!(page.has_more());

        let past_end = repo.list(&filter(2, 10)).unwrap();
        assert!(past_end.items.is_empty());
        assert!(!past_end.has_more());
    }

    #[test]
    fn test_filters() {
        let repo = InMemorySubmissionRepository::new();
        repo.insert(record("draft", None)).unwrap();
        let mut flagged = record("flagged", Some(1));
        flagged.red_flags.push(RedFlag {
            id: "night_pain".into(),
            label: "Nachtelijke pijn".into(),
            severity: Severity::Medium,
            matched_text: "night_pain: ja".into(),
            field: "night_pain".into(),
        });
        repo.insert(flagged).unwrap();
        repo.insert(record("clean", Some(2))).unwrap();

        let mut f = filter(10, 0);
        f.status = Some(SubmissionStatus::Submitted);
        assert_eq!(repo.list(&f).unwrap().total, 2);

        f.has_red_flags = Some(true);
        let page = repo.list(&f).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].session_id.as_str(), "flagged");

        let mut f = filter(10, 0);
        f.has_red_flags = Some(false);
        assert_eq!(repo.list(&f).unwrap().total, 2);
    }

    #[test]
    fn test_insert_update_get() {
        let repo = InMemorySubmissionRepository::new();
        let mut s = record("a", None);
        repo.insert(s.clone()).unwrap();
        assert!(matches!(repo.insert(s.clone()), Err(CoreError::InvalidInput(_))));

        s.status = SubmissionStatus::Submitted;
        repo.update(s.clone()).unwrap();
        assert_eq!(
            repo.get(&s.id).unwrap().map(|r| r.status),
            Some(SubmissionStatus::Submitted)
        );

        let stranger = record("b", None);
        assert!(matches!(repo.update(stranger), Err(CoreError::NotFound(_))));
        assert!(repo.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_find_by_session_returns_latest() {
        let repo = InMemorySubmissionRepository::new();
        let older = record("same", Some(1));
        let newer = record("same", None);
        let newer_id = newer.id.clone();
        repo.insert(older).unwrap();
        repo.insert(newer).unwrap();

        let found = repo
            .find_by_session(&SessionId::new("same").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(found.id, newer_id);
    }
}
