//! # Hysio Core
//!
//! Core business logic for the Hysio pre-intake and diagnosis-code service.
//!
//! This crate contains pure rule evaluation and the submission lifecycle:
//! - DCSPH code validation against a static knowledge base
//! - Red-flag detection over questionnaire answers
//! - HHSB mapping of answers into the four clinical note sections
//! - Questionnaire submissions behind an injectable repository
//!
//! **No API concerns**: HTTP servers, wire envelopes and CLI parsing belong in
//! `api-rest`, `api-shared` and `hysio-cli`.

pub mod answers;
pub mod config;
pub mod constants;
pub mod error;
pub mod hhsb;
pub mod knowledge_base;
pub mod red_flags;
pub mod repositories;
pub mod submission;
pub mod validation;

pub use answers::{AnswerValue, Answers};
pub use config::CoreConfig;
pub use error::{CoreError, CoreResult, FieldIssue};
pub use hhsb::{map_to_hhsb, HhsbDocument, HhsbEntry, HhsbSection};
pub use knowledge_base::DiagnosisCodeEntry;
pub use red_flags::{detect_red_flags, summarise, RedFlag, RedFlagSummary, Severity};
pub use repositories::store::{
    InMemorySubmissionRepository, Page, SubmissionFilter, SubmissionRepository,
};
pub use repositories::submissions::{SubmissionQuery, SubmissionService};
pub use submission::{QuestionnaireSubmission, SubmissionStatus};
pub use validation::{code_details, search_codes, validate_code, validate_codes, CodeDetails};
pub use validation::ValidationResult;

pub use hysio_types::{DcsphCode, SessionId};
