//! Submission storage and lifecycle services.
//!
//! `store` defines the repository interface and the in-memory implementation;
//! `submissions` holds the service that drives the questionnaire lifecycle on
//! top of any repository.

pub mod store;
pub mod submissions;
