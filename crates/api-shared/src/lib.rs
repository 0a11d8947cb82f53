//! # API Shared
//!
//! Shared definitions for the Hysio APIs.
//!
//! Contains:
//! - Wire request/response types (`wire` module)
//! - The uniform error envelope (`error` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the CLI for common functionality.

pub mod error;
pub mod health;
pub mod wire;

pub use error::{ErrorEnvelope, ErrorKind};
pub use health::HealthService;
pub use wire::*;
