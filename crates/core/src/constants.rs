//! Constants used throughout the Hysio core crate.
//!
//! Defaults and limits live here so the REST layer, the CLI and the tests all
//! agree on them.

/// Default listen address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Number of submissions returned when the client does not ask for a limit.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Upper bound on the submissions returned in one page.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Upper bound on the codes accepted by one batch validation request.
pub const MAX_BATCH_CODES: usize = 100;

/// Maximum number of alternative codes suggested for an invalid code.
pub const MAX_CODE_SUGGESTIONS: usize = 3;

/// Matched answer text longer than this is truncated in a red flag.
pub const MAX_MATCHED_TEXT_LEN: usize = 200;

/// Highest value on the numeric pain rating scale.
pub const MAX_PAIN_INTENSITY: f64 = 10.0;
