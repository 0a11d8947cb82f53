//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! core services. Request handling never reads environment variables.

use crate::constants::{DEFAULT_PAGE_LIMIT, MAX_BATCH_CODES, MAX_PAGE_LIMIT};
use crate::{CoreError, CoreResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    default_page_limit: usize,
    max_page_limit: usize,
    max_batch_codes: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if any limit is zero or the default
    /// page limit exceeds the maximum page limit.
    pub fn new(
        default_page_limit: usize,
        max_page_limit: usize,
        max_batch_codes: usize,
    ) -> CoreResult<Self> {
        if default_page_limit == 0 || max_page_limit == 0 || max_batch_codes == 0 {
            return Err(CoreError::InvalidInput(
                "page and batch limits must be greater than zero".into(),
            ));
        }

        if default_page_limit > max_page_limit {
            return Err(CoreError::InvalidInput(format!(
                "default page limit {default_page_limit} exceeds maximum page limit {max_page_limit}"
            )));
        }

        Ok(Self {
            default_page_limit,
            max_page_limit,
            max_batch_codes,
        })
    }

    pub fn default_page_limit(&self) -> usize {
        self.default_page_limit
    }

    pub fn max_page_limit(&self) -> usize {
        self.max_page_limit
    }

    pub fn max_batch_codes(&self) -> usize {
        self.max_batch_codes
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: MAX_PAGE_LIMIT,
            max_batch_codes: MAX_BATCH_CODES,
        }
    }
}

/// Parse a limit from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns `default`.
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` naming `name` if the value is not a
/// non-negative integer.
pub fn limit_from_env_value(
    name: &str,
    value: Option<String>,
    default: usize,
) -> CoreResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(default),
        Some(v) => v.parse::<usize>().map_err(|_| {
            CoreError::InvalidInput(format!("{name} must be a non-negative integer, got {v:?}"))
        }),
    }
}
