//! Validated primitive types shared across the Hysio crates.
//!
//! Values of these types can only be built through their constructors, so any
//! `DcsphCode` or `SessionId` seen elsewhere in the workspace is already known
//! to be structurally sound.

/// Number of characters in a DCSPH code.
pub const DCSPH_CODE_LEN: usize = 4;

/// Maximum length of a client supplied session identifier.
pub const MAX_SESSION_ID_LEN: usize = 128;

/// Errors that can occur when creating validated types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// The input was empty or contained only whitespace
    #[error("value cannot be empty")]
    Empty,

    /// A DCSPH code did not have exactly four characters
    #[error("code must be exactly {DCSPH_CODE_LEN} digits (got {0} characters)")]
    CodeLength(usize),

    /// A DCSPH code contained something other than ASCII digits
    #[error("code may only contain digits 0-9")]
    CodeCharset,

    /// A session identifier was too long or used unsupported characters
    #[error("invalid session id: {0}")]
    SessionId(String),
}

/// A structurally valid DCSPH diagnosis code.
///
/// A DCSPH code is four ASCII digits. The first two identify the body
/// location, the last two the pathology. Whether the code actually exists is
/// a knowledge-base question and is not answered here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DcsphCode([u8; DCSPH_CODE_LEN]);

impl DcsphCode {
    /// Parses a code after trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::Empty`] for blank input, [`TypeError::CodeLength`]
    /// when the trimmed input is not four characters long and
    /// [`TypeError::CodeCharset`] when it contains a non-digit.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }

        let len = trimmed.chars().count();
        if len != DCSPH_CODE_LEN {
            return Err(TypeError::CodeLength(len));
        }

        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::CodeCharset);
        }

        let mut digits = [0u8; DCSPH_CODE_LEN];
        digits.copy_from_slice(trimmed.as_bytes());
        Ok(Self(digits))
    }

    /// The full code, e.g. `"7920"`.
    pub fn as_str(&self) -> &str {
        // Only ASCII digits are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// The two-digit body location prefix, e.g. `"79"`.
    pub fn location(&self) -> &str {
        &self.as_str()[..2]
    }

    /// The two-digit pathology suffix, e.g. `"20"`.
    pub fn pathology(&self) -> &str {
        &self.as_str()[2..]
    }
}

impl std::fmt::Display for DcsphCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DcsphCode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Identifier of a patient's pre-intake session.
///
/// Session ids come from the browser, so they are trimmed, bounded in length
/// and restricted to `A-Z a-z 0-9 - _`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new `SessionId` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::Empty`] if the trimmed input is empty, or
    /// [`TypeError::SessionId`] if it is too long or has unsupported characters.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }

        if trimmed.len() > MAX_SESSION_ID_LEN {
            return Err(TypeError::SessionId(format!(
                "exceeds maximum length of {MAX_SESSION_ID_LEN} characters"
            )));
        }

        let ok = trimmed
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_'));
        if !ok {
            return Err(TypeError::SessionId(
                "only alphanumeric, '-' and '_' characters are allowed".into(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for SessionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SessionId::new(&s).map_err(serde::de::Error::custom)
    }
}
