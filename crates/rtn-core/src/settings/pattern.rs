use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RtnError};

/// A user pattern compiled once at settings construction.
///
/// `/inner/` (longer than two characters) compiles `inner` case-sensitively;
/// any other text compiles as a case-insensitive regex over the whole string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompiledPattern {
    raw: String,
    regex: Regex,
}

impl CompiledPattern {
    /// Compiles a raw pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`RtnError::Validation`] if the pattern is not a valid regex.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let (source, case_insensitive) = match raw.strip_prefix('/').and_then(|s| s.strip_suffix('/')) {
            Some(inner) if raw.len() > 2 => (inner, false),
            _ => (raw.as_str(), true),
        };
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| RtnError::Validation(format!("invalid pattern {raw:?}: {e}")))?;
        Ok(Self { raw, regex })
    }

    /// The pattern as written in the settings.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The source the regex was compiled from (without slashes).
    #[must_use]
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl TryFrom<String> for CompiledPattern {
    type Error = RtnError;

    fn try_from(raw: String) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<CompiledPattern> for String {
    fn from(pattern: CompiledPattern) -> Self {
        pattern.raw
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Returns the first pattern matching `haystack`.
pub(crate) fn first_match<'a>(patterns: &'a [CompiledPattern], haystack: &str) -> Option<&'a CompiledPattern> {
    patterns.iter().find(|p| p.is_match(haystack))
}
