use thiserror::Error;

/// Expected, per-candidate rejections raised by the [`Rtn`](crate::Rtn) facade.
///
/// Callers evaluating many candidates should skip the offending one and
/// keep going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GarbageRelease {
    /// The infohash does not have the expected length.
    #[error("infohash must be 40 characters long, got {length}")]
    InvalidHash {
        /// Length of the rejected hash.
        length: usize,
    },

    /// The parsed title is too far from the expected one.
    #[error("parsed title {parsed:?} does not match {expected:?}")]
    TitleMismatch {
        /// The canonical title the caller asked for.
        expected: String,
        /// The title extracted from the release name.
        parsed: String,
    },

    /// At least one fetch gate denied the release.
    #[error("release denied by fetch checks: {}", checks.join(", "))]
    FetchChecksFailed {
        /// Reason codes of every failed gate, in evaluation order.
        checks: Vec<String>,
    },

    /// The computed rank is below the configured minimum.
    #[error("rank {rank} is below the minimum of {minimum}")]
    RankUnderThreshold {
        /// Rank of the release.
        rank: i64,
        /// Configured minimum rank.
        minimum: i64,
    },
}

/// Errors that can occur during rtn operations.
#[derive(Debug, Error)]
pub enum RtnError {
    /// A call argument is malformed (empty string, out-of-range threshold).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The policy configuration could not be validated.
    #[error("invalid settings: {0}")]
    Validation(String),

    /// The candidate was rejected; see [`GarbageRelease`].
    #[error("garbage release {title:?}: {reason}")]
    Garbage {
        /// Raw title of the rejected release.
        title: String,
        /// Why it was rejected.
        #[source]
        reason: GarbageRelease,
    },

    /// The policy explicitly disables evaluation.
    #[error("ranking is disabled in settings")]
    SettingsDisabled,

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),
}

impl RtnError {
    pub(crate) fn garbage(title: impl Into<String>, reason: GarbageRelease) -> Self {
        Self::Garbage {
            title: title.into(),
            reason,
        }
    }

    /// Returns the rejection reason when this is a per-candidate rejection.
    #[must_use]
    pub fn garbage_reason(&self) -> Option<&GarbageRelease> {
        match self {
            Self::Garbage { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Returns `true` for recoverable per-candidate rejections.
    #[must_use]
    pub fn is_garbage(&self) -> bool {
        matches!(self, Self::Garbage { .. })
    }
}

impl From<serde_json::Error> for RtnError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type alias for rtn operations.
pub type Result<T> = std::result::Result<T, RtnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = RtnError::InvalidInput("raw title is empty".into());
        assert_eq!(err.to_string(), "invalid input: raw title is empty");

        let err = RtnError::garbage("Movie.2024", GarbageRelease::InvalidHash { length: 39 });
        assert!(err.to_string().contains("Movie.2024"));
        assert!(err.to_string().contains("39"));

        let err = GarbageRelease::FetchChecksFailed {
            checks: vec!["trash_quality".into(), "resolution".into()],
        };
        assert_eq!(
            err.to_string(),
            "release denied by fetch checks: trash_quality, resolution"
        );
    }

    #[test]
    fn garbage_reason_is_exposed() {
        let err = RtnError::garbage(
            "x",
            GarbageRelease::RankUnderThreshold {
                rank: -20000,
                minimum: -10000,
            },
        );
        assert!(err.is_garbage());
        assert!(matches!(
            err.garbage_reason(),
            Some(GarbageRelease::RankUnderThreshold { rank: -20000, .. })
        ));
        assert!(!RtnError::SettingsDisabled.is_garbage());
        assert!(RtnError::SettingsDisabled.garbage_reason().is_none());
    }

    #[test]
    fn serde_errors_become_validation_errors() {
        let err: RtnError = serde_json::from_str::<u32>("\"nope\"").unwrap_err().into();
        assert!(matches!(err, RtnError::Validation(_)));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RtnError>();
        assert_send_sync::<GarbageRelease>();
    }
}
