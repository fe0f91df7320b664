use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of content a release covers, derived from its season and
/// episode numbers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// No season or episode information.
    #[default]
    Movie,
    /// Exactly one episode.
    Episode,
    /// Exactly one season and not exactly one episode.
    Season,
    /// Several seasons or episodes.
    Show,
}

impl MediaType {
    /// Derives the media type from the season and episode lists.
    #[must_use]
    pub fn from_numbers(seasons: &[u32], episodes: &[u32]) -> Self {
        match (seasons.len(), episodes.len()) {
            (_, 1) => Self::Episode,
            (1, _) => Self::Season,
            (0, 0) => Self::Movie,
            _ => Self::Show,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Episode => write!(f, "episode"),
            Self::Season => write!(f, "season"),
            Self::Show => write!(f, "show"),
        }
    }
}
