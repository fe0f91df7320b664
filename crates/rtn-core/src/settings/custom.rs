use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::mapping::{Category, RankKey};

/// Per-key override of the fetch decision and ranking weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRank {
    /// Whether releases carrying this attribute may be fetched.
    #[serde(alias = "fetchAllowed", default = "fetch_allowed")]
    pub fetch: bool,
    /// Replaces the ranking model's weight when set.
    #[serde(alias = "rankOverride")]
    pub rank: Option<i64>,
}

impl CustomRank {
    #[must_use]
    pub const fn new(fetch: bool) -> Self {
        Self { fetch, rank: None }
    }
}

fn fetch_allowed() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CustomRankPatch {
    #[serde(alias = "fetchAllowed")]
    fetch: Option<bool>,
    #[serde(alias = "rankOverride")]
    rank: Option<i64>,
}

/// Whether a key may be fetched when the user did not say otherwise.
#[must_use]
pub fn default_fetch(key: RankKey) -> bool {
    use RankKey::*;

    !matches!(
        key,
        Av1 | Dvd
            | Mpeg
            | Remux
            | Vhs
            | WebMux
            | Xvid
            | BdRip
            | DvdRip
            | PpvRip
            | SatRip
            | TvRip
            | UhdRip
            | VhsRip
            | WebDlRip
            | DolbyVision
            | Mono
            | Mp3
            | ThreeD
            | Converted
            | Documentary
            | Site
            | Upscaled
            | Cam
            | CleanAudio
            | Pdtv
            | R5
            | Screener
            | Size
            | Telecine
            | Telesync
    )
}

/// Every `(category, key)` of the taxonomy with its effective [`CustomRank`].
///
/// Deserialization merges a partial `category -> key -> {fetch, rank}` map
/// over the defaults. A listed entry replaces the default one and its
/// `fetch` defaults to `true`; unlisted keys keep their per-key default.
/// Keys outside their category are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomRanks {
    entries: BTreeMap<RankKey, CustomRank>,
}

impl Default for CustomRanks {
    fn default() -> Self {
        Self {
            entries: RankKey::ALL
                .iter()
                .map(|&key| (key, CustomRank::new(default_fetch(key))))
                .collect(),
        }
    }
}

impl CustomRanks {
    /// Direct nested lookup. `None` when `key` does not belong to `category`.
    #[must_use]
    pub fn get(&self, category: Category, key: RankKey) -> Option<&CustomRank> {
        if key.category() != category {
            return None;
        }
        self.entries.get(&key)
    }

    /// Lookup by key alone; every key has an entry.
    #[must_use]
    pub fn entry(&self, key: RankKey) -> CustomRank {
        self.entries
            .get(&key)
            .copied()
            .unwrap_or(CustomRank::new(default_fetch(key)))
    }

    /// Replaces one entry, returning the updated set.
    #[must_use]
    pub fn with(mut self, key: RankKey, rank: CustomRank) -> Self {
        self.entries.insert(key, rank);
        self
    }
}

impl Serialize for CustomRanks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut nested: BTreeMap<Category, BTreeMap<RankKey, CustomRank>> = BTreeMap::new();
        for (&key, &rank) in &self.entries {
            nested.entry(key.category()).or_default().insert(key, rank);
        }
        nested.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CustomRanks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let patches = BTreeMap::<Category, BTreeMap<RankKey, CustomRankPatch>>::deserialize(deserializer)?;
        let mut ranks = Self::default();
        for (category, keys) in patches {
            for (key, patch) in keys {
                if key.category() != category {
                    return Err(D::Error::custom(format!(
                        "{key} is not a {category} key"
                    )));
                }
                ranks.entries.insert(
                    key,
                    CustomRank {
                        fetch: patch.fetch.unwrap_or(true),
                        rank: patch.rank,
                    },
                );
            }
        }
        Ok(ranks)
    }
}
