use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mapping::RankKey;

/// Default ranking weights. Keys not listed weigh `0`.
pub const DEFAULT_WEIGHTS: &[(RankKey, i64)] = &[
    // quality
    (RankKey::Av1, 500),
    (RankKey::Avc, 500),
    (RankKey::Bluray, 100),
    (RankKey::Dvd, -5000),
    (RankKey::Hdtv, -5000),
    (RankKey::Hevc, 500),
    (RankKey::Mpeg, -1000),
    (RankKey::Remux, 10000),
    (RankKey::Vhs, -10000),
    (RankKey::Web, 100),
    (RankKey::WebDl, 200),
    (RankKey::WebMux, -10000),
    (RankKey::Xvid, -10000),
    (RankKey::Pdtv, -10000),
    // rips
    (RankKey::BdRip, -5000),
    (RankKey::BrRip, -10000),
    (RankKey::DvdRip, -5000),
    (RankKey::HdRip, -10000),
    (RankKey::PpvRip, -10000),
    (RankKey::SatRip, -10000),
    (RankKey::TvRip, -10000),
    (RankKey::UhdRip, -5000),
    (RankKey::VhsRip, -10000),
    (RankKey::WebDlRip, -10000),
    (RankKey::WebRip, -1000),
    // hdr
    (RankKey::Bit10, 100),
    (RankKey::DolbyVision, 3000),
    (RankKey::Hdr, 2000),
    (RankKey::Hdr10Plus, 2100),
    // audio
    (RankKey::Aac, 100),
    (RankKey::Atmos, 1000),
    (RankKey::DolbyDigital, 50),
    (RankKey::DolbyDigitalPlus, 150),
    (RankKey::DtsLossy, 100),
    (RankKey::DtsLossless, 2000),
    (RankKey::Mp3, -1000),
    (RankKey::TrueHd, 2000),
    // extras
    (RankKey::ThreeD, -10000),
    (RankKey::Converted, -1000),
    (RankKey::Documentary, -250),
    (RankKey::Dubbed, -1000),
    (RankKey::Edition, 100),
    (RankKey::Proper, 20),
    (RankKey::Repack, 20),
    (RankKey::Site, -10000),
    (RankKey::Upscaled, -10000),
    // trash
    (RankKey::Cam, -10000),
    (RankKey::CleanAudio, -10000),
    (RankKey::R5, -10000),
    (RankKey::Screener, -10000),
    (RankKey::Size, -10000),
    (RankKey::Telecine, -10000),
    (RankKey::Telesync, -10000),
];

/// Flat map from attribute key to signed weight.
///
/// Independent of [`Settings`](crate::settings::Settings); per-key
/// overrides in `customRanks` take precedence over these weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankingModel {
    weights: BTreeMap<RankKey, i64>,
}

impl Default for RankingModel {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS.iter().copied().collect(),
        }
    }
}

impl RankingModel {
    /// A model where every key weighs `0`.
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Weight of `key`, `0` when unset.
    #[must_use]
    pub fn weight(&self, key: RankKey) -> i64 {
        self.weights.get(&key).copied().unwrap_or(0)
    }

    /// Sets one weight, returning the updated model.
    #[must_use]
    pub fn with_weight(mut self, key: RankKey, weight: i64) -> Self {
        self.weights.insert(key, weight);
        self
    }

    /// Parses a flat `{ "key": weight }` map. Missing keys weigh `0`.
    ///
    /// # Errors
    ///
    /// Returns [`RtnError::Validation`](crate::RtnError::Validation) on an
    /// unknown key or a non-integer weight.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
