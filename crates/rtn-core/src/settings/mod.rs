//! # Policy settings
//!
//! A fully defaulted, validated configuration value. Every field at every
//! nesting level may be omitted from the input:
//!
//! ```
//! use rtn_core::settings::create_settings;
//!
//! let settings = create_settings(serde_json::json!({
//!     "resolutions": { "r2160p": true },
//!     "options": { "removeAllTrash": false },
//! }))
//! .unwrap();
//!
//! assert!(settings.resolutions.r2160p);
//! assert!(settings.resolutions.r1080p);
//! assert!(settings.options.remove_adult_content);
//! ```

pub mod custom;
pub mod pattern;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RtnError};
use crate::mapping::{Category, RankKey, language_group};
use crate::types::Resolution;

pub use custom::{CustomRank, CustomRanks, default_fetch};
pub use pattern::CompiledPattern;

/// Default minimum title similarity used by the facade.
pub const DEFAULT_TITLE_SIMILARITY: f64 = 0.85;

/// Default rank below which releases are discarded when trash removal is on.
pub const DEFAULT_MINIMUM_RANK: i64 = -10_000;

/// The complete acquisition policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// When `false`, the facade refuses to evaluate anything.
    pub enabled: bool,
    /// A match admits the release and bypasses the exclude patterns.
    pub require: Vec<CompiledPattern>,
    /// A match denies the release.
    pub exclude: Vec<CompiledPattern>,
    /// A match adds a flat bonus to the rank.
    pub preferred: Vec<CompiledPattern>,
    pub resolutions: ResolutionSettings,
    pub options: OptionsSettings,
    pub languages: LanguageSettings,
    pub custom_ranks: CustomRanks,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            require: Vec::new(),
            exclude: Vec::new(),
            preferred: Vec::new(),
            resolutions: ResolutionSettings::default(),
            options: OptionsSettings::default(),
            languages: LanguageSettings::default(),
            custom_ranks: CustomRanks::default(),
        }
    }
}

impl Settings {
    /// Builds settings from a partially specified nested value.
    ///
    /// # Errors
    ///
    /// Returns [`RtnError::Validation`] on a type mismatch, an unknown
    /// category or key, an invalid pattern, or an out-of-range threshold.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let value = if value.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            value
        };
        let settings: Self = serde_json::from_value(value)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Builds settings from JSON text.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::from_value`], plus malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Checks constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`RtnError::Validation`] if `titleSimilarity` is outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.options.title_similarity;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RtnError::Validation(format!(
                "options.titleSimilarity must be between 0 and 1, got {threshold}"
            )));
        }
        Ok(())
    }

    /// Looks up the override for `(category, key)`.
    #[must_use]
    pub fn custom_rank(&self, category: Category, key: RankKey) -> Option<&CustomRank> {
        self.custom_ranks.get(category, key)
    }

    /// Resolution tiers enabled by this policy, best first.
    #[must_use]
    pub fn enabled_resolutions(&self) -> Vec<Resolution> {
        Resolution::ALL
            .into_iter()
            .filter(|&res| self.resolutions.is_enabled(res))
            .collect()
    }
}

/// Shorthand for [`Settings::from_value`].
///
/// # Errors
///
/// Same as [`Settings::from_value`].
pub fn create_settings(partial: serde_json::Value) -> Result<Settings> {
    Settings::from_value(partial)
}

/// One enable flag per resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionSettings {
    pub r2160p: bool,
    pub r1080p: bool,
    pub r720p: bool,
    pub r480p: bool,
    pub r360p: bool,
    pub unknown: bool,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            r2160p: false,
            r1080p: true,
            r720p: true,
            r480p: false,
            r360p: false,
            unknown: true,
        }
    }
}

impl ResolutionSettings {
    #[must_use]
    pub fn is_enabled(&self, resolution: Resolution) -> bool {
        match resolution {
            Resolution::UHD2160 => self.r2160p,
            Resolution::FHD1080 => self.r1080p,
            Resolution::HD720 => self.r720p,
            Resolution::SD480 => self.r480p,
            Resolution::SD360 => self.r360p,
            Resolution::Unknown => self.unknown,
        }
    }
}

/// Global switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionsSettings {
    /// Minimum similarity between the parsed and the expected title.
    pub title_similarity: f64,
    pub remove_all_trash: bool,
    #[serde(alias = "removeRanksUnder")]
    pub minimum_rank: i64,
    pub remove_unknown_languages: bool,
    /// English releases pass the required and excluded language checks.
    #[serde(alias = "allowEnglishInLanguages")]
    pub allow_english_override: bool,
    pub remove_adult_content: bool,
}

impl Default for OptionsSettings {
    fn default() -> Self {
        Self {
            title_similarity: DEFAULT_TITLE_SIMILARITY,
            remove_all_trash: true,
            minimum_rank: DEFAULT_MINIMUM_RANK,
            remove_unknown_languages: false,
            allow_english_override: true,
            remove_adult_content: true,
        }
    }
}

/// Language code sets. Group names (`anime`, `non_anime`, `common`, `all`)
/// are expanded to their codes when the settings are built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "LanguageLists")]
pub struct LanguageSettings {
    pub required: Vec<String>,
    pub allowed: Vec<String>,
    pub exclude: Vec<String>,
    pub preferred: Vec<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct LanguageLists {
    required: Vec<String>,
    allowed: Vec<String>,
    exclude: Vec<String>,
    preferred: Vec<String>,
}

impl From<LanguageLists> for LanguageSettings {
    fn from(lists: LanguageLists) -> Self {
        Self {
            required: expand_languages(lists.required),
            allowed: expand_languages(lists.allowed),
            exclude: expand_languages(lists.exclude),
            preferred: expand_languages(lists.preferred),
        }
    }
}

fn expand_languages(codes: Vec<String>) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::with_capacity(codes.len());
    for code in codes {
        let members = match language_group(&code) {
            Some(group) => group.into_iter().map(str::to_string).collect(),
            None => vec![code],
        };
        for member in members {
            if !expanded.contains(&member) {
                expanded.push(member);
            }
        }
    }
    expanded
}
