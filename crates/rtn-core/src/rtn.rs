//! # Ranking facade
//!
//! [`Rtn`] holds one resolved policy and ranking model and evaluates
//! candidates against them: parse, title similarity, fetch gates, rank.

use std::fmt;

use crate::error::{GarbageRelease, Result, RtnError};
use crate::fetch::check_fetch;
use crate::parser::ReleaseParser;
use crate::scoring::{RankingModel, rank};
use crate::settings::Settings;
use crate::similarity::{Aliases, lev_ratio};
use crate::sort::sort_releases;
use crate::types::{RankedRelease, Resolution};

/// Required length of a content hash.
pub const INFOHASH_LEN: usize = 40;

/// Per-call options for [`Rtn::rank_one`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankOptions {
    /// Canonical title the release is expected to carry.
    pub correct_title: Option<String>,
    /// Turn title mismatches, fetch denials and low ranks into errors.
    pub remove_trash: bool,
    /// Stop at the first failed fetch gate.
    pub speed_mode: bool,
    pub aliases: Aliases,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            correct_title: None,
            remove_trash: false,
            speed_mode: true,
            aliases: Aliases::new(),
        }
    }
}

impl RankOptions {
    #[must_use]
    pub fn with_correct_title(mut self, title: impl Into<String>) -> Self {
        self.correct_title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_remove_trash(mut self, remove_trash: bool) -> Self {
        self.remove_trash = remove_trash;
        self
    }

    #[must_use]
    pub fn with_speed_mode(mut self, speed_mode: bool) -> Self {
        self.speed_mode = speed_mode;
        self
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: Aliases) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Release-name ranking engine bound to one policy and ranking model.
pub struct Rtn {
    settings: Settings,
    model: RankingModel,
    parser: ReleaseParser,
    enabled_resolutions: Vec<Resolution>,
}

impl Rtn {
    /// Builds the engine, compiling the parser rules once.
    ///
    /// # Errors
    ///
    /// Returns `RtnError::RegexError` if a parser rule fails to compile.
    pub fn new(settings: Settings, model: RankingModel) -> Result<Self> {
        let enabled_resolutions = settings.enabled_resolutions();
        Ok(Self {
            settings,
            model,
            parser: ReleaseParser::new()?,
            enabled_resolutions,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn model(&self) -> &RankingModel {
        &self.model
    }

    /// Resolution tiers enabled by the policy, best first.
    #[must_use]
    pub fn enabled_resolutions(&self) -> &[Resolution] {
        &self.enabled_resolutions
    }

    /// Evaluates one candidate.
    ///
    /// # Errors
    ///
    /// - [`RtnError::SettingsDisabled`] when the policy is disabled.
    /// - [`RtnError::InvalidInput`] when `raw_title` or `infohash` is empty.
    /// - [`RtnError::Garbage`] for a hash that is not 40 characters long,
    ///   and, with `remove_trash`, for a title mismatch, a fetch denial or
    ///   a rank below `minimumRank`.
    pub fn rank_one(
        &self,
        raw_title: &str,
        infohash: &str,
        options: &RankOptions,
    ) -> Result<RankedRelease> {
        if !self.settings.enabled {
            return Err(RtnError::SettingsDisabled);
        }
        if raw_title.is_empty() || infohash.is_empty() {
            return Err(RtnError::InvalidInput(
                "both the title and the infohash must be provided".into(),
            ));
        }
        let length = infohash.chars().count();
        if length != INFOHASH_LEN {
            return Err(RtnError::garbage(raw_title, GarbageRelease::InvalidHash { length }));
        }

        let data = self.parser.parse(raw_title)?;

        let threshold = self.settings.options.title_similarity;
        let expected = options.correct_title.as_deref().filter(|title| !title.is_empty());
        let title_similarity = match expected {
            Some(correct) if !data.title.is_empty() => {
                lev_ratio(correct, &data.title, threshold, &options.aliases)?
            }
            _ => 0.0,
        };
        if let Some(expected) = expected {
            if options.remove_trash && title_similarity < threshold {
                return Err(RtnError::garbage(
                    raw_title,
                    GarbageRelease::TitleMismatch {
                        expected: expected.to_string(),
                        parsed: data.title.clone(),
                    },
                ));
            }
        }

        let verdict = check_fetch(&data, &self.settings, options.speed_mode);
        let score = rank(&data, &self.settings, &self.model)?;

        tracing::debug!(
            title = raw_title,
            rank = score,
            admitted = verdict.admitted,
            similarity = title_similarity,
            "ranked candidate"
        );

        if options.remove_trash {
            if !verdict.admitted {
                return Err(RtnError::garbage(
                    raw_title,
                    GarbageRelease::FetchChecksFailed {
                        checks: verdict.failed_checks,
                    },
                ));
            }
            let minimum = self.settings.options.minimum_rank;
            if score < minimum {
                return Err(RtnError::garbage(
                    raw_title,
                    GarbageRelease::RankUnderThreshold { rank: score, minimum },
                ));
            }
        }

        Ok(RankedRelease {
            infohash: infohash.to_string(),
            raw_title: raw_title.to_string(),
            data,
            rank: score,
            admitted: verdict.admitted,
            failed_checks: verdict.failed_checks,
            title_similarity,
        })
    }

    /// Ranks `(infohash, raw_title)` candidates, skipping rejected ones, and
    /// sorts the rest over the enabled resolution tiers.
    ///
    /// # Errors
    ///
    /// Propagates every error of [`Rtn::rank_one`] except per-candidate
    /// rejections.
    pub fn rank_many<I, H, T>(
        &self,
        candidates: I,
        bucket_limit: Option<usize>,
        options: &RankOptions,
    ) -> Result<Vec<RankedRelease>>
    where
        I: IntoIterator<Item = (H, T)>,
        H: AsRef<str>,
        T: AsRef<str>,
    {
        let mut ranked = Vec::new();
        for (infohash, raw_title) in candidates {
            match self.rank_one(raw_title.as_ref(), infohash.as_ref(), options) {
                Ok(release) => ranked.push(release),
                Err(err) if err.is_garbage() => {
                    tracing::debug!(error = %err, "skipping candidate");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(sort_releases(ranked, bucket_limit, &self.enabled_resolutions))
    }
}

impl fmt::Debug for Rtn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rtn")
            .field("settings", &self.settings)
            .field("model", &self.model)
            .field("enabled_resolutions", &self.enabled_resolutions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::create_settings;
    use serde_json::json;

    const HASH: &str = "c08a9ee8ce3a5c2c08865e2b05406273cabc97e7";
    const MATRIX: &str = "The.Matrix.1999.1080p.BluRay.x264-GROUP";

    fn rtn() -> Rtn {
        Rtn::new(Settings::default(), RankingModel::default()).unwrap()
    }

    fn rtn_with(settings: serde_json::Value) -> Rtn {
        Rtn::new(create_settings(settings).unwrap(), RankingModel::default()).unwrap()
    }

    fn garbage(err: RtnError) -> GarbageRelease {
        match err {
            RtnError::Garbage { reason, .. } => reason,
            other => panic!("expected a garbage release, got {other:?}"),
        }
    }

    #[test]
    fn ranks_a_clean_release() {
        let options = RankOptions::default()
            .with_correct_title("The Matrix")
            .with_remove_trash(true);
        let ranked = rtn().rank_one(MATRIX, HASH, &options).unwrap();
        assert_eq!(ranked.infohash, HASH);
        assert_eq!(ranked.raw_title, MATRIX);
        assert_eq!(ranked.data.title, "The Matrix");
        assert!(ranked.admitted);
        assert!(ranked.failed_checks.is_empty());
        assert_eq!(ranked.rank, 600);
        assert!((ranked.title_similarity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_is_zero_without_a_correct_title() {
        let ranked = rtn().rank_one(MATRIX, HASH, &RankOptions::default()).unwrap();
        assert_eq!(ranked.title_similarity, 0.0);
    }

    #[test]
    fn disabled_settings_win_over_everything() {
        let rtn = rtn_with(json!({ "enabled": false }));
        assert!(matches!(
            rtn.rank_one("", "short", &RankOptions::default()),
            Err(RtnError::SettingsDisabled)
        ));
    }

    #[test]
    fn empty_arguments_are_invalid() {
        let rtn = rtn();
        assert!(matches!(
            rtn.rank_one("", HASH, &RankOptions::default()),
            Err(RtnError::InvalidInput(_))
        ));
        assert!(matches!(
            rtn.rank_one(MATRIX, "", &RankOptions::default()),
            Err(RtnError::InvalidInput(_))
        ));
    }

    #[test]
    fn hash_length_is_checked() {
        let err = rtn().rank_one(MATRIX, &HASH[..39], &RankOptions::default()).unwrap_err();
        assert_eq!(garbage(err), GarbageRelease::InvalidHash { length: 39 });

        // only the length is validated
        let ranked = rtn().rank_one(MATRIX, &"z".repeat(40), &RankOptions::default());
        assert!(ranked.is_ok());
    }

    #[test]
    fn title_mismatch_only_with_remove_trash() {
        let options = RankOptions::default().with_correct_title("Inception");
        let ranked = rtn().rank_one(MATRIX, HASH, &options).unwrap();
        assert_eq!(ranked.title_similarity, 0.0);

        let err = rtn()
            .rank_one(MATRIX, HASH, &options.with_remove_trash(true))
            .unwrap_err();
        assert_eq!(
            garbage(err),
            GarbageRelease::TitleMismatch {
                expected: "Inception".into(),
                parsed: "The Matrix".into(),
            }
        );
    }

    #[test]
    fn aliases_rescue_the_title() {
        let mut aliases = Aliases::new();
        aliases.insert("us".into(), vec!["The Matrix".into()]);
        let options = RankOptions::default()
            .with_correct_title("Matrix")
            .with_aliases(aliases)
            .with_remove_trash(true);
        assert!(rtn().rank_one(MATRIX, HASH, &options).is_ok());
    }

    #[test]
    fn fetch_denial_is_reported_or_raised() {
        let cam = "Movie.2024.HDCAM.x264-NoGrp";
        let ranked = rtn().rank_one(cam, HASH, &RankOptions::default()).unwrap();
        assert!(!ranked.admitted);
        assert_eq!(ranked.failed_checks, vec!["trash_quality"]);

        let err = rtn()
            .rank_one(cam, HASH, &RankOptions::default().with_remove_trash(true))
            .unwrap_err();
        assert!(matches!(garbage(err), GarbageRelease::FetchChecksFailed { checks } if checks == ["trash_quality"]));
    }

    #[test]
    fn cam_without_trash_removal_hits_the_cam_gate() {
        let rtn = rtn_with(json!({ "options": { "removeAllTrash": false } }));
        let ranked = rtn
            .rank_one("Movie.2024.HDCAM.x264-NoGrp", HASH, &RankOptions::default())
            .unwrap();
        assert!(!ranked.admitted);
        assert!(ranked.failed_checks.contains(&"trash_cam".to_string()));
    }

    #[test]
    fn required_pattern_overrides_resolution() {
        let title = "Movie.2020.2160p.WEB-DL.x264-GRP";
        let denied = rtn().rank_one(title, HASH, &RankOptions::default()).unwrap();
        assert_eq!(denied.failed_checks, vec!["resolution"]);

        let rtn = rtn_with(json!({ "require": ["2160p"] }));
        assert!(rtn.rank_one(title, HASH, &RankOptions::default()).unwrap().admitted);
    }

    #[test]
    fn rank_under_threshold() {
        let rtn = rtn_with(json!({ "options": { "minimumRank": 1000 } }));
        let options = RankOptions::default().with_remove_trash(true);
        let err = rtn.rank_one(MATRIX, HASH, &options).unwrap_err();
        assert_eq!(
            garbage(err),
            GarbageRelease::RankUnderThreshold { rank: 600, minimum: 1000 }
        );
    }

    #[test]
    fn rank_override_alone_unblocks_remux() {
        let title = "Movie.2020.1080p.BluRay.REMUX.AVC-GRP";
        let denied = rtn().rank_one(title, HASH, &RankOptions::default()).unwrap();
        assert!(!denied.admitted);

        let rtn = rtn_with(json!({ "customRanks": { "quality": { "remux": { "rank": 5000 } } } }));
        let ranked = rtn.rank_one(title, HASH, &RankOptions::default()).unwrap();
        assert!(ranked.admitted);
        assert!(ranked.failed_checks.is_empty());
        assert_eq!(ranked.rank, 5500);
    }

    #[test]
    fn remux_outranks_bluray() {
        let rtn = rtn();
        let options = RankOptions::default();
        let bluray = rtn.rank_one("Movie.2020.1080p.BluRay.x264-GRP", HASH, &options).unwrap();
        let remux = rtn
            .rank_one("Movie.2020.1080p.BluRay.REMUX.x264-GRP", HASH, &options)
            .unwrap();
        assert!(remux.rank > bluray.rank);
    }

    #[test]
    fn three_d_lowers_a_series_rank() {
        let rtn = rtn();
        let options = RankOptions::default();
        let flat = rtn.rank_one("Show.S01E01.1080p.BluRay.x264-GRP", HASH, &options).unwrap();
        let three_d = rtn
            .rank_one("Show.S01E01.3D.1080p.BluRay.x264-GRP", HASH, &options)
            .unwrap();
        assert!(three_d.data.three_d);
        assert!(three_d.rank < flat.rank);
    }

    #[test]
    fn preferred_bonuses_stack() {
        let title = "Amelie.2001.FRENCH.1080p.BluRay.x264-GRP";
        let plain = rtn().rank_one(title, HASH, &RankOptions::default()).unwrap();
        let preferring = rtn_with(json!({
            "preferred": ["bluray"],
            "languages": { "preferred": ["fr"] }
        }));
        let boosted = preferring.rank_one(title, HASH, &RankOptions::default()).unwrap();
        assert!(boosted.rank - plain.rank >= 20_000);
    }

    #[test]
    fn rank_many_skips_garbage_and_sorts() {
        let rtn = rtn();
        let candidates = [
            ("a".repeat(40), "Movie.2020.720p.WEB-DL.x264-GRP".to_string()),
            ("b".repeat(40), "Movie.2020.1080p.BluRay.x264-GRP".to_string()),
            ("short".to_string(), "Movie.2020.1080p.WEB-DL.x264-GRP".to_string()),
            ("c".repeat(40), "Movie.2020.2160p.BluRay.x264-GRP".to_string()),
        ];
        let ranked = rtn.rank_many(candidates, None, &RankOptions::default()).unwrap();
        let order: Vec<char> = ranked
            .iter()
            .filter_map(|r| r.infohash.chars().next())
            .collect();
        assert_eq!(order, vec!['b', 'a']);
    }

    #[test]
    fn rank_many_propagates_disabled_settings() {
        let rtn = rtn_with(json!({ "enabled": false }));
        let result = rtn.rank_many([(HASH, MATRIX)], None, &RankOptions::default());
        assert!(matches!(result, Err(RtnError::SettingsDisabled)));
    }

    #[test]
    fn engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Rtn>();
        assert_send_sync::<Settings>();
        assert_send_sync::<RankingModel>();
    }
}
