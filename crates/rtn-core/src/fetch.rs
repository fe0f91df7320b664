//! # Fetch gates
//!
//! Decides whether a parsed release may be downloaded at all under a
//! [`Settings`] policy. Each gate is a pure function returning the reason
//! code of its denial; [`check_fetch`] runs them in a fixed order, either
//! stopping at the first denial (speed mode) or collecting every one
//! (exhaustive mode).
//!
//! Reason codes are stable strings: `trash_quality`, `trash_audio`,
//! `trash_flag`, `exclude_regex '<pattern>'`, `trash_adult`,
//! `unknown_language`, `missing_required_language`, `lang_<code>`,
//! `resolution`, `resolution_unknown`, and `<category>_<key>` for
//! attribute gates.

use serde::Serialize;

use crate::mapping::{SlotKind, TRASH_QUALITIES, is_trash_audio, slots};
use crate::settings::Settings;
use crate::settings::pattern::first_match;
use crate::types::{ParsedRelease, Resolution};

/// Outcome of [`check_fetch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchVerdict {
    pub admitted: bool,
    /// Reason codes in gate order; one entry at most in speed mode.
    pub failed_checks: Vec<String>,
}

impl FetchVerdict {
    fn admitted() -> Self {
        Self {
            admitted: true,
            failed_checks: Vec::new(),
        }
    }

    fn denied(failed_checks: Vec<String>) -> Self {
        Self {
            admitted: false,
            failed_checks,
        }
    }
}

type Gate = fn(&ParsedRelease, &Settings) -> Option<String>;

const TRASH_GATES: &[Gate] = &[trash_quality, trash_audio, trash_flag];

const POLICY_GATES: &[Gate] = &[adult, language, resolution];

/// Runs every fetch gate against `data`.
///
/// In speed mode the first denial wins and a matching `require` pattern
/// admits the release as soon as the trash gates have passed. In
/// exhaustive mode every gate runs; a `require` match only suppresses the
/// exclude gate.
///
/// Attribute denials are reported as `<category>_<key>`. Codecs live in the
/// `quality` category, so a denied AV1 codec reads `quality_av1`, never
/// `codec_av1`.
#[must_use]
pub fn check_fetch(data: &ParsedRelease, settings: &Settings, speed_mode: bool) -> FetchVerdict {
    let required = first_match(&settings.require, &data.raw_title).is_some();

    let verdict = if speed_mode {
        let trash = TRASH_GATES.iter().find_map(|gate| gate(data, settings));
        match trash {
            Some(reason) => FetchVerdict::denied(vec![reason]),
            None if required => FetchVerdict::admitted(),
            None => match policy_reasons(data, settings, false).next() {
                Some(reason) => FetchVerdict::denied(vec![reason]),
                None => FetchVerdict::admitted(),
            },
        }
    } else {
        let failed: Vec<String> = TRASH_GATES
            .iter()
            .filter_map(|gate| gate(data, settings))
            .chain(policy_reasons(data, settings, required))
            .collect();
        if failed.is_empty() {
            FetchVerdict::admitted()
        } else {
            FetchVerdict::denied(failed)
        }
    };

    tracing::debug!(
        title = %data.raw_title,
        required,
        admitted = verdict.admitted,
        failed = ?verdict.failed_checks,
        "fetch checks"
    );
    verdict
}

/// Exclude, adult, language, resolution and attribute gates, lazily.
fn policy_reasons<'a>(
    data: &'a ParsedRelease,
    settings: &'a Settings,
    skip_exclude: bool,
) -> impl Iterator<Item = String> + 'a {
    let excluded = if skip_exclude { None } else { exclude(data, settings) };
    excluded
        .into_iter()
        .chain(POLICY_GATES.iter().filter_map(move |gate| gate(data, settings)))
        .chain(
            slots(data)
                .into_iter()
                .filter(|(kind, _)| *kind != SlotKind::Channels)
                .filter(move |(_, key)| !settings.custom_ranks.entry(*key).fetch)
                .map(|(_, key)| key.reason()),
        )
}

fn trash_quality(data: &ParsedRelease, settings: &Settings) -> Option<String> {
    let trash = data.quality.is_some_and(|q| TRASH_QUALITIES.contains(&q));
    (settings.options.remove_all_trash && trash).then(|| "trash_quality".to_string())
}

fn trash_audio(data: &ParsedRelease, settings: &Settings) -> Option<String> {
    let trash = data.audio.iter().any(is_trash_audio);
    (settings.options.remove_all_trash && trash).then(|| "trash_audio".to_string())
}

fn trash_flag(data: &ParsedRelease, settings: &Settings) -> Option<String> {
    (settings.options.remove_all_trash && data.trash).then(|| "trash_flag".to_string())
}

fn exclude(data: &ParsedRelease, settings: &Settings) -> Option<String> {
    first_match(&settings.exclude, &data.raw_title)
        .map(|pattern| format!("exclude_regex '{}'", pattern.source()))
}

fn adult(data: &ParsedRelease, settings: &Settings) -> Option<String> {
    (settings.options.remove_adult_content && data.adult).then(|| "trash_adult".to_string())
}

fn language(data: &ParsedRelease, settings: &Settings) -> Option<String> {
    let policy = &settings.languages;
    let detected = &data.languages;

    if detected.is_empty() {
        if settings.options.remove_unknown_languages {
            return Some("unknown_language".into());
        }
        if !policy.required.is_empty() {
            return Some("missing_required_language".into());
        }
        return None;
    }

    let english_exempt =
        settings.options.allow_english_override && detected.iter().any(|code| code == "en");
    if english_exempt {
        return None;
    }

    if !policy.required.is_empty() && !detected.iter().any(|code| policy.required.contains(code)) {
        return Some("missing_required_language".into());
    }

    if detected.iter().any(|code| policy.allowed.contains(code)) {
        return None;
    }
    detected
        .iter()
        .find(|code| policy.exclude.contains(code))
        .map(|code| format!("lang_{code}"))
}

fn resolution(data: &ParsedRelease, settings: &Settings) -> Option<String> {
    if settings.resolutions.is_enabled(data.resolution) {
        return None;
    }
    Some(match data.resolution {
        Resolution::Unknown => "resolution_unknown".into(),
        _ => "resolution".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::create_settings;
    use crate::types::{AudioFormat, ChannelLayout, Quality, VideoCodec};
    use serde_json::json;

    fn clean() -> ParsedRelease {
        let mut data = ParsedRelease::new("The.Matrix.1999.1080p.BluRay.x264-GROUP");
        data.resolution = Resolution::FHD1080;
        data.quality = Some(Quality::BluRay);
        data.codec = Some(VideoCodec::AVC);
        data
    }

    fn settings(value: serde_json::Value) -> Settings {
        create_settings(value).unwrap()
    }

    #[test]
    fn clean_release_is_admitted() {
        let verdict = check_fetch(&clean(), &Settings::default(), true);
        assert_eq!(verdict, FetchVerdict::admitted());
        assert_eq!(check_fetch(&clean(), &Settings::default(), false), verdict);
    }

    #[test]
    fn trash_quality_denies() {
        let mut data = clean();
        data.quality = Some(Quality::CAM);
        let speed = check_fetch(&data, &Settings::default(), true);
        assert!(!speed.admitted);
        assert_eq!(speed.failed_checks, vec!["trash_quality"]);

        let all = check_fetch(&data, &Settings::default(), false);
        assert_eq!(all.failed_checks, vec!["trash_quality", "trash_cam"]);
    }

    #[test]
    fn trash_audio_and_flag() {
        let mut data = clean();
        data.audio = vec![AudioFormat::HQCleanAudio];
        data.trash = true;
        let all = check_fetch(&data, &Settings::default(), false);
        assert_eq!(all.failed_checks, vec!["trash_audio", "trash_flag", "trash_cleanAudio"]);
    }

    #[test]
    fn trash_gates_follow_remove_all_trash() {
        let mut data = clean();
        data.trash = true;
        let lenient = settings(json!({ "options": { "removeAllTrash": false } }));
        assert!(check_fetch(&data, &lenient, true).admitted);
    }

    #[test]
    fn attribute_gate_denies_without_trash_removal() {
        let mut data = clean();
        data.quality = Some(Quality::CAM);
        let lenient = settings(json!({ "options": { "removeAllTrash": false } }));
        let verdict = check_fetch(&data, &lenient, true);
        assert_eq!(verdict.failed_checks, vec!["trash_cam"]);
    }

    #[test]
    fn exclude_reports_the_pattern() {
        let policy = settings(json!({ "exclude": ["x264", "bluray"] }));
        let verdict = check_fetch(&clean(), &policy, true);
        assert_eq!(verdict.failed_checks, vec!["exclude_regex 'x264'"]);
    }

    #[test]
    fn slashed_exclude_reports_the_inner_regex() {
        let policy = settings(json!({ "exclude": ["/x264/"] }));
        let verdict = check_fetch(&clean(), &policy, true);
        assert_eq!(verdict.failed_checks, vec!["exclude_regex 'x264'"]);

        let policy = settings(json!({ "exclude": ["/X264/"] }));
        assert!(check_fetch(&clean(), &policy, true).admitted);
    }

    #[test]
    fn rank_only_override_admits_a_default_denied_key() {
        let mut data = clean();
        data.quality = Some(Quality::BluRayRemux);
        assert_eq!(
            check_fetch(&data, &Settings::default(), true).failed_checks,
            vec!["quality_remux"]
        );

        let policy = settings(json!({ "customRanks": { "quality": { "remux": { "rank": 5000 } } } }));
        assert!(check_fetch(&data, &policy, true).admitted);
    }

    #[test]
    fn required_match_admits_immediately_in_speed_mode() {
        let policy = settings(json!({ "require": ["matrix"], "exclude": ["x264"] }));
        let mut data = clean();
        data.codec = Some(VideoCodec::AV1);
        assert!(check_fetch(&data, &policy, true).admitted);

        let all = check_fetch(&data, &policy, false);
        assert!(!all.admitted);
        assert_eq!(all.failed_checks, vec!["quality_av1"]);
    }

    #[test]
    fn required_match_does_not_bypass_trash() {
        let policy = settings(json!({ "require": ["matrix"] }));
        let mut data = clean();
        data.trash = true;
        assert_eq!(check_fetch(&data, &policy, true).failed_checks, vec!["trash_flag"]);
    }

    #[test]
    fn adult_gate() {
        let mut data = clean();
        data.adult = true;
        assert_eq!(check_fetch(&data, &Settings::default(), true).failed_checks, vec!["trash_adult"]);
        let lenient = settings(json!({ "options": { "removeAdultContent": false } }));
        assert!(check_fetch(&data, &lenient, true).admitted);
    }

    #[test]
    fn unknown_language_gates() {
        let data = clean();
        let strict = settings(json!({ "options": { "removeUnknownLanguages": true } }));
        assert_eq!(check_fetch(&data, &strict, true).failed_checks, vec!["unknown_language"]);

        let required = settings(json!({ "languages": { "required": ["fr"] } }));
        assert_eq!(
            check_fetch(&data, &required, true).failed_checks,
            vec!["missing_required_language"]
        );
    }

    #[test]
    fn required_language_gate() {
        let policy = settings(json!({ "languages": { "required": ["fr"] } }));
        let mut data = clean();
        data.languages = vec!["de".into()];
        assert_eq!(check_fetch(&data, &policy, true).failed_checks, vec!["missing_required_language"]);

        data.languages = vec!["de".into(), "fr".into()];
        assert!(check_fetch(&data, &policy, true).admitted);
    }

    #[test]
    fn english_override() {
        let policy = settings(json!({ "languages": { "required": ["fr"], "exclude": ["en"] } }));
        let mut data = clean();
        data.languages = vec!["en".into()];
        assert!(check_fetch(&data, &policy, true).admitted);

        let strict = settings(json!({
            "languages": { "exclude": ["en"] },
            "options": { "allowEnglishOverride": false }
        }));
        assert_eq!(check_fetch(&data, &strict, true).failed_checks, vec!["lang_en"]);
    }

    #[test]
    fn excluded_language_unless_allowed() {
        let policy = settings(json!({ "languages": { "exclude": ["anime"] } }));
        let mut data = clean();
        data.languages = vec!["ja".into()];
        assert_eq!(check_fetch(&data, &policy, true).failed_checks, vec!["lang_ja"]);

        let allowing = settings(json!({ "languages": { "exclude": ["anime"], "allowed": ["ja"] } }));
        data.languages = vec!["ja".into(), "zh".into()];
        assert!(check_fetch(&data, &allowing, true).admitted);
    }

    #[test]
    fn resolution_gates() {
        let mut data = clean();
        data.resolution = Resolution::UHD2160;
        assert_eq!(check_fetch(&data, &Settings::default(), true).failed_checks, vec!["resolution"]);

        data.resolution = Resolution::Unknown;
        let no_unknown = settings(json!({ "resolutions": { "unknown": false } }));
        assert_eq!(
            check_fetch(&data, &no_unknown, true).failed_checks,
            vec!["resolution_unknown"]
        );
    }

    #[test]
    fn attribute_gates_use_category_reasons() {
        let mut data = clean();
        data.hdr = vec![crate::types::HdrFormat::DolbyVision];
        data.three_d = true;
        let all = check_fetch(&data, &Settings::default(), false);
        assert_eq!(all.failed_checks, vec!["hdr_dolbyVision", "extras_threeD"]);

        let allowing = settings(json!({
            "customRanks": { "hdr": { "dolbyVision": { "fetch": true } }, "extras": { "threeD": { "fetch": true } } }
        }));
        assert!(check_fetch(&data, &allowing, true).admitted);
    }

    #[test]
    fn channels_are_never_gated() {
        let mut data = clean();
        data.channels = vec![ChannelLayout::Mono];
        assert!(check_fetch(&data, &Settings::default(), true).admitted);
    }

    #[test]
    fn speed_mode_reports_first_failure_only() {
        let mut data = clean();
        data.resolution = Resolution::UHD2160;
        data.codec = Some(VideoCodec::AV1);
        data.adult = true;
        assert_eq!(check_fetch(&data, &Settings::default(), true).failed_checks, vec!["trash_adult"]);
        assert_eq!(
            check_fetch(&data, &Settings::default(), false).failed_checks,
            vec!["trash_adult", "resolution", "quality_av1"]
        );
    }
}
