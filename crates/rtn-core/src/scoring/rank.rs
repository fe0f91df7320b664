use crate::error::{Result, RtnError};
use crate::mapping::{RankKey, SlotKind, is_gated_flag, slots};
use crate::scoring::model::RankingModel;
use crate::settings::Settings;
use crate::settings::pattern::first_match;
use crate::types::ParsedRelease;

/// Added once when any `preferred` pattern matches the raw title.
pub const PREFERRED_PATTERN_BONUS: i64 = 10_000;

/// Added once when any detected language is in `languages.preferred`.
pub const PREFERRED_LANGUAGE_BONUS: i64 = 10_000;

/// Computes the additive desirability score of a parsed release.
///
/// Every attribute present on the release contributes its `customRanks`
/// override when one is set, else the model weight. Flag attributes other
/// than bit depth only count on releases carrying bit depth, HDR, season
/// or episode information.
///
/// # Errors
///
/// Returns [`RtnError::InvalidInput`] if `data.raw_title` is empty.
pub fn rank(data: &ParsedRelease, settings: &Settings, model: &RankingModel) -> Result<i64> {
    if data.raw_title.is_empty() {
        return Err(RtnError::InvalidInput("parsed data has no raw title".into()));
    }

    let mut total: i64 = 0;

    if let Some(pattern) = first_match(&settings.preferred, &data.raw_title) {
        tracing::trace!(%pattern, "preferred pattern matched");
        total = total.saturating_add(PREFERRED_PATTERN_BONUS);
    }
    if data
        .languages
        .iter()
        .any(|code| settings.languages.preferred.contains(code))
    {
        total = total.saturating_add(PREFERRED_LANGUAGE_BONUS);
    }

    let flags_scored = data.bit_depth.is_some() || !data.hdr.is_empty() || data.is_series();
    for (kind, key) in slots(data) {
        if let SlotKind::Flag(flag) = kind {
            if is_gated_flag(flag) && !flags_scored {
                continue;
            }
        }
        total = total.saturating_add(weight(settings, model, key));
    }

    tracing::debug!(title = %data.raw_title, rank = total, "ranked release");
    Ok(total)
}

/// Override from `customRanks`, else the model weight.
fn weight(settings: &Settings, model: &RankingModel, key: RankKey) -> i64 {
    settings
        .custom_rank(key.category(), key)
        .and_then(|custom| custom.rank)
        .unwrap_or_else(|| model.weight(key))
}
