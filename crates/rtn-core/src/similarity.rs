//! Fuzzy title agreement between a parsed title and an expected one.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, RtnError};
use crate::normalize::normalize;

/// Alternative titles grouped by an arbitrary key (usually a country or
/// language code), as supplied by a metadata lookup.
pub type Aliases = BTreeMap<String, Vec<String>>;

/// Returns the best Levenshtein ratio between `parsed_title` and the
/// expected title or any of its aliases, or `0.0` when it falls below
/// `threshold`.
///
/// The ratio is `1 - distance / max(len)` over normalized titles.
///
/// # Errors
///
/// Returns [`RtnError::InvalidInput`] when either title is empty or when
/// `threshold` is outside `[0, 1]`.
pub fn lev_ratio(
    correct_title: &str,
    parsed_title: &str,
    threshold: f64,
    aliases: &Aliases,
) -> Result<f64> {
    if correct_title.is_empty() || parsed_title.is_empty() {
        return Err(RtnError::InvalidInput(
            "both titles must be provided".into(),
        ));
    }
    if !(0.0..=1.0).contains(&threshold) {
        return Err(RtnError::InvalidInput(format!(
            "threshold must be between 0 and 1, got {threshold}"
        )));
    }

    let parsed = normalize(parsed_title);
    let candidates: BTreeSet<String> = std::iter::once(normalize(correct_title))
        .chain(aliases.values().flatten().map(|alias| normalize(alias)))
        .collect();

    let best = candidates
        .iter()
        .map(|candidate| ratio(candidate, &parsed))
        .fold(0.0_f64, f64::max);

    Ok(if best >= threshold { best } else { 0.0 })
}

/// Returns `true` when [`lev_ratio`] reaches `threshold`.
///
/// # Errors
///
/// Same as [`lev_ratio`].
pub fn title_match(
    correct_title: &str,
    parsed_title: &str,
    threshold: f64,
    aliases: &Aliases,
) -> Result<bool> {
    Ok(lev_ratio(correct_title, parsed_title, threshold, aliases)? >= threshold)
}

fn ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - strsim::levenshtein(a, b) as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_aliases() -> Aliases {
        Aliases::new()
    }

    #[test]
    fn identical_titles_score_one() {
        let r = lev_ratio("The Simpsons", "The Simpsons", 0.85, &no_aliases()).unwrap();
        assert_eq!(r, 1.0);
    }

    #[test]
    fn below_threshold_is_clamped_to_zero() {
        let r = lev_ratio("The Simpsons", "The Simpsons Movie", 0.85, &no_aliases()).unwrap();
        assert_eq!(r, 0.0);
    }

    #[test]
    fn comparison_uses_normalized_forms() {
        let r = lev_ratio("Amélie", "amelie", 0.85, &no_aliases()).unwrap();
        assert_eq!(r, 1.0);
        let r = lev_ratio("The.Office", "the office", 0.85, &no_aliases()).unwrap();
        assert_eq!(r, 1.0);
    }

    #[test]
    fn aliases_raise_the_best_ratio() {
        let mut aliases = Aliases::new();
        aliases.insert("jp".into(), vec!["Shingeki no Kyojin".into()]);
        aliases.insert("fr".into(), vec!["L'Attaque des Titans".into()]);

        let without = lev_ratio("Attack on Titan", "Shingeki no Kyojin", 0.85, &no_aliases()).unwrap();
        assert_eq!(without, 0.0);

        let with = lev_ratio("Attack on Titan", "Shingeki no Kyojin", 0.85, &aliases).unwrap();
        assert_eq!(with, 1.0);
    }

    #[test]
    fn ratio_is_partial_above_threshold() {
        let r = lev_ratio("The Simpsons", "The Simpson", 0.85, &no_aliases()).unwrap();
        assert!(r > 0.9 && r < 1.0, "ratio={r}");
    }

    #[test]
    fn empty_titles_fail() {
        assert!(matches!(
            lev_ratio("", "x", 0.5, &no_aliases()),
            Err(RtnError::InvalidInput(_))
        ));
        assert!(matches!(
            lev_ratio("x", "", 0.5, &no_aliases()),
            Err(RtnError::InvalidInput(_))
        ));
    }

    #[test]
    fn threshold_out_of_range_fails() {
        assert!(lev_ratio("a", "b", -1.0, &no_aliases()).is_err());
        assert!(lev_ratio("a", "b", 2.0, &no_aliases()).is_err());
        assert!(lev_ratio("a", "b", f64::NAN, &no_aliases()).is_err());
    }

    #[test]
    fn title_match_follows_threshold() {
        assert!(title_match("The Simpsons", "The Simpsons", 0.85, &no_aliases()).unwrap());
        assert!(!title_match("The Simpsons", "Futurama", 0.85, &no_aliases()).unwrap());
        assert!(title_match("The Simpsons", "Futurama", 0.0, &no_aliases()).unwrap());
    }
}
