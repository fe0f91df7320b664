//! Ordering and per-tier capping of ranked candidates.

use std::collections::HashMap;

use crate::types::{RankedRelease, Resolution};

/// Orders `results` best first and caps each resolution tier.
///
/// Candidates outside `allowed` are dropped unless `allowed` is empty. The
/// rest are sorted by resolution tier, then rank, both descending; ties keep
/// their input order. With a `bucket_limit`, at most that many candidates
/// survive per tier.
#[must_use]
pub fn sort_releases(
    results: Vec<RankedRelease>,
    bucket_limit: Option<usize>,
    allowed: &[Resolution],
) -> Vec<RankedRelease> {
    let mut sorted: Vec<RankedRelease> = results
        .into_iter()
        .filter(|release| allowed.is_empty() || allowed.contains(&release.data.resolution))
        .collect();

    sorted.sort_by(|a, b| {
        b.data
            .resolution
            .cmp(&a.data.resolution)
            .then_with(|| b.rank.cmp(&a.rank))
    });

    let Some(limit) = bucket_limit else {
        return sorted;
    };

    let mut buckets: HashMap<Resolution, usize> = HashMap::new();
    sorted.retain(|release| {
        let count = buckets.entry(release.data.resolution).or_default();
        *count += 1;
        *count <= limit
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParsedRelease;

    fn ranked(hash: char, resolution: Resolution, rank: i64) -> RankedRelease {
        let mut data = ParsedRelease::new(format!("release-{hash}"));
        data.resolution = resolution;
        RankedRelease {
            infohash: hash.to_string().repeat(40),
            raw_title: data.raw_title.clone(),
            data,
            rank,
            admitted: true,
            failed_checks: Vec::new(),
            title_similarity: 0.0,
        }
    }

    fn hashes(releases: &[RankedRelease]) -> String {
        releases
            .iter()
            .map(|r| r.infohash.chars().next().unwrap_or('?'))
            .collect()
    }

    #[test]
    fn higher_tier_wins_regardless_of_rank() {
        let sorted = sort_releases(
            vec![
                ranked('a', Resolution::HD720, 9_000),
                ranked('b', Resolution::UHD2160, -500),
                ranked('c', Resolution::FHD1080, 10),
            ],
            None,
            &[],
        );
        assert_eq!(hashes(&sorted), "bca");
    }

    #[test]
    fn rank_breaks_ties_within_a_tier() {
        let sorted = sort_releases(
            vec![
                ranked('a', Resolution::FHD1080, 1),
                ranked('b', Resolution::FHD1080, 3),
                ranked('c', Resolution::FHD1080, 2),
                ranked('d', Resolution::FHD1080, 3),
            ],
            None,
            &[],
        );
        assert_eq!(hashes(&sorted), "bdca");
    }

    #[test]
    fn bucket_limit_keeps_best_per_tier() {
        let sorted = sort_releases(
            vec![
                ranked('a', Resolution::FHD1080, 100),
                ranked('b', Resolution::FHD1080, 300),
                ranked('c', Resolution::FHD1080, 200),
                ranked('d', Resolution::HD720, 50),
            ],
            Some(2),
            &[],
        );
        assert_eq!(hashes(&sorted), "bcd");
    }

    #[test]
    fn zero_bucket_limit_drops_everything() {
        let sorted = sort_releases(vec![ranked('a', Resolution::FHD1080, 1)], Some(0), &[]);
        assert!(sorted.is_empty());
    }

    #[test]
    fn filters_by_allowed_resolutions() {
        let sorted = sort_releases(
            vec![
                ranked('a', Resolution::UHD2160, 1),
                ranked('b', Resolution::FHD1080, 1),
                ranked('c', Resolution::Unknown, 1),
            ],
            None,
            &[Resolution::FHD1080, Resolution::Unknown],
        );
        assert_eq!(hashes(&sorted), "bc");
    }
}
