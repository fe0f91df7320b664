//! Fold machinery behind [`ReleaseParser`](super::ReleaseParser).
//!
//! Each [`Rule`] consumes a [`ParseState`] and returns the next one. Rules
//! that accept a match may claim its span in the working copy so later
//! rules no longer see it. Claimed bytes are overwritten in place, which
//! keeps every byte offset valid for the rest of the pipeline.

use std::ops::Range;

use regex::{Captures, Regex};

use crate::error::Result;
use crate::types::ParsedRelease;

/// Marks the end of the title region in the working copy.
pub(crate) const TITLE_END: char = '\x00';

/// What happens to the span of an accepted match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Claim {
    /// Replace with [`TITLE_END`]; the title stops before this span.
    End,
    /// Replace with blanks; for tags that precede the title.
    Strip,
    /// Leave the text for later rules.
    Keep,
}

/// `(remaining, fields)` threaded through the rules.
#[derive(Debug)]
pub(crate) struct ParseState {
    pub(crate) remaining: String,
    pub(crate) release: ParsedRelease,
}

impl ParseState {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            remaining: input.to_string(),
            release: ParsedRelease::new(input),
        }
    }

    fn claim(&mut self, range: Range<usize>, claim: Claim) {
        let fill = match claim {
            Claim::End => TITLE_END,
            Claim::Strip => ' ',
            Claim::Keep => return,
        };
        let replacement: String = std::iter::repeat_n(fill, range.len()).collect();
        self.remaining.replace_range(range, &replacement);
    }
}

type Extract = Box<dyn Fn(&Captures<'_>, &str, &mut ParsedRelease) -> bool + Send + Sync>;

/// One extraction rule bound to one output field.
pub(crate) struct Rule {
    pub(crate) field: &'static str,
    pattern: Regex,
    extract: Extract,
    claim: Claim,
    group: usize,
    every: bool,
    tail_only: bool,
    skip_if: Option<fn(&ParsedRelease) -> bool>,
}

impl Rule {
    /// A rule that accepts the first match for which `extract` returns `true`
    /// and ends the title at it.
    pub(crate) fn new<F>(field: &'static str, pattern: &str, extract: F) -> Result<Self>
    where
        F: Fn(&Captures<'_>, &str, &mut ParsedRelease) -> bool + Send + Sync + 'static,
    {
        Ok(Self {
            field,
            pattern: Regex::new(pattern)?,
            extract: Box::new(extract),
            claim: Claim::End,
            group: 0,
            every: false,
            tail_only: false,
            skip_if: None,
        })
    }

    /// A boolean rule that sets a flag on the first match.
    pub(crate) fn flag(field: &'static str, pattern: &str, set: fn(&mut ParsedRelease)) -> Result<Self> {
        Self::new(field, pattern, move |_, _, release| {
            set(release);
            true
        })
    }

    pub(crate) fn claim(mut self, claim: Claim) -> Self {
        self.claim = claim;
        self
    }

    /// Claims capture `group` instead of the whole match.
    pub(crate) fn group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    /// Accepts every match instead of the first one.
    pub(crate) fn every(mut self) -> Self {
        self.every = true;
        self
    }

    /// Accepts a match only after the title has ended, or when it is
    /// written in capitals (`PROPER`, `FRENCH`).
    pub(crate) fn tail_only(mut self) -> Self {
        self.tail_only = true;
        self
    }

    pub(crate) fn skip_if(mut self, skip: fn(&ParsedRelease) -> bool) -> Self {
        self.skip_if = Some(skip);
        self
    }

    pub(crate) fn apply(&self, mut state: ParseState) -> ParseState {
        if self.skip_if.is_some_and(|skip| skip(&state.release)) {
            return state;
        }

        let mut claimed = Vec::new();
        for caps in self.pattern.captures_iter(&state.remaining) {
            let Some(span) = caps.get(self.group).or_else(|| caps.get(0)) else {
                continue;
            };
            if self.tail_only && !in_tail(&state.remaining, span.start(), span.as_str()) {
                continue;
            }
            if (self.extract)(&caps, &state.remaining, &mut state.release) {
                claimed.push(span.range());
                if !self.every {
                    break;
                }
            }
        }

        if !claimed.is_empty() {
            tracing::trace!(field = self.field, matches = claimed.len(), "rule matched");
        }
        for range in claimed {
            state.claim(range, self.claim);
        }
        state
    }
}

/// Byte offset where the title region ends.
pub(crate) fn title_end(remaining: &str) -> Option<usize> {
    remaining.find(TITLE_END)
}

fn in_tail(remaining: &str, start: usize, text: &str) -> bool {
    title_end(remaining).is_some_and(|end| end < start) || is_shouted(text)
}

fn is_shouted(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic()) && !text.chars().any(|c| c.is_lowercase())
}

/// Parses capture `index` as a number.
pub(crate) fn number(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

pub(crate) fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rule: &Rule, input: &str) -> ParseState {
        rule.apply(ParseState::new(input))
    }

    #[test]
    fn end_claim_terminates_title_region() {
        let rule = Rule::flag("proper", r"(?i)\bPROPER\b", |r| r.proper = true).unwrap();
        let state = run(&rule, "Movie.PROPER.x264");
        assert!(state.release.proper);
        assert_eq!(state.remaining, "Movie.\0\0\0\0\0\0.x264");
        assert_eq!(title_end(&state.remaining), Some(6));
    }

    #[test]
    fn strip_claim_blanks_span() {
        let rule = Rule::new("group", r"^\[([^\]]+)\]", |c, _, r| {
            r.group = Some(c[1].to_string());
            true
        })
        .unwrap()
        .claim(Claim::Strip);
        let state = run(&rule, "[Grp] Title");
        assert_eq!(state.release.group.as_deref(), Some("Grp"));
        assert_eq!(state.remaining, "      Title");
    }

    #[test]
    fn claims_keep_byte_length_with_multibyte_text() {
        let rule = Rule::flag("three_d", r"3D", |r| r.three_d = true).unwrap();
        let state = run(&rule, "Café 3D Ünïcode");
        assert_eq!(state.remaining.len(), "Café 3D Ünïcode".len());
        assert!(state.remaining.starts_with("Café \0\0"));
    }

    #[test]
    fn first_match_only_by_default() {
        let rule = Rule::new("seasons", r"S(\d+)", |c, _, r| {
            r.seasons.extend(number(c, 1));
            true
        })
        .unwrap();
        assert_eq!(run(&rule, "S1 S2").release.seasons, vec![1]);
        assert_eq!(run(&rule.every(), "S1 S2").release.seasons, vec![1, 2]);
    }

    #[test]
    fn rejected_matches_are_not_claimed() {
        let rule = Rule::new("year", r"\d{4}", |c, _, r| {
            let year: u16 = c[0].parse().unwrap_or(0);
            if year < 1900 {
                return false;
            }
            r.year = Some(year);
            true
        })
        .unwrap();
        let state = run(&rule, "0042 1999");
        assert_eq!(state.release.year, Some(1999));
        assert_eq!(state.remaining, "0042 \0\0\0\0");
    }

    #[test]
    fn tail_only_needs_title_end_or_capitals() {
        let rule = Rule::flag("proper", r"(?i)\bproper\b", |r| r.proper = true)
            .unwrap()
            .tail_only();
        assert!(!run(&rule, "A Proper Title").release.proper);
        assert!(run(&rule, "A Title PROPER").release.proper);
        assert!(run(&rule, "A Title\0 Proper").release.proper);
    }

    #[test]
    fn skip_if_short_circuits() {
        let rule = Rule::flag("proper", r"PROPER", |r| r.proper = true)
            .unwrap()
            .skip_if(|r| r.repack);
        let mut state = ParseState::new("PROPER");
        state.release.repack = true;
        let state = rule.apply(state);
        assert!(!state.release.proper);
        assert_eq!(state.remaining, "PROPER");
    }

    #[test]
    fn claim_group_only() {
        let rule = Rule::new("episodes", r" - (\d+) ", |c, _, r| {
            r.episodes.extend(number(c, 1));
            true
        })
        .unwrap()
        .group(1);
        let state = run(&rule, "Show - 24 (x)");
        assert_eq!(state.remaining, "Show - \0\0 (x)");
    }
}
