//! Language detection table.
//!
//! Spelled-out names match in any case; three-letter tags only in capitals
//! so that `Mar`, `Per` or `Ben` inside a title do not count.

use super::pipeline::{Rule, push_unique};
use crate::error::Result;

/// `(ISO 639-1 code, names, capitalised tags)`.
const LANGUAGES: &[(&str, &str, &str)] = &[
    ("en", "english", "ENG"),
    ("ja", "japanese", "JAP|JPN"),
    ("zh", "chinese|mandarin|cantonese", "CHI|CHS|CHT|ZHO"),
    ("ko", "korean", "KOR"),
    ("fr", "french|truefrench|vostfr|vff|vfq|vf2", "FRE|FRA"),
    ("es", "spanish|castellano|espa[ñn]ol|latino", "SPA|ESP|LAT"),
    ("pt", "portuguese|brazilian|dublado|legendado|pt-br", "POR|PTBR"),
    ("it", "italian", "ITA"),
    ("de", "german|deutsch", "GER|DEU"),
    ("ru", "russian", "RUS"),
    ("ua", "ukrainian", "UKR"),
    ("hi", "hindi", "HIN"),
    ("ta", "tamil", "TAM"),
    ("te", "telugu", "TEL"),
    ("ml", "malayalam", "MAL"),
    ("kn", "kannada", "KAN"),
    ("mr", "marathi", "MAR"),
    ("gu", "gujarati", "GUJ"),
    ("pa", "punjabi", "PAN"),
    ("ar", "arabic", "ARA"),
    ("tr", "turkish", "TUR"),
    ("pl", "polish|pldub|plsub", "POL"),
    ("nl", "dutch|flemish", "NLD|DUT"),
    ("sv", "swedish", "SWE"),
    ("no", "norwegian", "NOR"),
    ("da", "danish", "DAN"),
    ("fi", "finnish", "FIN"),
    ("cs", "czech", "CZE|CES"),
    ("sk", "slovak", "SLK|SLO"),
    ("hu", "hungarian", "HUN"),
    ("ro", "romanian", "RUM|RON"),
    ("bg", "bulgarian", "BUL"),
    ("sr", "serbian", "SRP"),
    ("hr", "croatian", "HRV"),
    ("sl", "slovenian", "SLV"),
    ("el", "greek", "GRE|ELL"),
    ("he", "hebrew", "HEB"),
    ("fa", "persian|farsi", "PER|FAS"),
    ("vi", "vietnamese", "VIE"),
    ("id", "indonesian", "IND"),
    ("ms", "malay", "MSA"),
    ("th", "thai", "THA"),
    ("lt", "lithuanian", "LIT"),
    ("lv", "latvian", "LAV"),
    ("et", "estonian", "EST"),
];

/// One rule per language, in table order. Every occurrence is claimed.
pub(crate) fn language_rules() -> Result<Vec<Rule>> {
    LANGUAGES
        .iter()
        .map(|&(code, names, tags)| {
            let pattern = format!(r"\b(?:(?i:{names})|{tags})\b");
            Ok(Rule::new("languages", &pattern, move |_, _, release| {
                push_unique(&mut release.languages, code.to_string());
                true
            })?
            .every()
            .tail_only())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::pipeline::ParseState;

    fn detect(input: &str) -> Vec<String> {
        language_rules()
            .unwrap()
            .iter()
            .fold(ParseState::new(input), |state, rule| rule.apply(state))
            .release
            .languages
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<&str> = LANGUAGES.iter().map(|(code, _, _)| *code).collect();
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), total);
    }

    #[test]
    fn names_match_in_any_case_after_the_title() {
        assert_eq!(detect("Movie\0 French"), vec!["fr"]);
        assert_eq!(detect("Movie\0 FRENCH.ENG"), vec!["en", "fr"]);
    }

    #[test]
    fn tags_need_capitals() {
        assert_eq!(detect("Movie\0 ITA"), vec!["it"]);
        assert!(detect("Movie\0 Ita").is_empty());
        assert!(detect("Mar Adentro").is_empty());
    }

    #[test]
    fn names_inside_the_title_are_ignored() {
        assert!(detect("The French Dispatch").is_empty());
    }
}
