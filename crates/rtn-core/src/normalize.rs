//! Title folding into a canonical comparison form.

use unicode_normalization::UnicodeNormalization;

/// Normalizes a title for comparison, lowercasing it.
///
/// ```
/// use rtn_core::normalize;
///
/// assert_eq!(normalize("Amélie: Le Fabuleux Destin"), "amelie le fabuleux destin");
/// assert_eq!(normalize("Rock & Roll"), "rock and roll");
/// ```
#[must_use]
pub fn normalize(title: &str) -> String {
    normalize_with(title, true)
}

/// Normalizes a title, optionally keeping its case.
///
/// Steps: NFKC folding, lowercasing, translation of diacritics and
/// punctuation, removal of everything that is not a letter, digit or
/// whitespace, whitespace collapsing.
#[must_use]
pub fn normalize_with(title: &str, lowercase: bool) -> String {
    if title.is_empty() {
        return String::new();
    }

    let folded: String = title.nfkc().collect();
    let folded = if lowercase {
        folded.to_lowercase()
    } else {
        folded
    };

    let mut translated = String::with_capacity(folded.len());
    for c in folded.chars() {
        match translate(c) {
            Some(replacement) => translated.push_str(replacement),
            None => translated.push(c),
        }
    }

    // Lowercasing and deletion can leave composable sequences behind.
    let kept: String = translated
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .nfkc()
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn translate(c: char) -> Option<&'static str> {
    let replacement = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'ç' | 'ć' | 'č' => "c",
        'Ç' | 'Ć' | 'Č' => "C",
        'ď' | 'đ' => "d",
        'Ď' | 'Đ' => "D",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ę' | 'Ě' => "E",
        'ğ' => "g",
        'Ğ' => "G",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'İ' => "I",
        'ł' => "l",
        'Ł' => "L",
        'ñ' | 'ń' | 'ň' => "n",
        'Ñ' | 'Ń' | 'Ň' => "N",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ő' => "O",
        'ř' => "r",
        'Ř' => "R",
        'ś' | 'š' | 'ş' => "s",
        'Ś' | 'Š' | 'Ş' => "S",
        'ť' | 'ţ' => "t",
        'Ť' | 'Ţ' => "T",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' | 'Ű' => "U",
        'ý' | 'ÿ' => "y",
        'Ý' | 'Ÿ' => "Y",
        'ź' | 'ż' | 'ž' => "z",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'œ' => "oe",
        'Œ' => "OE",
        'æ' => "ae",
        'Æ' => "AE",
        'ß' => "ss",
        'þ' => "th",
        'Þ' => "TH",
        '&' => "and",
        '_' | '.' | ':' | '%' => " ",
        '\'' | '!' | '?' | ',' | ';' => "",
        _ => return None,
    };
    Some(replacement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn folds_diacritics() {
        assert_eq!(normalize("café"), "cafe");
        assert_eq!(normalize("Pokémon"), "pokemon");
        assert_eq!(normalize("Straße"), "strasse");
        assert_eq!(normalize("Cœur"), "coeur");
    }

    #[test]
    fn translates_punctuation() {
        assert_eq!(normalize("Rock & Roll"), "rock and roll");
        assert_eq!(normalize("The.Matrix_Reloaded"), "the matrix reloaded");
        assert_eq!(normalize("Who's There?!"), "whos there");
        assert_eq!(normalize("Star Wars: Episode IV"), "star wars episode iv");
        assert_eq!(normalize("Spider-Man"), "spiderman");
    }

    #[test]
    fn folds_compatibility_forms() {
        assert_eq!(normalize("ＦＵＬＬ ｗｉｄｔｈ"), "full width");
        assert_eq!(normalize("ﬁnal"), "final");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("  The   Office \t US "), "the office us");
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("!?"), "");
    }

    #[test]
    fn keeps_case_when_asked() {
        assert_eq!(normalize_with("Amélie", false), "Amelie");
        assert_eq!(normalize_with("The.Office", false), "The Office");
    }

    #[test]
    fn keeps_non_latin_letters() {
        assert_eq!(normalize("進撃の巨人"), "進撃の巨人");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "[a-zA-Z0-9 àéîõüçñœæßÉ&_.:,!?'%-]{0,64}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        #[test]
        fn output_has_no_edge_whitespace(s in ".{0,64}") {
            let out = normalize(&s);
            prop_assert_eq!(out.trim(), out.as_str());
            prop_assert!(!out.contains("  "));
        }
    }
}
