//! A small Porter-style suffix stemmer.
//!
//! The source system's `MultiLanguageStemmer` is described only by its
//! call sites (`similarity_calculator.py`); its rule tables were not part
//! of the retrieved reference material. This is a from-scratch rule-based
//! stemmer covering the classic Porter suffixes for English (plurals,
//! `-ing`, `-ed`, `-ly`, `-ation`/`-ization`), plus folded suffix-stripping
//! analogues for French, German, Spanish, and Italian; any other language
//! code falls back to the English table, per spec's "English-only
//! stemmers applied when language is unknown".

const ENG_SUFFIXES: &[(&str, &str)] = &[
    ("ization", "ize"),
    ("ational", "ate"),
    ("fulness", "ful"),
    ("iveness", "ive"),
    ("ousness", "ous"),
    ("ing", ""),
    ("edly", ""),
    ("ed", ""),
    ("ies", "y"),
    ("ied", "y"),
    ("ly", ""),
    ("es", ""),
    ("s", ""),
];

const FRE_SUFFIXES: &[(&str, &str)] = &[
    ("issements", ""),
    ("issement", ""),
    ("ations", ""),
    ("ation", ""),
    ("ements", ""),
    ("ement", ""),
    ("ment", ""),
    ("aux", "al"),
    ("euses", "eux"),
    ("euse", "eux"),
    ("es", ""),
    ("s", ""),
];

const GER_SUFFIXES: &[(&str, &str)] = &[
    ("heiten", "heit"),
    ("heit", ""),
    ("keiten", "keit"),
    ("keit", ""),
    ("ungen", "ung"),
    ("ung", ""),
    ("lich", ""),
    ("isch", ""),
    ("en", ""),
    ("er", ""),
    ("e", ""),
    ("s", ""),
];

const SPA_SUFFIXES: &[(&str, &str)] = &[
    ("izacion", "izar"),
    ("ciones", "cion"),
    ("cion", ""),
    ("mente", ""),
    ("es", ""),
    ("s", ""),
];

const ITA_SUFFIXES: &[(&str, &str)] = &[
    ("zioni", "zion"),
    ("zione", "zion"),
    ("amente", ""),
    ("mente", ""),
    ("i", ""),
    ("e", ""),
];

const MIN_STEM_LEN: usize = 3;

fn suffixes_for(language: &str) -> &'static [(&'static str, &'static str)] {
    match language {
        "fre" => FRE_SUFFIXES,
        "ger" => GER_SUFFIXES,
        "spa" => SPA_SUFFIXES,
        "ita" => ITA_SUFFIXES,
        _ => ENG_SUFFIXES,
    }
}

fn stem_word(word: &str, suffixes: &[(&str, &str)]) -> String {
    if word.chars().count() <= MIN_STEM_LEN {
        return word.to_string();
    }
    for (suffix, replacement) in suffixes {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.chars().count() >= MIN_STEM_LEN {
                return format!("{stem}{replacement}");
            }
        }
    }
    word.to_string()
}

/// Stem every word in `words` for `language`, using the folded
/// suffix-stripping table for `"fre"`/`"ger"`/`"spa"`/`"ita"`, or the
/// English table for `"eng"` and any unrecognized language code.
#[must_use]
pub fn stem_words(words: &[String], language: &str) -> Vec<String> {
    let suffixes = suffixes_for(language);
    words.iter().map(|w| stem_word(w, suffixes)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_common_english_suffixes() {
        assert_eq!(stem_word("running", ENG_SUFFIXES), "runn");
        assert_eq!(stem_word("stories", ENG_SUFFIXES), "story");
        assert_eq!(stem_word("quickly", ENG_SUFFIXES), "quick");
        assert_eq!(stem_word("cats", ENG_SUFFIXES), "cat");
    }

    #[test]
    fn leaves_short_words_alone() {
        assert_eq!(stem_word("is", ENG_SUFFIXES), "is");
        assert_eq!(stem_word("cat", ENG_SUFFIXES), "cat");
    }

    #[test]
    fn unrecognized_language_falls_back_to_english() {
        let words = vec!["running".to_string()];
        assert_eq!(stem_words(&words, "zzz"), vec!["runn".to_string()]);
    }

    #[test]
    fn strips_french_suffixes() {
        assert_eq!(stem_word("rapidement", FRE_SUFFIXES), "rapid");
        assert_eq!(stem_word("chevaux", FRE_SUFFIXES), "cheval");
    }

    #[test]
    fn strips_german_suffixes() {
        assert_eq!(stem_word("freiheiten", GER_SUFFIXES), "freiheit");
        assert_eq!(stem_word("sammlungen", GER_SUFFIXES), "sammlung");
    }

    #[test]
    fn strips_spanish_suffixes() {
        assert_eq!(stem_word("naciones", SPA_SUFFIXES), "nacion");
        assert_eq!(stem_word("rapidamente", SPA_SUFFIXES), "rapida");
    }

    #[test]
    fn strips_italian_suffixes() {
        assert_eq!(stem_word("nazioni", ITA_SUFFIXES), "nazion");
        assert_eq!(stem_word("rapidamente", ITA_SUFFIXES), "rapid");
    }

    #[test]
    fn different_languages_use_different_tables() {
        let words = vec!["rapidamente".to_string()];
        assert_eq!(stem_words(&words, "spa"), vec!["rapida".to_string()]);
        assert_eq!(stem_words(&words, "eng"), vec!["rapidamente".to_string()]);
    }
}
