//! Language- and field-specific stopword removal.
//!
//! Tables are ported verbatim from the ground-truth analysis encoded in
//! the source system's `custom_stopwords.py`: English benefits from
//! aggressive stopword removal, while French/German/Spanish/Italian keep
//! minimal lists since their articles carry matching-relevant meaning.

use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

type FieldMap = HashMap<&'static str, &'static [&'static str]>;

const ENG_TITLE: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with", "or", "not", "this", "these",
    "those", "they", "their", "there", "been", "have", "had", "were", "what", "when", "where",
    "which", "who", "why", "how", "all", "some", "other", "another", "any", "many", "more",
    "most", "such", "our",
];
const ENG_AUTHOR: &[&str] =
    &["a", "an", "and", "as", "at", "by", "for", "from", "in", "of", "on", "the", "to", "with", "or", "ed", "trans", "comp"];
const ENG_PUBLISHER: &[&str] = &["a", "an", "and", "at", "by", "for", "from", "in", "of", "on", "the", "to", "with"];

const FRE_TITLE: &[&str] = &["et", "ou", "avec", "dans", "pour", "sur", "par", "aux", "des"];
const FRE_AUTHOR: &[&str] = &["et", "avec", "par"];
const FRE_PUBLISHER: &[&str] = &["et", "&"];

const GER_TITLE: &[&str] = &["und", "oder", "mit", "für", "auf", "bei", "zu", "vom", "zur"];
const GER_AUTHOR: &[&str] = &["und", "mit", "von"];
const GER_PUBLISHER: &[&str] = &["und", "&"];

const SPA_TITLE: &[&str] = &["y", "o", "con", "para", "por", "en", "sobre", "desde", "hasta"];
const SPA_AUTHOR: &[&str] = &["y", "con", "por"];
const SPA_PUBLISHER: &[&str] = &["y", "&"];

const ITA_TITLE: &[&str] = &["e", "o", "con", "per", "su", "da", "tra", "fra", "nei"];
const ITA_AUTHOR: &[&str] = &["e", "con", "da"];
const ITA_PUBLISHER: &[&str] = &["e", "&"];

const PRESERVE_TITLE: &[&str] = &[
    "new", "history", "story", "life", "american", "world", "book", "first", "second", "third",
    "complete", "selected", "collected",
];
const PRESERVE_AUTHOR: &[&str] = &["illustrated", "edited", "translated", "compiled", "introduction"];
const PRESERVE_PUBLISHER: &[&str] = &[
    "company", "press", "university", "college", "institute", "corporation", "inc", "ltd",
    "limited", "publishing", "publishers",
];

lazy_static! {
    static ref STOPWORDS: HashMap<&'static str, FieldMap> = {
        let mut langs: HashMap<&'static str, FieldMap> = HashMap::new();
        langs.insert("eng", HashMap::from([("title", ENG_TITLE), ("author", ENG_AUTHOR), ("publisher", ENG_PUBLISHER)]));
        langs.insert("fre", HashMap::from([("title", FRE_TITLE), ("author", FRE_AUTHOR), ("publisher", FRE_PUBLISHER)]));
        langs.insert("ger", HashMap::from([("title", GER_TITLE), ("author", GER_AUTHOR), ("publisher", GER_PUBLISHER)]));
        langs.insert("spa", HashMap::from([("title", SPA_TITLE), ("author", SPA_AUTHOR), ("publisher", SPA_PUBLISHER)]));
        langs.insert("ita", HashMap::from([("title", ITA_TITLE), ("author", ITA_AUTHOR), ("publisher", ITA_PUBLISHER)]));
        langs
    };

    static ref PRESERVE_WORDS: FieldMap =
        HashMap::from([("title", PRESERVE_TITLE), ("author", PRESERVE_AUTHOR), ("publisher", PRESERVE_PUBLISHER)]);
}

const MIN_WORD_LENGTH: usize = 2;

/// Return the stopword set for `language`/`field`, falling back to
/// English, then to the field's `"title"` list, if not found.
#[must_use]
pub fn stopwords_for(language: &str, field: &str) -> HashSet<&'static str> {
    let lang_map = STOPWORDS.get(language).unwrap_or_else(|| &STOPWORDS["eng"]);
    let words = lang_map.get(field).or_else(|| lang_map.get("title")).copied().unwrap_or(&[]);
    words.iter().copied().collect()
}

/// Lowercase-split `text` on whitespace and remove stopwords, keeping
/// preserved words even when they appear in the stopword list, and
/// dropping any remaining word shorter than 2 characters.
#[must_use]
pub fn remove_stopwords(text: &str, language: &str, field: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let stopword_set = stopwords_for(language, field);
    let preserve_set: HashSet<&str> =
        PRESERVE_WORDS.get(field).copied().unwrap_or(&[]).iter().copied().collect();

    text.to_lowercase()
        .split_whitespace()
        .filter_map(|word| {
            if !stopword_set.contains(word) {
                (word.chars().count() >= MIN_WORD_LENGTH).then(|| word.to_string())
            } else if preserve_set.contains(word) {
                Some(word.to_string())
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_english_title_stopwords() {
        let result = remove_stopwords("the great gatsby", "eng", "title");
        assert_eq!(result, vec!["great", "gatsby"]);
    }

    #[test]
    fn preserves_listed_words_even_if_stopword() {
        let result = remove_stopwords("the new world", "eng", "title");
        assert_eq!(result, vec!["new", "world"]);
    }

    #[test]
    fn minimal_removal_for_french() {
        let result = remove_stopwords("le roi et la reine", "fre", "title");
        assert_eq!(result, vec!["le", "roi", "la", "reine"]);
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let result = remove_stopwords("the book", "xyz", "title");
        assert_eq!(result, vec!["book"]);
    }

    #[test]
    fn drops_short_non_stopword_tokens() {
        let result = remove_stopwords("a b cd", "eng", "title");
        assert_eq!(result, vec!["cd"]);
    }

    #[test]
    fn empty_input_returns_empty_vec() {
        assert!(remove_stopwords("", "eng", "title").is_empty());
    }
}
