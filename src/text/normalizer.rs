//! Orchestrates the title/author/publisher normalization pipeline:
//! Unicode fold → lowercase → abbreviation expansion → number
//! normalization → stopword removal → stemming.

use super::{abbreviations, numbers, stemmer, stopwords, unicode_fold};
use crate::config::TextOptions;

/// Stateless driver for the text-normalization pipeline, parameterized by
/// [`TextOptions`] (stemming/abbreviation toggles, default language).
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    enable_stemming: bool,
    enable_abbreviation_expansion: bool,
}

impl TextNormalizer {
    /// Build a normalizer from the text-processing options in `config`.
    #[must_use]
    pub fn new(config: &TextOptions) -> Self {
        Self {
            enable_stemming: config.enable_stemming,
            enable_abbreviation_expansion: config.enable_abbreviation_expansion,
        }
    }

    /// Run the full pipeline for `field` (`"title"`, `"author"`, or
    /// `"publisher"`), returning the space-joined normalized text.
    ///
    /// Steps: Unicode fold, lowercase, abbreviation expansion (if
    /// enabled), number normalization, field-specific stopword removal,
    /// stemming (if enabled).
    #[must_use]
    pub fn normalize_field(&self, text: &str, language: &str, field: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut normalized = unicode_fold::normalize_unicode(text).to_lowercase();

        if self.enable_abbreviation_expansion {
            normalized = abbreviations::expand_abbreviations(&normalized);
        }

        normalized = numbers::normalize_numbers(&normalized, language);

        let words = stopwords::remove_stopwords(&normalized, language, field);
        if words.is_empty() {
            return String::new();
        }

        let words = if self.enable_stemming {
            stemmer::stem_words(&words, language)
        } else {
            words
        };

        words.join(" ")
    }

    /// Same as [`Self::normalize_field`], but returns the intermediate
    /// word list before joining (used by score combiner / title
    /// comparisons that need to detect "both normalized to empty").
    #[must_use]
    pub fn normalize_field_words(&self, text: &str, language: &str, field: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut normalized = unicode_fold::normalize_unicode(text).to_lowercase();

        if self.enable_abbreviation_expansion {
            normalized = abbreviations::expand_abbreviations(&normalized);
        }

        normalized = numbers::normalize_numbers(&normalized, language);

        let words = stopwords::remove_stopwords(&normalized, language, field);
        if words.is_empty() {
            return Vec::new();
        }

        if self.enable_stemming {
            stemmer::stem_words(&words, language)
        } else {
            words
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(&TextOptions::default())
    }

    #[test]
    fn normalizes_title_with_full_pipeline() {
        let n = normalizer();
        let result = n.normalize_field("The Running Stories", "eng", "title");
        assert_eq!(result, "runn story");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let n = normalizer();
        assert_eq!(n.normalize_field("", "eng", "title"), "");
    }

    #[test]
    fn abbreviation_expansion_can_be_disabled() {
        let mut opts = TextOptions::default();
        opts.enable_abbreviation_expansion = false;
        let n = TextNormalizer::new(&opts);
        let words = n.normalize_field_words("Scribner Co.", "eng", "publisher");
        assert!(words.contains(&"co.".to_string()));
    }
}
