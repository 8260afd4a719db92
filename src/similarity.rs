//! Pairwise field similarity: token-sort / plain / partial ratio over
//! normalized text, with a containment boost for title comparisons.
//!
//! Grounded on `default_matching.py::FuzzyWuzzySimilarityCalculator`: the
//! three ratio primitives below are thin wrappers over `strsim::levenshtein`
//! implementing the well-known fuzzywuzzy formulas (see the GLOSSARY), since
//! `strsim` itself only ships the edit-distance primitive, not the
//! token-sort/partial variants built on it.

use crate::config::TextOptions;
use crate::text::TextNormalizer;

/// Minimum number of overlapping tokens for the title containment boost.
const MIN_CONTAINMENT_TOKENS: usize = 2;
/// Minimum fraction of the longer token sequence the overlap must cover.
const MIN_CONTAINMENT_FRACTION: f64 = 0.40;
/// Minimum raw character length both titles must exceed for the boost to apply.
const CONTAINMENT_LENGTH_FLOOR: usize = 8;
/// Floor the containment boost raises the title score to.
const CONTAINMENT_BOOST_SCORE: f64 = 85.0;
/// Minimum length of a `partial_ratio` segment worth scoring (full_text splits).
const MIN_PARTIAL_SEGMENT_LEN: usize = 1;

/// Plain Levenshtein ratio, rescaled to `[0, 100]`, following the
/// fuzzywuzzy `ratio` formula: `100 * (1 - distance / max(len_a, len_b))`.
#[must_use]
pub fn ratio(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return 100.0;
    }
    let distance = strsim::levenshtein(a, b);
    (100.0 * (1.0 - distance as f64 / max_len as f64)).clamp(0.0, 100.0)
}

/// Token-sort ratio: sort whitespace-separated tokens alphabetically in
/// both strings, then compute [`ratio`] on the rejoined strings. Tolerates
/// word reordering while remaining sensitive to content.
#[must_use]
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Partial ratio: the maximum [`ratio`] between the shorter string and any
/// same-length contiguous substring of the longer string. Substring-tolerant,
/// useful for matching a short field against a long free-text block.
#[must_use]
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    if shorter.is_empty() && longer.is_empty() {
        return 100.0;
    }
    if shorter.is_empty() || shorter.len() < MIN_PARTIAL_SEGMENT_LEN {
        return 0.0;
    }
    if shorter.len() == longer.len() {
        return ratio(
            &shorter.iter().collect::<String>(),
            &longer.iter().collect::<String>(),
        );
    }

    let window = shorter.len();
    let mut best = 0.0_f64;
    for start in 0..=(longer.len() - window) {
        let segment: String = longer[start..start + window].iter().collect();
        let score = ratio(&shorter.iter().collect::<String>(), &segment);
        if score > best {
            best = score;
        }
        if (best - 100.0).abs() < f64::EPSILON {
            break;
        }
    }
    best
}

/// Pairwise similarity over normalized text, dispatched by field.
///
/// Owns a [`TextNormalizer`] configured from the same [`TextOptions`] used
/// to build the indexes being matched against, so normalization is
/// identical on both the query and candidate side.
#[derive(Debug, Clone)]
pub struct SimilarityCalculator {
    normalizer: TextNormalizer,
}

impl SimilarityCalculator {
    /// Build a calculator from text-processing options.
    #[must_use]
    pub fn new(options: &TextOptions) -> Self {
        Self { normalizer: TextNormalizer::new(options) }
    }

    /// Score two titles: full normalization, token-sort ratio, then the
    /// containment boost (§4.2).
    #[must_use]
    pub fn title_similarity(&self, a: &str, b: &str, language: &str) -> f64 {
        let words_a = self.normalizer.normalize_field_words(a, language, "title");
        let words_b = self.normalizer.normalize_field_words(b, language, "title");

        let base = if words_a.is_empty() && words_b.is_empty() {
            if a == b {
                100.0
            } else {
                0.0
            }
        } else {
            token_sort_ratio(&words_a.join(" "), &words_b.join(" "))
        };

        apply_containment_boost(base, &words_a, &words_b, a, b)
    }

    /// Score two author strings: conservative normalization, plain ratio.
    #[must_use]
    pub fn author_similarity(&self, a: &str, b: &str, language: &str) -> f64 {
        let words_a = self.normalizer.normalize_field_words(a, language, "author");
        let words_b = self.normalizer.normalize_field_words(b, language, "author");
        if words_a.is_empty() && words_b.is_empty() {
            return if a == b { 100.0 } else { 0.0 };
        }
        ratio(&words_a.join(" "), &words_b.join(" "))
    }

    /// Score a MARC publisher against a candidate's publisher field, or (for
    /// renewals) its `full_text` via substring-tolerant [`partial_ratio`].
    #[must_use]
    pub fn publisher_similarity(
        &self,
        marc_publisher: &str,
        candidate_publisher: &str,
        candidate_full_text: &str,
        language: &str,
    ) -> f64 {
        if !candidate_full_text.is_empty() {
            let marc_norm = self.normalizer.normalize_field_words(marc_publisher, language, "publisher").join(" ");
            if marc_norm.is_empty() {
                return 0.0;
            }
            return partial_ratio(&marc_norm, &candidate_full_text.to_lowercase());
        }

        if candidate_publisher.is_empty() {
            return 0.0;
        }

        let words_a = self.normalizer.normalize_field_words(marc_publisher, language, "publisher");
        let words_b = self.normalizer.normalize_field_words(candidate_publisher, language, "publisher");
        if words_a.is_empty() && words_b.is_empty() {
            return if marc_publisher == candidate_publisher { 100.0 } else { 0.0 };
        }
        ratio(&words_a.join(" "), &words_b.join(" "))
    }
}

fn apply_containment_boost(score: f64, words_a: &[String], words_b: &[String], raw_a: &str, raw_b: &str) -> f64 {
    if words_a.is_empty() || words_b.is_empty() {
        return score;
    }
    if raw_a.chars().count() <= CONTAINMENT_LENGTH_FLOOR || raw_b.chars().count() <= CONTAINMENT_LENGTH_FLOOR {
        return score;
    }

    let (shorter, longer) = if words_a.len() <= words_b.len() { (words_a, words_b) } else { (words_b, words_a) };

    if shorter.len() < MIN_CONTAINMENT_TOKENS || shorter.len() >= longer.len() {
        return score;
    }
    let fraction = shorter.len() as f64 / longer.len() as f64;
    if fraction < MIN_CONTAINMENT_FRACTION {
        return score;
    }

    let is_prefix = shorter == &longer[..shorter.len()];
    let is_suffix = shorter == &longer[longer.len() - shorter.len()..];
    if is_prefix || is_suffix {
        score.max(CONTAINMENT_BOOST_SCORE)
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextOptions;

    fn calc() -> SimilarityCalculator {
        SimilarityCalculator::new(&TextOptions::default())
    }

    #[test]
    fn ratio_is_symmetric_and_bounded() {
        let cases = [("gatsby", "gadsby"), ("", "something"), ("same", "same")];
        for (a, b) in cases {
            let ab = ratio(a, b);
            let ba = ratio(b, a);
            assert!((ab - ba).abs() < 1e-9);
            assert!((0.0..=100.0).contains(&ab));
        }
    }

    #[test]
    fn ratio_identical_is_100() {
        assert!((ratio("same string", "same string") - 100.0).abs() < 1e-9);
    }

    #[test]
    fn token_sort_ratio_tolerates_reordering() {
        let score = token_sort_ratio("great gatsby the", "the great gatsby");
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn partial_ratio_finds_substring_match() {
        let score = partial_ratio("scribner", "published by charles scribner and sons new york");
        assert!(score > 90.0);
    }

    #[test]
    fn title_similarity_reflexive_on_empty_normalization() {
        let c = calc();
        assert!((c.title_similarity("...", "...", "eng") - 100.0).abs() < 1e-9);
        assert!((c.title_similarity("...", "???", "eng") - 0.0).abs() < 1e-9);
    }

    #[test]
    fn title_containment_boost_applies() {
        let c = calc();
        let score = c.title_similarity("Federal Tax Guide", "Federal Tax Guide 1934 with Latest Supplement", "eng");
        assert!(score >= 85.0, "expected containment boost, got {score}");
    }

    #[test]
    fn publisher_similarity_uses_partial_ratio_for_full_text() {
        let c = calc();
        let score = c.publisher_similarity(
            "Scribner",
            "",
            "New York: Charles Scribner's Sons, renewed 1962 by the author",
            "eng",
        );
        assert!(score > 60.0);
    }

    #[test]
    fn publisher_similarity_empty_both_sides_is_zero_without_full_text() {
        let c = calc();
        assert_eq!(c.publisher_similarity("", "", "", "eng"), 0.0);
    }
}
