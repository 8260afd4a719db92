//! Scores a MARC [`Publication`] against index candidates and selects the
//! best match.
//!
//! Grounded on `original_source/marc_pd_tool/application/processing/
//! matching_engine.py` (`find_best_match`, `find_best_match_ignore_thresholds`,
//! `extract_best_publisher_match`), with LCCN fast-path/threshold interaction
//! per DESIGN.md's Open Question decision.

use crate::config::Config;
use crate::generic_title::GenericTitleDetector;
use crate::indexer::DataIndexer;
use crate::publication::{MatchResult, MatchType, Publication, SourceType};
use crate::score_combiner;
use crate::similarity::SimilarityCalculator;
use crate::text::TextNormalizer;

/// Scores a MARC publication against the candidates drawn from one or more
/// [`DataIndexer`]s and returns the best match found, if any.
#[derive(Debug)]
pub struct CoreMatcher<'a> {
    config: &'a Config,
    similarity: SimilarityCalculator,
    normalizer: TextNormalizer,
}

impl<'a> CoreMatcher<'a> {
    /// Build a matcher bound to `config` for its lifetime.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config, similarity: SimilarityCalculator::new(&config.text), normalizer: TextNormalizer::new(&config.text) }
    }

    /// Find the best-scoring candidate in `index` for `marc_pub`, applying
    /// per-field thresholds (with the LCCN-boost exception described below),
    /// or `None` if nothing qualifies.
    ///
    /// An LCCN-matched candidate skips the field thresholds for the initial
    /// check but the combined score still re-applies them afterward: if the
    /// boosted combined score still fails a per-field threshold, the
    /// candidate is rejected rather than accepted on LCCN alone (protects
    /// against a data-entry error in the LCCN field producing a nonsense
    /// match).
    #[must_use]
    pub fn find_best_match(
        &self,
        marc_pub: &Publication,
        index: &DataIndexer,
        generic_titles: &GenericTitleDetector,
        source_type: SourceType,
    ) -> Option<MatchResult> {
        let candidates = index.find_candidates(
            &self.normalizer,
            &self.config.text.default_language,
            marc_pub,
            self.config.thresholds.year_tolerance,
        );

        let mut best: Option<MatchResult> = None;
        for id in candidates {
            let Some(candidate) = index.get(id) else { continue };
            if Self::exceeds_year_tolerance(marc_pub, candidate, self.config.thresholds.year_tolerance) {
                continue;
            }
            let Some(result) = self.score_candidate(marc_pub, candidate, generic_titles, source_type) else {
                continue;
            };
            if !self.passes_thresholds(marc_pub, candidate, &result) {
                continue;
            }
            if Self::is_better(&result, best.as_ref()) {
                let early_exit = self.is_early_exit(marc_pub, candidate, &result);
                best = Some(result);
                if early_exit {
                    break;
                }
            }
        }
        best
    }

    fn exceeds_year_tolerance(marc_pub: &Publication, candidate: &Publication, year_tolerance: i32) -> bool {
        match (marc_pub.year, candidate.year) {
            (Some(a), Some(b)) => (a - b).abs() > year_tolerance,
            _ => false,
        }
    }

    /// Find the best-scoring candidate ignoring per-field thresholds
    /// entirely (`score_everything_mode`); only
    /// `thresholds.minimum_combined_score` is enforced.
    #[must_use]
    pub fn find_best_match_ignore_thresholds(
        &self,
        marc_pub: &Publication,
        index: &DataIndexer,
        generic_titles: &GenericTitleDetector,
        source_type: SourceType,
    ) -> Option<MatchResult> {
        let candidates = index.find_candidates(
            &self.normalizer,
            &self.config.text.default_language,
            marc_pub,
            self.config.thresholds.year_tolerance,
        );

        let mut best: Option<MatchResult> = None;
        for id in candidates {
            let Some(candidate) = index.get(id) else { continue };
            if Self::exceeds_year_tolerance(marc_pub, candidate, self.config.thresholds.year_tolerance) {
                continue;
            }
            let Some(result) = self.score_candidate(marc_pub, candidate, generic_titles, source_type) else {
                continue;
            };
            if result.combined_score < f64::from(self.config.thresholds.minimum_combined_score) {
                continue;
            }
            if Self::is_better(&result, best.as_ref()) {
                best = Some(result);
            }
        }
        best
    }

    fn score_candidate(
        &self,
        marc_pub: &Publication,
        candidate: &Publication,
        generic_titles: &GenericTitleDetector,
        source_type: SourceType,
    ) -> Option<MatchResult> {
        let language = if marc_pub.language_code.is_empty() { &self.config.text.default_language } else { &marc_pub.language_code };

        let is_lccn_match = self.config.matching.enable_lccn_matching
            && !marc_pub.normalized_lccn.is_empty()
            && marc_pub.normalized_lccn == candidate.normalized_lccn;

        let title_score = self.similarity.title_similarity(&marc_pub.title, &candidate.title, language);
        let author_score = self.best_author_score(marc_pub, candidate, language);

        let (publisher_score, matched_publisher) = if source_type == SourceType::Renewal && !candidate.full_text.is_empty() {
            let segment = self.extract_best_publisher_segment(&marc_pub.publisher, &candidate.full_text, language);
            let score = self.similarity.publisher_similarity(&marc_pub.publisher, "", &candidate.full_text, language);
            (score, segment)
        } else {
            let score = self.similarity.publisher_similarity(&marc_pub.publisher, &candidate.publisher, "", language);
            (score, candidate.publisher.clone())
        };
        let publisher_present = !marc_pub.publisher.is_empty() && (!candidate.publisher.is_empty() || !candidate.full_text.is_empty());

        let marc_generic = generic_titles.is_generic(&marc_pub.title, language);
        let candidate_generic = generic_titles.is_generic(&candidate.title, language);
        let is_generic = marc_generic || candidate_generic;
        let generic_reason = if marc_generic {
            generic_titles.detection_reason(&marc_pub.title, language)
        } else if candidate_generic {
            generic_titles.detection_reason(&candidate.title, language)
        } else {
            "none".to_string()
        };

        let mut combined = score_combiner::combine(&self.config.scoring_weights, title_score, author_score, publisher_score, publisher_present, is_generic);

        if is_lccn_match {
            combined = (combined + f64::from(self.config.matching.lccn_score_boost)).min(100.0);
        }

        let year_difference = match (marc_pub.year, candidate.year) {
            (Some(a), Some(b)) => Some((a - b).abs()),
            _ => None,
        };

        let match_type = if is_lccn_match {
            MatchType::Lccn
        } else if marc_pub.year.is_none() && self.config.matching.brute_force_missing_year {
            MatchType::BruteForceWithoutYear
        } else {
            MatchType::Similarity
        };

        Some(MatchResult {
            source_id: candidate.source_id.clone(),
            matched_title: candidate.title.clone(),
            matched_author: candidate.author_for_indexing(),
            matched_publisher,
            matched_date: candidate.pub_date.clone(),
            title_score,
            author_score,
            publisher_score,
            combined_score: combined,
            year_difference,
            match_type,
            source_type,
            is_lccn_match,
            generic_title_detected: is_generic,
            generic_detection_reason: generic_reason,
        })
    }

    /// Highest author similarity across the four (marc `author`/`main_author`
    /// × candidate `author`/`main_author`) pairings with non-empty text on
    /// both sides, per spec's "max of `author` vs `main_author`" scoring.
    fn best_author_score(&self, marc_pub: &Publication, candidate: &Publication, language: &str) -> f64 {
        let marc_fields = [&marc_pub.author, &marc_pub.main_author];
        let candidate_fields = [&candidate.author, &candidate.main_author];

        let mut best = 0.0_f64;
        let mut scored_any = false;
        for marc_field in marc_fields {
            if marc_field.is_empty() {
                continue;
            }
            for candidate_field in candidate_fields {
                if candidate_field.is_empty() {
                    continue;
                }
                scored_any = true;
                let score = self.similarity.author_similarity(marc_field, candidate_field, language);
                if score > best {
                    best = score;
                }
            }
        }
        if scored_any {
            best
        } else {
            0.0
        }
    }

    /// Per-field thresholds, re-applied even after an LCCN boost: a
    /// candidate that only qualifies because of the boost but fails a raw
    /// field threshold is still rejected. Author/publisher thresholds are
    /// skipped when either side lacks that field's data, per spec.
    fn passes_thresholds(&self, marc_pub: &Publication, candidate: &Publication, result: &MatchResult) -> bool {
        let t = &self.config.thresholds;
        if result.title_score < f64::from(t.title) {
            return false;
        }
        if marc_pub.has_author_data() && candidate.has_author_data() && result.author_score < f64::from(t.author) {
            return false;
        }
        if !marc_pub.publisher.is_empty() && result.publisher_score < f64::from(t.publisher) {
            return false;
        }
        true
    }

    fn is_early_exit(&self, marc_pub: &Publication, candidate: &Publication, result: &MatchResult) -> bool {
        let t = &self.config.thresholds;
        marc_pub.has_author_data()
            && candidate.has_author_data()
            && result.title_score >= f64::from(t.early_exit_title)
            && result.author_score >= f64::from(t.early_exit_author)
    }

    /// A candidate replaces the current best on a strictly higher combined
    /// score, or on an exact tie broken by `source_id` — result selection
    /// must not depend on the candidate set's iteration order.
    fn is_better(candidate: &MatchResult, current_best: Option<&MatchResult>) -> bool {
        match current_best {
            None => true,
            Some(best) => {
                candidate.combined_score > best.combined_score
                    || ((candidate.combined_score - best.combined_score).abs() < f64::EPSILON
                        && candidate.source_id < best.source_id)
            }
        }
    }

    /// Find the substring of `full_text` that best matches `marc_publisher`,
    /// for use as `MatchResult::matched_publisher` on renewal matches (which
    /// have no dedicated publisher field, only free text).
    ///
    /// Splits `full_text` on `;` and `,` (the common renewal-entry
    /// separators) and returns whichever segment scores highest against
    /// `marc_publisher`, falling back to the whole text if no segment beats
    /// a plain match.
    #[must_use]
    pub fn extract_best_publisher_segment(&self, marc_publisher: &str, full_text: &str, language: &str) -> String {
        if marc_publisher.is_empty() || full_text.is_empty() {
            return full_text.to_string();
        }

        let mut best_segment = full_text.to_string();
        let mut best_score = self.similarity.publisher_similarity(marc_publisher, full_text, "", language);

        for segment in full_text.split([';', ',']) {
            let trimmed = segment.trim();
            if trimmed.is_empty() {
                continue;
            }
            let score = self.similarity.publisher_similarity(marc_publisher, trimmed, "", language);
            if score > best_score {
                best_score = score;
                best_segment = trimmed.to_string();
            }
        }

        best_segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generic_title::GenericTitleDetector;
    use crate::publication::SourceKind;

    fn build_index(pubs: Vec<Publication>) -> DataIndexer {
        let config = Config::default();
        let normalizer = crate::text::TextNormalizer::new(&config.text);
        DataIndexer::build_sequential(&normalizer, &config.text.default_language, pubs)
    }

    #[test]
    fn finds_best_match_by_title_author() {
        let config = Config::default();
        let matcher = CoreMatcher::new(&config);
        let detector = GenericTitleDetector::new(config.text.generic_title_frequency_threshold, false);

        let index = build_index(vec![Publication::new(
            "r1", SourceKind::Registration, "The Great Gatsby", "Fitzgerald, F. Scott", "Fitzgerald, F. Scott", "Scribner", "New York", "1925",
        )]);

        let marc_pub = Publication::new(
            "m1", SourceKind::Marc, "The Great Gatsby", "Fitzgerald, F. Scott", "Fitzgerald, F. Scott", "Scribner", "New York", "1925",
        );

        let result = matcher.find_best_match(&marc_pub, &index, &detector, SourceType::Registration).expect("expected a match");
        assert_eq!(result.source_id, "r1");
        assert!(result.combined_score > 90.0);
        assert!(!result.is_lccn_match);
    }

    #[test]
    fn lccn_match_boosts_but_still_enforces_thresholds() {
        let config = Config::default();
        let matcher = CoreMatcher::new(&config);
        let detector = GenericTitleDetector::new(config.text.generic_title_frequency_threshold, false);

        let mut candidate = Publication::new("r1", SourceKind::Registration, "Something Totally Unrelated", "Nobody, At All", "", "", "", "1925");
        candidate.normalized_lccn = "50012345".to_string();
        let index = build_index(vec![candidate]);

        let mut marc_pub = Publication::new("m1", SourceKind::Marc, "The Great Gatsby", "Fitzgerald, F. Scott", "", "", "", "1925");
        marc_pub.normalized_lccn = "50012345".to_string();

        let result = matcher.find_best_match(&marc_pub, &index, &detector, SourceType::Registration);
        assert!(result.is_none(), "LCCN boost should not override a failing title threshold");
    }

    #[test]
    fn ignore_thresholds_mode_only_enforces_minimum_combined_score() {
        let config = Config::default();
        let matcher = CoreMatcher::new(&config);
        let detector = GenericTitleDetector::new(config.text.generic_title_frequency_threshold, false);

        let index = build_index(vec![Publication::new(
            "r1", SourceKind::Registration, "The Great Gatsby", "Fitzgerald, F. Scott", "Fitzgerald, F. Scott", "Scribner", "New York", "1925",
        )]);
        let marc_pub = Publication::new(
            "m1", SourceKind::Marc, "The Great Gatsby", "Fitzgerald, F. Scott", "Fitzgerald, F. Scott", "Scribner", "New York", "1925",
        );

        let result = matcher.find_best_match_ignore_thresholds(&marc_pub, &index, &detector, SourceType::Registration);
        assert!(result.is_some());
    }

    #[test]
    fn extract_best_publisher_segment_picks_matching_segment() {
        let config = Config::default();
        let matcher = CoreMatcher::new(&config);
        let full_text = "New York: Random House, 1950; renewed 1978 by the author";
        let segment = matcher.extract_best_publisher_segment("Random House", full_text, "eng");
        assert!(segment.to_lowercase().contains("random house"));
    }
}
