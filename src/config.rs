//! Configuration for the matching pipeline.
//!
//! A single [`Config`] is threaded through every component (§6 of the
//! specification this crate implements). Defaults mirror the source
//! system's documented defaults so tests and examples work with no config
//! file on disk; [`Config::load`] reads a TOML file and falls back to
//! [`Config::default`] semantics layered with whatever the file overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Matching thresholds (all 0-100 unless noted).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum title similarity to consider a candidate at all.
    pub title: i32,
    /// Minimum author similarity, when both sides have author data.
    pub author: i32,
    /// Minimum publisher similarity, when the MARC side has a publisher.
    pub publisher: i32,
    /// Title score at/above which early exit is considered.
    pub early_exit_title: i32,
    /// Author score at/above which early exit is considered.
    pub early_exit_author: i32,
    /// Publisher score at/above which early exit is considered.
    pub early_exit_publisher: i32,
    /// Maximum allowed absolute year difference between MARC and candidate.
    pub year_tolerance: i32,
    /// Minimum combined score accepted in score-everything mode.
    pub minimum_combined_score: i32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            title: 40,
            author: 30,
            publisher: 60,
            early_exit_title: 95,
            early_exit_author: 90,
            early_exit_publisher: 85,
            year_tolerance: 1,
            minimum_combined_score: 40,
        }
    }
}

/// Matching behavior flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchingOptions {
    /// Ignore field thresholds and return the best candidate above
    /// `minimum_combined_score` instead.
    pub score_everything_mode: bool,
    /// Still process MARC records with no extractable year.
    pub brute_force_missing_year: bool,
    /// Whether the LCCN exact-match fast path is enabled.
    pub enable_lccn_matching: bool,
    /// Combined-score boost applied on an LCCN hit, capped at 100.
    pub lccn_score_boost: i32,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        Self {
            score_everything_mode: false,
            brute_force_missing_year: false,
            enable_lccn_matching: true,
            lccn_score_boost: 35,
        }
    }
}

/// Text-normalization behavior flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextOptions {
    /// Apply language-specific stemming after stopword removal.
    pub enable_stemming: bool,
    /// Apply longest-match abbreviation expansion.
    pub enable_abbreviation_expansion: bool,
    /// Language used when a record has no language code.
    pub default_language: String,
    /// Occurrence count above which a title is flagged generic by frequency.
    pub generic_title_frequency_threshold: u32,
    /// Disable generic-title detection entirely.
    pub generic_title_disable: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            enable_stemming: true,
            enable_abbreviation_expansion: true,
            default_language: "eng".to_string(),
            generic_title_frequency_threshold: 10,
            generic_title_disable: false,
        }
    }
}

/// One title/author/publisher weight split; see [`crate::score_combiner`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeightSet {
    /// Weight applied to the title score.
    pub title: f64,
    /// Weight applied to the author score.
    pub author: f64,
    /// Weight applied to the publisher score (0.0 when publisher is absent
    /// from the scenario this set is used for).
    pub publisher: f64,
}

impl WeightSet {
    fn sum(&self) -> f64 {
        self.title + self.author + self.publisher
    }
}

/// The four weight profiles selected by (publisher present × generic title).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringWeights {
    /// Normal title, publisher present: 0.60 / 0.25 / 0.15.
    pub normal_with_publisher: WeightSet,
    /// Generic title, publisher present: 0.30 / 0.45 / 0.25.
    pub generic_with_publisher: WeightSet,
    /// Normal title, no publisher: 0.70 / 0.30 / 0.0.
    pub normal_no_publisher: WeightSet,
    /// Generic title, no publisher: 0.40 / 0.60 / 0.0.
    pub generic_no_publisher: WeightSet,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            normal_with_publisher: WeightSet { title: 0.60, author: 0.25, publisher: 0.15 },
            generic_with_publisher: WeightSet { title: 0.30, author: 0.45, publisher: 0.25 },
            normal_no_publisher: WeightSet { title: 0.70, author: 0.30, publisher: 0.0 },
            generic_no_publisher: WeightSet { title: 0.40, author: 0.60, publisher: 0.0 },
        }
    }
}

/// Batch executor tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExecutionOptions {
    /// Records per batch.
    pub batch_size: usize,
    /// Worker count; `None` means CPU-count minus 4, minimum 1.
    pub num_workers: Option<usize>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self { batch_size: 100, num_workers: None }
    }
}

impl ExecutionOptions {
    /// Resolve `num_workers` to a concrete thread count.
    #[must_use]
    pub fn resolved_workers(&self) -> usize {
        self.num_workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                .saturating_sub(4)
                .max(1)
        })
    }
}

/// Root configuration object, threaded through every component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Matching thresholds.
    pub thresholds: Thresholds,
    /// Matching behavior flags.
    pub matching: MatchingOptions,
    /// Text-normalization behavior flags.
    pub text: TextOptions,
    /// The four scoring-weight profiles.
    pub scoring_weights: ScoringWeights,
    /// Batch executor tuning.
    pub execution: ExecutionOptions,
}

impl Config {
    /// Load configuration from a TOML file, then validate it.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Io`] if the file cannot be read, or
    /// [`MatchError::Config`] if the file contains invalid TOML or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| MatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every constraint from the specification's configuration
    /// section: weights sum to 1 within 0.01 tolerance, thresholds are in
    /// `[0, 100]`, and `lccn_score_boost` is in `[0, 100]`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Config`] describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        for (name, weights) in [
            ("normal_with_publisher", &self.scoring_weights.normal_with_publisher),
            ("generic_with_publisher", &self.scoring_weights.generic_with_publisher),
            ("normal_no_publisher", &self.scoring_weights.normal_no_publisher),
            ("generic_no_publisher", &self.scoring_weights.generic_no_publisher),
        ] {
            let sum = weights.sum();
            if !(0.99..=1.01).contains(&sum) {
                return Err(MatchError::Config(format!(
                    "weight profile '{name}' must sum to 1.0 (±0.01), got {sum}"
                )));
            }
            if weights.title <= 0.0 || weights.author <= 0.0 {
                return Err(MatchError::Config(format!(
                    "weight profile '{name}' must have strictly positive title/author weights"
                )));
            }
        }

        for (name, value) in [
            ("title", self.thresholds.title),
            ("author", self.thresholds.author),
            ("publisher", self.thresholds.publisher),
            ("early_exit_title", self.thresholds.early_exit_title),
            ("early_exit_author", self.thresholds.early_exit_author),
            ("early_exit_publisher", self.thresholds.early_exit_publisher),
            ("minimum_combined_score", self.thresholds.minimum_combined_score),
        ] {
            if !(0..=100).contains(&value) {
                return Err(MatchError::Config(format!(
                    "threshold '{name}' must be in [0,100], got {value}"
                )));
            }
        }

        if !(0..=100).contains(&self.matching.lccn_score_boost) {
            return Err(MatchError::Config(format!(
                "lccn_score_boost must be in [0,100], got {}",
                self.matching.lccn_score_boost
            )));
        }

        if self.thresholds.year_tolerance < 0 {
            return Err(MatchError::Config("year_tolerance must be >= 0".to_string()));
        }

        Ok(())
    }

    /// Validate that a year value, if present, falls in `[1000, 3000]`.
    #[must_use]
    pub fn year_in_range(year: Option<i32>) -> bool {
        match year {
            Some(y) => (1000..=3000).contains(&y),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn weights_must_sum_to_one() {
        let mut config = Config::default();
        config.scoring_weights.normal_with_publisher.title = 0.9;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, MatchError::Config(_)));
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        let mut config = Config::default();
        config.thresholds.title = 150;
        assert!(config.validate().is_err());
    }

    #[test]
    fn lccn_boost_out_of_range_rejected() {
        let mut config = Config::default();
        config.matching.lccn_score_boost = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_missing_file_errors() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn load_parses_partial_toml_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[thresholds]\ntitle = 50\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.thresholds.title, 50);
        assert_eq!(config.thresholds.author, 30);
    }
}
