#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # marc_copyright_matcher
//!
//! Matches MARC21 bibliographic records against US copyright registration
//! and renewal corpora to help determine pre-1978 public-domain status.
//!
//! ## Modules
//!
//! - [`error`] — Error and result types
//! - [`config`] — Thresholds, scoring weights, and execution tuning
//! - [`publication`] — `Publication`, `MatchResult`, and related enums
//! - [`text`] — Unicode folding, abbreviation/number normalization, stopwords, stemming
//! - [`similarity`] — Token-sort / plain / partial ratio field similarity
//! - [`score_combiner`] — Weighted combination of field scores
//! - [`generic_title`] — Pattern/frequency/linguistic generic-title detection
//! - [`index_entry`] — Compact single-id-or-small-set index value
//! - [`indexer`] — Word-based multi-field candidate index; [`build_indexes_and_detector`] wires index construction to generic-title detection
//! - [`matcher`] — Best-candidate selection with thresholds and LCCN boost
//! - [`batch`] — Batch-sharded, multi-threaded record processing
//! - [`cache`] — The `CacheStore` trait boundary for persisting built indexes

pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod generic_title;
pub mod index_entry;
pub mod indexer;
pub mod matcher;
pub mod publication;
pub mod score_combiner;
pub mod similarity;
pub mod text;

pub use batch::{BatchExecutor, BatchOutcome, BatchStats};
pub use cache::{CacheKey, CacheStore};
pub use config::Config;
pub use error::{MatchError, Result};
pub use generic_title::{Detection, GenericTitleDetector};
pub use index_entry::IndexEntry;
pub use indexer::{build_indexes_and_detector, DataIndexer};
pub use matcher::CoreMatcher;
pub use publication::{
    CountryClassification, MatchResult, MatchType, Publication, SourceKind, SourceType,
};
pub use similarity::SimilarityCalculator;
pub use text::TextNormalizer;
