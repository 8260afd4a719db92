//! Text normalization pipeline: Unicode folding, abbreviation expansion,
//! number normalization, stopword removal, and stemming.

pub mod abbreviations;
pub mod normalizer;
pub mod numbers;
pub mod stemmer;
pub mod stopwords;
pub mod unicode_fold;

pub use normalizer::TextNormalizer;
