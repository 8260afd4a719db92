//! Combines title/author/publisher scores into one 0-100 combined score
//! using the weight profile selected by (publisher present × generic title).
//!
//! Grounded on `default_matching.py::DynamicWeightingCombiner`.

use crate::config::ScoringWeights;

/// Combine field scores into a single score using the weight profile
/// selected by whether a publisher comparison was possible and whether
/// either side's title was flagged generic.
///
/// `publisher_present` should be true only when the MARC record has a
/// publisher string *and* the candidate has either a publisher or (for
/// renewals) non-empty full text — matching `default_matching.py`'s guard
/// `marc_pub.publisher and (copyright_pub.publisher or copyright_pub.full_text)`.
#[must_use]
pub fn combine(
    weights: &ScoringWeights,
    title_score: f64,
    author_score: f64,
    publisher_score: f64,
    publisher_present: bool,
    is_generic: bool,
) -> f64 {
    let profile = match (publisher_present, is_generic) {
        (true, false) => &weights.normal_with_publisher,
        (true, true) => &weights.generic_with_publisher,
        (false, false) => &weights.normal_no_publisher,
        (false, true) => &weights.generic_no_publisher,
    };

    let publisher_term = if publisher_present { profile.publisher * publisher_score } else { 0.0 };
    profile.title * title_score + profile.author * author_score + publisher_term
}
