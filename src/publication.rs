//! The `Publication` type and related domain enums.
//!
//! A `Publication` is the unit handled everywhere in the pipeline: MARC
//! records, copyright registrations, and renewals are all represented with
//! this same struct, distinguished by [`SourceKind`].

use serde::{Deserialize, Serialize};

/// Which corpus a [`Publication`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// A bibliographic record from a MARC21 catalog.
    Marc,
    /// A pre-1978 copyright registration entry.
    Registration,
    /// A copyright renewal entry.
    Renewal,
}

/// Country classification derived from a MARC country code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountryClassification {
    /// Published in the United States.
    Us,
    /// Published outside the United States.
    NonUs,
    /// Country could not be classified from the available data.
    Unknown,
}

/// How a match was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    /// Matched via an exact LCCN hit.
    Lccn,
    /// Matched via field similarity scoring.
    Similarity,
    /// Matched in brute-force mode for a record with no year.
    BruteForceWithoutYear,
}

/// Which index a match was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// The registration index.
    Registration,
    /// The renewal index.
    Renewal,
}

/// The result of matching a MARC record against a candidate registration or
/// renewal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// `source_id` of the matched record.
    pub source_id: String,
    /// Title of the matched record.
    pub matched_title: String,
    /// Author of the matched record.
    pub matched_author: String,
    /// Publisher of the matched record (or the best-matching segment of a
    /// renewal's `full_text`, see [`crate::matcher::CoreMatcher`]).
    pub matched_publisher: String,
    /// Raw publication date string of the matched record.
    pub matched_date: String,
    /// Title similarity score, 0-100.
    pub title_score: f64,
    /// Author similarity score, 0-100.
    pub author_score: f64,
    /// Publisher similarity score, 0-100.
    pub publisher_score: f64,
    /// Combined score, 0-100.
    pub combined_score: f64,
    /// Absolute year difference between the two records, if both have a year.
    pub year_difference: Option<i32>,
    /// How the match was found.
    pub match_type: MatchType,
    /// Which index the matched record came from.
    pub source_type: SourceType,
    /// Whether the match was found via the LCCN fast path.
    pub is_lccn_match: bool,
    /// Whether either side's title was detected as generic.
    pub generic_title_detected: bool,
    /// Detection reason for the generic-title flag, if any (`"none"` if not generic).
    pub generic_detection_reason: String,
}

/// The unit handled everywhere in the matching pipeline.
///
/// Loaders external to this crate (MARC21 XML parsing, registration-XML /
/// renewal-TSV parsing) are responsible for producing `Publication` values
/// with these fields already populated: titles stripped of bracketed
/// content, LCCNs normalized to digits, and country already classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    /// Opaque identifier, unique within its source.
    pub source_id: String,
    /// Which corpus this publication came from.
    pub source_kind: SourceKind,

    /// Title, already stripped of bracketed `[...]` content at load time.
    pub title: String,
    /// Author from the 245$c-style statement of responsibility.
    pub author: String,
    /// Author from the 1xx heading, already date-stripped.
    pub main_author: String,
    /// Publisher name.
    pub publisher: String,
    /// Place of publication.
    pub place: String,
    /// Edition statement.
    pub edition: String,
    /// Long free text; only non-empty for renewals.
    pub full_text: String,

    /// Raw, unparsed publication date.
    pub pub_date: String,
    /// Year extracted from a 4-digit substring of `pub_date`, if any.
    pub year: Option<i32>,

    /// 3-letter MARC country code.
    pub country_code: String,
    /// Country classification derived from `country_code`.
    pub country_classification: CountryClassification,

    /// 3-letter MARC language code; empty string allowed.
    pub language_code: String,

    /// Raw LCCN as it appeared in the source.
    pub lccn: String,
    /// Digits-only canonical LCCN (`^\d+$`), or empty if none.
    pub normalized_lccn: String,

    /// Best registration match found for this publication, if any.
    pub registration_match: Option<MatchResult>,
    /// Best renewal match found for this publication, if any.
    pub renewal_match: Option<MatchResult>,
    /// Final copyright status label, set by the (external) status decision.
    pub copyright_status: Option<String>,

    /// Whether a generic title was detected on either side of any match.
    pub generic_title_detected: bool,
    /// Whether the registration match specifically involved a generic title.
    pub registration_generic_title: bool,
    /// Whether the renewal match specifically involved a generic title.
    pub renewal_generic_title: bool,
    /// Reason the generic-title flag was set (`"none"` if never set).
    pub generic_detection_reason: String,
}

impl Publication {
    /// Construct a new `Publication` with all outputs unset.
    ///
    /// `year` is extracted from `pub_date` automatically.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source_id: impl Into<String>,
        source_kind: SourceKind,
        title: impl Into<String>,
        author: impl Into<String>,
        main_author: impl Into<String>,
        publisher: impl Into<String>,
        place: impl Into<String>,
        pub_date: impl Into<String>,
    ) -> Self {
        let pub_date = pub_date.into();
        let year = extract_year(&pub_date);
        Self {
            source_id: source_id.into(),
            source_kind,
            title: title.into(),
            author: author.into(),
            main_author: main_author.into(),
            publisher: publisher.into(),
            place: place.into(),
            edition: String::new(),
            full_text: String::new(),
            pub_date,
            year,
            country_code: String::new(),
            country_classification: CountryClassification::Unknown,
            language_code: String::new(),
            lccn: String::new(),
            normalized_lccn: String::new(),
            registration_match: None,
            renewal_match: None,
            copyright_status: None,
            generic_title_detected: false,
            registration_generic_title: false,
            renewal_generic_title: false,
            generic_detection_reason: "none".to_string(),
        }
    }

    /// Whether this publication has any usable author data (either field).
    #[must_use]
    pub fn has_author_data(&self) -> bool {
        !self.author.is_empty() || !self.main_author.is_empty()
    }

    /// The author string to use for indexing and comparison: the 1xx
    /// heading (`main_author`) when present, since it is already
    /// name-authority form, falling back to the 245$c statement.
    #[must_use]
    pub fn author_for_indexing(&self) -> String {
        if !self.main_author.is_empty() {
            self.main_author.clone()
        } else {
            self.author.clone()
        }
    }
}

/// Extract a 4-digit year from a raw publication-date string.
///
/// Matches the first run of 4 digits in the text; returns `None` if no such
/// run exists. Unlike the original implementation's `(19|20)\d{2}` pattern,
/// any 4-digit run is accepted and then range-checked by the caller against
/// `[1000, 3000]` (see [`crate::config::Config::validate`] for the range),
/// since copyright registrations predate 1900.
#[must_use]
pub fn extract_year(pub_date: &str) -> Option<i32> {
    let bytes = pub_date.as_bytes();
    let mut i = 0;
    while i + 4 <= bytes.len() {
        if bytes[i..i + 4].iter().all(u8::is_ascii_digit) {
            if let Ok(year) = pub_date[i..i + 4].parse::<i32>() {
                return Some(year);
            }
        }
        i += 1;
    }
    None
}
