//! Flags titles that are likely generic ("Annual Report", "Poems", …) so
//! that high title-similarity carries less weight in scoring.
//!
//! Grounded on `original_source/marc_pd_tool/generic_title_detector.py`: the
//! pattern set is ported verbatim, the three-tier detection order (pattern →
//! frequency → linguistic) is preserved, and detection is English-only per
//! the source's `_is_english_language` gate.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use lazy_static::lazy_static;

lazy_static! {
    /// Known generic-title phrases, ported verbatim from
    /// `GenericTitleDetector.GENERIC_PATTERNS`.
    static ref GENERIC_PATTERNS: HashSet<&'static str> = [
        "collected works", "complete works", "selected works", "works",
        "collected writings", "complete writings", "selected writings",
        "collected papers", "selected papers", "papers",
        "poems", "poetry", "selected poems", "complete poems", "collected poems",
        "essays", "selected essays", "complete essays", "collected essays",
        "stories", "short stories", "selected stories", "collected stories",
        "plays", "dramas", "selected plays", "complete plays", "collected plays",
        "letters", "correspondence", "selected letters", "collected letters",
        "speeches", "addresses", "selected speeches", "collected speeches",
        "novels", "selected novels", "collected novels",
        "anthology", "collection", "selections", "miscellany",
        "writings", "documents", "memoirs", "autobiography",
        "biography", "journal", "diary", "notebook",
        "proceedings", "transactions", "bulletin",
        "report", "reports", "studies", "articles", "records",
    ]
    .into_iter()
    .collect();

    static ref GENRE_TERMS: HashSet<&'static str> = [
        "poems", "essays", "stories", "plays", "letters", "works", "novels",
        "writings", "papers", "speeches", "addresses",
    ]
    .into_iter()
    .collect();

    static ref ENGLISH_STOPWORDS: HashSet<&'static str> = crate::text::stopwords::stopwords_for("eng", "title");
}

/// Detection outcome for one (title, language) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Whether the title was flagged generic.
    pub is_generic: bool,
    /// Which check flagged it (`"pattern"`, `"frequency"`, `"linguistic"`,
    /// `"none"`, or `"skipped_non_english_<lang>"`).
    pub reason: String,
}

/// Pattern + frequency + linguistic generic-title detector.
///
/// Frequency counts are accumulated while building the registration/renewal
/// indexes (via [`Self::add_title`]) and then treated as read-only once the
/// detector is shared (behind an `Arc`) across matching workers; the
/// detection cache uses interior mutability so concurrent workers can share
/// one instance without re-computing repeat lookups.
#[derive(Debug)]
pub struct GenericTitleDetector {
    frequency_threshold: u32,
    disabled: bool,
    title_counts: HashMap<String, u32>,
    cache: RwLock<HashMap<(String, String), Detection>>,
}

impl GenericTitleDetector {
    /// Build a detector with the given frequency threshold.
    #[must_use]
    pub fn new(frequency_threshold: u32, disabled: bool) -> Self {
        Self { frequency_threshold, disabled, title_counts: HashMap::new(), cache: RwLock::new(HashMap::new()) }
    }

    /// Record one occurrence of `title` for frequency-based detection.
    /// Called during index construction, before the detector is shared.
    pub fn add_title(&mut self, title: &str) {
        let normalized = normalize_for_detection(title);
        if !normalized.is_empty() {
            *self.title_counts.entry(normalized).or_insert(0) += 1;
        }
    }

    /// Whether `title` (in `language`) is generic.
    #[must_use]
    pub fn is_generic(&self, title: &str, language: &str) -> bool {
        self.detect(title, language).is_generic
    }

    /// The detection reason for `title` (in `language`).
    #[must_use]
    pub fn detection_reason(&self, title: &str, language: &str) -> String {
        self.detect(title, language).reason
    }

    fn detect(&self, title: &str, language: &str) -> Detection {
        if self.disabled || title.is_empty() {
            return Detection { is_generic: false, reason: "empty".to_string() };
        }
        if !is_english(language) {
            let lang = if language.is_empty() { "unknown".to_string() } else { language.to_string() };
            return Detection { is_generic: false, reason: format!("skipped_non_english_{lang}") };
        }

        let normalized = normalize_for_detection(title);
        if normalized.is_empty() {
            return Detection { is_generic: false, reason: "empty".to_string() };
        }

        let cache_key = (normalized.clone(), language.to_string());
        if let Some(hit) = self.cache.read().expect("generic-title cache lock poisoned").get(&cache_key) {
            return hit.clone();
        }

        let result = self.detect_uncached(&normalized);
        self.cache.write().expect("generic-title cache lock poisoned").insert(cache_key, result.clone());
        result
    }

    fn detect_uncached(&self, normalized: &str) -> Detection {
        if is_pattern_match(normalized) {
            return Detection { is_generic: true, reason: "pattern".to_string() };
        }
        if self.is_frequency_match(normalized) {
            return Detection { is_generic: true, reason: "frequency".to_string() };
        }
        if is_linguistic_match(normalized) {
            return Detection { is_generic: true, reason: "linguistic".to_string() };
        }
        Detection { is_generic: false, reason: "none".to_string() }
    }

    fn is_frequency_match(&self, normalized: &str) -> bool {
        self.title_counts.get(normalized).copied().unwrap_or(0) > self.frequency_threshold
    }
}

fn is_english(language: &str) -> bool {
    language.is_empty() || matches!(language.to_lowercase().as_str(), "eng" | "en")
}

fn is_pattern_match(normalized: &str) -> bool {
    if GENERIC_PATTERNS.contains(normalized) {
        return true;
    }
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.len() <= 3 {
        return GENERIC_PATTERNS.iter().any(|pattern| normalized.contains(pattern));
    }
    false
}

fn is_linguistic_match(normalized: &str) -> bool {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.is_empty() {
        return false;
    }

    if words.len() <= 2 && words.iter().all(|w| GENRE_TERMS.contains(w)) {
        return true;
    }

    if words.len() <= 4 {
        let stopword_count = words.iter().filter(|w| ENGLISH_STOPWORDS.contains(*w)).count();
        let ratio = stopword_count as f64 / words.len() as f64;
        if ratio > 0.6 {
            return true;
        }
    }

    false
}

/// Lowercase, strip punctuation (keeping spaces and hyphens), collapse
/// whitespace. Deliberately lighter than [`crate::text::TextNormalizer`]
/// since generic-title pattern matching needs exact phrases ("collected
/// works") to survive normalization unstemmed.
fn normalize_for_detection(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    let mut last_was_space = false;
    for ch in lowered.chars() {
        if ch.is_alphanumeric() || ch == '-' {
            cleaned.push(ch);
            last_was_space = false;
        } else if !last_was_space {
            cleaned.push(' ');
            last_was_space = true;
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
