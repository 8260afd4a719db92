//! Word-based multi-field index over registration/renewal publications.
//!
//! Grounded on `original_source/marc_pd_tool/indexer.py` (key generation,
//! `find_candidates` priority logic) and `application/processing/
//! parallel_indexer.py` (chunk-then-merge parallel build), simplified to
//! the five key maps spec.md §4.5/§3 specifies (title, author, publisher,
//! year, LCCN — no edition index, unlike the original).

use std::collections::HashMap as StdHashMap;
use std::collections::HashSet;

use ahash::AHashMap;
use rayon::prelude::*;

use crate::generic_title::GenericTitleDetector;
use crate::index_entry::IndexEntry;
use crate::publication::Publication;
use crate::text::TextNormalizer;

/// Read-only, word-based index over one corpus (registrations or renewals).
///
/// Owns the publications it indexes; index maps hold integer ids (positions
/// into [`Self::publications`]), never references, so the index is
/// trivially `Send + Sync` and cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct DataIndexer {
    publications: Vec<Publication>,
    title_index: AHashMap<String, IndexEntry>,
    author_index: AHashMap<String, IndexEntry>,
    publisher_index: AHashMap<String, IndexEntry>,
    year_index: AHashMap<i32, IndexEntry>,
    lccn_index: AHashMap<String, IndexEntry>,
}

/// Below this publication count (or with a single worker), parallel index
/// building falls back to sequential — the chunking overhead isn't worth it.
const PARALLEL_BUILD_MIN_PUBLICATIONS: usize = 1000;

impl DataIndexer {
    /// Build an index sequentially, inserting publications in order.
    #[must_use]
    pub fn build_sequential(normalizer: &TextNormalizer, default_language: &str, publications: Vec<Publication>) -> Self {
        let mut indexer = Self {
            publications: Vec::with_capacity(publications.len()),
            title_index: AHashMap::new(),
            author_index: AHashMap::new(),
            publisher_index: AHashMap::new(),
            year_index: AHashMap::new(),
            lccn_index: AHashMap::new(),
        };
        for publication in publications {
            indexer.insert(normalizer, default_language, publication);
        }
        indexer
    }

    /// Build an index, splitting publications across `num_workers` chunks
    /// (at least `4 * num_workers` chunks for load balancing) and merging
    /// partial key maps afterward. Falls back to [`Self::build_sequential`]
    /// for small inputs or a single worker.
    #[must_use]
    pub fn build_parallel(
        normalizer: &TextNormalizer,
        default_language: &str,
        publications: Vec<Publication>,
        num_workers: usize,
    ) -> Self {
        if publications.len() < PARALLEL_BUILD_MIN_PUBLICATIONS || num_workers <= 1 {
            return Self::build_sequential(normalizer, default_language, publications);
        }

        let chunk_size = (publications.len() / (num_workers * 4)).max(100);
        let partials: Vec<PartialIndex> = publications
            .par_chunks(chunk_size)
            .enumerate()
            .map(|(chunk_idx, chunk)| {
                let start_id = (chunk_idx * chunk_size) as u32;
                let mut partial = PartialIndex::default();
                for (offset, publication) in chunk.iter().enumerate() {
                    let id = start_id + offset as u32;
                    partial.index_one(normalizer, default_language, publication, id);
                }
                partial
            })
            .collect();

        let mut indexer = Self {
            publications,
            title_index: AHashMap::new(),
            author_index: AHashMap::new(),
            publisher_index: AHashMap::new(),
            year_index: AHashMap::new(),
            lccn_index: AHashMap::new(),
        };
        for partial in partials {
            partial.merge_into(&mut indexer);
        }
        indexer
    }

    /// Insert one publication, generating and storing its index keys, and
    /// return its assigned id.
    pub fn insert(&mut self, normalizer: &TextNormalizer, default_language: &str, publication: Publication) -> u32 {
        let id = self.publications.len() as u32;
        let language = language_or_default(&publication.language_code, default_language);

        for key in generate_title_keys(normalizer, &publication.title, language) {
            self.title_index.entry(key).or_default().insert(id);
        }
        for key in generate_author_keys(&publication.author_for_indexing()) {
            self.author_index.entry(key).or_default().insert(id);
        }
        if !publication.publisher.is_empty() {
            for key in generate_publisher_keys(normalizer, &publication.publisher, language) {
                self.publisher_index.entry(key).or_default().insert(id);
            }
        }
        if let Some(year) = publication.year {
            self.year_index.entry(year).or_default().insert(id);
        }
        if !publication.normalized_lccn.is_empty() {
            self.lccn_index.entry(publication.normalized_lccn.clone()).or_default().insert(id);
        }

        self.publications.push(publication);
        id
    }

    /// Number of publications held by this index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.publications.len()
    }

    /// Whether this index holds no publications.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.publications.is_empty()
    }

    /// Fetch a publication by its index id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Publication> {
        self.publications.get(id as usize)
    }

    /// Find candidate publication ids worth scoring against `query`.
    ///
    /// Implements the LCCN fast path and the title/author/publisher/year
    /// combination priority from spec.md §4.5.
    #[must_use]
    pub fn find_candidates(&self, normalizer: &TextNormalizer, default_language: &str, query: &Publication, year_tolerance: i32) -> HashSet<u32> {
        if !query.normalized_lccn.is_empty() {
            if let Some(entry) = self.lccn_index.get(&query.normalized_lccn) {
                if !entry.is_empty() {
                    return entry.iter().collect();
                }
            }
        }

        let language = language_or_default(&query.language_code, default_language);

        let title_ids = self.collect(&self.title_index, generate_title_keys(normalizer, &query.title, language));
        let author_ids = if query.has_author_data() {
            self.collect(&self.author_index, generate_author_keys(&query.author_for_indexing()))
        } else {
            HashSet::new()
        };
        let publisher_ids = if query.publisher.is_empty() {
            HashSet::new()
        } else {
            self.collect(&self.publisher_index, generate_publisher_keys(normalizer, &query.publisher, language))
        };
        let year_ids = match query.year {
            Some(year) => {
                let mut ids = HashSet::new();
                for offset in -year_tolerance..=year_tolerance {
                    if let Some(entry) = self.year_index.get(&(year + offset)) {
                        ids.extend(entry.iter());
                    }
                }
                ids
            }
            None => HashSet::new(),
        };

        let mut chosen = combine_candidates(&title_ids, &author_ids, &publisher_ids);
        if chosen.is_empty() && !year_ids.is_empty() {
            chosen = year_ids.clone();
        }

        if !year_ids.is_empty() {
            chosen = chosen.intersection(&year_ids).copied().collect();
        }

        chosen
    }

    fn collect<K: std::hash::Hash + Eq>(&self, map: &AHashMap<K, IndexEntry>, keys: HashSet<K>) -> HashSet<u32> {
        let mut ids = HashSet::new();
        for key in &keys {
            if let Some(entry) = map.get(key) {
                ids.extend(entry.iter());
            }
        }
        ids
    }
}

/// Builds the registration and renewal indexes and populates a
/// [`GenericTitleDetector`] with every title across both corpora in one
/// orchestrated step. The detector must see every title before it is shared
/// read-only across matching workers, so this runs single-threaded ahead of
/// (and separately from) the indexes' own parallel build.
#[must_use]
pub fn build_indexes_and_detector(
    normalizer: &TextNormalizer,
    default_language: &str,
    registrations: Vec<Publication>,
    renewals: Vec<Publication>,
    num_workers: usize,
    frequency_threshold: u32,
    generic_title_disabled: bool,
) -> (DataIndexer, DataIndexer, GenericTitleDetector) {
    let mut detector = GenericTitleDetector::new(frequency_threshold, generic_title_disabled);
    for publication in registrations.iter().chain(renewals.iter()) {
        detector.add_title(&publication.title);
    }

    let registration_index = DataIndexer::build_parallel(normalizer, default_language, registrations, num_workers);
    let renewal_index = DataIndexer::build_parallel(normalizer, default_language, renewals, num_workers);
    (registration_index, renewal_index, detector)
}

/// Combine title/author/publisher candidate sets preferring intersection
/// for precision, falling back to union for recall, per spec.md §4.5:
/// title∩author∩publisher, else title∩author (∪publisher), else
/// title∩publisher, else union of all three.
fn combine_candidates(title_ids: &HashSet<u32>, author_ids: &HashSet<u32>, publisher_ids: &HashSet<u32>) -> HashSet<u32> {
    if !title_ids.is_empty() && !author_ids.is_empty() {
        let title_author: HashSet<u32> = title_ids.intersection(author_ids).copied().collect();
        if !title_author.is_empty() {
            if publisher_ids.is_empty() {
                return title_author;
            }
            let triple: HashSet<u32> = title_author.intersection(publisher_ids).copied().collect();
            if !triple.is_empty() {
                return triple;
            }
            return title_author.union(publisher_ids).copied().collect();
        }
    }

    if !title_ids.is_empty() && !publisher_ids.is_empty() {
        let title_publisher: HashSet<u32> = title_ids.intersection(publisher_ids).copied().collect();
        if !title_publisher.is_empty() {
            return title_publisher;
        }
    }

    let mut union: HashSet<u32> = title_ids.clone();
    union.extend(author_ids);
    union.extend(publisher_ids);
    union
}

fn language_or_default<'a>(language_code: &'a str, default_language: &'a str) -> &'a str {
    if language_code.is_empty() { default_language } else { language_code }
}

#[derive(Default)]
struct PartialIndex {
    title: StdHashMap<String, Vec<u32>>,
    author: StdHashMap<String, Vec<u32>>,
    publisher: StdHashMap<String, Vec<u32>>,
    year: StdHashMap<i32, Vec<u32>>,
    lccn: StdHashMap<String, Vec<u32>>,
}

impl PartialIndex {
    fn index_one(&mut self, normalizer: &TextNormalizer, default_language: &str, publication: &Publication, id: u32) {
        let language = language_or_default(&publication.language_code, default_language);
        for key in generate_title_keys(normalizer, &publication.title, language) {
            self.title.entry(key).or_default().push(id);
        }
        for key in generate_author_keys(&publication.author_for_indexing()) {
            self.author.entry(key).or_default().push(id);
        }
        if !publication.publisher.is_empty() {
            for key in generate_publisher_keys(normalizer, &publication.publisher, language) {
                self.publisher.entry(key).or_default().push(id);
            }
        }
        if let Some(year) = publication.year {
            self.year.entry(year).or_default().push(id);
        }
        if !publication.normalized_lccn.is_empty() {
            self.lccn.entry(publication.normalized_lccn.clone()).or_default().push(id);
        }
    }

    fn merge_into(self, indexer: &mut DataIndexer) {
        merge_map(self.title, &mut indexer.title_index);
        merge_map(self.author, &mut indexer.author_index);
        merge_map(self.publisher, &mut indexer.publisher_index);
        merge_map(self.year, &mut indexer.year_index);
        merge_map(self.lccn, &mut indexer.lccn_index);
    }
}

fn merge_map<K: std::hash::Hash + Eq>(partial: StdHashMap<K, Vec<u32>>, target: &mut AHashMap<K, IndexEntry>) {
    for (key, ids) in partial {
        let entry = target.entry(key).or_default();
        for id in ids {
            entry.insert(id);
        }
    }
}

/// Title keys: single significant tokens plus 2- and 3-token shingles,
/// after stopword removal and stemming.
fn generate_title_keys(normalizer: &TextNormalizer, title: &str, language: &str) -> HashSet<String> {
    let words = normalizer.normalize_field_words(title, language, "title");
    shingled_keys(&words)
}

/// Publisher keys: significant-word tokens, 2- and 3-word combinations, and
/// the full joined form, with publisher stopwords removed but corporate
/// terms preserved by [`TextNormalizer`]'s publisher preserve set.
fn generate_publisher_keys(normalizer: &TextNormalizer, publisher: &str, language: &str) -> HashSet<String> {
    let words = normalizer.normalize_field_words(publisher, language, "publisher");
    let mut keys = shingled_keys(&words);
    if !words.is_empty() {
        keys.insert(words.join("_"));
    }
    keys
}

fn shingled_keys(words: &[String]) -> HashSet<String> {
    let mut keys = HashSet::new();
    if words.is_empty() {
        return keys;
    }
    for word in words {
        keys.insert(word.clone());
    }
    if words.len() >= 2 {
        keys.insert(words[..2].join("_"));
        if words.len() > 2 {
            keys.insert(words[words.len() - 2..].join("_"));
        }
        if words.len() >= 3 {
            keys.insert(words[..3].join("_"));
        }
    }
    keys
}

/// Author keys: surname; surname+first-given; surname+first-initial;
/// first+surname; individual given names — for both "Last, First Middle"
/// and "First Middle Last" forms, per spec.md §4.5.
fn generate_author_keys(author: &str) -> HashSet<String> {
    let mut keys = HashSet::new();
    if author.is_empty() {
        return keys;
    }

    let folded = crate::text::unicode_fold::normalize_unicode(author).to_lowercase();

    if let Some((surname_raw, given_raw)) = folded.split_once(',') {
        let surname = surname_raw.trim();
        let given_names: Vec<&str> = given_raw.split_whitespace().collect();

        if surname.chars().count() >= 2 {
            keys.insert(surname.to_string());
        }
        if let Some(first_given) = given_names.first() {
            if !surname.is_empty() {
                keys.insert(format!("{surname}_{first_given}"));
                keys.insert(format!("{first_given}_{surname}"));
                if let Some(initial) = first_given.chars().next() {
                    keys.insert(format!("{surname}_{initial}"));
                }
            }
        }
        for given in &given_names {
            let clean = given.replace('.', "");
            if clean.chars().count() >= 2 {
                keys.insert(clean);
            }
        }
    } else {
        let words: Vec<&str> = folded.split_whitespace().collect();
        if let Some(last) = words.last() {
            if last.chars().count() >= 2 {
                keys.insert((*last).to_string());
            }
        }
        if words.len() >= 2 {
            let first = words[0];
            let last = *words.last().expect("checked len >= 2");
            keys.insert(format!("{first}_{last}"));
            keys.insert(format!("{last}_{first}"));
            for word in &words {
                let clean = word.replace('.', "");
                if !clean.is_empty() {
                    keys.insert(clean);
                }
            }
        } else if words.len() == 1 && words[0].chars().count() >= 2 {
            keys.insert(words[0].to_string());
        }
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextOptions;
    use crate::publication::{Publication, SourceKind};

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(&TextOptions::default())
    }

    fn sample_publications() -> Vec<Publication> {
        vec![
            Publication::new("r1", SourceKind::Registration, "The Great Gatsby", "Fitzgerald, F. Scott", "Fitzgerald, F. Scott", "Scribner", "New York", "1925"),
            Publication::new("r2", SourceKind::Registration, "Nineteen Eighty-Four", "Orwell, George", "Orwell, George", "Secker and Warburg", "London", "1949"),
        ]
    }

    #[test]
    fn round_trip_finds_own_id() {
        let n = normalizer();
        let indexer = DataIndexer::build_sequential(&n, "eng", sample_publications());
        let query = indexer.get(0).unwrap().clone();
        let candidates = indexer.find_candidates(&n, "eng", &query, 1);
        assert!(candidates.contains(&0));
    }

    #[test]
    fn lccn_hit_returns_immediately() {
        let n = normalizer();
        let mut pub1 = Publication::new("r1", SourceKind::Registration, "A Title", "An Author", "", "", "", "1950");
        pub1.normalized_lccn = "50012345".to_string();
        let mut indexer = DataIndexer::build_sequential(&n, "eng", vec![]);
        indexer.insert(&n, "eng", pub1);

        let mut query = Publication::new("m1", SourceKind::Marc, "Completely Different", "Someone Else", "", "", "", "1999");
        query.normalized_lccn = "50012345".to_string();

        let candidates = indexer.find_candidates(&n, "eng", &query, 1);
        assert_eq!(candidates, HashSet::from([0]));
    }

    #[test]
    fn parallel_build_matches_sequential_membership() {
        let n = normalizer();
        let pubs: Vec<Publication> = (0..1500)
            .map(|i| Publication::new(format!("r{i}"), SourceKind::Registration, format!("Title Number {i}"), "Some Author", "", "Some Publisher", "", "1950"))
            .collect();
        let indexer = DataIndexer::build_parallel(&n, "eng", pubs.clone(), 4);
        assert_eq!(indexer.len(), pubs.len());
        let query = indexer.get(42).unwrap().clone();
        let candidates = indexer.find_candidates(&n, "eng", &query, 1);
        assert!(candidates.contains(&42));
    }

    #[test]
    fn build_indexes_and_detector_populates_detector_from_both_corpora() {
        let n = normalizer();
        let registrations = vec![
            Publication::new("r1", SourceKind::Registration, "Annual Report", "Acme Corp", "", "", "", "1930"),
            Publication::new("r2", SourceKind::Registration, "Annual Report", "Acme Corp", "", "", "", "1931"),
        ];
        let renewals = vec![
            Publication::new("n1", SourceKind::Registration, "Annual Report", "Acme Corp", "", "", "", "1932"),
        ];

        let (registration_index, renewal_index, detector) =
            build_indexes_and_detector(&n, "eng", registrations, renewals, 1, 2, false);

        assert_eq!(registration_index.len(), 2);
        assert_eq!(renewal_index.len(), 1);
        assert!(detector.is_generic("Annual Report", "eng"), "title present 3 times across both corpora should exceed the frequency threshold of 2");
    }

    #[test]
    fn author_keys_cover_both_name_forms() {
        let comma_keys = generate_author_keys("Fitzgerald, F. Scott");
        assert!(comma_keys.contains("fitzgerald"));
        assert!(comma_keys.contains("fitzgerald_f"));

        let plain_keys = generate_author_keys("F. Scott Fitzgerald");
        assert!(plain_keys.contains("fitzgerald"));
    }
}
