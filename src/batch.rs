//! Shards publications into batches, runs them across a bounded-channel
//! thread pool, and streams two per-batch files to disk: a result file (the
//! matched publications) and a stats file, kept separate so the main thread
//! can aggregate stats across a whole run without loading every batch's
//! full result set into memory.
//!
//! Grounded on the teacher's `producer_consumer_pipeline.rs` for the
//! bounded-channel + `std::thread` worker shape, generalized from a single
//! producer/file-reader pair to an N-worker pool draining a shared batch
//! queue and reporting results on a second channel, per the design note in
//! SPEC_FULL.md section J (share indexes immutably via `Arc` across OS
//! threads rather than the source's fork-based global state).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{MatchError, Result};
use crate::generic_title::GenericTitleDetector;
use crate::indexer::DataIndexer;
use crate::matcher::CoreMatcher;
use crate::publication::{CountryClassification, Publication, SourceType};

/// Wire-format version for batch stats and result files.
const FORMAT_VERSION: u32 = 1;

/// Batches slower than this sustained rec/s trigger a watchdog warning.
const SLOW_BATCH_THRESHOLD_RECORDS_PER_SEC: f64 = 5.0;

/// Aggregated counts for one batch or for a whole run, after merging.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BatchStats {
    /// Wire format version.
    pub format_version: u32,
    /// Total publications seen.
    pub total_records: u64,
    /// Publications with an accepted registration match.
    pub registration_matches: u64,
    /// Publications with an accepted renewal match.
    pub renewal_matches: u64,
    /// Publications skipped for having no extractable year.
    pub skipped_no_year: u64,
    /// Publications skipped for being outside a configured year range.
    pub skipped_out_of_range: u64,
    /// Publications skipped for not being US-classified.
    pub skipped_non_us: u64,
    /// Publications classified as US.
    pub us_records: u64,
    /// Publications classified as non-US.
    pub non_us_records: u64,
    /// Publications with unknown country classification.
    pub unknown_country_records: u64,
    /// Publications where matching raised a per-record error.
    pub records_with_errors: u64,
    /// Wall-clock seconds spent processing this batch.
    pub processing_time_secs: f64,
    /// Count per copyright-status label assigned (external status decision).
    pub status_counts: HashMap<String, u64>,
}

impl BatchStats {
    fn new() -> Self {
        Self { format_version: FORMAT_VERSION, ..Self::default() }
    }

    /// Fold another batch's stats into this one (used by the main thread to
    /// aggregate across completed batches).
    pub fn merge(&mut self, other: &Self) {
        self.total_records += other.total_records;
        self.registration_matches += other.registration_matches;
        self.renewal_matches += other.renewal_matches;
        self.skipped_no_year += other.skipped_no_year;
        self.skipped_out_of_range += other.skipped_out_of_range;
        self.skipped_non_us += other.skipped_non_us;
        self.us_records += other.us_records;
        self.non_us_records += other.non_us_records;
        self.unknown_country_records += other.unknown_country_records;
        self.records_with_errors += other.records_with_errors;
        self.processing_time_secs += other.processing_time_secs;
        for (status, count) in &other.status_counts {
            *self.status_counts.entry(status.clone()).or_insert(0) += count;
        }
    }

    fn records_per_sec(&self) -> f64 {
        if self.processing_time_secs <= 0.0 {
            return 0.0;
        }
        self.total_records as f64 / self.processing_time_secs
    }
}

/// A batch's worth of publications, paired with the file path it came from
/// so the worker can delete it on consumption.
struct BatchJob {
    batch_id: u64,
    input_path: PathBuf,
}

/// One completed batch: where its result and stats files landed.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Sequential id of the completed batch.
    pub batch_id: u64,
    /// Path of the written result file (a serialized `Vec<Publication>`).
    pub result_path: PathBuf,
    /// Path of the written stats file (a serialized [`BatchStats`]), written
    /// separately so the main thread can aggregate stats without loading
    /// every batch's full result set into memory.
    pub stats_path: PathBuf,
    /// This batch's stats.
    pub stats: BatchStats,
}

/// Runs MARC batches through [`crate::matcher::CoreMatcher`] across a pool
/// of OS threads, reading from and writing to `output_dir`.
#[derive(Debug)]
pub struct BatchExecutor {
    config: Arc<Config>,
    registration_index: Arc<DataIndexer>,
    renewal_index: Arc<DataIndexer>,
    generic_titles: Arc<GenericTitleDetector>,
}

impl BatchExecutor {
    /// Build an executor sharing the given indexes and detector across
    /// worker threads.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        registration_index: Arc<DataIndexer>,
        renewal_index: Arc<DataIndexer>,
        generic_titles: Arc<GenericTitleDetector>,
    ) -> Self {
        Self { config, registration_index, renewal_index, generic_titles }
    }

    /// Process every batch file in `input_paths`, writing `<batch>_result.mp`
    /// and `<batch>_stats.mp`, and returning the aggregated stats across all
    /// batches. Each input
    /// file is deleted as soon as it is read.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Io`] if `output_dir` cannot be created.
    pub fn run(&self, input_paths: Vec<PathBuf>, output_dir: &Path) -> Result<BatchStats> {
        fs::create_dir_all(output_dir)?;

        let num_workers = self.config.execution.resolved_workers().min(input_paths.len().max(1));
        let (job_tx, job_rx): (Sender<BatchJob>, Receiver<BatchJob>) = bounded(input_paths.len().max(1));
        let (outcome_tx, outcome_rx): (Sender<Result<BatchOutcome>>, Receiver<Result<BatchOutcome>>) = bounded(input_paths.len().max(1));

        for (batch_id, input_path) in input_paths.iter().enumerate() {
            job_tx
                .send(BatchJob { batch_id: batch_id as u64, input_path: input_path.clone() })
                .map_err(|e| MatchError::Worker(format!("failed to enqueue batch: {e}")))?;
        }
        drop(job_tx);

        let mut handles = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let job_rx = job_rx.clone();
            let outcome_tx = outcome_tx.clone();
            let config = Arc::clone(&self.config);
            let registration_index = Arc::clone(&self.registration_index);
            let renewal_index = Arc::clone(&self.renewal_index);
            let generic_titles = Arc::clone(&self.generic_titles);
            let output_dir = output_dir.to_path_buf();

            handles.push(thread::spawn(move || {
                debug!(worker_id, "batch worker started");
                for job in job_rx {
                    let outcome = process_batch(&job, &output_dir, &config, &registration_index, &renewal_index, &generic_titles);
                    if outcome_tx.send(outcome).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(outcome_tx);

        let mut aggregate = BatchStats::new();
        let mut completed = 0u64;
        for outcome in outcome_rx {
            match outcome {
                Ok(outcome) => {
                    aggregate.merge(&outcome.stats);
                    completed += 1;
                    info!(
                        batch_id = outcome.batch_id,
                        completed,
                        total_batches = input_paths.len(),
                        rec_per_sec = outcome.stats.records_per_sec(),
                        "batch complete"
                    );
                    if outcome.stats.records_per_sec() < SLOW_BATCH_THRESHOLD_RECORDS_PER_SEC && outcome.stats.total_records > 0 {
                        warn!(batch_id = outcome.batch_id, rec_per_sec = outcome.stats.records_per_sec(), "batch ran slower than watchdog threshold");
                    }
                }
                Err(err) => {
                    warn!(error = %err, "batch dropped");
                }
            }
        }

        for handle in handles {
            handle.join().map_err(|_| MatchError::Worker("batch worker thread panicked".to_string()))?;
        }

        Ok(aggregate)
    }
}

fn process_batch(
    job: &BatchJob,
    output_dir: &Path,
    config: &Config,
    registration_index: &DataIndexer,
    renewal_index: &DataIndexer,
    generic_titles: &GenericTitleDetector,
) -> Result<BatchOutcome> {
    let started = Instant::now();

    let bytes = fs::read(&job.input_path)?;
    fs::remove_file(&job.input_path)?;

    let mut publications: Vec<Publication> =
        rmp_serde::from_slice(&bytes).map_err(|e| MatchError::Serialization(format!("batch {}: {e}", job.batch_id)))?;

    let matcher = CoreMatcher::new(config);
    let mut stats = BatchStats::new();
    stats.total_records = publications.len() as u64;

    for publication in &mut publications {
        if publication.year.is_none() && !config.matching.brute_force_missing_year {
            stats.skipped_no_year += 1;
            continue;
        }
        if !Config::year_in_range(publication.year) {
            stats.skipped_out_of_range += 1;
            continue;
        }

        match publication.country_classification {
            CountryClassification::Us => stats.us_records += 1,
            CountryClassification::NonUs => stats.non_us_records += 1,
            CountryClassification::Unknown => stats.unknown_country_records += 1,
        }

        let find = |index: &DataIndexer, source_type: SourceType| {
            if config.matching.score_everything_mode {
                matcher.find_best_match_ignore_thresholds(publication, index, generic_titles, source_type)
            } else {
                matcher.find_best_match(publication, index, generic_titles, source_type)
            }
        };

        publication.registration_match = find(registration_index, SourceType::Registration);
        publication.renewal_match = find(renewal_index, SourceType::Renewal);

        if publication.registration_match.is_some() {
            stats.registration_matches += 1;
        }
        if publication.renewal_match.is_some() {
            stats.renewal_matches += 1;
        }
        publication.generic_title_detected =
            publication.registration_match.as_ref().is_some_and(|m| m.generic_title_detected)
                || publication.renewal_match.as_ref().is_some_and(|m| m.generic_title_detected);
        publication.registration_generic_title = publication.registration_match.as_ref().is_some_and(|m| m.generic_title_detected);
        publication.renewal_generic_title = publication.renewal_match.as_ref().is_some_and(|m| m.generic_title_detected);
    }

    stats.processing_time_secs = started.elapsed().as_secs_f64();

    for publication in &publications {
        if let Some(status) = &publication.copyright_status {
            *stats.status_counts.entry(status.clone()).or_insert(0) += 1;
        }
    }

    let result_path = output_dir.join(format!("batch_{}_result.mp", job.batch_id));
    let encoded = rmp_serde::to_vec(&publications).map_err(|e| MatchError::Serialization(format!("batch {}: {e}", job.batch_id)))?;
    fs::write(&result_path, encoded)?;

    let stats_path = output_dir.join(format!("batch_{}_stats.mp", job.batch_id));
    let encoded_stats = rmp_serde::to_vec(&stats).map_err(|e| MatchError::Serialization(format!("batch {}: {e}", job.batch_id)))?;
    fs::write(&stats_path, encoded_stats)?;

    Ok(BatchOutcome { batch_id: job.batch_id, result_path, stats_path, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publication::SourceKind;

    fn setup(
        registrations: Vec<Publication>,
    ) -> (Arc<Config>, Arc<DataIndexer>, Arc<DataIndexer>, Arc<GenericTitleDetector>) {
        let config = Arc::new(Config::default());
        let normalizer = crate::text::TextNormalizer::new(&config.text);
        let registration_index = Arc::new(DataIndexer::build_sequential(&normalizer, &config.text.default_language, registrations));
        let renewal_index = Arc::new(DataIndexer::build_sequential(&normalizer, &config.text.default_language, vec![]));
        let generic_titles = Arc::new(GenericTitleDetector::new(config.text.generic_title_frequency_threshold, false));
        (config, registration_index, renewal_index, generic_titles)
    }

    #[test]
    fn runs_one_batch_and_writes_result_and_stats() {
        let (config, registration_index, renewal_index, generic_titles) = setup(vec![Publication::new(
            "r1", SourceKind::Registration, "The Great Gatsby", "Fitzgerald, F. Scott", "Fitzgerald, F. Scott", "Scribner", "New York", "1925",
        )]);

        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("batch_0.mp");
        let marc_pub = Publication::new(
            "m1", SourceKind::Marc, "The Great Gatsby", "Fitzgerald, F. Scott", "Fitzgerald, F. Scott", "Scribner", "New York", "1925",
        );
        fs::write(&input_path, rmp_serde::to_vec(&vec![marc_pub]).unwrap()).unwrap();

        let executor = BatchExecutor::new(config, registration_index, renewal_index, generic_titles);
        let output_dir = dir.path().join("out");
        let stats = executor.run(vec![input_path.clone()], &output_dir).unwrap();

        assert_eq!(stats.total_records, 1);
        assert_eq!(stats.registration_matches, 1);
        assert!(!input_path.exists(), "input batch file should be deleted on consumption");

        let result_path = output_dir.join("batch_0_result.mp");
        assert!(result_path.exists());
        let decoded: Vec<Publication> = rmp_serde::from_slice(&fs::read(result_path).unwrap()).unwrap();
        assert_eq!(decoded.len(), 1);
        assert!(decoded[0].registration_match.is_some());

        let stats_path = output_dir.join("batch_0_stats.mp");
        assert!(stats_path.exists(), "batch stats file should be written alongside the result file");
        let decoded_stats: BatchStats = rmp_serde::from_slice(&fs::read(stats_path).unwrap()).unwrap();
        assert_eq!(decoded_stats.total_records, 1);
        assert_eq!(decoded_stats.registration_matches, 1);
    }

    #[test]
    fn skips_records_with_no_year_by_default() {
        let (config, registration_index, renewal_index, generic_titles) = setup(vec![]);
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("batch_0.mp");
        let marc_pub = Publication::new("m1", SourceKind::Marc, "Some Title", "Some Author", "", "", "", "no date here");
        assert!(marc_pub.year.is_none());
        fs::write(&input_path, rmp_serde::to_vec(&vec![marc_pub]).unwrap()).unwrap();

        let executor = BatchExecutor::new(config, registration_index, renewal_index, generic_titles);
        let stats = executor.run(vec![input_path], &dir.path().join("out")).unwrap();
        assert_eq!(stats.skipped_no_year, 1);
        assert_eq!(stats.registration_matches, 0);
    }

    #[test]
    fn merge_sums_counters_and_status_maps() {
        let mut a = BatchStats::new();
        a.total_records = 5;
        a.status_counts.insert("public_domain".to_string(), 2);
        let mut b = BatchStats::new();
        b.total_records = 3;
        b.status_counts.insert("public_domain".to_string(), 1);
        b.status_counts.insert("in_copyright".to_string(), 4);

        a.merge(&b);
        assert_eq!(a.total_records, 8);
        assert_eq!(a.status_counts["public_domain"], 3);
        assert_eq!(a.status_counts["in_copyright"], 4);
    }
}
