//! End-to-end batch execution: write a serialized batch of MARC
//! publications to disk, run it through [`BatchExecutor`], and check the
//! result file and aggregated stats.

use std::fs;
use std::sync::Arc;

use marc_copyright_matcher::{
    build_indexes_and_detector, BatchExecutor, Config, Publication, SourceKind, TextNormalizer,
};

#[test]
fn two_batches_across_the_worker_pool_merge_into_one_stats_report() {
    let config = Arc::new(Config::default());
    let registrations = vec![
        Publication::new("r1", SourceKind::Registration, "The Great Gatsby", "Fitzgerald, F. Scott", "Fitzgerald, F. Scott", "Scribner", "New York", "1925"),
        Publication::new("r2", SourceKind::Registration, "Walden", "Thoreau, Henry David", "Thoreau, Henry David", "Ticknor and Fields", "Boston", "1854"),
    ];
    let normalizer = TextNormalizer::new(&config.text);
    let (reg_index, ren_index, detector) = build_indexes_and_detector(
        &normalizer,
        &config.text.default_language,
        registrations,
        vec![],
        1,
        config.text.generic_title_frequency_threshold,
        false,
    );
    let generic_titles = Arc::new(detector);

    let executor = BatchExecutor::new(Arc::clone(&config), Arc::new(reg_index), Arc::new(ren_index), generic_titles);

    let dir = tempfile::tempdir().unwrap();
    let batch_a = vec![Publication::new(
        "m1", SourceKind::Marc, "The Great Gatsby", "Fitzgerald, F. Scott", "Fitzgerald, F. Scott", "Scribner", "New York", "1925",
    )];
    let batch_b = vec![Publication::new(
        "m2", SourceKind::Marc, "Walden", "Thoreau, Henry David", "Thoreau, Henry David", "Ticknor and Fields", "Boston", "1854",
    )];

    let path_a = dir.path().join("batch_0.mp");
    let path_b = dir.path().join("batch_1.mp");
    fs::write(&path_a, rmp_serde::to_vec(&batch_a).unwrap()).unwrap();
    fs::write(&path_b, rmp_serde::to_vec(&batch_b).unwrap()).unwrap();

    let output_dir = dir.path().join("out");
    let stats = executor.run(vec![path_a, path_b], &output_dir).unwrap();

    assert_eq!(stats.total_records, 2);
    assert_eq!(stats.registration_matches, 2);
    assert!(output_dir.join("batch_0_result.mp").exists());
    assert!(output_dir.join("batch_1_result.mp").exists());
    assert!(output_dir.join("batch_0_stats.mp").exists(), "each batch should also write its own stats file");
    assert!(output_dir.join("batch_1_stats.mp").exists(), "each batch should also write its own stats file");
}
