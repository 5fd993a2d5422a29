mod common;

use common::TreeFixture;
use offload_lib::*;
use std::fs;
use std::path::{Path, PathBuf};

fn run(fixture: &TreeFixture, config: Config) -> (RunSummary, Vec<Event>) {
    let mut events = Vec::new();
    let summary = Pipeline::new(config)
        .run(&fixture.source, &fixture.destination, &mut events)
        .unwrap();
    (summary, events)
}

#[test]
fn test_new_file_is_copied_and_kept() {
    let fixture = TreeFixture::new();
    fixture.write_source("a.txt", b"hello");

    let (summary, _) = run(&fixture, Config::default());

    assert_eq!(fixture.read_destination("a.txt"), b"hello");
    assert!(fixture.source_exists("a.txt"));
    assert_eq!(summary.pruned, 0);
}

#[test]
fn test_old_nested_file_is_copied_and_pruned() {
    let fixture = TreeFixture::new();
    fixture.write_source("sub/b.txt", b"x");
    fixture.age_source("sub/b.txt", 5);

    let (summary, _) = run(&fixture, Config::default());

    assert_eq!(fixture.read_destination("sub/b.txt"), b"x");
    assert!(!fixture.source_exists("sub/b.txt"));
    assert_eq!(summary.pruned, 1);
    assert_eq!(summary.bytes_pruned, 1);
}

#[test]
fn test_stale_destination_is_overwritten_then_verified() {
    let fixture = TreeFixture::new();
    fixture.write_source("c.txt", b"current");
    fixture.age_source("c.txt", 3);
    fixture.write_destination("c.txt", b"an older, different version");

    let (summary, events) = run(&fixture, Config::default());

    assert_eq!(fixture.read_destination("c.txt"), b"current");
    assert_eq!(summary.verified_ok, 1);
    assert_eq!(summary.verified_mismatch, 0);
    assert!(!fixture.source_exists("c.txt"));
    assert!(events.contains(&Event::Verified {
        relative: PathBuf::from("c.txt"),
        outcome: VerifyOutcome::Match,
    }));
}

#[test]
fn test_missing_source_touches_nothing() {
    let fixture = TreeFixture::new();
    let missing = fixture.temp_dir.path().join("does-not-exist");
    let mut events = Vec::new();

    let result = Pipeline::new(Config::default()).run(&missing, &fixture.destination, &mut events);

    assert!(matches!(result, Err(OffloadError::SourceNotDirectory(_))));
    assert!(events.is_empty());
    assert!(!fixture.destination.exists());
}

#[test]
fn test_corrupted_copy_is_reported_and_source_retained() {
    let fixture = TreeFixture::new();
    fixture.write_source("d.txt", b"important data");
    fixture.age_source("d.txt", 10);
    fixture.write_source("e.txt", b"fine");
    fixture.age_source("e.txt", 10);

    let config = Config::default();
    replicate_tree(
        &FsWalker::default(),
        &fixture.source,
        &fixture.destination,
        2,
        &config,
        &mut NullSink,
    )
    .unwrap();

    // Truncate after the copy, before verification.
    fs::write(fixture.destination.join("d.txt"), b"important").unwrap();

    let mut events = Vec::new();
    let stats = verify_and_prune(
        &FsWalker::default(),
        &fixture.source,
        &fixture.destination,
        &config,
        chrono::Utc::now(),
        &mut events,
    )
    .unwrap();

    assert_eq!(stats.mismatched, 1);
    assert_eq!(stats.pruned, 1);
    assert!(fixture.source_exists("d.txt"));
    assert!(!fixture.source_exists("e.txt"));
    assert!(events.iter().any(|e| matches!(
        e,
        Event::Verified { relative, outcome: VerifyOutcome::Mismatch { .. } } if relative == Path::new("d.txt")
    )));
}

#[test]
fn test_every_file_is_mirrored() {
    let fixture = TreeFixture::new();
    let files = [
        ("top.txt", b"top".to_vec()),
        ("a/one.bin", vec![0u8; 4096]),
        ("a/b/two.bin", vec![1u8; 4097]),
        ("a/b/c/d/three.txt", b"deep".to_vec()),
        ("empty.txt", Vec::new()),
    ];
    for (relative, content) in &files {
        fixture.write_source(relative, content);
    }
    fs::create_dir_all(fixture.source.join("only/dirs/here")).unwrap();

    let (summary, _) = run(&fixture, Config::default());

    assert_eq!(summary.files_found, files.len() as u64);
    assert_eq!(summary.files_copied, files.len() as u64);
    assert_eq!(summary.verified_ok, files.len() as u64);
    for (relative, content) in &files {
        assert_eq!(&fixture.read_destination(relative), content);
    }
}

#[test]
fn test_deletion_requires_copy_match_and_age() {
    let fixture = TreeFixture::new();
    fixture.write_source("old.txt", b"old");
    fixture.age_source("old.txt", 3);
    fixture.write_source("young.txt", b"young");
    fixture.age_source("young.txt", 1);

    let config = Config {
        retention_days: 2,
        ..Default::default()
    };
    let (summary, _) = run(&fixture, config);

    assert_eq!(summary.pruned, 1);
    assert!(!fixture.source_exists("old.txt"));
    assert!(fixture.source_exists("young.txt"));
    assert!(fixture.destination.join("old.txt").exists());
    assert!(fixture.destination.join("young.txt").exists());
}

#[test]
fn test_custom_retention_threshold() {
    let fixture = TreeFixture::new();
    fixture.write_source("week.txt", b"w");
    fixture.age_source("week.txt", 7);

    let config = Config {
        retention_days: 30,
        ..Default::default()
    };
    let (summary, _) = run(&fixture, config);

    assert_eq!(summary.pruned, 0);
    assert!(fixture.source_exists("week.txt"));
}

#[test]
fn test_dry_run_changes_nothing() {
    let fixture = TreeFixture::new();
    fixture.write_source("a.txt", b"a");
    fixture.age_source("a.txt", 9);

    let config = Config {
        dry_run: true,
        ..Default::default()
    };
    let (summary, _) = run(&fixture, config);

    assert!(summary.dry_run);
    assert_eq!(summary.files_copied, 1);
    assert_eq!(summary.missing_destination, 1);
    assert_eq!(summary.pruned, 0);
    assert!(fixture.source_exists("a.txt"));
    assert!(!fixture.destination.exists());
}

#[test]
fn test_blake3_pipeline() {
    let fixture = TreeFixture::new();
    fixture.write_source("a.txt", b"a");
    fixture.age_source("a.txt", 4);

    let config = Config {
        algorithm: HashAlgorithm::Blake3,
        ..Default::default()
    };
    let (summary, _) = run(&fixture, config);

    assert_eq!(summary.verified_ok, 1);
    assert_eq!(summary.pruned, 1);
}

#[test]
fn test_second_run_after_prune_is_quiet() {
    let fixture = TreeFixture::new();
    fixture.write_source("a.txt", b"a");
    fixture.age_source("a.txt", 4);
    fixture.write_source("b.txt", b"b");

    run(&fixture, Config::default());
    let (summary, _) = run(&fixture, Config::default());

    assert_eq!(summary.files_found, 1);
    assert_eq!(summary.pruned, 0);
    assert_eq!(fixture.read_destination("a.txt"), b"a");
    assert_eq!(fixture.read_destination("b.txt"), b"b");
}
