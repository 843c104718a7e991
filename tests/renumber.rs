//! Renumbering Tests
//!
//! Two-pass renames over a scratch folder of numbered images.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use forgefunnel_core::renumber::{renumber, RenumberError, RenumberPlan};

fn seed(dir: &Path, ids: &[u32]) {
    for id in ids {
        fs::write(dir.join(format!("testimonial-{:03}.png", id)), format!("image {}", id)).unwrap();
    }
}

fn read(dir: &Path, position: u32) -> String {
    fs::read_to_string(dir.join(format!("testimonial-{:03}.png", position))).unwrap()
}

#[test]
fn permutation_moves_bytes_to_new_positions() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path(), &[1, 2, 3]);

    // 1 -> 2 -> 3 -> 1: every file is both a source and a destination
    let plan = RenumberPlan::new(tmp.path(), vec![(1, 2), (2, 3), (3, 1)]);
    let report = renumber(&plan).unwrap();

    assert_eq!(read(tmp.path(), 1), "image 3");
    assert_eq!(read(tmp.path(), 2), "image 1");
    assert_eq!(read(tmp.path(), 3), "image 2");
    assert_eq!(report.finalized.len(), 3);
    assert!(report.missing.is_empty());

    let files = fs::read_dir(tmp.path()).unwrap().count();
    assert_eq!(files, 3);
}

#[test]
fn shared_position_last_entry_wins() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path(), &[88, 91]);

    let plan = RenumberPlan::new(tmp.path(), vec![(88, 92), (91, 92)]);
    let report = renumber(&plan).unwrap();

    assert_eq!(read(tmp.path(), 92), "image 91");
    assert_eq!(report.collisions.len(), 1);
    assert_eq!(report.collisions[0].winner, 91);
    assert_eq!(report.finalized, vec!["testimonial-092.png"]);
}

#[test]
fn shared_position_winner_skips_missing_source() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path(), &[1, 2]);

    // 3 is listed last for position 5 but has no file
    let plan = RenumberPlan::new(tmp.path(), vec![(1, 5), (2, 5), (3, 5)]);
    let report = renumber(&plan).unwrap();

    assert_eq!(read(tmp.path(), 5), "image 2");
    assert_eq!(report.missing, vec!["testimonial-003.png"]);
    assert_eq!(report.collisions.len(), 1);
    assert_eq!(report.collisions[0].discarded, 1);
    assert_eq!(report.collisions[0].winner, 2);
}

#[test]
fn shared_position_single_staged_source_is_not_a_collision() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path(), &[88]);

    let plan = RenumberPlan::new(tmp.path(), vec![(88, 92), (91, 92)]);
    let report = renumber(&plan).unwrap();

    assert_eq!(read(tmp.path(), 92), "image 88");
    assert!(report.collisions.is_empty());
}

#[test]
fn missing_sources_are_skipped() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path(), &[5]);

    let plan = RenumberPlan::new(tmp.path(), vec![(4, 1), (5, 2)]);
    let report = renumber(&plan).unwrap();

    assert_eq!(report.missing, vec!["testimonial-004.png"]);
    assert_eq!(report.staged, vec![(5, 2)]);
    assert_eq!(read(tmp.path(), 2), "image 5");
    assert!(!tmp.path().join("testimonial-001.png").exists());
}

#[test]
fn stale_temp_files_are_cleaned() {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path(), &[1]);
    fs::write(tmp.path().join("temp-050.png"), b"left over").unwrap();

    let plan = RenumberPlan::new(tmp.path(), vec![(1, 7)]);
    let report = renumber(&plan).unwrap();

    assert_eq!(report.cleaned, vec!["temp-050.png"]);
    assert!(!tmp.path().join("temp-050.png").exists());
    assert!(!tmp.path().join("temp-007.png").exists());
    assert_eq!(read(tmp.path(), 7), "image 1");
}

#[test]
fn missing_directory_is_error() {
    let tmp = TempDir::new().unwrap();
    let plan = RenumberPlan::with_default_order(tmp.path().join("nowhere"));
    assert!(matches!(renumber(&plan), Err(RenumberError::DirectoryNotFound(_))));
}

#[test]
fn mapping_file_is_loaded_in_order() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("order.json");
    fs::write(&path, "[[3, 1], [1, 3]]").unwrap();

    let mapping = RenumberPlan::load_mapping(&path).unwrap();
    assert_eq!(mapping, vec![(3, 1), (1, 3)]);
}
