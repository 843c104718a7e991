//! Asset Materializer
//!
//! Mirrors the asset source into `<output>/assets`. Top-level files are
//! copied over whatever is there; top-level folders replace their previous
//! copy entirely. Without a source directory a fixed set of placeholder
//! files is written instead so every page reference resolves.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};
use walkdir::WalkDir;

pub const PLACEHOLDER_FILES: &[&str] = &[
    "logo.png",
    "favicon.ico",
    "hero-video-fallback.jpg",
    "testimonial-1.jpg",
    "testimonial-2.jpg",
    "testimonial-3.jpg",
    "testimonial-4.jpg",
    "og-image.jpg",
];

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to read asset source {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write asset {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk asset folder {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "name")]
pub enum AssetAction {
    CopiedFile(String),
    CopiedFolder(String),
    Placeholder(String),
}

/// A top-level asset entry that could not be copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFailure {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetReport {
    pub source_found: bool,
    pub actions: Vec<AssetAction>,
    #[serde(default)]
    pub failures: Vec<AssetFailure>,
}

impl AssetReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn placeholder_text(filename: &str) -> String {
    format!("# Placeholder for {}\n# Replace with actual asset", filename)
}

/// Copy `source` into `dest`, or synthesize placeholders when `source` is absent.
///
/// A top-level entry that fails is recorded in `failures` and the remaining
/// entries are still copied. Only an unusable `source` or `dest` is an error.
pub fn materialize(source: &Path, dest: &Path) -> Result<AssetReport, AssetError> {
    fs::create_dir_all(dest).map_err(|e| write_err(dest, e))?;

    if !source.is_dir() {
        warn!(source = %source.display(), "no assets directory found, creating placeholder assets");
        return write_placeholders(dest);
    }

    let mut children: Vec<PathBuf> = fs::read_dir(source)
        .map_err(|e| read_err(source, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .map_err(|e| read_err(source, e))?;
    children.sort();

    let mut report = AssetReport { source_found: true, ..Default::default() };

    for child in children {
        let name = match child.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        let target = dest.join(&name);

        let copied = if child.is_file() {
            copy_file(&child, &target).map(|_| AssetAction::CopiedFile(name.clone()))
        } else if child.is_dir() {
            replace_folder(&child, &target).map(|_| AssetAction::CopiedFolder(name.clone()))
        } else {
            continue;
        };

        match copied {
            Ok(action) => {
                info!(asset = %name, "copied asset");
                report.actions.push(action);
            }
            Err(e) => {
                error!(asset = %name, error = %e, "failed to copy asset");
                report.failures.push(AssetFailure { name, error: e.to_string() });
            }
        }
    }

    Ok(report)
}

fn write_placeholders(dest: &Path) -> Result<AssetReport, AssetError> {
    let mut report = AssetReport::default();
    for filename in PLACEHOLDER_FILES {
        let path = dest.join(filename);
        fs::write(&path, placeholder_text(filename)).map_err(|e| write_err(&path, e))?;
        info!(asset = %filename, "created placeholder");
        report.actions.push(AssetAction::Placeholder(filename.to_string()));
    }
    Ok(report)
}

fn replace_folder(source: &Path, dest: &Path) -> Result<(), AssetError> {
    if dest.exists() {
        fs::remove_dir_all(dest).map_err(|e| write_err(dest, e))?;
    }
    copy_tree(source, dest)
}

fn copy_tree(source: &Path, dest: &Path) -> Result<(), AssetError> {
    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| AssetError::Walk { path: source.to_path_buf(), source: e })?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| write_err(&target, e))?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Copy bytes and permissions, then carry over the modification time.
///
/// An existing destination is unlinked first: a read-only copy from an
/// earlier build cannot be opened for writing. The timestamp is set through
/// a read-only handle, which the owner may do whatever the file mode.
fn copy_file(source: &Path, dest: &Path) -> Result<(), AssetError> {
    if dest.symlink_metadata().is_ok() {
        fs::remove_file(dest).map_err(|e| write_err(dest, e))?;
    }
    fs::copy(source, dest).map_err(|e| write_err(dest, e))?;

    let modified = fs::metadata(source)
        .and_then(|meta| meta.modified())
        .map_err(|e| read_err(source, e))?;
    fs::File::open(dest)
        .and_then(|file| file.set_modified(modified))
        .map_err(|e| write_err(dest, e))
}

fn read_err(path: &Path, source: std::io::Error) -> AssetError {
    AssetError::Read { path: path.to_path_buf(), source }
}

fn write_err(path: &Path, source: std::io::Error) -> AssetError {
    AssetError::Write { path: path.to_path_buf(), source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_when_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("output/assets");

        let report = materialize(&dir.path().join("assets"), &dest).unwrap();

        assert!(!report.source_found);
        assert_eq!(report.actions.len(), PLACEHOLDER_FILES.len());
        let logo = fs::read_to_string(dest.join("logo.png")).unwrap();
        assert_eq!(logo, "# Placeholder for logo.png\n# Replace with actual asset");
    }

    #[test]
    fn test_folder_copy_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("assets");
        let dest = dir.path().join("out");
        fs::create_dir_all(source.join("testimonials/nested")).unwrap();
        fs::write(source.join("logo.png"), b"logo").unwrap();
        fs::write(source.join("testimonials/nested/a.png"), b"a").unwrap();

        fs::create_dir_all(dest.join("testimonials")).unwrap();
        fs::write(dest.join("testimonials/stale.png"), b"old").unwrap();

        let report = materialize(&source, &dest).unwrap();

        assert_eq!(
            report.actions,
            vec![
                AssetAction::CopiedFile("logo.png".into()),
                AssetAction::CopiedFolder("testimonials".into()),
            ]
        );
        assert!(!dest.join("testimonials/stale.png").exists());
        assert_eq!(fs::read(dest.join("testimonials/nested/a.png")).unwrap(), b"a");
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("assets");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("favicon.ico"), b"ico").unwrap();

        let dest = dir.path().join("out");
        materialize(&source, &dest).unwrap();

        let src_time = fs::metadata(source.join("favicon.ico")).unwrap().modified().unwrap();
        let dst_time = fs::metadata(dest.join("favicon.ico")).unwrap().modified().unwrap();
        assert_eq!(src_time, dst_time);
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_asset_copies_and_recopies() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("assets");
        fs::create_dir_all(&source).unwrap();
        let logo = source.join("logo.png");
        fs::write(&logo, b"logo").unwrap();
        fs::set_permissions(&logo, fs::Permissions::from_mode(0o444)).unwrap();

        let dest = dir.path().join("out");
        let first = materialize(&source, &dest).unwrap();
        let second = materialize(&source, &dest).unwrap();

        assert!(first.is_complete() && second.is_complete());
        assert_eq!(second.actions, vec![AssetAction::CopiedFile("logo.png".into())]);
        assert_eq!(fs::read(dest.join("logo.png")).unwrap(), b"logo");
        let mode = fs::metadata(dest.join("logo.png")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o444);
    }

    #[test]
    fn test_failed_entry_does_not_stop_later_entries() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("assets");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.png"), b"a").unwrap();
        fs::write(source.join("b.png"), b"b").unwrap();
        fs::write(source.join("c.png"), b"c").unwrap();

        // A non-empty folder where b.png should go cannot be replaced by a file
        let dest = dir.path().join("out");
        fs::create_dir_all(dest.join("b.png/inner")).unwrap();

        let report = materialize(&source, &dest).unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "b.png");
        assert_eq!(
            report.actions,
            vec![
                AssetAction::CopiedFile("a.png".into()),
                AssetAction::CopiedFile("c.png".into()),
            ]
        );
        assert_eq!(fs::read(dest.join("c.png")).unwrap(), b"c");
    }

    #[cfg(unix)]
    #[test]
    fn test_folder_copy_follows_directory_links() {
        let dir = tempfile::tempdir().unwrap();
        let shared = dir.path().join("shared");
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("badge.svg"), b"<svg/>").unwrap();

        let source = dir.path().join("assets");
        fs::create_dir_all(source.join("icons")).unwrap();
        std::os::unix::fs::symlink(&shared, source.join("icons/shared")).unwrap();

        let dest = dir.path().join("out");
        let report = materialize(&source, &dest).unwrap();

        assert!(report.is_complete());
        assert_eq!(fs::read(dest.join("icons/shared/badge.svg")).unwrap(), b"<svg/>");
    }
}
