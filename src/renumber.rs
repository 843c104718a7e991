//! Testimonial Renumbering
//!
//! Two-pass rename over a numbered image folder:
//! 1. copy every existing source to `temp-NNN` (NNN = new position)
//! 2. move each `temp-NNN` to its final name, replacing what is there
//! 3. remove any temp file left behind
//!
//! Sources are copied, never moved, so a file that is both a source and a
//! destination is read before it can be overwritten. When two old ids share
//! a position, the later one in table order wins.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_DIR: &str = "/home/user/Simo-Landing-Page/assets/testimonials";

/// Best results first: top tier 1-5, high tier 6-17, mid tier 19-40,
/// early stage 41-92.
pub const DEFAULT_ORDER: &[(u32, u32)] = &[
    // top tier
    (89, 1), (62, 2), (64, 3), (71, 4), (83, 5),
    // high tier
    (3, 6), (37, 7), (50, 8), (51, 9), (54, 10), (57, 11), (58, 12),
    (59, 13), (61, 14), (63, 15), (75, 16), (92, 17),
    // mid tier
    (2, 19), (4, 20), (5, 21), (6, 22), (7, 23), (10, 24), (23, 25),
    (34, 26), (36, 27), (44, 28), (46, 29), (49, 30), (52, 31), (56, 32),
    (60, 33), (66, 34), (76, 35), (79, 36), (81, 37), (86, 38), (87, 39),
    (90, 40),
    // early stage
    (1, 41), (8, 42), (9, 43), (11, 44), (12, 45), (13, 46), (14, 47),
    (15, 48), (16, 49), (17, 50), (18, 51), (19, 52), (20, 53), (21, 54),
    (22, 55), (24, 56), (25, 57), (26, 58), (27, 59), (28, 60), (29, 61),
    (30, 62), (31, 63), (32, 64), (33, 65), (35, 66), (38, 67), (39, 68),
    (40, 69), (41, 70), (42, 71), (43, 72), (45, 73), (47, 74), (48, 75),
    (53, 76), (55, 77), (65, 78), (67, 79), (68, 80), (69, 81), (70, 82),
    (72, 83), (73, 84), (74, 85), (77, 86), (78, 87), (80, 88), (82, 89),
    (84, 90), (85, 91), (88, 92), (91, 92),
];

#[derive(Debug, Error)]
pub enum RenumberError {
    #[error("Directory {0} not found")]
    DirectoryNotFound(PathBuf),

    #[error("Old id {old} is mapped to both {first} and {second}")]
    ConflictingMapping { old: u32, first: u32, second: u32 },

    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid mapping file {path}: {source}")]
    Mapping {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Two old ids sent to the same position; `winner` is the one kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub position: u32,
    pub discarded: u32,
    pub winner: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenumberPlan {
    pub dir: PathBuf,
    /// (old id, new position) in table order.
    pub mapping: Vec<(u32, u32)>,
    pub stem: String,
    pub temp_stem: String,
    pub extension: String,
}

impl RenumberPlan {
    pub fn new(dir: impl Into<PathBuf>, mapping: Vec<(u32, u32)>) -> Self {
        Self {
            dir: dir.into(),
            mapping,
            stem: "testimonial".to_string(),
            temp_stem: "temp".to_string(),
            extension: "png".to_string(),
        }
    }

    /// Plan over `dir` with the built-in tier ordering.
    pub fn with_default_order(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, DEFAULT_ORDER.to_vec())
    }

    /// Read a JSON array of `[old, new]` pairs.
    pub fn load_mapping(path: &Path) -> Result<Vec<(u32, u32)>, RenumberError> {
        let content = fs::read_to_string(path).map_err(|source| RenumberError::Io {
            action: "read",
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| RenumberError::Mapping {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn final_name(&self, position: u32) -> String {
        format!("{}-{:03}.{}", self.stem, position, self.extension)
    }

    pub fn temp_name(&self, position: u32) -> String {
        format!("{}-{:03}.{}", self.temp_stem, position, self.extension)
    }

    /// Reject an old id sent to two different positions; list the positions
    /// the table assigns more than once.
    pub fn validate(&self) -> Result<Vec<Collision>, RenumberError> {
        let mut targets: HashMap<u32, u32> = HashMap::new();

        for &(old, new) in &self.mapping {
            match targets.get(&old) {
                Some(&first) if first != new => {
                    return Err(RenumberError::ConflictingMapping { old, first, second: new });
                }
                Some(_) => {}
                None => {
                    targets.insert(old, new);
                }
            }
        }

        Ok(collisions(&self.mapping))
    }

    fn is_temp(&self, name: &str) -> bool {
        name.strip_prefix(&format!("{}-", self.temp_stem))
            .and_then(|rest| rest.strip_suffix(&format!(".{}", self.extension)))
            .is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenumberReport {
    /// (old id, new position) that were copied to a temp name.
    pub staged: Vec<(u32, u32)>,
    /// Source files that did not exist.
    pub missing: Vec<String>,
    pub finalized: Vec<String>,
    pub cleaned: Vec<String>,
    pub collisions: Vec<Collision>,
}

/// Positions reached by more than one old id, in order; the later id wins.
fn collisions(pairs: &[(u32, u32)]) -> Vec<Collision> {
    let mut owners: HashMap<u32, u32> = HashMap::new();
    let mut found = vec![];
    for &(old, new) in pairs {
        match owners.insert(new, old) {
            Some(previous) if previous != old => {
                found.push(Collision { position: new, discarded: previous, winner: old });
            }
            _ => {}
        }
    }
    found
}

fn io_err(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> RenumberError {
    let path = path.to_path_buf();
    move |source| RenumberError::Io { action, path, source }
}

/// Apply `plan` to its directory.
pub fn renumber(plan: &RenumberPlan) -> Result<RenumberReport, RenumberError> {
    if !plan.dir.is_dir() {
        return Err(RenumberError::DirectoryNotFound(plan.dir.clone()));
    }

    plan.validate()?;
    let mut report = RenumberReport::default();

    // Pass 1: stage
    let mut positions = BTreeSet::new();
    for &(old, new) in &plan.mapping {
        let source = plan.dir.join(plan.final_name(old));
        let temp = plan.dir.join(plan.temp_name(new));

        if source.is_file() {
            fs::copy(&source, &temp).map_err(io_err("copy", &source))?;
            info!(old, new, "staged");
            report.staged.push((old, new));
            positions.insert(new);
        } else {
            warn!(file = %plan.final_name(old), "missing");
            report.missing.push(plan.final_name(old));
        }
    }

    // Only sources that were actually staged compete for a position.
    report.collisions = collisions(&report.staged);
    for c in &report.collisions {
        warn!(position = c.position, discarded = c.discarded, winner = c.winner, "position assigned twice");
    }

    // Pass 2: promote
    for new in positions {
        let temp = plan.dir.join(plan.temp_name(new));
        let target = plan.dir.join(plan.final_name(new));

        if !temp.is_file() {
            continue;
        }
        if target.exists() {
            fs::remove_file(&target).map_err(io_err("remove", &target))?;
        }
        fs::rename(&temp, &target).map_err(io_err("rename", &temp))?;
        info!(file = %plan.final_name(new), "finalized");
        report.finalized.push(plan.final_name(new));
    }

    // Pass 3: clean up
    let mut leftovers: Vec<PathBuf> = fs::read_dir(&plan.dir)
        .map_err(io_err("read", &plan.dir))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map_or(false, |name| plan.is_temp(&name.to_string_lossy()))
        })
        .collect();
    leftovers.sort();
    for path in leftovers {
        fs::remove_file(&path).map_err(io_err("remove", &path))?;
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        info!(file = %name, "cleaned up");
        report.cleaned.push(name);
    }

    Ok(report)
}
