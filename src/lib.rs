//! ForgeFunnel Core - Landing Page Compiler
//!
//! # The Rules
//! 1. Config Is Truth
//! 2. Placeholders Are Enumerated
//! 3. One Bad Page Never Stops The Build
//! 4. Assets Always Resolve
//! 5. Renames Never Destroy A Source

pub mod config;
pub mod substitution;
pub mod fragments;
pub mod preflight;
pub mod assets;
pub mod hashing;
pub mod pipeline;
pub mod renumber;
pub mod logging;

pub use config::{BuildSettings, ClientConfig, ConfigError};
pub use substitution::{substitute, unresolved_markers, SubstitutionError};
pub use preflight::{Preflight, PreflightResult, Violation, ViolationSeverity};
pub use assets::{materialize, AssetAction, AssetError, AssetReport};
pub use hashing::{canonical_json, config_fingerprint, tree_digest};
pub use pipeline::{BuildError, BuildPipeline, BuildReport, PageOutcome, PageStatus, TemplateError, PAGES};
pub use renumber::{renumber, RenumberError, RenumberPlan, RenumberReport};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
