//! Build Pipeline - Single Entry Point
//!
//! `build` always processes every page. A page that fails is reported and
//! skipped; it never stops the remaining pages or the asset step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::assets::{self, AssetReport};
use crate::config::{BuildSettings, ClientConfig};
use crate::hashing::{config_fingerprint, tree_digest};
use crate::substitution::{self, SubstitutionError};
use crate::ENGINE_VERSION;

/// Template file, output file. Processed in this order.
pub const PAGES: [(&str, &str); 3] = [
    ("index.html", "index.html"),
    ("education-page.html", "education-page.html"),
    ("confirmation-page.html", "confirmation-page.html"),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Substitution(#[from] SubstitutionError),
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fingerprint config: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Built,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOutcome {
    pub template: String,
    pub output: String,
    pub status: PageStatus,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub unresolved: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetOutcome {
    #[serde(flatten)]
    pub report: AssetReport,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub digest: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub id: String,
    pub engine_version: String,
    pub started_at: DateTime<Utc>,
    pub client_name: Option<String>,
    pub primary_color: Option<String>,
    pub output_dir: PathBuf,
    pub config_fingerprint: String,
    pub pages: Vec<PageOutcome>,
    pub assets: AssetOutcome,
}

impl BuildReport {
    pub fn failed_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.status == PageStatus::Failed).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed_pages() == 0 && self.assets.error.is_none()
    }
}

/// The build pipeline - owns the output directory for one client config
pub struct BuildPipeline {
    config: ClientConfig,
    settings: BuildSettings,
}

impl BuildPipeline {
    pub fn new(config: ClientConfig, settings: BuildSettings) -> Self {
        Self { config, settings }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Read `template_file`, substitute, write `output_file`.
    ///
    /// Returns the distinct placeholder markers still present in the output.
    pub fn process_template(
        &self,
        template_file: &str,
        output_file: &str,
    ) -> Result<Vec<String>, TemplateError> {
        let template_path = self.settings.template_dir.join(template_file);
        let content = fs::read_to_string(&template_path).map_err(|source| TemplateError::Read {
            path: template_path.clone(),
            source,
        })?;

        let processed = substitution::substitute(&self.config, &content)?;

        let output_path = self.settings.output_dir.join(output_file);
        fs::write(&output_path, &processed).map_err(|source| TemplateError::Write {
            path: output_path.clone(),
            source,
        })?;

        let unresolved = substitution::unresolved_markers(&processed);
        for marker in &unresolved {
            warn!(template = template_file, %marker, "placeholder left in output");
        }
        Ok(unresolved)
    }

    /// Build every page and the asset tree.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let started_at = Utc::now();
        info!(
            client = self.config.client_name().unwrap_or_default(),
            output = %self.settings.output_dir.display(),
            "building funnel template"
        );

        let assets_dir = self.settings.output_assets_dir();
        fs::create_dir_all(&assets_dir).map_err(|source| BuildError::OutputDir {
            path: assets_dir.clone(),
            source,
        })?;

        let pages = PAGES
            .iter()
            .map(|(template, output)| self.build_page(template, output))
            .collect();

        let assets = self.build_assets(&assets_dir);

        Ok(BuildReport {
            id: Uuid::new_v4().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            started_at,
            client_name: self.config.client_name().map(str::to_string),
            primary_color: self.config.primary_color().map(str::to_string),
            output_dir: self.settings.output_dir.clone(),
            config_fingerprint: config_fingerprint(self.config.as_value())?,
            pages,
            assets,
        })
    }

    fn build_page(&self, template: &str, output: &str) -> PageOutcome {
        match self.process_template(template, output) {
            Ok(unresolved) => {
                info!(template, output, "processed template");
                PageOutcome {
                    template: template.to_string(),
                    output: output.to_string(),
                    status: PageStatus::Built,
                    error: None,
                    unresolved,
                }
            }
            Err(e) => {
                error!(template, error = %e, "error processing template");
                PageOutcome {
                    template: template.to_string(),
                    output: output.to_string(),
                    status: PageStatus::Failed,
                    error: Some(e.to_string()),
                    unresolved: vec![],
                }
            }
        }
    }

    fn build_assets(&self, assets_dir: &Path) -> AssetOutcome {
        let report = match assets::materialize(&self.settings.assets_dir, assets_dir) {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "error copying assets");
                return AssetOutcome {
                    report: AssetReport::default(),
                    error: Some(e.to_string()),
                    digest: None,
                };
            }
        };

        let error = (!report.is_complete()).then(|| {
            let names: Vec<&str> = report.failures.iter().map(|f| f.name.as_str()).collect();
            format!("Failed to copy {} asset(s): {}", names.len(), names.join(", "))
        });

        let digest = match tree_digest(assets_dir) {
            Ok(digest) => Some(digest),
            Err(e) => {
                warn!(error = %e, "failed to digest asset tree");
                None
            }
        };

        AssetOutcome { report, error, digest }
    }
}
