//! Client Configuration - Loading and Build Settings
//!
//! The configuration is kept as a JSON tree. Scalars are resolved by dotted
//! path on demand; list sections are decoded into typed records only when a
//! template asks for them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/client-config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Error loading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config {0} must be a JSON object at the top level")]
    NotAnObject(PathBuf),
}

/// Client configuration document (`client`, `branding`, `content`, `media`,
/// `seo`, `forms`, `pages`).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    root: Value,
}

impl ClientConfig {
    pub fn from_value(root: Value) -> Option<Self> {
        root.is_object().then_some(Self { root })
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Follow a dotted path (`media.heroVideo.embedId`) into the tree.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.root, |node, segment| node.as_object()?.get(segment))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    pub fn client_name(&self) -> Option<&str> {
        self.lookup("client.name").and_then(Value::as_str)
    }

    pub fn primary_color(&self) -> Option<&str> {
        self.lookup("branding.primaryColor").and_then(Value::as_str)
    }
}

/// Read and parse a client configuration file.
pub fn load(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Io { path: path.to_path_buf(), source }
        }
    })?;

    let root: Value = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    ClientConfig::from_value(root).ok_or_else(|| ConfigError::NotAnObject(path.to_path_buf()))
}

/// `*.json` files in a config directory, sorted. Used for the not-found hint.
pub fn available_configs(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().map_or(false, |e| e == "json"))
            .collect(),
        Err(_) => vec![],
    };
    found.sort();
    found
}

/// Where templates are read from and where the site is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub assets_dir: PathBuf,
}

impl BuildSettings {
    pub fn from_root(root: &Path) -> Self {
        Self {
            template_dir: root.join("templates"),
            output_dir: root.join("output"),
            assets_dir: root.join("assets"),
        }
    }

    pub fn output_assets_dir(&self) -> PathBuf {
        self.output_dir.join("assets")
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self::from_root(Path::new("."))
    }
}

// --- Structured sections ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pillar {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    pub action: String,
    pub method: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub options: Vec<FormOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormOption {
    pub value: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationPage {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<EducationSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationSection {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationPage {
    pub title: String,
    pub subtitle: String,
    pub message: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
}
