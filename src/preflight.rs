//! Preflight Check - Placeholder Presence
//!
//! Rules produce structured violations; nothing is written.
//! Only attribute presence is checked, never value shape beyond scalars.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::substitution::{placeholder, FORM_MARKER, OPTIONAL_SECTIONS, SCALAR_PATHS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub path: String,
    pub message: String,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightResult {
    pub template: String,
    pub ready: bool,
    pub violations: Vec<Violation>,
}

impl PreflightResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }
}

/// Preflight rule - inspects template text against the configuration
pub trait PreflightRule {
    fn name(&self) -> &'static str;
    fn check(&self, config: &ClientConfig, template: &str) -> Vec<Violation>;
}

// --- Concrete Rules ---

/// Every referenced scalar placeholder must resolve to a scalar value.
pub struct ScalarPresenceRule;

impl PreflightRule for ScalarPresenceRule {
    fn name(&self) -> &'static str { "scalar_presence" }

    fn check(&self, config: &ClientConfig, template: &str) -> Vec<Violation> {
        let mut referenced: Vec<&str> = SCALAR_PATHS
            .iter()
            .copied()
            .filter(|path| template.contains(&placeholder(path)))
            .collect();
        // The form's submit button reads the CTA label.
        if template.contains(FORM_MARKER)
            && config.contains("forms.applicationForm")
            && !referenced.contains(&"content.ctaButtonText")
        {
            referenced.push("content.ctaButtonText");
        }

        referenced
            .into_iter()
            .filter_map(|path| match config.lookup(path) {
                None => Some(Violation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    path: path.to_string(),
                    message: "Missing config value".to_string(),
                    remediation: vec![format!("Add `{}` to the client config", path)],
                }),
                Some(Value::Object(_)) | Some(Value::Array(_)) | Some(Value::Null) => Some(Violation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    path: path.to_string(),
                    message: "Config value is not a string, number or boolean".to_string(),
                    remediation: vec![format!("Set `{}` to a plain text value", path)],
                }),
                Some(_) => None,
            })
            .collect()
    }
}

/// Markers of absent optional sections stay verbatim in the page.
pub struct OptionalSectionRule;

impl PreflightRule for OptionalSectionRule {
    fn name(&self) -> &'static str { "optional_section" }

    fn check(&self, config: &ClientConfig, template: &str) -> Vec<Violation> {
        let mut violations = vec![];
        for (section, markers) in OPTIONAL_SECTIONS {
            if config.contains(section) {
                continue;
            }
            for marker in markers.iter().filter(|m| template.contains(*m)) {
                violations.push(Violation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Info,
                    path: section.to_string(),
                    message: format!("{} will be left as-is", marker),
                    remediation: vec![format!("Add `{}` to fill this marker", section)],
                });
            }
        }
        violations
    }
}

/// Preflight runs every rule over one template
pub struct Preflight {
    rules: Vec<Box<dyn PreflightRule>>,
}

impl Preflight {
    pub fn new() -> Self {
        Self {
            rules: vec![Box::new(ScalarPresenceRule), Box::new(OptionalSectionRule)],
        }
    }

    pub fn check(&self, config: &ClientConfig, name: &str, template: &str) -> PreflightResult {
        let violations: Vec<Violation> = self
            .rules
            .iter()
            .flat_map(|rule| rule.check(config, template))
            .collect();
        let ready = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);

        PreflightResult { template: name.to_string(), ready, violations }
    }
}

impl Default for Preflight {
    fn default() -> Self {
        Self::new()
    }
}
