//! Placeholder Substitution - Fixed Enumeration
//!
//! Only the paths listed here are ever substituted. Replacement is literal
//! substring replacement over the evolving text, in the order below:
//! scalars first, then list expansions. Values are inserted raw; a value
//! that itself contains a later placeholder will be substituted too.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

use crate::config::{
    ApplicationForm, ClientConfig, ConfirmationPage, EducationPage, Pillar, Testimonial,
};
use crate::fragments;

/// Scalar placeholders, substituted in this order.
pub const SCALAR_PATHS: &[&str] = &[
    "client.name",
    "client.businessName",
    "client.website",
    "client.email",
    "client.phone",
    "branding.primaryColor",
    "branding.secondaryColor",
    "branding.accentColor",
    "branding.textColor",
    "branding.backgroundColor",
    "branding.buttonColor",
    "branding.buttonTextColor",
    "content.heroTitle",
    "content.heroSubtitle",
    "content.heroDescription",
    "content.missionTitle",
    "content.missionText",
    "content.aboutTitle",
    "content.aboutText",
    "content.ctaTitle",
    "content.ctaSubtitle",
    "content.ctaButtonText",
    "content.ctaButtonUrl",
    "media.heroVideo.embedId",
    "media.logo",
    "media.favicon",
    "seo.title",
    "seo.description",
    "seo.keywords",
    "seo.ogImage",
];

pub const PILLARS_MARKER: &str = "{{content.pillars}}";
pub const TESTIMONIALS_MARKER: &str = "{{media.testimonials}}";
pub const FORM_MARKER: &str = "{{forms.applicationForm}}";
pub const EDUCATION_SECTIONS_MARKER: &str = "{{#each pages.education.sections}}";
pub const NEXT_STEPS_MARKER: &str = "{{#each pages.confirmation.nextSteps}}";

/// Optional sections: (config path, markers that stay verbatim without it).
pub const OPTIONAL_SECTIONS: &[(&str, &[&str])] = &[
    ("content.pillars", &[PILLARS_MARKER]),
    ("media.testimonials", &[TESTIMONIALS_MARKER]),
    ("forms.applicationForm", &[FORM_MARKER]),
    (
        "pages.education",
        &["{{pages.education.title}}", EDUCATION_SECTIONS_MARKER],
    ),
    (
        "pages.confirmation",
        &[
            "{{pages.confirmation.title}}",
            "{{pages.confirmation.subtitle}}",
            "{{pages.confirmation.message}}",
            NEXT_STEPS_MARKER,
        ],
    ),
];

#[derive(Debug, Error)]
pub enum SubstitutionError {
    #[error("Missing config value: {0}")]
    MissingField(String),

    #[error("Config value {0} must be a string, number or boolean")]
    NotScalar(String),

    #[error("Invalid config section {section}: {source}")]
    InvalidSection {
        section: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn placeholder(path: &str) -> String {
    format!("{{{{{}}}}}", path)
}

/// Render a scalar config value as placeholder text.
pub fn scalar_text(config: &ClientConfig, path: &str) -> Result<String, SubstitutionError> {
    match config.lookup(path) {
        None => Err(SubstitutionError::MissingField(path.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(SubstitutionError::NotScalar(path.to_string())),
    }
}

fn section<T: DeserializeOwned>(
    config: &ClientConfig,
    path: &str,
) -> Result<Option<T>, SubstitutionError> {
    config
        .lookup(path)
        .map(|value| {
            serde_json::from_value(value.clone()).map_err(|source| SubstitutionError::InvalidSection {
                section: path.to_string(),
                source,
            })
        })
        .transpose()
}

/// Whether any marker of the optional section at `path` occurs in `text`.
fn mentions(text: &str, path: &str) -> bool {
    OPTIONAL_SECTIONS
        .iter()
        .filter(|(section, _)| *section == path)
        .flat_map(|(_, markers)| markers.iter())
        .any(|marker| text.contains(marker))
}

fn replace_scalar(
    text: String,
    config: &ClientConfig,
    path: &str,
) -> Result<String, SubstitutionError> {
    let marker = placeholder(path);
    if !text.contains(&marker) {
        return Ok(text);
    }
    let value = scalar_text(config, path)?;
    debug!(path, "substituted placeholder");
    Ok(text.replace(&marker, &value))
}

/// Substitute every supported placeholder in `template`.
///
/// The input is never modified. A referenced scalar that the configuration
/// lacks is an error; an absent optional section leaves its markers as-is.
pub fn substitute(config: &ClientConfig, template: &str) -> Result<String, SubstitutionError> {
    let mut text = template.to_string();

    for path in SCALAR_PATHS {
        text = replace_scalar(text, config, path)?;
    }

    if text.contains(PILLARS_MARKER) {
        if let Some(items) = section::<Vec<Pillar>>(config, "content.pillars")? {
            text = text.replace(PILLARS_MARKER, &fragments::pillars(&items));
        }
    }

    if text.contains(TESTIMONIALS_MARKER) {
        if let Some(items) = section::<Vec<Testimonial>>(config, "media.testimonials")? {
            text = text.replace(TESTIMONIALS_MARKER, &fragments::testimonials(&items));
        }
    }

    if text.contains(FORM_MARKER) {
        if let Some(form) = section::<ApplicationForm>(config, "forms.applicationForm")? {
            let button = scalar_text(config, "content.ctaButtonText")?;
            text = text.replace(FORM_MARKER, &fragments::application_form(&form, &button));
        }
    }

    let education = if mentions(&text, "pages.education") {
        section::<EducationPage>(config, "pages.education")?
    } else {
        None
    };
    if let Some(education) = education {
        text = text.replace("{{pages.education.title}}", &education.title);
        text = text.replace(
            EDUCATION_SECTIONS_MARKER,
            &fragments::education_sections(&education.sections),
        );
    }

    let confirmation = if mentions(&text, "pages.confirmation") {
        section::<ConfirmationPage>(config, "pages.confirmation")?
    } else {
        None
    };
    if let Some(confirmation) = confirmation {
        text = text.replace("{{pages.confirmation.title}}", &confirmation.title);
        text = text.replace("{{pages.confirmation.subtitle}}", &confirmation.subtitle);
        text = text.replace("{{pages.confirmation.message}}", &confirmation.message);
        text = text.replace(
            NEXT_STEPS_MARKER,
            &fragments::next_steps(&confirmation.next_steps),
        );
    }

    Ok(text)
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{[^{}]*\}\}").expect("static marker pattern"))
}

/// Distinct `{{...}}` markers left in `text`, in first-seen order.
pub fn unresolved_markers(text: &str) -> Vec<String> {
    let mut seen: Vec<String> = vec![];
    for m in marker_pattern().find_iter(text) {
        if !seen.iter().any(|s| s == m.as_str()) {
            seen.push(m.as_str().to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> ClientConfig {
        ClientConfig::from_value(value).unwrap()
    }

    #[test]
    fn test_scalar_substitution() {
        let cfg = config(json!({
            "client": {"name": "Acme"},
            "branding": {"primaryColor": "#000"}
        }));
        let out = substitute(&cfg, "Hello {{client.name}}, color {{branding.primaryColor}}").unwrap();
        assert_eq!(out, "Hello Acme, color #000");
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let cfg = config(json!({"client": {"name": "Acme"}}));
        let out = substitute(&cfg, "{{client.name}} / {{client.name}}").unwrap();
        assert_eq!(out, "Acme / Acme");
    }

    #[test]
    fn test_input_untouched() {
        let cfg = config(json!({"client": {"name": "Acme"}}));
        let template = String::from("<h1>{{client.name}}</h1>");
        let _ = substitute(&cfg, &template).unwrap();
        assert_eq!(template, "<h1>{{client.name}}</h1>");
    }

    #[test]
    fn test_missing_referenced_field_fails() {
        let cfg = config(json!({"client": {"name": "Acme"}}));
        let err = substitute(&cfg, "{{client.email}}").unwrap_err();
        assert!(matches!(err, SubstitutionError::MissingField(p) if p == "client.email"));
    }

    #[test]
    fn test_numbers_render_as_text() {
        let cfg = config(json!({"client": {"phone": 5551234}}));
        assert_eq!(substitute(&cfg, "{{client.phone}}").unwrap(), "5551234");
    }

    #[test]
    fn test_object_value_is_not_scalar() {
        let cfg = config(json!({"media": {"logo": {"src": "x.png"}}}));
        let err = substitute(&cfg, "{{media.logo}}").unwrap_err();
        assert!(matches!(err, SubstitutionError::NotScalar(_)));
    }

    #[test]
    fn test_unknown_placeholder_left_alone() {
        let cfg = config(json!({}));
        assert_eq!(substitute(&cfg, "{{client.nickname}}").unwrap(), "{{client.nickname}}");
    }

    #[test]
    fn test_absent_optional_sections_stay_verbatim() {
        let cfg = config(json!({"content": {"ctaButtonText": "Apply"}}));
        let template = "{{content.pillars}}|{{media.testimonials}}|{{forms.applicationForm}}|\
                        {{pages.education.title}}|{{#each pages.confirmation.nextSteps}}";
        assert_eq!(substitute(&cfg, template).unwrap(), template);
    }

    #[test]
    fn test_pillars_expand_in_order() {
        let cfg = config(json!({"content": {"pillars": [
            {"title": "One", "description": "1"},
            {"title": "Two", "description": "2"},
            {"title": "Three", "description": "3"}
        ]}}));
        let out = substitute(&cfg, "<div>{{content.pillars}}</div>").unwrap();
        assert_eq!(out.matches("class=\"pillar\"").count(), 3);
        let one = out.find("One").unwrap();
        let two = out.find("Two").unwrap();
        let three = out.find("Three").unwrap();
        assert!(one < two && two < three);
        assert!(!out.contains("{{"));
    }

    #[test]
    fn test_form_uses_cta_button_text() {
        let cfg = config(json!({
            "content": {"ctaButtonText": "Apply Now"},
            "forms": {"applicationForm": {
                "action": "/apply", "method": "post",
                "fields": [{"name": "email", "label": "Email", "type": "email", "required": true}]
            }}
        }));
        let out = substitute(&cfg, "{{forms.applicationForm}}").unwrap();
        assert!(out.contains("<form action=\"/apply\" method=\"post\""));
        assert!(out.contains(">Apply Now</button>"));
    }

    #[test]
    fn test_malformed_section_is_error() {
        let cfg = config(json!({"content": {"pillars": "not a list"}}));
        let err = substitute(&cfg, "{{content.pillars}}").unwrap_err();
        assert!(matches!(err, SubstitutionError::InvalidSection { .. }));
    }

    #[test]
    fn test_confirmation_page() {
        let cfg = config(json!({"pages": {"confirmation": {
            "title": "Thanks", "subtitle": "Received", "message": "We will call",
            "nextSteps": ["Check inbox", "Prepare"]
        }}}));
        let out = substitute(
            &cfg,
            "{{pages.confirmation.title}}:{{pages.confirmation.subtitle}}:\
             {{pages.confirmation.message}}<ul>{{#each pages.confirmation.nextSteps}}</ul>",
        )
        .unwrap();
        assert_eq!(
            out,
            "Thanks:Received:We will call<ul><li>Check inbox</li><li>Prepare</li></ul>"
        );
    }

    #[test]
    fn test_value_containing_placeholder_is_substituted_later() {
        let cfg = config(json!({
            "client": {"name": "see {{media.logo}}"},
            "media": {"logo": "logo.png"}
        }));
        assert_eq!(substitute(&cfg, "{{client.name}}").unwrap(), "see logo.png");
    }

    #[test]
    fn test_unresolved_markers_distinct() {
        let found = unresolved_markers("{{a.b}} x {{#each c.d}} {{a.b}} {not}");
        assert_eq!(found, vec!["{{a.b}}", "{{#each c.d}}"]);
    }
}
