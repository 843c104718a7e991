//! HTML fragments for list-expansion markers
//!
//! One fragment per item, concatenated in input order.

use crate::config::{
    ApplicationForm, EducationSection, FormField, Pillar, Testimonial,
};

pub const DEFAULT_TEXTAREA_ROWS: u32 = 3;

pub fn pillars(items: &[Pillar]) -> String {
    items
        .iter()
        .map(|pillar| {
            format!(
                "\n<div class=\"pillar\">\n    <h3>{}</h3>\n    <p>{}</p>\n</div>",
                pillar.title, pillar.description
            )
        })
        .collect()
}

pub fn testimonials(items: &[Testimonial]) -> String {
    items.iter().map(testimonial).collect()
}

fn testimonial(t: &Testimonial) -> String {
    format!(
        "\n<div class=\"testimonial-picture-card\">\
         \n    <img src=\"{}\" alt=\"{}\" class=\"result-img\" loading=\"lazy\">\
         \n    <div class=\"testimonial-info\">\
         \n        <h4>{}</h4>\
         \n        <p class=\"result\">{}</p>\
         \n        <p class=\"description\">{}</p>\
         \n    </div>\
         \n</div>",
        t.image, t.name, t.name, t.result, t.description
    )
}

/// The whole `<form>` element; the submit button reuses the CTA label.
pub fn application_form(form: &ApplicationForm, button_text: &str) -> String {
    let fields: String = form.fields.iter().map(form_field).collect();
    format!(
        "\n<form action=\"{}\" method=\"{}\" class=\"application-form\" id=\"application-form\">\
         {}\
         \n    <button type=\"submit\" class=\"cta-button\">{}</button>\
         \n</form>",
        form.action, form.method, fields, button_text
    )
}

pub fn form_field(field: &FormField) -> String {
    let marker = if field.required { " *" } else { "" };
    let required = if field.required { " required" } else { "" };
    let label = format!(
        "\n    <label for=\"{}\">{}{}</label>",
        field.name, field.label, marker
    );

    let control = match field.kind.as_str() {
        "select" => {
            let prompt = format!("\n        <option value=\"\">Select {}</option>", field.label);
            let options: String = field
                .options
                .iter()
                .map(|option| {
                    format!("\n        <option value=\"{}\">{}</option>", option.value, option.text)
                })
                .collect();
            format!(
                "\n    <select name=\"{0}\" id=\"{0}\"{1}>{2}{3}\n    </select>",
                field.name, required, prompt, options
            )
        }
        "textarea" => format!(
            "\n    <textarea name=\"{0}\" id=\"{0}\" placeholder=\"{1}\" rows=\"{2}\"{3}></textarea>",
            field.name,
            field.placeholder,
            field.rows.unwrap_or(DEFAULT_TEXTAREA_ROWS),
            required
        ),
        other => format!(
            "\n    <input type=\"{0}\" name=\"{1}\" id=\"{1}\" placeholder=\"{2}\"{3}>",
            other, field.name, field.placeholder, required
        ),
    };

    format!("\n<div class=\"form-group\">{}{}\n</div>", label, control)
}

pub fn education_sections(items: &[EducationSection]) -> String {
    items
        .iter()
        .map(|section| {
            format!(
                "\n<section class=\"education-section\">\
             \n    <h2 class=\"section-title\">{}</h2>\
             \n    <p class=\"section-text\">{}</p>\
             \n</section>",
                section.title, section.content
            )
        })
        .collect()
}

pub fn next_steps(steps: &[String]) -> String {
    steps.iter().map(|step| format!("<li>{}</li>", step)).collect()
}
