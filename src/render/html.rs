use super::view::{CharacterView, FormView, SectionBody};
use super::{ELEMENT_HINT, YOKAI_TYPE_HINT};
use crate::models::PowerLevel;
use html_escape::{encode_double_quoted_attribute, encode_text};

const PAGE_TITLE: &str = "🦊 Touhou Character Generator ⚡";

/// Render the form and, when present, the character as a standalone page.
pub fn render_page(form: &FormView) -> String {
    let mut output = String::new();
    output.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    output.push_str("  <meta charset=\"utf-8\" />\n");
    output.push_str("  <title>");
    output.push_str(&encode_text(PAGE_TITLE));
    output.push_str("</title>\n</head>\n<body>\n  <div class=\"container\">\n    <header><h1>");
    output.push_str(&encode_text(PAGE_TITLE));
    output.push_str("</h1></header>\n    <div class=\"generator-card\">\n");
    output.push_str(&render_form(form));
    if let Some(character) = &form.character {
        output.push_str(&render_character(character));
    }
    output.push_str("    </div>\n  </div>\n</body>\n</html>\n");
    output
}

fn render_form(form: &FormView) -> String {
    let disabled = if form.disabled { " disabled" } else { "" };

    let options: String = PowerLevel::ALL
        .iter()
        .map(|level| {
            let selected = if *level == form.power_level {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                encode_double_quoted_attribute(level.as_str()),
                selected,
                encode_text(level.label())
            )
        })
        .collect();

    let error_block = match &form.error {
        Some(error) => format!("<div class=\"error\">{}</div>", encode_text(error)),
        None => String::new(),
    };

    format!(
        "      <div class=\"input-section\"><div class=\"input-group\"><label>Yokai Type *</label><input type=\"text\" placeholder=\"{}\" value=\"{}\"{} /></div><div class=\"input-group\"><label>Power Level</label><select{}>{}</select></div><div class=\"input-group\"><label>Element (Optional)</label><input type=\"text\" placeholder=\"{}\" value=\"{}\"{} /></div><button class=\"generate-btn\"{}>{}</button>{}</div>\n",
        encode_double_quoted_attribute(YOKAI_TYPE_HINT),
        encode_double_quoted_attribute(&form.yokai_type),
        disabled,
        disabled,
        options,
        encode_double_quoted_attribute(ELEMENT_HINT),
        encode_double_quoted_attribute(&form.element),
        disabled,
        disabled,
        encode_text(form.button_label),
        error_block
    )
}

fn render_character(view: &CharacterView) -> String {
    let badge_classes = ["species", "element", "power"];
    let badges: String = view
        .badges
        .iter()
        .zip(badge_classes)
        .map(|(badge, class)| {
            format!(
                "<span class=\"badge {}\">{}</span>",
                class,
                encode_text(badge)
            )
        })
        .collect();

    let mut sections = String::new();
    for section in &view.sections {
        let body = match &section.body {
            SectionBody::Paragraph(text) => format!("<p>{}</p>", encode_text(text)),
            SectionBody::List(items) => {
                let items: String = items
                    .iter()
                    .map(|item| match &item.emphasis {
                        Some(emphasis) => format!(
                            "<li><strong>{}:</strong> {}</li>",
                            encode_text(emphasis),
                            encode_text(&item.text)
                        ),
                        None => format!("<li>{}</li>", encode_text(&item.text)),
                    })
                    .collect();
                format!("<ul class=\"abilities-list\">{}</ul>", items)
            }
        };
        sections.push_str(&format!(
            "<div class=\"character-section\"><h3>{} {}</h3>{}</div>",
            section.icon, section.heading, body
        ));
    }

    format!(
        "      <div class=\"character-display\"><div class=\"character-header\"><h2>{}</h2><p class=\"title\">{}</p><div class=\"badges\">{}</div></div>{}</div>\n",
        encode_text(&view.name),
        encode_text(&view.title),
        badges,
        sections
    )
}
