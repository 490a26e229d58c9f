use super::view::{CharacterView, FormView, SectionBody};
use super::{ELEMENT_HINT, YOKAI_TYPE_HINT};

/// Render the form block for the terminal: inputs, trigger, and error line.
pub fn render_status(form: &FormView) -> String {
    let input = |value: &str, hint: &str| {
        if value.is_empty() {
            format!("({})", hint)
        } else {
            value.to_string()
        }
    };
    let disabled = if form.disabled { " (disabled)" } else { "" };

    let mut lines = vec![
        format!("Yokai Type *: {}", input(&form.yokai_type, YOKAI_TYPE_HINT)),
        format!("Power Level: {}", form.power_level.label()),
        format!("Element (Optional): {}", input(&form.element, ELEMENT_HINT)),
        format!("[{}]{}", form.button_label, disabled),
    ];
    if let Some(error) = &form.error {
        lines.push(format!("Error: {}", error));
    }
    lines.join("\n")
}

/// Render a character as Markdown-flavoured terminal text.
pub fn render_character(view: &CharacterView) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n", view.name));
    out.push_str(&format!("{}\n", view.title));
    let badges: Vec<String> = view.badges.iter().map(|b| format!("[{}]", b)).collect();
    out.push_str(&badges.join(" "));
    out.push('\n');

    for section in &view.sections {
        out.push_str(&format!("\n## {} {}\n", section.icon, section.heading));
        match &section.body {
            SectionBody::Paragraph(text) => {
                out.push_str(text);
                out.push('\n');
            }
            SectionBody::List(items) => {
                for item in items {
                    match &item.emphasis {
                        Some(emphasis) => {
                            out.push_str(&format!("- **{}:** {}\n", emphasis, item.text))
                        }
                        None => out.push_str(&format!("- {}\n", item.text)),
                    }
                }
            }
        }
    }
    out
}
