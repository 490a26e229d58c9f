use super::{BUSY_LABEL, GENERATE_LABEL};
use crate::controller::FormState;
use crate::models::{Ability, CharacterRecord, Field, PowerLevel, Relationships};

/// One bullet in a list section. `emphasis` is shown in bold before `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub emphasis: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Paragraph(String),
    List(Vec<ListItem>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub icon: &'static str,
    pub heading: &'static str,
    pub body: SectionBody,
}

/// Read-only display model for one character record.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterView {
    pub name: String,
    pub title: String,
    pub badges: Vec<String>,
    pub sections: Vec<Section>,
}

impl CharacterView {
    pub fn from_record(record: &CharacterRecord) -> Self {
        let text = |value: &Field<String>| value.as_str().unwrap_or_default().to_string();
        let paragraph = |icon, heading, value: &Field<String>| Section {
            icon,
            heading,
            body: SectionBody::Paragraph(text(value)),
        };

        let badges = vec![
            text(&record.species),
            text(&record.element),
            format!("Power: {}", text(&record.power_level)),
        ];

        let sections = vec![
            paragraph("👤", "Appearance", &record.appearance),
            Section {
                icon: "⚡",
                heading: "Abilities",
                body: SectionBody::List(
                    record
                        .abilities
                        .value()
                        .into_iter()
                        .flatten()
                        .map(ability_item)
                        .collect(),
                ),
            },
            paragraph("🎭", "Personality", &record.personality),
            paragraph("🏯", "Residence", &record.residence),
            paragraph("📖", "Background", &record.background),
            Section {
                icon: "👥",
                heading: "Relationships",
                body: relationships_body(record.relationships.value()),
            },
            paragraph("🎮", "Danmaku Style", &record.danmaku_style),
        ];

        Self {
            name: record.character_name.clone(),
            title: record.display_title(),
            badges,
            sections,
        }
    }

    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

fn ability_item(ability: &Ability) -> ListItem {
    match ability {
        Ability::Label(label) => ListItem {
            emphasis: None,
            text: label.clone(),
        },
        Ability::Detailed(detail) => ListItem {
            emphasis: Some(detail.name.clone()),
            text: detail.description.as_str().unwrap_or_default().to_string(),
        },
    }
}

fn relationships_body(relationships: Option<&Relationships>) -> SectionBody {
    match relationships {
        Some(Relationships::Summary(summary)) => SectionBody::Paragraph(summary.clone()),
        Some(Relationships::Map(entries)) => SectionBody::List(
            entries
                .iter()
                .map(|(name, relation)| ListItem {
                    emphasis: Some(name.clone()),
                    text: Relationships::relation_text(relation),
                })
                .collect(),
        ),
        None => SectionBody::List(Vec::new()),
    }
}

/// Display model for the whole form, derived from [`FormState`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub yokai_type: String,
    pub power_level: PowerLevel,
    pub element: String,
    pub button_label: &'static str,
    pub disabled: bool,
    pub error: Option<String>,
    pub character: Option<CharacterView>,
}

impl FormView {
    pub fn from_state(state: &FormState) -> Self {
        Self {
            yokai_type: state.yokai_type().to_string(),
            power_level: state.power_level(),
            element: state.element().to_string(),
            button_label: if state.loading() {
                BUSY_LABEL
            } else {
                GENERATE_LABEL
            },
            disabled: state.inputs_disabled(),
            error: state.error().map(str::to_string),
            character: state.character().map(CharacterView::from_record),
        }
    }
}
