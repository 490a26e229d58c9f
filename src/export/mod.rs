//! JSON export of generated characters
//!
//! Serialization is a pure step ([`export_record`]) that yields the bytes and
//! suggested file name; handing them to the user is a separate
//! [`ExportSink`] so the two can be tested and swapped independently.

pub mod file;
pub mod mock;

pub use file::FileExportSink;
pub use mock::MockExportSink;

use crate::models::CharacterRecord;
use crate::Result;
use async_trait::async_trait;

/// Serialized character ready to be delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub filename: String,
    pub contents: Vec<u8>,
}

#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Deliver an artifact and return where it ended up.
    async fn deliver(&self, artifact: &ExportArtifact) -> Result<String>;
}

/// Pretty-print a record and derive its download name.
pub fn export_record(character: &CharacterRecord) -> Result<ExportArtifact> {
    let json = serde_json::to_string_pretty(character)?;
    Ok(ExportArtifact {
        filename: export_filename(&character.character_name),
        contents: json.into_bytes(),
    })
}

/// `Kuzuha  no Kitsune` -> `Kuzuha_no_Kitsune.json`.
///
/// Every whitespace run becomes one `_`; path separators are replaced too so
/// the name never leaves the export directory.
pub fn export_filename(character_name: &str) -> String {
    let mut name = String::with_capacity(character_name.len() + 5);
    let mut in_whitespace = false;
    for ch in character_name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                name.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        name.push(if matches!(ch, '/' | '\\') { '_' } else { ch });
    }
    name.push_str(".json");
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ability, Relationships};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_export_filename_collapses_whitespace() {
        assert_eq!(export_filename("Kuzuha"), "Kuzuha.json");
        assert_eq!(export_filename("Kuzuha  no\tKitsune"), "Kuzuha_no_Kitsune.json");
        assert_eq!(export_filename(" Aya "), "_Aya_.json");
        assert_eq!(export_filename("Ran/Chen"), "Ran_Chen.json");
    }

    #[test]
    fn test_export_round_trips_received_payload() {
        let payload = json!({
            "characterName": "Kuzuha Inari",
            "title": "Fox of the Bamboo Grove",
            "species": "Kitsune",
            "element": "Fire",
            "powerLevel": "stage 3 boss",
            "appearance": "Nine golden tails",
            "abilities": ["Fox Fire", { "name": "Illusion Veil", "description": "Conceals true form" }],
            "personality": "Mischievous",
            "residence": "Bamboo Forest of the Lost",
            "background": "Once served a shrine",
            "relationships": { "Reimu": "Rival", "Ran": "Distant cousin" },
            "danmakuStyle": "Spiralling foxfire",
            "spellCards": ["Fox Sign \"Kitsunebi\""]
        });
        let record: CharacterRecord = serde_json::from_value(payload.clone()).unwrap();

        let artifact = export_record(&record).unwrap();
        assert_eq!(artifact.filename, "Kuzuha_Inari.json");

        let text = String::from_utf8(artifact.contents).unwrap();
        assert!(text.contains("\n  \"characterName\": \"Kuzuha Inari\""));

        let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, payload);
        let record_again: CharacterRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(record_again, record);
    }

    #[test]
    fn test_export_keeps_plain_shapes() {
        let record = CharacterRecord {
            character_name: "Kuzuha".to_string(),
            abilities: vec![Ability::Label("Fox Fire".to_string())].into(),
            relationships: Relationships::Summary("None known".to_string()).into(),
            ..Default::default()
        };
        let artifact = export_record(&record).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&artifact.contents).unwrap();

        assert_eq!(
            value,
            json!({
                "characterName": "Kuzuha",
                "abilities": ["Fox Fire"],
                "relationships": "None known"
            })
        );
    }
}
