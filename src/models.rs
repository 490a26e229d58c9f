//! Data models and structures
//!
//! Defines the wire types exchanged with the generation service, the
//! character record it returns, and runtime configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str =
    "https://uv0amevpah.execute-api.us-east-1.amazonaws.com/prod/generate";
pub const DEFAULT_EXPORT_DIR: &str = "output";

/// Boss tier requested from the generation service.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PowerLevel {
    #[serde(rename = "stage 1 boss")]
    Stage1,
    #[serde(rename = "stage 2 boss")]
    Stage2,
    #[default]
    #[serde(rename = "stage 3 boss")]
    Stage3,
    #[serde(rename = "stage 4 boss")]
    Stage4,
    #[serde(rename = "stage 5 boss")]
    Stage5,
    #[serde(rename = "stage 6 boss")]
    Stage6,
    #[serde(rename = "extra boss")]
    Extra,
    #[serde(rename = "phantasm boss")]
    Phantasm,
}

impl PowerLevel {
    pub const ALL: [PowerLevel; 8] = [
        PowerLevel::Stage1,
        PowerLevel::Stage2,
        PowerLevel::Stage3,
        PowerLevel::Stage4,
        PowerLevel::Stage5,
        PowerLevel::Stage6,
        PowerLevel::Extra,
        PowerLevel::Phantasm,
    ];

    /// Value sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerLevel::Stage1 => "stage 1 boss",
            PowerLevel::Stage2 => "stage 2 boss",
            PowerLevel::Stage3 => "stage 3 boss",
            PowerLevel::Stage4 => "stage 4 boss",
            PowerLevel::Stage5 => "stage 5 boss",
            PowerLevel::Stage6 => "stage 6 boss",
            PowerLevel::Extra => "extra boss",
            PowerLevel::Phantasm => "phantasm boss",
        }
    }

    /// Human-facing option label.
    pub fn label(&self) -> &'static str {
        match self {
            PowerLevel::Stage1 => "Stage 1 Boss",
            PowerLevel::Stage2 => "Stage 2 Boss",
            PowerLevel::Stage3 => "Stage 3 Boss",
            PowerLevel::Stage4 => "Stage 4 Boss",
            PowerLevel::Stage5 => "Stage 5 Boss",
            PowerLevel::Stage6 => "Stage 6 Boss",
            PowerLevel::Extra => "Extra Boss",
            PowerLevel::Phantasm => "Phantasm Boss",
        }
    }
}

impl fmt::Display for PowerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerLevel {
    type Err = String;

    /// Accepts the wire value, the label, or a dashed form like `stage-3-boss`.
    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase().replace(['-', '_'], " ");
        PowerLevel::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| {
                let options: Vec<&str> = PowerLevel::ALL.iter().map(|l| l.as_str()).collect();
                format!(
                    "Unknown power level '{}'. Expected one of: {}",
                    input,
                    options.join(", ")
                )
            })
    }
}

/// Request body sent to the generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    pub yokai_type: String,
    pub power_level: PowerLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
}

impl GenerationRequest {
    /// Build a request from raw form inputs.
    ///
    /// A blank element is left out of the body entirely; any other value is
    /// sent as typed.
    pub fn new(yokai_type: &str, power_level: PowerLevel, element: &str) -> Self {
        let element = if element.trim().is_empty() {
            None
        } else {
            Some(element.to_string())
        };

        Self {
            yokai_type: yokai_type.to_string(),
            power_level,
            element,
        }
    }
}

/// Top-level response envelope from the generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GenerationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<CharacterRecord>,
}

impl GenerationResponse {
    pub fn succeeded(character: CharacterRecord) -> Self {
        Self {
            success: true,
            character: Some(character),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            character: None,
        }
    }

    /// Unwrap the envelope, yielding the record only when `success` is set.
    pub fn into_character(self) -> crate::Result<CharacterRecord> {
        match (self.success, self.character) {
            (true, Some(character)) => Ok(character),
            _ => Err(crate::Error::GenerationFailed),
        }
    }
}

/// A record field that keeps the difference between an absent key and an
/// explicit `null`, so both survive a decode/encode cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> Field<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(value) => Some(value),
            Field::Missing | Field::Null => None,
        }
    }
}

impl Field<String> {
    pub fn as_str(&self) -> Option<&str> {
        self.value().map(String::as_str)
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Value(value)
    }
}

impl From<&str> for Field<String> {
    fn from(value: &str) -> Self {
        Field::Value(value.to_string())
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Field::Value(value) => value.serialize(serializer),
            Field::Missing | Field::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        // Only reached when the key is present; absent keys take `Default`.
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Field::Null, Field::Value))
    }
}

/// Object form of an ability. Unknown keys are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AbilityDetail {
    pub name: String,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub description: Field<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AbilityDetail {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// One entry of a character's ability list.
///
/// Variant order matters for `#[serde(untagged)]` decoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Ability {
    Label(String),
    Detailed(AbilityDetail),
}

/// Relationships come back either as free text or as name -> relation pairs.
///
/// Relations are usually strings but any JSON value is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Relationships {
    Summary(String),
    Map(BTreeMap<String, serde_json::Value>),
}

impl Relationships {
    /// Text shown for one relation: strings verbatim, anything else as JSON.
    pub fn relation_text(relation: &serde_json::Value) -> String {
        match relation {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Generated character payload.
///
/// Keys the service sends beyond the known fields are kept in `extra`, and
/// every optional field remembers whether it was absent or `null`, so the
/// record exports exactly as received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub character_name: String,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub title: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub species: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub occupation: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub element: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub power_level: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub appearance: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub abilities: Field<Vec<Ability>>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub personality: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub residence: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub background: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub relationships: Field<Relationships>,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub danmaku_style: Field<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CharacterRecord {
    /// Display title, falling back to `species - occupation`.
    pub fn display_title(&self) -> String {
        match self.title.as_str() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!(
                "{} - {}",
                self.species.as_str().unwrap_or_default(),
                self.occupation.as_str().unwrap_or_default()
            ),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub export_dir: PathBuf,
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            request_timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let request_timeout = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    crate::Error::Config(format!(
                        "REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self {
            api_url: std::env::var("YOKAI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            export_dir: std::env::var("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EXPORT_DIR)),
            request_timeout,
        })
    }
}
