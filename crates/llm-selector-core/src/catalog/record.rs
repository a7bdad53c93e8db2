//! Model records as stored in the `llm_models` table

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Input/output capability of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Text,
    Vision,
    Audio,
    Realtime,
}

impl Modality {
    pub fn all() -> &'static [Modality] {
        &[Self::Text, Self::Vision, Self::Audio, Self::Realtime]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Vision => "vision",
            Self::Audio => "audio",
            Self::Realtime => "realtime",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Vision => "Vision",
            Self::Audio => "Audio",
            Self::Realtime => "Realtime",
        }
    }
}

/// License classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseType {
    OpenSource,
    OpenWeights,
    ClosedSource,
    /// Any license string outside the known set. Never offered as a filter.
    #[serde(other)]
    Unknown,
}

impl LicenseType {
    pub fn all() -> &'static [LicenseType] {
        &[Self::OpenSource, Self::OpenWeights, Self::ClosedSource]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenSource => "open_source",
            Self::OpenWeights => "open_weights",
            Self::ClosedSource => "closed_source",
            Self::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenSource => "Open Source",
            Self::OpenWeights => "Open Weights",
            Self::ClosedSource => "Closed Source",
            Self::Unknown => "Unknown",
        }
    }
}

/// How a model can be hosted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostingType {
    ApiBased,
    SelfHosted,
}

impl HostingType {
    pub fn all() -> &'static [HostingType] {
        &[Self::ApiBased, Self::SelfHosted]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApiBased => "api_based",
            Self::SelfHosted => "self_hosted",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ApiBased => "API Based",
            Self::SelfHosted => "Self Hosted",
        }
    }
}

/// OCI catalog a model is offered through.
///
/// `None` is a literal tag stored by the database. It only hides the OCI
/// section when rendering; the filter treats it like any other tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OciAvailability {
    GenerativeAi,
    DataScience,
    None,
}

impl OciAvailability {
    /// Tags offered as filter options. `none` is not one of them.
    pub fn selectable() -> &'static [OciAvailability] {
        &[Self::GenerativeAi, Self::DataScience]
    }

    /// Parse a filter option. Only [`selectable`](Self::selectable) tags are accepted.
    pub fn parse_filter(s: &str) -> std::result::Result<Self, ParseTagError> {
        s.parse::<Self>()
            .ok()
            .filter(|oci| Self::selectable().contains(oci))
            .ok_or_else(|| ParseTagError {
                kind: "OCI filter",
                input: s.to_string(),
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenerativeAi => "generative_ai",
            Self::DataScience => "data_science",
            Self::None => "none",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::GenerativeAi => "Generative AI",
            Self::DataScience => "Data Science",
            Self::None => "None",
        }
    }
}

/// Error returned when a tag string is not part of the fixed vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTagError {
    pub kind: &'static str,
    pub input: String,
}

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.input)
    }
}

impl std::error::Error for ParseTagError {}

macro_rules! impl_tag_text {
    ($($tag:ty => $kind:literal, [$($variant:expr),*]);* $(;)?) => {
        $(
            impl fmt::Display for $tag {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            /// Accepts the wire name or the label, ignoring case, `-`, `_` and spaces.
            impl FromStr for $tag {
                type Err = ParseTagError;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    let wanted = normalize_tag(s);
                    [$($variant),*]
                        .into_iter()
                        .find(|tag: &$tag| {
                            normalize_tag(tag.as_str()) == wanted
                                || normalize_tag(tag.label()) == wanted
                        })
                        .ok_or_else(|| ParseTagError {
                            kind: $kind,
                            input: s.to_string(),
                        })
                }
            }
        )*
    };
}

impl_tag_text! {
    Modality => "modality",
        [Modality::Text, Modality::Vision, Modality::Audio, Modality::Realtime];
    LicenseType => "license type",
        [LicenseType::OpenSource, LicenseType::OpenWeights, LicenseType::ClosedSource];
    HostingType => "hosting type",
        [HostingType::ApiBased, HostingType::SelfHosted];
    OciAvailability => "OCI availability",
        [OciAvailability::GenerativeAi, OciAvailability::DataScience, OciAvailability::None];
}

fn normalize_tag(input: &str) -> String {
    input
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// One catalog entry. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: String,
    pub name: String,
    pub provider: String,
    /// Hub repository id such as `meta-llama/Llama-3.1-8B`. `None` means no
    /// downloadable artifact.
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "known_tags")]
    pub modality: Vec<Modality>,
    #[serde(default)]
    pub parameters: Option<String>,
    #[serde(default)]
    pub context_window: Option<u64>,
    pub license_type: LicenseType,
    #[serde(default, deserialize_with = "known_tags")]
    pub hosting_type: Vec<HostingType>,
    #[serde(default, deserialize_with = "known_tags")]
    pub oci_availability: Vec<OciAvailability>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub best_gpu: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: serde_json::Map<String, serde_json::Value>,
    /// Benchmark scores in the order the database returned them
    #[serde(default, deserialize_with = "null_as_default")]
    pub performance_metrics: IndexMap<String, f64>,
    #[serde(default)]
    pub model_card_url: Option<String>,
    #[serde(default)]
    pub pricing: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_production_ready: bool,
    pub created_at: DateTime<Utc>,
}

impl ModelRecord {
    /// Hub id of the downloadable artifact, if any.
    pub fn downloadable_id(&self) -> Option<&str> {
        self.model_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn is_downloadable(&self) -> bool {
        self.downloadable_id().is_some()
    }

    /// Whether the OCI section should be shown. Empty lists and lists carrying
    /// the literal `none` tag are hidden.
    pub fn shows_oci_availability(&self) -> bool {
        !self.oci_availability.is_empty()
            && !self.oci_availability.contains(&OciAvailability::None)
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Tag list where `null` is empty and tags outside the vocabulary are dropped.
fn known_tags<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Vec<serde_json::Value> = null_as_default(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match T::deserialize(&value) {
            Ok(tag) => Some(tag),
            Err(e) => {
                warn!("Ignoring tag {}: {}", value, e);
                None
            }
        })
        .collect())
}
