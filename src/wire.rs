//! JSON records exchanged with the API.
use std::{collections::BTreeMap, fmt};

use derive_more::From;
use serde::{Deserialize, Serialize};

/// An environment as returned by the API. `api_key` and `mobile_key` are read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonEnvironment {
    /// Display name.
    pub name: String,
    /// Key, unique within the project.
    pub key: String,
    /// Hex color without the leading `#`.
    pub color: String,
    /// Server-side SDK key.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    /// Mobile SDK key.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mobile_key: String,
}

/// A project. `environments` is only sent on creation and only read back on lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonProject {
    /// Display name.
    pub name: String,
    /// Key, unique within the account.
    pub key: String,
    /// Environments of the project.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environments: Vec<JsonEnvironment>,
}

/// Variation value. Untagged on the wire: the flag's variations kind says which shape to expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(untagged)]
pub enum VariationValue {
    /// `true` or `false`.
    Boolean(bool),
    /// Any JSON number.
    Number(serde_json::Number),
    /// A string.
    String(String),
}

impl From<&str> for VariationValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<i64> for VariationValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl fmt::Display for VariationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariationValue::Boolean(b) => write!(f, "{b}"),
            VariationValue::Number(n) => write!(f, "{n}"),
            VariationValue::String(s) => f.write_str(s),
        }
    }
}

/// One variation of a flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonVariation {
    /// Value served when this variation is selected.
    pub value: VariationValue,
    /// Optional display name.
    #[serde(default)]
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
}

/// A custom property, keyed by its property key in [`JsonFeatureFlag::custom_properties`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonCustomProperty {
    /// Display name.
    pub name: String,
    /// Values, in the order the API keeps them.
    #[serde(default)]
    pub value: Vec<String>,
}

/// A feature flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonFeatureFlag {
    /// Display name.
    pub name: String,
    /// Key, unique within the project.
    pub key: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Whether the flag is expected to be removed eventually.
    #[serde(default)]
    pub temporary: bool,
    /// Whether client-side SDKs see the flag.
    #[serde(default)]
    pub include_in_snippet: bool,
    /// `boolean` or `multivariate` when read back; left out of creation payloads so the API
    /// infers it from the variations.
    #[serde(rename = "kind", default, skip_serializing_if = "String::is_empty")]
    pub variations_kind: String,
    /// Variations in server order. Targeting refers to them by index.
    #[serde(default)]
    pub variations: Vec<JsonVariation>,
    /// Tags, in server order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Custom properties by key.
    #[serde(default)]
    pub custom_properties: BTreeMap<String, JsonCustomProperty>,
}

/// One JSON Patch (RFC 6902) operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    /// Replace the existing member at `path`.
    Replace {
        /// JSON Pointer to the target.
        path: String,
        /// New value.
        value: serde_json::Value,
    },
    /// Insert at `path`, shifting array elements after it.
    Add {
        /// JSON Pointer to the target.
        path: String,
        /// Inserted value.
        value: serde_json::Value,
    },
    /// Remove the member at `path`.
    Remove {
        /// JSON Pointer to the target.
        path: String,
    },
}

impl PatchOperation {
    /// `replace` operation.
    pub fn replace(path: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        PatchOperation::Replace {
            path: path.into(),
            value: value.into(),
        }
    }

    /// `add` operation.
    pub fn add(path: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        PatchOperation::Add {
            path: path.into(),
            value: value.into(),
        }
    }

    /// `remove` operation.
    pub fn remove(path: impl Into<String>) -> Self {
        PatchOperation::Remove { path: path.into() }
    }

    /// JSON Pointer the operation targets.
    pub fn path(&self) -> &str {
        match self {
            PatchOperation::Replace { path, .. }
            | PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path } => path,
        }
    }
}
