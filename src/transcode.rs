//! Conversions between host-visible records and the API's JSON records.
use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    resources::{CustomProperty, EnvironmentState, FeatureFlagState, ProjectState, Variation},
    wire::{
        JsonCustomProperty, JsonEnvironment, JsonFeatureFlag, JsonProject, JsonVariation,
        VariationValue,
    },
    Error, Result,
};

/// Type shared by every variation of a flag. Fixed once the flag is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariationsKind {
    /// `true`/`false` values.
    #[default]
    Boolean,
    /// Integer values.
    Number,
    /// String values.
    String,
}

impl VariationsKind {
    /// Name as written in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariationsKind::Boolean => "boolean",
            VariationsKind::Number => "number",
            VariationsKind::String => "string",
        }
    }

    /// Parse a host-side literal into a typed value.
    ///
    /// Booleans accept exactly `true`/`false`, numbers are integers, strings pass through.
    pub fn parse_value(&self, value: &str) -> Result<VariationValue> {
        let parse_error = || Error::VariationParse {
            kind: self.as_str().to_owned(),
            value: value.to_owned(),
        };
        match self {
            VariationsKind::Boolean => value
                .parse::<bool>()
                .map(VariationValue::Boolean)
                .map_err(|_| parse_error()),
            VariationsKind::Number => value
                .parse::<i64>()
                .map(VariationValue::from)
                .map_err(|_| parse_error()),
            VariationsKind::String => Ok(VariationValue::String(value.to_owned())),
        }
    }
}

impl FromStr for VariationsKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "boolean" => Ok(VariationsKind::Boolean),
            "number" => Ok(VariationsKind::Number),
            "string" => Ok(VariationsKind::String),
            _ => Err(crate::ValidationError::VariationsKind {
                attribute: "variations_kind".to_owned(),
                value: s.to_owned(),
            }
            .into()),
        }
    }
}

impl fmt::Display for VariationsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags are sent sorted so that reading them back is stable.
pub fn tags_to_wire(tags: &[String]) -> Vec<String> {
    let mut sorted = tags.to_vec();
    sorted.sort();
    sorted
}

/// Whether the host's tags differ from the remote ones, ignoring order.
pub fn tags_need_refresh(host: &[String], remote: &[String]) -> bool {
    tags_to_wire(host) != tags_to_wire(remote)
}

/// Typed variations. Fails on the first value that does not parse under `kind`.
pub fn variations_to_wire(
    kind: VariationsKind,
    variations: &[Variation],
) -> Result<Vec<JsonVariation>> {
    variations
        .iter()
        .map(|variation| {
            Ok(JsonVariation {
                value: kind.parse_value(&variation.value)?,
                name: variation.name.clone(),
                description: variation.description.clone(),
            })
        })
        .collect()
}

/// Host variations, values rendered as strings, in server order.
pub fn variations_from_wire(variations: &[JsonVariation]) -> Vec<Variation> {
    variations
        .iter()
        .map(|variation| Variation {
            value: variation.value.to_string(),
            name: variation.name.clone(),
            description: variation.description.clone(),
        })
        .collect()
}

/// Custom properties keyed by property key. A later duplicate key wins.
pub fn custom_properties_to_wire(
    properties: &[CustomProperty],
) -> BTreeMap<String, JsonCustomProperty> {
    properties
        .iter()
        .map(|property| {
            (
                property.key.clone(),
                JsonCustomProperty {
                    name: property.name.clone(),
                    value: property.value.clone(),
                },
            )
        })
        .collect()
}

/// Returned sorted by property key.
pub fn custom_properties_from_wire(
    properties: &BTreeMap<String, JsonCustomProperty>,
) -> Vec<CustomProperty> {
    properties
        .iter()
        .map(|(key, property)| CustomProperty {
            key: key.clone(),
            name: property.name.clone(),
            value: property.value.clone(),
        })
        .collect()
}

/// Whether the host's custom properties differ from the remote ones, ignoring list order.
pub fn custom_properties_need_refresh(
    host: &[CustomProperty],
    remote: &BTreeMap<String, JsonCustomProperty>,
) -> bool {
    &custom_properties_to_wire(host) != remote
}

impl ProjectState {
    /// Creation payload, without environments.
    pub fn to_wire(&self) -> JsonProject {
        JsonProject {
            name: self.name.clone(),
            key: self.key.clone(),
            environments: Vec::new(),
        }
    }

    /// Overwrite local state with what the API returned.
    pub fn apply_wire(&mut self, remote: JsonProject) {
        self.id = Some(remote.key.clone());
        self.name = remote.name;
        self.key = remote.key;
    }
}

impl EnvironmentState {
    /// Creation payload. SDK keys are never sent.
    pub fn to_wire(&self) -> JsonEnvironment {
        JsonEnvironment {
            name: self.name.clone(),
            key: self.key.clone(),
            color: self.color.clone(),
            api_key: String::new(),
            mobile_key: String::new(),
        }
    }

    /// Overwrite local state, SDK keys included, with what the API returned.
    pub fn apply_wire(&mut self, remote: JsonEnvironment) {
        self.id = Some(remote.key.clone());
        self.name = remote.name;
        self.key = remote.key;
        self.color = remote.color;
        self.api_key = remote.api_key;
        self.mobile_key = remote.mobile_key;
    }
}

impl FeatureFlagState {
    /// Creation payload. Fails if a variation value does not parse under `variations_kind`.
    pub fn to_wire(&self) -> Result<JsonFeatureFlag> {
        let kind = self.kind()?;
        Ok(JsonFeatureFlag {
            name: self.name.clone(),
            key: self.key.clone(),
            description: self.description.clone(),
            temporary: self.temporary,
            include_in_snippet: self.include_in_snippet,
            variations_kind: String::new(),
            variations: variations_to_wire(kind, &self.variations)?,
            tags: tags_to_wire(&self.tags),
            custom_properties: custom_properties_to_wire(&self.custom_properties),
        })
    }

    /// Overwrite host state with what the API reports.
    ///
    /// Tags and custom properties are only rewritten when they differ regardless of ordering.
    /// `variations_kind` is only taken from the API when it reports `boolean`: non-boolean flags
    /// are reported as `multivariate`, and flags created before the attribute existed must not be
    /// forced into recreation.
    pub fn apply_wire(&mut self, remote: JsonFeatureFlag) {
        self.id = Some(remote.key.clone());
        self.name = remote.name;
        self.key = remote.key;
        self.description = remote.description;
        self.temporary = remote.temporary;
        self.include_in_snippet = remote.include_in_snippet;

        if tags_need_refresh(&self.tags, &remote.tags) {
            self.tags = remote.tags;
        }

        if remote.variations_kind == VariationsKind::Boolean.as_str() {
            self.variations_kind = remote.variations_kind;
        }

        self.variations = variations_from_wire(&remote.variations);

        if custom_properties_need_refresh(&self.custom_properties, &remote.custom_properties) {
            self.custom_properties = custom_properties_from_wire(&remote.custom_properties);
        }
    }

    pub(crate) fn kind(&self) -> Result<VariationsKind> {
        if self.variations_kind.is_empty() {
            return Ok(VariationsKind::default());
        }
        self.variations_kind.parse()
    }
}
