use serde::{Deserialize, Serialize};

use super::{lookup, parse_composite_id, require_id, Resource};
use crate::{
    reconcile::{default_off_targeting_patch, default_targeting_patch, variation_patch_batches},
    transcode::{custom_properties_to_wire, tags_to_wire, variations_to_wire},
    validation::{validate_flag_key, validate_key, validate_variation_value, validate_variations_kind},
    wire::{JsonFeatureFlag, PatchOperation},
    Provider, Result, ValidationError,
};

const MIN_VARIATIONS: usize = 2;

/// `launchdarkly_feature_flag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlagState {
    /// Set once the remote entity exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning project.
    pub project_key: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Flag key, unique within the project.
    pub key: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Defaults to `true`.
    #[serde(default = "default_temporary")]
    pub temporary: bool,
    /// Expose the flag to client-side SDKs.
    #[serde(default)]
    pub include_in_snippet: bool,
    /// `boolean`, `number` or `string`. Changing it requires recreating the flag.
    #[serde(default = "default_variations_kind")]
    pub variations_kind: String,
    /// Ordered: targeting rules refer to variations by position.
    #[serde(default)]
    pub variations: Vec<Variation>,
    /// Compared as a set.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Compared as a set of keyed properties.
    #[serde(default)]
    pub custom_properties: Vec<CustomProperty>,
    /// Variation served when targeting is on, per environment.
    #[serde(default)]
    pub default_targeting_rule: Vec<TargetingRule>,
    /// Variation served when targeting is off, per environment.
    #[serde(default)]
    pub default_off_targeting_rule: Vec<TargetingRule>,
}

fn default_temporary() -> bool {
    true
}

fn default_variations_kind() -> String {
    "boolean".to_owned()
}

impl Default for FeatureFlagState {
    fn default() -> Self {
        FeatureFlagState {
            id: None,
            project_key: String::new(),
            name: String::new(),
            key: String::new(),
            description: String::new(),
            temporary: default_temporary(),
            include_in_snippet: false,
            variations_kind: default_variations_kind(),
            variations: Vec::new(),
            tags: Vec::new(),
            custom_properties: Vec::new(),
            default_targeting_rule: Vec::new(),
            default_off_targeting_rule: Vec::new(),
        }
    }
}

/// One variation as declared by the host. `value` is typed by the flag's variations kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    /// Value literal, e.g. `true`, `42` or `blue`.
    pub value: String,
    /// Optional display name.
    #[serde(default)]
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
}

/// A custom property attached to a flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomProperty {
    /// Property key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Values. Order is not significant.
    pub value: Vec<String>,
}

/// Default variation served in `environment`, identified by its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetingRule {
    /// Environment key.
    pub environment: String,
    /// Value of the variation to serve.
    pub value: String,
}

impl FeatureFlagState {
    /// Data source read: flag `key` of `project_key`, if it exists.
    pub fn lookup(provider: &Provider, project_key: &str, key: &str) -> Result<Option<FeatureFlagState>> {
        validate_key("project_key", project_key)?;
        validate_flag_key("key", key)?;
        lookup(
            FeatureFlagState {
                project_key: project_key.to_owned(),
                key: key.to_owned(),
                ..Default::default()
            },
            provider,
        )
    }

    /// Patch operations for both default targeting rule lists.
    fn targeting_patch(&self) -> Result<Vec<PatchOperation>> {
        let mut operations = default_targeting_patch(&self.default_targeting_rule, &self.variations)?;
        operations.extend(default_off_targeting_patch(
            &self.default_off_targeting_rule,
            &self.variations,
        )?);
        Ok(operations)
    }
}

impl Resource for FeatureFlagState {
    const TYPE_NAME: &'static str = "launchdarkly_feature_flag";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<()> {
        validate_key("project_key", &self.project_key)?;
        validate_flag_key("key", &self.key)?;
        validate_variations_kind("variations_kind", &self.variations_kind)?;

        if !self.variations.is_empty() && self.variations.len() < MIN_VARIATIONS {
            return Err(ValidationError::TooFewItems {
                attribute: "variations".to_owned(),
                min: MIN_VARIATIONS,
                count: self.variations.len(),
            }
            .into());
        }
        for variation in &self.variations {
            validate_variation_value("variations.value", &variation.value)?;
        }
        for rule in self
            .default_targeting_rule
            .iter()
            .chain(&self.default_off_targeting_rule)
        {
            validate_key("environment", &rule.environment)?;
            validate_variation_value("value", &rule.value)?;
        }
        Ok(())
    }

    fn create(&mut self, provider: &Provider) -> Result<()> {
        self.validate()?;
        let payload = self.to_wire()?;
        let targeting = self.targeting_patch()?;
        let client = provider.client();
        let urls = provider.urls();

        let _: JsonFeatureFlag =
            client.post(&urls.flag_create(&self.project_key), &payload, &[201])?;
        self.id = Some(self.key.clone());

        if !targeting.is_empty() {
            client.patch(
                &urls.flag(&self.project_key, &self.key),
                &targeting,
                &[200],
                provider.flag_retries(),
            )?;
        }
        Ok(())
    }

    fn read(&mut self, provider: &Provider) -> Result<()> {
        let url = provider.urls().flag(&self.project_key, &self.key);
        match provider.client().get_optional::<JsonFeatureFlag>(&url)? {
            Some(remote) => self.apply_wire(remote),
            None => {
                log::warn!(target: "launchdarkly",
                           project:% = self.project_key,
                           flag:% = self.key;
                           "feature flag no longer exists");
                self.id = None;
            }
        }
        Ok(())
    }

    /// Reconcile variations first, one `PATCH` per batch, then replace every other mutable
    /// attribute and the default targeting rules in a final `PATCH`.
    ///
    /// A failure midway leaves the flag partially updated. Nothing is rolled back; running the
    /// update again converges from whatever state the flag was left in.
    ///
    /// Without declared variations the remote ones are left untouched.
    fn update(&mut self, provider: &Provider) -> Result<()> {
        self.validate()?;
        let id = require_id(&self.id, Self::TYPE_NAME)?;
        let desired = variations_to_wire(self.kind()?, &self.variations)?;
        let targeting = self.targeting_patch()?;
        let client = provider.client();
        let url = provider.urls().flag(&self.project_key, id);

        if !desired.is_empty() {
            let remote: JsonFeatureFlag = client.get(&url)?;
            for batch in variation_patch_batches(&desired, remote.variations.len())? {
                client.patch(&url, &batch, &[200], provider.flag_retries())?;
            }
        }

        let mut operations = vec![
            PatchOperation::replace("/name", self.name.clone()),
            PatchOperation::replace("/description", self.description.clone()),
            PatchOperation::replace("/temporary", self.temporary),
            PatchOperation::replace("/includeInSnippet", self.include_in_snippet),
            PatchOperation::replace("/tags", tags_to_wire(&self.tags)),
            PatchOperation::replace(
                "/customProperties",
                serde_json::to_value(custom_properties_to_wire(&self.custom_properties))?,
            ),
        ];
        operations.extend(targeting);
        client.patch(&url, &operations, &[200], provider.flag_retries())?;
        Ok(())
    }

    fn delete(&mut self, provider: &Provider) -> Result<()> {
        let id = require_id(&self.id, Self::TYPE_NAME)?;
        provider
            .client()
            .delete(&provider.urls().flag(&self.project_key, id), &[204, 404])?;
        self.id = None;
        Ok(())
    }

    /// Flags are imported as `<project_key>:<flag_key>`.
    fn import(id: &str, provider: &Provider) -> Result<Self> {
        let (project_key, key) = parse_composite_id(id)?;
        let mut state = FeatureFlagState {
            id: Some(key.to_owned()),
            project_key: project_key.to_owned(),
            key: key.to_owned(),
            ..Default::default()
        };
        state.read(provider)?;
        Ok(state)
    }
}
