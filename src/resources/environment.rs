use serde::{Deserialize, Serialize};

use super::{lookup, parse_composite_id, require_id, Resource};
use crate::{
    validation::{validate_color, validate_key},
    wire::{JsonEnvironment, PatchOperation},
    Provider, Result,
};

/// `launchdarkly_environment`. `api_key` and `mobile_key` are computed by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentState {
    /// Set once the remote entity exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning project.
    pub project_key: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Environment key, unique within the project.
    pub key: String,
    /// Hex color without the leading `#`.
    #[serde(default)]
    pub color: String,
    /// Server-side SDK key. Sensitive.
    #[serde(default)]
    pub api_key: String,
    /// Mobile SDK key. Sensitive.
    #[serde(default)]
    pub mobile_key: String,
}

impl EnvironmentState {
    /// Data source read: environment `key` of `project_key`, if it exists.
    pub fn lookup(provider: &Provider, project_key: &str, key: &str) -> Result<Option<EnvironmentState>> {
        validate_key("project_key", project_key)?;
        validate_key("key", key)?;
        lookup(
            EnvironmentState {
                project_key: project_key.to_owned(),
                key: key.to_owned(),
                ..Default::default()
            },
            provider,
        )
    }
}

impl Resource for EnvironmentState {
    const TYPE_NAME: &'static str = "launchdarkly_environment";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<()> {
        validate_key("project_key", &self.project_key)?;
        validate_key("key", &self.key)?;
        validate_color("color", &self.color)?;
        Ok(())
    }

    fn create(&mut self, provider: &Provider) -> Result<()> {
        self.validate()?;
        let environments = provider.lock_environments()?;

        let response: JsonEnvironment = environments.client().post(
            &environments.urls().environment_create(&self.project_key),
            &self.to_wire(),
            &[201],
        )?;
        self.id = Some(self.key.clone());
        self.api_key = response.api_key;
        self.mobile_key = response.mobile_key;

        // A real environment now exists, the placeholder is no longer needed.
        environments.ensure_no_dummy_environment(&self.project_key)
    }

    fn read(&mut self, provider: &Provider) -> Result<()> {
        let url = provider.urls().environment(&self.project_key, &self.key);
        match provider.client().get_optional::<JsonEnvironment>(&url)? {
            Some(remote) => self.apply_wire(remote),
            None => {
                log::warn!(target: "launchdarkly",
                           project:% = self.project_key,
                           environment:% = self.key;
                           "environment no longer exists");
                self.id = None;
            }
        }
        Ok(())
    }

    fn update(&mut self, provider: &Provider) -> Result<()> {
        self.validate()?;
        let id = require_id(&self.id, Self::TYPE_NAME)?;
        let payload = [
            PatchOperation::replace("/name", self.name.clone()),
            PatchOperation::replace("/color", self.color.clone()),
        ];

        let environments = provider.lock_environments()?;
        environments.client().patch(
            &environments.urls().environment(&self.project_key, id),
            &payload,
            &[200],
            0,
        )?;
        Ok(())
    }

    fn delete(&mut self, provider: &Provider) -> Result<()> {
        let id = require_id(&self.id, Self::TYPE_NAME)?;
        let environments = provider.lock_environments()?;

        environments.ensure_can_delete_environment(&self.project_key)?;
        environments.client().delete(
            &environments.urls().environment(&self.project_key, id),
            &[204, 404],
        )?;
        self.id = None;
        Ok(())
    }

    /// Environments are imported as `<project_key>:<environment_key>`.
    fn import(id: &str, provider: &Provider) -> Result<Self> {
        let (project_key, key) = parse_composite_id(id)?;
        let mut state = EnvironmentState {
            id: Some(key.to_owned()),
            project_key: project_key.to_owned(),
            key: key.to_owned(),
            ..Default::default()
        };
        state.read(provider)?;
        Ok(state)
    }
}
