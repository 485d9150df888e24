use serde::{Deserialize, Serialize};

use super::{lookup, require_id, Resource};
use crate::{
    environment_guard::DUMMY_ENVIRONMENT_KEY,
    validation::validate_key,
    wire::{JsonProject, PatchOperation},
    Provider, Result,
};

/// `launchdarkly_project`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
    /// Set once the remote entity exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Project key. Changing it recreates the project.
    pub key: String,
}

impl ProjectState {
    /// Data source read: the project with `key`, if it exists.
    pub fn lookup(provider: &Provider, key: &str) -> Result<Option<ProjectState>> {
        validate_key("key", key)?;
        lookup(
            ProjectState {
                key: key.to_owned(),
                ..Default::default()
            },
            provider,
        )
    }
}

impl Resource for ProjectState {
    const TYPE_NAME: &'static str = "launchdarkly_project";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<()> {
        validate_key("key", &self.key)?;
        Ok(())
    }

    fn create(&mut self, provider: &Provider) -> Result<()> {
        self.validate()?;
        let client = provider.client();
        let urls = provider.urls();

        let _: JsonProject = client.post(&urls.project_create(), &self.to_wire(), &[201])?;
        self.id = Some(self.key.clone());

        // The API seeds every new project with default environments. They are replaced by the
        // dummy environment until real ones are declared.
        let environments = provider.lock_environments()?;
        let defaults = environments.environment_keys(&self.key)?;
        environments.ensure_dummy_environment(&self.key)?;
        for environment in defaults.iter().filter(|key| *key != DUMMY_ENVIRONMENT_KEY) {
            log::debug!(target: "launchdarkly",
                        project:% = self.key,
                        environment:% = environment;
                        "deleting default environment");
            client.delete(&urls.environment(&self.key, environment), &[204])?;
        }

        Ok(())
    }

    fn read(&mut self, provider: &Provider) -> Result<()> {
        let url = provider.urls().project(&self.key);
        match provider.client().get_optional::<JsonProject>(&url)? {
            Some(remote) => self.apply_wire(remote),
            None => {
                log::warn!(target: "launchdarkly", project:% = self.key; "project no longer exists");
                self.id = None;
            }
        }
        Ok(())
    }

    fn update(&mut self, provider: &Provider) -> Result<()> {
        self.validate()?;
        let id = require_id(&self.id, Self::TYPE_NAME)?;
        let payload = [PatchOperation::replace("/name", self.name.clone())];
        provider
            .client()
            .patch(&provider.urls().project(id), &payload, &[200], 0)?;
        Ok(())
    }

    fn delete(&mut self, provider: &Provider) -> Result<()> {
        let id = require_id(&self.id, Self::TYPE_NAME)?;
        provider
            .client()
            .delete(&provider.urls().project(id), &[204, 404])?;
        self.id = None;
        Ok(())
    }

    /// Projects are imported by their bare key.
    fn import(id: &str, provider: &Provider) -> Result<Self> {
        let mut state = ProjectState {
            id: Some(id.to_owned()),
            key: id.to_owned(),
            ..Default::default()
        };
        state.read(provider)?;
        Ok(state)
    }
}
