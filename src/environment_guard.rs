//! Keeps at least one environment in every project.
//!
//! The API refuses to delete the last environment of a project. Before such a delete a
//! placeholder ("dummy") environment is created, and it is removed again as soon as a real
//! environment is created. The host may run environment operations concurrently, so the
//! check-then-act sequences below only run while the guard's lock is held.
use std::sync::{Mutex, MutexGuard};

use crate::{wire::JsonEnvironment, wire::JsonProject, Client, Error, Result, Urls};

/// Key, and name, of the placeholder environment.
pub const DUMMY_ENVIRONMENT_KEY: &str = "dummy-environment";
const DUMMY_ENVIRONMENT_COLOR: &str = "FFFFFF";

/// Owner of the lock serializing every environment create/update/delete in the process.
#[derive(Default)]
pub struct EnvironmentGuard {
    lock: Mutex<()>,
}

impl EnvironmentGuard {
    /// Create an unlocked guard.
    pub fn new() -> EnvironmentGuard {
        EnvironmentGuard::default()
    }

    /// Enter the critical section. It lasts until the returned session is dropped.
    pub fn lock<'a>(&'a self, client: &'a Client, urls: &'a Urls) -> Result<GuardedEnvironments<'a>> {
        let guard = self.lock.lock().map_err(|_| Error::LockPoisoned)?;
        Ok(GuardedEnvironments {
            _guard: guard,
            client,
            urls,
        })
    }
}

/// Environment operations that may only run while the lock is held.
pub struct GuardedEnvironments<'a> {
    _guard: MutexGuard<'a, ()>,
    client: &'a Client,
    urls: &'a Urls,
}

impl GuardedEnvironments<'_> {
    /// Keys of every environment currently in `project`.
    pub fn environment_keys(&self, project: &str) -> Result<Vec<String>> {
        let project: JsonProject = self.client.get(&self.urls.project(project))?;
        Ok(project
            .environments
            .into_iter()
            .map(|environment| environment.key)
            .collect())
    }

    /// Whether `project` has the dummy environment.
    pub fn has_dummy_environment(&self, project: &str) -> Result<bool> {
        let status = self
            .client
            .get_status(&self.urls.environment(project, DUMMY_ENVIRONMENT_KEY))?;
        Ok(status == 200)
    }

    /// Create the dummy environment in `project` unless it already exists.
    pub fn ensure_dummy_environment(&self, project: &str) -> Result<()> {
        if self.has_dummy_environment(project)? {
            return Ok(());
        }

        log::info!(target: "launchdarkly", project; "creating dummy environment");
        let payload = JsonEnvironment {
            name: DUMMY_ENVIRONMENT_KEY.to_owned(),
            key: DUMMY_ENVIRONMENT_KEY.to_owned(),
            color: DUMMY_ENVIRONMENT_COLOR.to_owned(),
            ..Default::default()
        };
        let _: serde_json::Value =
            self.client
                .post(&self.urls.environment_create(project), &payload, &[201])?;
        Ok(())
    }

    /// Delete the dummy environment from `project` if it exists.
    pub fn ensure_no_dummy_environment(&self, project: &str) -> Result<()> {
        if !self.has_dummy_environment(project)? {
            log::debug!(target: "launchdarkly", project; "no dummy environment was found");
            return Ok(());
        }

        log::info!(target: "launchdarkly", project; "deleting dummy environment");
        self.client.delete(
            &self.urls.environment(project, DUMMY_ENVIRONMENT_KEY),
            &[204, 404],
        )
    }

    /// Make sure deleting one environment of `project` cannot remove its last one.
    pub fn ensure_can_delete_environment(&self, project: &str) -> Result<()> {
        let count = self.environment_keys(project)?.len();
        log::debug!(target: "launchdarkly", project, count; "counted environments");
        if count == 1 {
            self.ensure_dummy_environment(project)?;
        }
        Ok(())
    }

    pub(crate) fn client(&self) -> &Client {
        self.client
    }

    pub(crate) fn urls(&self) -> &Urls {
        self.urls
    }
}
