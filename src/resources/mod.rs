//! Host-visible resource records and their lifecycle operations.
//!
//! Each record mirrors the attribute map the host keeps in its state. `id` is `None` until the
//! record is created or imported, and is cleared again when a read finds the remote entity gone.
mod environment;
mod feature_flag;
mod project;

pub use environment::EnvironmentState;
pub use feature_flag::{CustomProperty, FeatureFlagState, TargetingRule, Variation};
pub use project::ProjectState;

use crate::{Error, Provider, Result};

/// Lifecycle contract the host drives for every resource kind.
pub trait Resource: Sized {
    /// Resource type name as registered with the host.
    const TYPE_NAME: &'static str;

    /// Identifier of the remote entity, `None` when it does not exist.
    fn id(&self) -> Option<&str>;

    /// Check attributes. Called by every mutating operation before any request.
    fn validate(&self) -> Result<()>;

    /// Create the remote entity and record its `id`.
    fn create(&mut self, provider: &Provider) -> Result<()>;

    /// Refresh from the API. A remote 404 clears `id` instead of failing.
    fn read(&mut self, provider: &Provider) -> Result<()>;

    /// Push every mutable attribute to the existing remote entity.
    fn update(&mut self, provider: &Provider) -> Result<()>;

    /// Delete the remote entity. Deleting an entity that is already gone succeeds.
    fn delete(&mut self, provider: &Provider) -> Result<()>;

    /// Hydrate a record from nothing but its import identifier.
    fn import(id: &str, provider: &Provider) -> Result<Self>;
}

/// Split an import identifier `"<project_key>:<resource_key>"` on its first colon.
pub fn parse_composite_id(id: &str) -> Result<(&str, &str)> {
    id.split_once(':').ok_or(Error::InvalidCompositeId)
}

/// Read `state` and return it only if the remote entity exists. Used by data sources.
fn lookup<R: Resource>(mut state: R, provider: &Provider) -> Result<Option<R>> {
    state.read(provider)?;
    Ok(state.id().is_some().then_some(state))
}

fn require_id<'a>(id: &'a Option<String>, type_name: &'static str) -> Result<&'a str> {
    id.as_deref().ok_or(Error::MissingId(type_name))
}
