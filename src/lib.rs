//! An infrastructure-as-code provider for LaunchDarkly projects, environments and feature flags.
//!
//! # Overview
//!
//! The crate is driven by a host orchestration runtime that owns the resource lifecycle and the
//! state diffing. It supplies what the host cannot know by itself: the [schemas](schema) of the
//! resources, and the translation between the host's attribute records ([`ProjectState`],
//! [`EnvironmentState`], [`FeatureFlagState`]) and the LaunchDarkly REST API.
//!
//! A [`Provider`] is created once from a [`ProviderConfig`] and passed to every [`Resource`]
//! operation. It holds the API [`Client`], which retries rate-limited requests, and the lock
//! serializing environment creation and deletion (a project must always keep at least one
//! environment, see [`environment_guard`]).
//!
//! Feature flag updates are computed by the [`reconcile`] module as ordered JSON Patch batches
//! and sent one `PATCH` per batch.
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum and are always fatal to the operation. Reading
//! an entity that was deleted remotely is not an error: the record's `id` is cleared instead.
//!
//! # Logging
//!
//! The crate uses the [`log`](https://docs.rs/log/latest/log/) crate with the `launchdarkly`
//! target. Consider integrating a `log`-compatible logger implementation for visibility into
//! requests, retries and dummy environment handling.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

pub mod environment_guard;
pub mod http;
pub mod reconcile;
pub mod schema;
pub mod transcode;
pub mod validation;
pub mod wire;

mod client;
mod config;
mod error;
mod provider;
mod resources;
mod urls;

pub use client::{Client, RetryDelay, ThreadSleep};
pub use config::{ProviderConfig, ProviderSettings};
pub use error::{Error, Result, ValidationError};
pub use provider::Provider;
pub use resources::{
    parse_composite_id, CustomProperty, EnvironmentState, FeatureFlagState, ProjectState,
    Resource, TargetingRule, Variation,
};
pub use urls::Urls;
