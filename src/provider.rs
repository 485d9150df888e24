use url::Url;

use crate::{
    environment_guard::{EnvironmentGuard, GuardedEnvironments},
    schema::{self, ResourceSchema},
    Client, Error, ProviderConfig, Result, Urls,
};

/// Configured provider handed to every lifecycle operation.
///
/// A single instance is shared by all of the host's concurrent operations. It owns the lock that
/// keeps environment creation and deletion from racing.
///
/// # Examples
/// ```no_run
/// # use launchdarkly_provider::{ProviderConfig, ProjectState, Resource};
/// let provider = ProviderConfig::from_access_token("api-token").to_provider()?;
/// let mut project = ProjectState {
///     name: "My project".to_owned(),
///     key: "my-project".to_owned(),
///     ..Default::default()
/// };
/// project.create(&provider)?;
/// # Ok::<(), launchdarkly_provider::Error>(())
/// ```
pub struct Provider {
    client: Client,
    urls: Urls,
    environments: EnvironmentGuard,
    flag_retries: u32,
}

impl Provider {
    /// Create a new `Provider` using the specified configuration.
    pub fn new(mut config: ProviderConfig) -> Result<Provider> {
        Url::parse(&config.base_url).map_err(Error::InvalidBaseUrl)?;

        let transport = config.take_transport();
        log::debug!(target: "launchdarkly", base_url:% = config.base_url; "configuring provider");

        Ok(Provider {
            client: Client::new(
                config.access_token,
                transport,
                config.retry_interval,
                config.retry_delay,
            ),
            urls: Urls::new(config.base_url),
            environments: EnvironmentGuard::new(),
            flag_retries: config.max_retries,
        })
    }

    /// API client shared by every operation.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// URL builder rooted at the configured base URL.
    pub fn urls(&self) -> &Urls {
        &self.urls
    }

    /// Retries granted to rate-limited flag `PATCH`es.
    pub fn flag_retries(&self) -> u32 {
        self.flag_retries
    }

    /// Enter the environment critical section.
    pub fn lock_environments(&self) -> Result<GuardedEnvironments<'_>> {
        self.environments.lock(&self.client, &self.urls)
    }

    /// Schema of the provider block.
    pub fn schema() -> &'static ResourceSchema {
        &schema::PROVIDER
    }

    /// Resources the provider manages.
    pub fn resources() -> &'static [ResourceSchema] {
        schema::RESOURCES
    }

    /// Read-only data sources.
    pub fn data_sources() -> &'static [ResourceSchema] {
        schema::DATA_SOURCES
    }
}
