use std::{fmt, sync::Arc, time::Duration};

use serde::Deserialize;

use crate::{
    client::{RetryDelay, ThreadSleep},
    http::{ReqwestTransport, Transport},
    Provider, Result,
};

/// Configuration for [`Provider`].
///
/// # Examples
/// ```
/// # use launchdarkly_provider::ProviderConfig;
/// let provider = ProviderConfig::from_access_token("api-token")
///     .max_retries(5)
///     .to_provider()
///     .unwrap();
/// ```
pub struct ProviderConfig {
    pub(crate) access_token: String,
    pub(crate) base_url: String,
    pub(crate) max_retries: u32,
    pub(crate) retry_interval: Duration,
    pub(crate) retry_delay: Arc<dyn RetryDelay + Send + Sync>,
    pub(crate) transport: Option<Arc<dyn Transport + Send + Sync>>,
}

impl ProviderConfig {
    /// Default base URL for API calls.
    pub const DEFAULT_BASE_URL: &'static str = "https://app.launchdarkly.com/api/v2";

    /// Default number of retries for rate-limited flag updates.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Default wait between two attempts of a rate-limited request.
    pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(60);

    /// Create a default configuration authenticating with `access_token`.
    pub fn from_access_token(access_token: impl Into<String>) -> Self {
        ProviderConfig {
            access_token: access_token.into(),
            base_url: ProviderConfig::DEFAULT_BASE_URL.to_owned(),
            max_retries: ProviderConfig::DEFAULT_MAX_RETRIES,
            retry_interval: ProviderConfig::DEFAULT_RETRY_INTERVAL,
            retry_delay: Arc::new(ThreadSleep),
            transport: None,
        }
    }

    /// Override base URL for API calls. The default should be used in most cases.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Number of times a rate-limited (HTTP 429) flag update is retried before failing.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Wait between two attempts of a rate-limited request.
    pub fn retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Replace the way the provider waits between retries.
    ///
    /// ```
    /// # use std::time::Duration;
    /// # use launchdarkly_provider::ProviderConfig;
    /// let config = ProviderConfig::from_access_token("api-token").retry_delay(|interval: Duration| {
    ///     println!("would wait {:?}", interval);
    /// });
    /// ```
    pub fn retry_delay(mut self, retry_delay: impl RetryDelay + Send + Sync + 'static) -> Self {
        self.retry_delay = Arc::new(retry_delay);
        self
    }

    /// Replace the HTTP transport. Defaults to [`ReqwestTransport`].
    pub fn transport(mut self, transport: impl Transport + Send + Sync + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Create a new [`Provider`] using this configuration.
    pub fn to_provider(self) -> Result<Provider> {
        Provider::new(self)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("access_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .field("retry_interval", &self.retry_interval)
            .finish_non_exhaustive()
    }
}

impl ProviderConfig {
    pub(crate) fn take_transport(&mut self) -> Arc<dyn Transport + Send + Sync> {
        self.transport
            .take()
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()))
    }
}

/// Provider block as supplied by the host.
#[derive(Clone, Deserialize)]
pub struct ProviderSettings {
    /// The access token used to authenticate against the API. Sensitive.
    pub access_token: String,
    /// API root. Defaults to [`ProviderConfig::DEFAULT_BASE_URL`].
    #[serde(default)]
    pub base_url: Option<String>,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("access_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl From<ProviderSettings> for ProviderConfig {
    fn from(settings: ProviderSettings) -> Self {
        let config = ProviderConfig::from_access_token(settings.access_token);
        match settings.base_url {
            Some(base_url) => config.base_url(base_url),
            None => config,
        }
    }
}
