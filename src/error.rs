use std::sync::Arc;

use thiserror::Error;

/// Result type used throughout the provider.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the provider.
///
/// Every error is fatal to the lifecycle operation that produced it. The two expected-absence
/// cases (404 on read, 404 on delete) never surface as errors.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The API answered with a status outside the expected set, or kept answering 429 after all
    /// retries were spent.
    #[error("{method} {url} did not return one of the expected HTTP status codes. Got HTTP {status}\n{body}")]
    UnexpectedStatus {
        /// HTTP method of the failed request.
        method: String,
        /// Full URL of the failed request.
        url: String,
        /// Status that was received.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response.
    #[error(transparent)]
    Network(Arc<reqwest::Error>),

    /// A payload could not be encoded or a response could not be decoded.
    #[error(transparent)]
    Serialization(Arc<serde_json::Error>),

    /// Invalid base_url configuration.
    #[error("invalid base_url configuration")]
    InvalidBaseUrl(#[source] url::ParseError),

    /// An attribute failed validation before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A targeting rule points at a value that none of the declared variations carry.
    #[error("{value} is not a valid variation value as it is not in the provided variations")]
    InvalidVariationValue {
        /// The value that could not be resolved.
        value: String,
    },

    /// A declared variation value does not parse under the flag's variations kind.
    #[error("variation value {value:?} is not a valid {kind} value")]
    VariationParse {
        /// The declared variations kind.
        kind: String,
        /// The offending value.
        value: String,
    },

    /// An import identifier is missing the `project:key` separator.
    #[error("error: Import composite ID requires two parts separated by colon, eg x:y")]
    InvalidCompositeId,

    /// A thread panicked while holding the environment lock.
    #[error("environment lock poisoned")]
    LockPoisoned,

    /// The operation requires a record that has already been created.
    #[error("{0} has no id, it must be created or imported first")]
    MissingId(&'static str),
}

/// Validation failures for host-supplied attributes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// Project and environment keys are limited to 20 characters.
    #[error("{attribute} must be between 1 and 20 characters: {value}")]
    KeyLength {
        /// Attribute name.
        attribute: String,
        /// Rejected value.
        value: String,
    },
    /// Keys may only contain letters, digits, `_`, `-` and `.`.
    #[error("{attribute} is not a valid key: {value}")]
    KeyFormat {
        /// Attribute name.
        attribute: String,
        /// Rejected value.
        value: String,
    },
    /// Colors are six hex digits without a leading `#`.
    #[error("{attribute} is not a valid RGB color code: {value}")]
    Color {
        /// Attribute name.
        attribute: String,
        /// Rejected value.
        value: String,
    },
    /// Unknown variations kind.
    #[error("expected {attribute} to be one of [number boolean string], got {value}")]
    VariationsKind {
        /// Attribute name.
        attribute: String,
        /// Rejected value.
        value: String,
    },
    /// Variation values must not be empty.
    #[error("{attribute} must not be empty")]
    Empty {
        /// Attribute name.
        attribute: String,
    },
    /// A list attribute has fewer items than it requires.
    #[error("{attribute} requires at least {min} items, got {count}")]
    TooFewItems {
        /// Attribute name.
        attribute: String,
        /// Minimum number of items.
        min: usize,
        /// Number of items supplied.
        count: usize,
    },
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Network(Arc::new(value.without_url()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Serialization(Arc::new(value))
    }
}
