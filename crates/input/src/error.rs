//! Error types for input sources.

use thiserror::Error;

/// Boxed cause carried by errors that come from an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while constructing or opening a source.
///
/// Every variant is returned to the caller as-is. Sources never retry and
/// never turn a failure into an empty result.
#[derive(Error, Debug)]
pub enum InputError {
    /// Invalid or ambiguous construction arguments.
    #[error("Invalid source configuration: {0}")]
    Configuration(String),

    /// An optional backend required by the chosen source is not available.
    #[error("Missing capability: {0}")]
    MissingCapability(String),

    /// The origin resolved to no data.
    #[error("Not found: {locator}")]
    NotFound {
        locator: String,
        #[source]
        source: BoxError,
    },

    /// Credentials were rejected (or could not be resolved) by the remote store.
    #[error("Authentication failed for {locator}")]
    Authentication {
        locator: String,
        #[source]
        source: BoxError,
    },

    /// Connectivity or service-level failure. Not retried here.
    #[error("Remote request failed for {locator}")]
    TransientRemote {
        locator: String,
        #[source]
        source: BoxError,
    },
}

impl InputError {
    pub fn not_found(locator: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::NotFound {
            locator: locator.into(),
            source: source.into(),
        }
    }

    pub fn authentication(locator: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Authentication {
            locator: locator.into(),
            source: source.into(),
        }
    }

    pub fn transient(locator: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::TransientRemote {
            locator: locator.into(),
            source: source.into(),
        }
    }

    /// Whether a caller may reasonably retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientRemote { .. })
    }
}
