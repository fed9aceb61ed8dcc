//! Remote object-storage source
//!
//! The storage client is an injected capability ([`ObjectStore`]) so that a
//! build without a client, or a caller that supplies none, fails at
//! construction with [`InputError::MissingCapability`] instead of failing
//! later on the network.

use crate::compression::Compression;
use crate::{InputError, Source, Stream};
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// Explicit key/secret pair for the remote store.
///
/// `Debug` masks the secret and session token; `Display` is not implemented.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
    session_token: Option<String>,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token for temporary credentials.
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(session_token.into());
        self
    }

    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    #[inline]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    #[inline]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// First four characters of the access key followed by asterisks.
    pub fn access_key_masked(&self) -> String {
        match self.access_key.get(..4) {
            Some(prefix) if self.access_key.len() > 4 => format!("{prefix}***"),
            _ => "*".repeat(self.access_key.chars().count()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key_masked())
            .field("secret_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// A connected client able to fetch whole objects.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    /// Fetch the full content of `bucket`/`key`.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, InputError>;
}

/// Remote object-storage capability.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Connect with explicit credentials, or with the store's ambient
    /// credential resolution when `credentials` is `None`.
    async fn connect(
        &self,
        credentials: Option<&Credentials>,
    ) -> Result<Box<dyn ObjectClient>, InputError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// The object store compiled into this build, if any.
#[cfg(feature = "s3")]
pub fn default_object_store() -> Option<Arc<dyn ObjectStore>> {
    Some(Arc::new(crate::aws::S3ObjectStore::default()))
}

/// The object store compiled into this build, if any.
#[cfg(not(feature = "s3"))]
pub fn default_object_store() -> Option<Arc<dyn ObjectStore>> {
    None
}

/// Construction arguments for [`RemoteObjectSource`].
///
/// Exactly one addressing mode must be used: `path` alone, or `bucket` and
/// `key` together. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct RemoteObjectConfig {
    pub path: Option<String>,
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub credentials: Option<Credentials>,
}

impl RemoteObjectConfig {
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn from_bucket_key(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            key: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// Parse a locator of the form `scheme://bucket/key/to/object`.
///
/// The authority becomes the bucket and everything after the following `/`
/// becomes the key.
pub fn parse_locator(locator: &str) -> Result<(String, String), InputError> {
    let invalid = |reason: &str| {
        InputError::Configuration(format!(
            "Locator '{locator}' {reason}; expected 'scheme://bucket/key'"
        ))
    };

    let (scheme, rest) = locator
        .split_once("://")
        .ok_or_else(|| invalid("has no scheme"))?;
    if scheme.is_empty() {
        return Err(invalid("has an empty scheme"));
    }

    let (bucket, key) = rest
        .split_once('/')
        .ok_or_else(|| invalid("has no key"))?;
    if bucket.is_empty() {
        return Err(invalid("has an empty bucket"));
    }
    if key.is_empty() {
        return Err(invalid("has an empty key"));
    }

    Ok((bucket.to_string(), key.to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Reads a whole object from a remote bucket.
pub struct RemoteObjectSource {
    store: Arc<dyn ObjectStore>,
    locator: String,
    bucket: String,
    key: String,
    credentials: Option<Credentials>,
}

impl RemoteObjectSource {
    /// Build a source using the object store compiled into this build.
    pub fn new(config: RemoteObjectConfig) -> Result<Self, InputError> {
        Self::with_store(config, default_object_store())
    }

    /// Build a source with an explicitly supplied object store.
    ///
    /// `None` means the capability is unavailable and always yields
    /// [`InputError::MissingCapability`], regardless of the addressing
    /// arguments.
    pub fn with_store(
        config: RemoteObjectConfig,
        store: Option<Arc<dyn ObjectStore>>,
    ) -> Result<Self, InputError> {
        let store = store.ok_or_else(|| {
            InputError::MissingCapability(
                "no remote object-storage client is available; \
                 enable the `s3` feature or supply an ObjectStore"
                    .to_string(),
            )
        })?;

        let RemoteObjectConfig {
            path,
            bucket,
            key,
            credentials,
        } = config;

        let (locator, bucket, key) =
            match (non_empty(path), non_empty(bucket), non_empty(key)) {
                (Some(path), None, None) => {
                    let (bucket, key) = parse_locator(&path)?;
                    (path, bucket, key)
                }
                (None, Some(bucket), Some(key)) => {
                    (format!("s3://{bucket}/{key}"), bucket, key)
                }
                (Some(_), _, _) => {
                    return Err(InputError::Configuration(
                        "'path' cannot be combined with 'bucket' or 'key'".to_string(),
                    ))
                }
                _ => {
                    return Err(InputError::Configuration(
                        "Either 'path' or both 'bucket' and 'key' must be set".to_string(),
                    ))
                }
            };

        Ok(Self {
            store,
            locator,
            bucket,
            key,
            credentials,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Printable locator, `scheme://bucket/key`.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    fn credential_mode(&self) -> &'static str {
        if self.credentials.is_some() {
            "explicit"
        } else {
            "ambient"
        }
    }
}

#[async_trait]
impl Source for RemoteObjectSource {
    async fn open(&self) -> Result<Stream, InputError> {
        tracing::debug!(
            "Connecting to {} for {} ({} credentials)",
            self.store.name(),
            self.locator,
            self.credential_mode()
        );
        let client = self.store.connect(self.credentials.as_ref()).await?;

        let contents = client.get_object(&self.bucket, &self.key).await?;

        let compression = Compression::from_name(&self.key);
        tracing::debug!(
            "Fetched {} bytes from {} (compression: {})",
            contents.len(),
            self.locator,
            compression.name()
        );

        Ok(compression.wrap(contents))
    }
}

impl fmt::Display for RemoteObjectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RemoteObjectSource('{}')", self.locator)
    }
}

impl fmt::Debug for RemoteObjectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteObjectSource")
            .field("store", &self.store.name())
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .field("credentials", &self.credential_mode())
            .finish()
    }
}
