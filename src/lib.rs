//! vlad library
//!
//! Command-line options and source selection for the `vlad` binary. The
//! source types themselves live in the `vlad-input` crate.
//!
//! # Locators
//!
//! - `s3://bucket/key` - object in S3 (or an S3-compatible store)
//! - `-` - standard input, read fully into memory
//! - anything else - local file path

use anyhow::Context;
use clap::Args;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

pub use vlad_input as input;
use vlad_input::{
    Credentials, LocalSource, ObjectStore, RemoteObjectConfig, RemoteObjectSource, Source,
    StringSource,
};

/// Remote object-store connection options
#[derive(Args, Clone, Debug, Default)]
pub struct RemoteOpts {
    /// Access key for the object store (uses the default credential chain if unset)
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Secret key for the object store
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Session token for temporary credentials
    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,

    /// Region of the bucket
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Address buckets by path instead of virtual host
    #[arg(long)]
    pub force_path_style: bool,
}

impl RemoteOpts {
    /// Explicit credentials, if both halves of the key pair were given.
    pub fn credentials(&self) -> anyhow::Result<Option<Credentials>> {
        match (&self.access_key, &self.secret_key) {
            (Some(access_key), Some(secret_key)) => {
                let credentials = Credentials::new(access_key, secret_key);
                Ok(Some(match &self.session_token {
                    Some(token) => credentials.with_session_token(token),
                    None => credentials,
                }))
            }
            (None, None) => Ok(None),
            _ => anyhow::bail!("--access-key and --secret-key must be given together"),
        }
    }

    #[cfg(feature = "s3")]
    fn object_store(&self) -> Option<Arc<dyn ObjectStore>> {
        let mut store = vlad_input::S3ObjectStore::default()
            .with_force_path_style(self.force_path_style);
        if let Some(region) = &self.region {
            store = store.with_region(region);
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            store = store.with_endpoint_url(endpoint_url);
        }
        Some(Arc::new(store))
    }

    #[cfg(not(feature = "s3"))]
    fn object_store(&self) -> Option<Arc<dyn ObjectStore>> {
        None
    }
}

/// Where a locator points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Stdin,
    Remote(String),
    Local(PathBuf),
}

impl Locator {
    pub fn parse(locator: &str) -> Self {
        if locator == "-" {
            Locator::Stdin
        } else if locator.starts_with("s3://") {
            Locator::Remote(locator.to_string())
        } else {
            Locator::Local(PathBuf::from(locator))
        }
    }
}

/// Build the source a locator names.
///
/// Standard input is consumed here, so it can only be selected once per
/// process.
pub async fn build_source(locator: &str, opts: &RemoteOpts) -> anyhow::Result<Box<dyn Source>> {
    let source: Box<dyn Source> = match Locator::parse(locator) {
        Locator::Stdin => {
            let mut buffer = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buffer)
                .await
                .context("Failed to read standard input")?;
            Box::new(StringSource::from_buffer(Cursor::new(buffer)))
        }
        Locator::Remote(path) => {
            let config = RemoteObjectConfig {
                path: Some(path),
                credentials: opts.credentials()?,
                ..Default::default()
            };
            Box::new(RemoteObjectSource::with_store(config, opts.object_store())?)
        }
        Locator::Local(path) => Box::new(LocalSource::new(path)?),
    };

    tracing::debug!("Selected {source} for locator {locator}");
    Ok(source)
}
