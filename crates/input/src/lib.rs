//! Input source abstraction for reading line-oriented content from the local
//! filesystem, a remote object store, or memory.
//!
//! # Source Types
//!
//! - **Local**: [`LocalSource`], a file on the local filesystem
//! - **Remote**: [`RemoteObjectSource`], an object in an S3 bucket
//! - **In-memory**: [`StringSource`], text or a byte buffer
//!
//! # Decompression
//!
//! Local paths and remote keys ending in `.gz` are decompressed
//! transparently. Content is always fetched into memory in full before it is
//! handed out; memory use is not bounded for large inputs.
//!
//! # Example
//!
//! ```ignore
//! use vlad_input::{LocalSource, RemoteObjectConfig, RemoteObjectSource, Source};
//!
//! let sources: Vec<Box<dyn Source>> = vec![
//!     Box::new(LocalSource::new("data/people.csv")?),
//!     Box::new(RemoteObjectSource::new(RemoteObjectConfig::from_path(
//!         "s3://my-bucket/people.csv.gz",
//!     ))?),
//! ];
//!
//! for source in &sources {
//!     for line in source.open().await?.into_lines() {
//!         // Process line...
//!     }
//! }
//! ```

#[cfg(feature = "s3")]
mod aws;
mod compression;
mod error;
mod local;
mod s3;
mod stream;
mod string;

use async_trait::async_trait;
use std::fmt;

#[cfg(feature = "s3")]
pub use aws::S3ObjectStore;
pub use compression::{Compression, GZIP_SUFFIX};
pub use error::{BoxError, InputError};
pub use local::LocalSource;
pub use s3::{
    default_object_store, parse_locator, Credentials, ObjectClient, ObjectStore,
    RemoteObjectConfig, RemoteObjectSource,
};
pub use stream::{Lines, Stream, StreamLines};
pub use string::StringSource;

/// A place line-oriented content can be read from.
///
/// `Display` gives a diagnostic identity such as `LocalSource('data.csv')`.
/// It never includes credentials or in-memory content.
#[async_trait]
pub trait Source: fmt::Display + Send + Sync {
    /// Read the source's content.
    ///
    /// Every call goes back to the origin; nothing is cached between calls.
    /// The returned future completes only once the whole content is in
    /// memory, and no work continues in the background afterwards.
    async fn open(&self) -> Result<Stream, InputError>;
}
