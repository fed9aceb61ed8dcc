//! Local filesystem source

use crate::compression::Compression;
use crate::{InputError, Source, Stream};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};

/// Reads a file from the local filesystem.
///
/// Plain files are returned as pre-split lines. Files ending in `.gz` are
/// read fully into memory and returned behind a gzip decoder.
#[derive(Debug, Clone)]
pub struct LocalSource {
    path: PathBuf,
}

impl LocalSource {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, InputError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(InputError::Configuration(
                "LocalSource requires a non-empty path".to_string(),
            ));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn compression(&self) -> Compression {
        Compression::from_name(&self.path.to_string_lossy())
    }
}

#[async_trait]
impl Source for LocalSource {
    async fn open(&self) -> Result<Stream, InputError> {
        // The handle is scoped to the read; nothing stays open afterwards.
        let contents = tokio::fs::read(&self.path)
            .await
            .map_err(|e| InputError::not_found(self.path.display().to_string(), e))?;

        let compression = self.compression();
        tracing::debug!(
            "Read {} bytes from {} (compression: {})",
            contents.len(),
            self.path.display(),
            compression.name()
        );

        Ok(match compression {
            Compression::None => Stream::from_lines(&contents),
            Compression::Gzip => compression.wrap(contents.into()),
        })
    }
}

impl fmt::Display for LocalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalSource('{}')", self.path.display())
    }
}
