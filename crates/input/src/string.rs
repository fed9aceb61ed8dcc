//! In-memory source, mostly for tests and synthetic inputs.

use crate::{InputError, Source, Stream};
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::io::Cursor;

/// Serves text that is already in memory.
///
/// Content is never decompressed. Each `open()` returns a fresh reader
/// positioned at the start of the content.
#[derive(Debug, Clone)]
pub struct StringSource {
    content: Bytes,
}

impl StringSource {
    /// Build from exactly one of `text` or `buffer`.
    pub fn new(text: Option<String>, buffer: Option<Cursor<Vec<u8>>>) -> Result<Self, InputError> {
        match (text, buffer) {
            (Some(text), None) => Ok(Self::from_text(text)),
            (None, Some(buffer)) => Ok(Self::from_buffer(buffer)),
            (None, None) => Err(InputError::Configuration(
                "StringSource requires either text or a buffer".to_string(),
            )),
            (Some(_), Some(_)) => Err(InputError::Configuration(
                "StringSource accepts text or a buffer, not both".to_string(),
            )),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: Bytes::from(text.into()),
        }
    }

    /// Adopt an existing buffer. Its read position is discarded.
    pub fn from_buffer(buffer: Cursor<Vec<u8>>) -> Self {
        Self {
            content: Bytes::from(buffer.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[async_trait]
impl Source for StringSource {
    async fn open(&self) -> Result<Stream, InputError> {
        Ok(Stream::from_bytes(self.content.clone()))
    }
}

impl fmt::Display for StringSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StringSource('...')")
    }
}
