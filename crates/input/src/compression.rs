//! Suffix-driven transparent decompression.
//!
//! Both local and remote sources fetch the entire content into memory first
//! and then, if the locator names a compressed file, wrap that buffer in a
//! decoder. Memory use is therefore proportional to the compressed size plus
//! the decoder's internal buffer; there is no streaming over a live
//! connection.

use crate::Stream;
use bytes::Bytes;
use flate2::read::MultiGzDecoder;
use std::io::{BufReader, Cursor};

/// Suffix that marks gzip-compressed content. Matched case-sensitively.
pub const GZIP_SUFFIX: &str = ".gz";

/// Compression applied to a source's raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    /// Detect compression from a path or object key.
    pub fn from_name(name: &str) -> Self {
        if name.ends_with(GZIP_SUFFIX) {
            Compression::Gzip
        } else {
            Compression::None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
        }
    }

    /// Wrap fully fetched content in the matching decoder.
    ///
    /// Decoding happens lazily as the returned stream is read, so a corrupt
    /// archive surfaces as an `io::Error` from the stream, not from here.
    pub fn wrap(&self, content: Bytes) -> Stream {
        match self {
            Compression::None => Stream::from_bytes(content),
            Compression::Gzip => Stream::Reader(Box::new(BufReader::new(MultiGzDecoder::new(
                Cursor::new(content),
            )))),
        }
    }
}
