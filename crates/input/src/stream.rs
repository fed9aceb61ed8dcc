//! The readable handle returned by [`Source::open`](crate::Source::open).

use bytes::Bytes;
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Cursor, Read};

/// Content produced by opening a source.
///
/// Plain local files come back already split into lines; everything else is a
/// buffered reader over an in-memory copy of the content (possibly wrapped in
/// a decompressor). Both shapes can be consumed through [`Read`]/[`BufRead`]
/// or line by line through [`Stream::into_lines`].
pub enum Stream {
    /// Pre-split lines, consumed once.
    Lines(Lines),
    /// Buffered reader owning its backing buffer.
    Reader(Box<dyn BufRead + Send>),
}

impl Stream {
    /// Wrap an in-memory buffer without any decoding.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Stream::Reader(Box::new(Cursor::new(bytes.into())))
    }

    /// Split an in-memory buffer into lines up front.
    pub fn from_lines(content: &[u8]) -> Self {
        Stream::Lines(Lines::split(content))
    }

    /// Iterate over the remaining lines, each keeping its `\n` terminator.
    pub fn into_lines(self) -> StreamLines {
        StreamLines { stream: self }
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Lines(lines) => f.debug_tuple("Lines").field(&lines.remaining()).finish(),
            Stream::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Stream::Lines(lines) => lines.read(buf),
            Stream::Reader(reader) => reader.read(buf),
        }
    }
}

impl BufRead for Stream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Stream::Lines(lines) => lines.fill_buf(),
            Stream::Reader(reader) => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Stream::Lines(lines) => lines.consume(amt),
            Stream::Reader(reader) => reader.consume(amt),
        }
    }
}

/// An ordered sequence of raw lines.
///
/// Lines keep their terminator; a trailing line without `\n` is kept as-is.
/// `pos` tracks how much of the front line has already been handed out
/// through `Read`.
#[derive(Debug, Default)]
pub struct Lines {
    lines: VecDeque<Vec<u8>>,
    pos: usize,
}

impl Lines {
    pub fn split(content: &[u8]) -> Self {
        Self {
            lines: content
                .split_inclusive(|b| *b == b'\n')
                .map(<[u8]>::to_vec)
                .collect(),
            pos: 0,
        }
    }

    /// Number of lines not yet fully consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    fn skip_consumed(&mut self) {
        while self.lines.front().is_some_and(|l| self.pos >= l.len()) {
            self.lines.pop_front();
            self.pos = 0;
        }
    }
}

impl Iterator for Lines {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_consumed();
        let mut line = self.lines.pop_front()?;
        if self.pos > 0 {
            line.drain(..self.pos);
            self.pos = 0;
        }
        Some(line)
    }
}

impl Read for Lines {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for Lines {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.skip_consumed();
        Ok(match self.lines.front() {
            Some(line) => &line[self.pos..],
            None => &[],
        })
    }

    fn consume(&mut self, amt: usize) {
        self.pos += amt;
    }
}

/// Line iterator over either stream shape.
pub struct StreamLines {
    stream: Stream,
}

impl Iterator for StreamLines {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.stream {
            Stream::Lines(lines) => lines.next().map(Ok),
            Stream::Reader(reader) => {
                let mut line = Vec::new();
                match reader.read_until(b'\n', &mut line) {
                    Ok(0) => None,
                    Ok(_) => Some(Ok(line)),
                    Err(e) => Some(Err(e)),
                }
            }
        }
    }
}
