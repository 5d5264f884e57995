//! Newline-aligned chunking of a byte stream.
//!
//! `ChunkSplitter` reads the source sequentially and hands out chunks that
//! always end on a line terminator, so no line is ever split between two
//! units of work.

use std::io::Read;
use std::mem;

use crate::error::{AnalysisError, Result};

/// Default target chunk size (10 MiB)
pub const DEFAULT_CHUNK_BYTES: usize = 10 * 1024 * 1024;

/// An immutable slice of decoded text that ends at a line boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    id: u64,
    offset: u64,
    text: String,
    lossy: bool,
}

impl Chunk {
    /// Build a chunk directly from text. Used by callers that already hold
    /// line-aligned data in memory.
    pub fn new(id: u64, offset: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            offset,
            text: text.into(),
            lossy: false,
        }
    }

    fn from_bytes(id: u64, offset: u64, bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self {
                id,
                offset,
                text,
                lossy: false,
            },
            Err(err) => Self {
                id,
                offset,
                text: String::from_utf8_lossy(err.as_bytes()).into_owned(),
                lossy: true,
            },
        }
    }

    /// Sequential id in source order, starting at 0.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Byte offset of the chunk's first byte in the source.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether invalid UTF-8 was replaced with U+FFFD while decoding.
    pub fn is_lossy(&self) -> bool {
        self.lossy
    }
}

/// Lazily splits a reader into newline-aligned [`Chunk`]s of roughly
/// `target_bytes` each.
///
/// A line longer than the target is never cut; the chunk holding it simply
/// grows until its terminator (or EOF) is reached.
pub struct ChunkSplitter<R> {
    reader: R,
    target_bytes: usize,
    /// Bytes read past the last emitted terminator. Never contains `\n`.
    carry: Vec<u8>,
    next_id: u64,
    emitted_bytes: u64,
    bytes_read: u64,
    done: bool,
}

impl<R: Read> ChunkSplitter<R> {
    pub fn new(reader: R, target_bytes: usize) -> Result<Self> {
        if target_bytes == 0 {
            return Err(AnalysisError::InvalidConfig(
                "chunk size must be at least 1 byte".to_string(),
            ));
        }
        Ok(Self {
            reader,
            target_bytes,
            carry: Vec::new(),
            next_id: 0,
            emitted_bytes: 0,
            bytes_read: 0,
            done: false,
        })
    }

    fn emit(&mut self, bytes: Vec<u8>) -> Chunk {
        let chunk = Chunk::from_bytes(self.next_id, self.emitted_bytes, bytes);
        self.next_id += 1;
        self.emitted_bytes = self.bytes_read - self.carry.len() as u64;
        chunk
    }

    /// Append up to one target's worth of bytes to the carry. The carry only
    /// grows by what the reader actually delivers.
    fn fill(&mut self) -> std::io::Result<usize> {
        let before = self.carry.len();
        let result = (&mut self.reader)
            .take(self.target_bytes as u64)
            .read_to_end(&mut self.carry);
        // Bytes read before a failure stay in the carry and count toward the offset
        let n = self.carry.len() - before;
        self.bytes_read += n as u64;
        result.map(|_| n)
    }
}

impl<R: Read> Iterator for ChunkSplitter<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let start = self.carry.len();

            let n = match self.fill() {
                Ok(n) => n,
                Err(source) => {
                    self.done = true;
                    self.carry.clear();
                    return Some(Err(AnalysisError::Read {
                        offset: self.bytes_read,
                        source,
                    }));
                }
            };

            if n == 0 {
                self.done = true;
                if self.carry.is_empty() {
                    return None;
                }
                // Unterminated final line
                let bytes = mem::take(&mut self.carry);
                return Some(Ok(self.emit(bytes)));
            }

            // The carry held no terminator, so only the fresh bytes need scanning.
            if let Some(pos) = self.carry[start..].iter().rposition(|&b| b == b'\n') {
                let rest = self.carry.split_off(start + pos + 1);
                let bytes = mem::replace(&mut self.carry, rest);
                return Some(Ok(self.emit(bytes)));
            }
        }
    }
}
