//! Per-connection line framing.
//!
//! Bytes from the socket are appended at the tail; complete `\n`-terminated
//! lines are taken from the head. Whatever follows the last delimiter stays
//! buffered until the next read completes it.

use bytes::{Bytes, BytesMut};

/// Initial capacity for a connection's line buffer.
const INITIAL_CAPACITY: usize = 4 * 1024;

/// Line delimiter.
const DELIMITER: u8 = b'\n';

/// Accumulates bytes for one connection and splits them into lines.
#[derive(Debug)]
pub struct LineBuffer {
    buffer: BytesMut,
    /// Prefix of `buffer` already known to contain no delimiter.
    scanned: usize,
}

impl LineBuffer {
    /// Create an empty line buffer.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create an empty line buffer with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            scanned: 0,
        }
    }

    /// Append newly received bytes at the tail.
    pub fn append(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Remove and return the next complete line, without its delimiter.
    ///
    /// Returns `None` when no delimiter is buffered yet. Call repeatedly
    /// after each [`append`](Self::append) until it returns `None`, since a
    /// single read may carry any number of lines.
    pub fn next_line(&mut self) -> Option<Bytes> {
        let found = self.buffer[self.scanned..]
            .iter()
            .position(|&b| b == DELIMITER);

        match found {
            Some(offset) => {
                let end = self.scanned + offset;
                let mut line = self.buffer.split_to(end + 1);
                line.truncate(end);
                self.scanned = 0;
                Some(line.freeze())
            }
            None => {
                self.scanned = self.buffer.len();
                None
            }
        }
    }

    /// Number of buffered bytes not yet returned as a line.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard everything buffered.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.scanned = 0;
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
