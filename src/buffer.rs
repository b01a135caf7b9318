//! Feed buffer for chunked input
//!
//! Accumulates incoming chunks and lets the lexer consume complete tokens
//! while partial ones stay buffered until the next feed. Identical parser
//! behavior per byte regardless of how the input was split into chunks.

use bytes::{Buf, BytesMut};

/// Growable buffer holding not-yet-consumed input bytes.
///
/// `consumed()` is the absolute offset of the first buffered byte in the
/// overall stream, used for error reporting.
#[derive(Debug)]
pub(crate) struct FeedBuffer {
    buf: BytesMut,
    consumed: u64,
    total_in: u64,
}

impl FeedBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            consumed: 0,
            total_in: 0,
        }
    }

    /// Append one incoming chunk. Empty chunks are accepted and change
    /// nothing.
    pub(crate) fn append(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        self.total_in += chunk.len() as u64;
        self.buf.extend_from_slice(chunk);
    }

    /// Unconsumed bytes.
    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf[..]
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop `n` bytes from the front after the lexer has consumed them.
    pub(crate) fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.buf.len());
        self.buf.advance(n);
        self.consumed += n as u64;
    }

    /// Absolute stream offset of `as_slice()[0]`.
    #[inline]
    pub(crate) fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Total bytes ever appended.
    #[inline]
    pub(crate) fn total_in(&self) -> u64 {
        self.total_in
    }
}
