//! Chunk sources
//!
//! One capability interface — "yield the next chunk or signal done" —
//! with adapters for in-memory buffers, blocking readers, chunk
//! iterators, and externally pushed data handed over a bounded channel.
//! The parser core never inspects concrete source types.

use std::io::Read;

use bytes::Bytes;
use crossbeam_channel::{Receiver, Sender, bounded};

use crate::error::Result;

/// Supplies the parser with input, one chunk at a time.
///
/// `Ok(None)` means end of input. Empty chunks are legal and ignored by
/// the parser. A source error is terminal for the parse session.
pub trait ChunkSource {
    fn next_chunk(&mut self) -> Result<Option<Bytes>>;
}

/// In-memory input, yielded in `read_buffer_size` slices.
#[derive(Debug)]
pub(crate) struct BufferSource {
    data: Bytes,
    chunk_size: usize,
}

impl BufferSource {
    pub(crate) fn new(data: Bytes, chunk_size: usize) -> Self {
        Self { data, chunk_size }
    }
}

impl ChunkSource for BufferSource {
    fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.data.is_empty() {
            return Ok(None);
        }
        let take = self.chunk_size.min(self.data.len());
        Ok(Some(self.data.split_to(take)))
    }
}

/// Blocking `io::Read` input.
#[derive(Debug)]
pub(crate) struct ReaderSource<R> {
    reader: R,
    chunk_size: usize,
}

impl<R: Read> ReaderSource<R> {
    pub(crate) fn new(reader: R, chunk_size: usize) -> Self {
        Self { reader, chunk_size }
    }
}

impl<R: Read> ChunkSource for ReaderSource<R> {
    fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        let mut buf = vec![0u8; self.chunk_size];
        let n = self.reader.read(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(Bytes::from(buf)))
    }
}

/// Adapt any chunk iterator (e.g. a body-callback generator collected
/// into chunks) into a source.
#[derive(Debug)]
pub struct IterSource<I> {
    iter: I,
}

impl<I> IterSource<I> {
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I, B> ChunkSource for IterSource<I>
where
    I: Iterator<Item = B>,
    B: Into<Bytes>,
{
    fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        Ok(self.iter.next().map(Into::into))
    }
}

/// Create a single-slot handoff for feeding chunks from another thread
/// while this thread pulls values.
///
/// The writer blocks until the pull side consumes the previous chunk.
/// Dropping the consuming parser (or its iterator) disconnects the
/// channel; subsequent writes report `false` instead of panicking, which
/// is the cancellation signal for the producer.
pub fn chunk_channel() -> (ChunkWriter, ChannelSource) {
    let (tx, rx) = bounded(1);
    (ChunkWriter { tx }, ChannelSource { rx })
}

/// Producer half of [`chunk_channel`].
#[derive(Debug, Clone)]
pub struct ChunkWriter {
    tx: Sender<Bytes>,
}

impl ChunkWriter {
    /// Hand one chunk to the parser. Returns `false` once the consumer
    /// has gone away and no further input is wanted.
    pub fn write(&self, chunk: impl Into<Bytes>) -> bool {
        self.tx.send(chunk.into()).is_ok()
    }
}

/// Consumer half of [`chunk_channel`]; input ends when every writer has
/// been dropped.
#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<Bytes>,
}

impl ChunkSource for ChannelSource {
    fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        Ok(self.rx.recv().ok())
    }
}
