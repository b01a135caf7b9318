//! Feed controller
//!
//! [`Parser`] owns the whole pipeline: feed buffer, lexer, path tracker,
//! filter engine and emission sink. Chunks go in (from a source or via
//! `feed`), completed values come out (through the callback or a pull
//! iterator). All processing is synchronous: push callbacks fire before
//! `feed` returns.

mod iter;
mod options;
mod source;

use bytes::Bytes;
use serde_json::Value;

use crate::buffer::FeedBuffer;
use crate::error::{Error, Result};
use crate::event::{ContainerKind, Event};
use crate::filter::FilterEngine;
use crate::lexer::Lexer;
use crate::path::PathTracker;
use crate::sink::{Emission, EmissionSink, ValueCallback};

pub use self::iter::{Events, Values};
pub use self::options::{DEFAULT_READ_BUFFER_SIZE, KeyTransform, ParserOptions};
pub use self::source::{ChannelSource, ChunkSource, ChunkWriter, IterSource, chunk_channel};

/// Session lifecycle.
///
/// `Unconfigured` has seen no bytes and no driver; parse requests in that
/// state are usage errors. Both `Exhausted` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParserState {
    Unconfigured,
    Active,
    Exhausted,
    Failed,
}

/// Streaming JSON parser extracting selector-matched sub-values.
///
/// One instance handles one document (or one continuous filter run) for
/// one logical consumer, in exactly one delivery mode:
///
/// - push: register a callback with [`on_value`](Parser::on_value) and
///   drive input with [`feed`](Parser::feed) / [`finish`](Parser::finish);
/// - pull: construct with an input source and iterate
///   [`into_values`](Parser::into_values) (or
///   [`into_events`](Parser::into_events) for the raw event stream).
pub struct Parser {
    pub(crate) options: ParserOptions,
    pub(crate) state: ParserState,
    pub(crate) buffer: FeedBuffer,
    pub(crate) lexer: Lexer,
    pub(crate) tracker: PathTracker,
    pub(crate) filter: FilterEngine,
    pub(crate) sink: EmissionSink,
    pub(crate) source: Option<Box<dyn ChunkSource>>,
}

impl Parser {
    /// A parser with no input source, for feed-on-the-fly use: register a
    /// callback, then push chunks with [`feed`](Parser::feed).
    pub fn new(options: ParserOptions) -> Self {
        Self::build(None, options)
    }

    /// Parse an in-memory buffer.
    pub fn from_slice(data: impl Into<Bytes>, options: ParserOptions) -> Self {
        let chunk_size = options.read_buffer_size;
        let source = source::BufferSource::new(data.into(), chunk_size);
        Self::build(Some(Box::new(source)), options)
    }

    /// Parse from a blocking reader, `read_buffer_size` bytes at a time.
    pub fn from_reader<R: std::io::Read + 'static>(reader: R, options: ParserOptions) -> Self {
        let chunk_size = options.read_buffer_size;
        let source = source::ReaderSource::new(reader, chunk_size);
        Self::build(Some(Box::new(source)), options)
    }

    /// Parse from any chunk source (see [`IterSource`], [`chunk_channel`]).
    pub fn from_source<S: ChunkSource + 'static>(source: S, options: ParserOptions) -> Self {
        Self::build(Some(Box::new(source)), options)
    }

    fn build(source: Option<Box<dyn ChunkSource>>, options: ParserOptions) -> Self {
        let filter = FilterEngine::new(&options.filter, options.with_path);
        let capacity = options.read_buffer_size;
        Self {
            options,
            state: ParserState::Unconfigured,
            buffer: FeedBuffer::with_capacity(capacity),
            lexer: Lexer::new(),
            tracker: PathTracker::new(),
            filter,
            sink: EmissionSink::new(),
            source,
        }
    }

    /// Register the completion callback for push delivery, replacing and
    /// returning any previous one.
    pub fn on_value<F>(&mut self, callback: F) -> Option<ValueCallback>
    where
        F: FnMut(Emission) + 'static,
    {
        self.sink.set_callback(Box::new(callback))
    }

    /// Push one chunk of input.
    ///
    /// Requires a registered callback — feeding data with nowhere for it
    /// to go is rejected, not silently dropped. An empty chunk is a
    /// no-op. Completed values are delivered synchronously before this
    /// returns.
    pub fn feed(&mut self, chunk: impl AsRef<[u8]>) -> Result<()> {
        if !self.sink.has_callback() {
            return Err(Error::usage(
                "feed requires a completion callback; register one with on_value first",
            ));
        }
        self.check_not_terminal()?;
        let bytes = chunk.as_ref();
        if bytes.is_empty() {
            return Ok(());
        }
        self.state = ParserState::Active;
        self.buffer.append(bytes);
        self.pump(false)
    }

    /// Signal that no more input will arrive, finalizing any value that
    /// only end-of-input can bound (e.g. a bare trailing number) and
    /// rejecting truncated documents.
    pub fn finish(&mut self) -> Result<()> {
        if self.state == ParserState::Exhausted {
            return Ok(());
        }
        self.check_not_terminal()?;
        self.pump(true)?;
        self.state = ParserState::Exhausted;
        Ok(())
    }

    /// Consume the parser into a pull iterator of completed values.
    ///
    /// Fails with a usage error when no input source was configured. The
    /// sequence is forward-only and non-restartable; dropping it stops
    /// all further chunk consumption.
    pub fn into_values(mut self) -> Result<Values> {
        self.require_source("into_values")?;
        self.state = ParserState::Active;
        Ok(Values::new(self))
    }

    /// Consume the parser into a pull iterator of `(path, event)` pairs —
    /// the raw parse event stream, unfiltered.
    pub fn into_events(mut self) -> Result<Events> {
        self.require_source("into_events")?;
        self.state = ParserState::Active;
        self.sink.enable_event_capture();
        Ok(Events::new(self))
    }

    /// Drive the configured source to completion, invoking `callback` for
    /// every completed value (push over a source).
    pub fn each_value<F>(mut self, callback: F) -> Result<()>
    where
        F: FnMut(Emission) + 'static,
    {
        self.require_source("each_value")?;
        self.sink.set_callback(Box::new(callback));
        self.state = ParserState::Active;
        let mut source = self.source.take().unwrap_or_else(|| unreachable!());
        loop {
            match source.next_chunk() {
                Ok(Some(chunk)) => {
                    self.buffer.append(&chunk);
                    self.pump(false)?;
                }
                Ok(None) => {
                    self.pump(true)?;
                    self.state = ParserState::Exhausted;
                    return Ok(());
                }
                Err(err) => {
                    self.state = ParserState::Failed;
                    return Err(err);
                }
            }
        }
    }

    /// Drive the configured source to completion, invoking `callback` for
    /// every `(path, event)` pair.
    pub fn each_event<F>(mut self, mut callback: F) -> Result<()>
    where
        F: FnMut(String, Event),
    {
        self.require_source("each_event")?;
        self.sink.enable_event_capture();
        self.state = ParserState::Active;
        let mut source = self.source.take().unwrap_or_else(|| unreachable!());
        loop {
            let chunk = match source.next_chunk() {
                Ok(chunk) => chunk,
                Err(err) => {
                    self.state = ParserState::Failed;
                    return Err(err);
                }
            };
            let eof = chunk.is_none();
            if let Some(chunk) = chunk {
                self.buffer.append(&chunk);
            }
            let pumped = self.pump(eof);
            while let Some((path, event)) = self.sink.pop_event() {
                callback(path, event);
            }
            pumped?;
            if eof {
                self.state = ParserState::Exhausted;
                return Ok(());
            }
        }
    }

    fn require_source(&self, operation: &str) -> Result<()> {
        if self.source.is_none() {
            return Err(Error::usage(format!(
                "{operation} requires an input source; construct the parser with \
                 from_slice, from_reader or from_source"
            )));
        }
        Ok(())
    }

    fn check_not_terminal(&self) -> Result<()> {
        match self.state {
            ParserState::Failed => Err(Error::usage("parser already failed")),
            ParserState::Exhausted => Err(Error::usage("parser input already finished")),
            _ => Ok(()),
        }
    }

    /// Drain every event the lexer can currently produce through the
    /// pipeline.
    pub(crate) fn pump(&mut self, eof: bool) -> Result<()> {
        loop {
            match self.lexer.next_event(&mut self.buffer, eof) {
                Ok(Some(event)) => self.apply(event),
                Ok(None) => return Ok(()),
                Err(err) => {
                    self.state = ParserState::Failed;
                    log::debug!(
                        "parse failed after {} bytes: {err}",
                        self.buffer.total_in()
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Route one event through tracker, filter and sink. Path rendering
    /// happens against the tracker state the event refers to: opens
    /// before entering, closes after leaving, keys against the owning
    /// object.
    fn apply(&mut self, event: Event) {
        let filtering = !self.sink.captures_events();
        match event {
            Event::ObjectStart | Event::ArrayStart => {
                let kind = if matches!(event, Event::ObjectStart) {
                    ContainerKind::Object
                } else {
                    ContainerKind::Array
                };
                let path = self.tracker.render();
                if filtering {
                    self.filter.on_open(kind, &path);
                } else {
                    self.sink.push_event(path, event);
                }
                match kind {
                    ContainerKind::Object => self.tracker.enter_object(),
                    ContainerKind::Array => self.tracker.enter_array(),
                }
            }
            Event::Key(raw) => {
                self.tracker.drop_pending_key();
                let name = match &self.options.key_transform {
                    Some(transform) => transform(&raw),
                    None => raw.clone(),
                };
                if filtering {
                    self.filter.on_key(&name);
                } else {
                    let path = self.tracker.render();
                    self.sink.push_event(path, Event::Key(name));
                }
                self.tracker.set_key(&raw);
            }
            Event::Scalar(value) => {
                let path = self.tracker.render();
                if filtering {
                    self.filter.on_scalar(&path, &value, &mut self.sink);
                } else {
                    self.sink.push_event(path, Event::Scalar(value));
                }
            }
            Event::ObjectEnd | Event::ArrayEnd => {
                self.tracker.leave();
                if filtering {
                    self.filter.on_close(&mut self.sink);
                } else {
                    let path = self.tracker.render();
                    self.sink.push_event(path, event);
                }
            }
        }
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("state", &self.state)
            .field("options", &self.options)
            .field("buffered", &self.buffer.len())
            .field("depth", &self.tracker.depth())
            .field("done", &self.lexer.is_done())
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

/// Convenience: parse a complete in-memory document with no filter into
/// one value.
pub fn parse_document(data: impl Into<Bytes>) -> Result<Value> {
    let mut values = Parser::from_slice(data, ParserOptions::new()).into_values()?;
    let first = values
        .next()
        .transpose()?
        .ok_or_else(|| Error::usage("empty input contains no document"))?;
    Ok(first.value)
}
