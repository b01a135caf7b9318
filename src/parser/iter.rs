//! Pull iterators
//!
//! Wrap a configured [`Parser`] and drive its chunk source on demand:
//! each `next` call drains whatever the sink already holds before asking
//! the source for more bytes. A parse or source error is yielded exactly
//! once, after every value completed before the failure point, and the
//! iterator is fused afterwards. Dropping the iterator drops the source,
//! which stops all chunk consumption.

use crate::error::{Error, Result};
use crate::event::Event;
use crate::sink::Emission;

use super::{Parser, ParserState};

/// Pull iterator over completed values, in document order.
pub struct Values {
    parser: Parser,
    source: Option<Box<dyn super::ChunkSource>>,
    pending_error: Option<Error>,
    finished: bool,
}

impl Values {
    pub(super) fn new(mut parser: Parser) -> Self {
        let source = parser.source.take();
        Self {
            parser,
            source,
            pending_error: None,
            finished: false,
        }
    }

    /// Advance the parse by one source chunk, recording any failure for
    /// delivery after the values that preceded it.
    fn advance(&mut self) {
        let Some(source) = self.source.as_mut() else {
            self.finished = true;
            return;
        };
        match source.next_chunk() {
            Ok(Some(chunk)) => {
                self.parser.buffer.append(&chunk);
                if let Err(err) = self.parser.pump(false) {
                    self.pending_error = Some(err);
                }
            }
            Ok(None) => {
                self.finished = true;
                match self.parser.pump(true) {
                    Ok(()) => self.parser.state = ParserState::Exhausted,
                    Err(err) => self.pending_error = Some(err),
                }
            }
            Err(err) => {
                self.parser.state = ParserState::Failed;
                self.pending_error = Some(err);
            }
        }
    }
}

impl Iterator for Values {
    type Item = Result<Emission>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(emission) = self.parser.sink.pop_value() {
                return Some(Ok(emission));
            }
            if let Some(err) = self.pending_error.take() {
                self.finished = true;
                return Some(Err(err));
            }
            if self.finished {
                return None;
            }
            self.advance();
        }
    }
}

impl std::fmt::Debug for Values {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Values")
            .field("parser", &self.parser)
            .field("finished", &self.finished)
            .finish()
    }
}

/// Pull iterator over the raw `(path, event)` stream.
pub struct Events {
    parser: Parser,
    source: Option<Box<dyn super::ChunkSource>>,
    pending_error: Option<Error>,
    finished: bool,
}

impl Events {
    pub(super) fn new(mut parser: Parser) -> Self {
        let source = parser.source.take();
        Self {
            parser,
            source,
            pending_error: None,
            finished: false,
        }
    }

    fn advance(&mut self) {
        let Some(source) = self.source.as_mut() else {
            self.finished = true;
            return;
        };
        match source.next_chunk() {
            Ok(Some(chunk)) => {
                self.parser.buffer.append(&chunk);
                if let Err(err) = self.parser.pump(false) {
                    self.pending_error = Some(err);
                }
            }
            Ok(None) => {
                self.finished = true;
                match self.parser.pump(true) {
                    Ok(()) => self.parser.state = ParserState::Exhausted,
                    Err(err) => self.pending_error = Some(err),
                }
            }
            Err(err) => {
                self.parser.state = ParserState::Failed;
                self.pending_error = Some(err);
            }
        }
    }
}

impl Iterator for Events {
    type Item = Result<(String, Event)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pair) = self.parser.sink.pop_event() {
                return Some(Ok(pair));
            }
            if let Some(err) = self.pending_error.take() {
                self.finished = true;
                return Some(Err(err));
            }
            if self.finished {
                return None;
            }
            self.advance();
        }
    }
}

impl std::fmt::Debug for Events {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Events")
            .field("parser", &self.parser)
            .field("finished", &self.finished)
            .finish()
    }
}
