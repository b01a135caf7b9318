//! Incremental JSON lexer
//!
//! Turns buffered bytes into [`Event`]s one at a time. The lexer is fully
//! resumable: a token cut off by a chunk boundary stays in the feed buffer
//! and `next_event` returns `Ok(None)` until enough bytes arrive, so the
//! event stream is identical no matter how the input was chunked.
//!
//! Grammar is strict RFC 8259: one top-level document, no trailing data,
//! no comments, strict number syntax, full escape handling with surrogate
//! pairs. Malformed input yields a terminal [`Error::Syntax`] carrying the
//! absolute byte offset.

mod scan;

use serde_json::Value;

use crate::buffer::FeedBuffer;
use crate::error::{Error, Result};
use crate::event::{ContainerKind, Event};

/// What the grammar allows at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    /// A value is required (document root, after `:`, after `,` in arrays).
    Value,
    /// A value or `]` (immediately after `[`).
    ValueOrClose,
    /// A key or `}` (immediately after `{`).
    KeyOrClose,
    /// A key is required (after `,` in objects).
    Key,
    /// `:` between a key and its value.
    Colon,
    /// `,` or the matching close of the innermost container.
    Delim,
    /// The top-level value is complete; only whitespace may follow.
    Done,
}

/// Streaming tokenizer state.
#[derive(Debug)]
pub(crate) struct Lexer {
    state: LexState,
    stack: Vec<ContainerKind>,
    started: bool,
}

impl Lexer {
    pub(crate) fn new() -> Self {
        Self {
            state: LexState::Value,
            stack: Vec::new(),
            started: false,
        }
    }

    /// True once the single top-level document has been fully consumed.
    pub(crate) fn is_done(&self) -> bool {
        self.state == LexState::Done
    }

    /// Produce the next event from the buffer, consuming its bytes.
    ///
    /// Returns `Ok(None)` when more input is needed (or, with `eof`, when
    /// the document ended cleanly). With `eof` set, a partial token or an
    /// unterminated container is a syntax error instead of a wait.
    pub(crate) fn next_event(&mut self, buf: &mut FeedBuffer, eof: bool) -> Result<Option<Event>> {
        loop {
            skip_whitespace(buf);
            let Some(&byte) = buf.as_slice().first() else {
                return if eof { self.at_end_of_input(buf) } else { Ok(None) };
            };
            self.started = true;

            match self.state {
                LexState::Done => {
                    return Err(Error::syntax(
                        format!("trailing byte 0x{byte:02x} after document"),
                        buf.consumed(),
                    ));
                }
                LexState::Colon => {
                    if byte == b':' {
                        buf.consume(1);
                        self.state = LexState::Value;
                        continue;
                    }
                    return Err(Error::syntax(
                        format!("unexpected byte 0x{byte:02x}, expected ':'"),
                        buf.consumed(),
                    ));
                }
                LexState::Delim => match (byte, self.stack.last().copied()) {
                    (b',', Some(ContainerKind::Object)) => {
                        buf.consume(1);
                        self.state = LexState::Key;
                        continue;
                    }
                    (b',', Some(ContainerKind::Array)) => {
                        buf.consume(1);
                        self.state = LexState::Value;
                        continue;
                    }
                    (b'}', Some(ContainerKind::Object)) => {
                        return Ok(Some(self.close_container(buf)));
                    }
                    (b']', Some(ContainerKind::Array)) => {
                        return Ok(Some(self.close_container(buf)));
                    }
                    _ => {
                        return Err(Error::syntax(
                            format!("unexpected byte 0x{byte:02x}, expected ',' or close"),
                            buf.consumed(),
                        ));
                    }
                },
                LexState::KeyOrClose | LexState::Key => match byte {
                    b'"' => return self.lex_key(buf, eof),
                    b'}' if self.state == LexState::KeyOrClose => {
                        return Ok(Some(self.close_container(buf)));
                    }
                    _ => {
                        return Err(Error::syntax(
                            format!("unexpected byte 0x{byte:02x}, expected object key"),
                            buf.consumed(),
                        ));
                    }
                },
                LexState::Value | LexState::ValueOrClose => match byte {
                    b']' if self.state == LexState::ValueOrClose => {
                        return Ok(Some(self.close_container(buf)));
                    }
                    b'{' => {
                        buf.consume(1);
                        self.stack.push(ContainerKind::Object);
                        self.state = LexState::KeyOrClose;
                        return Ok(Some(Event::ObjectStart));
                    }
                    b'[' => {
                        buf.consume(1);
                        self.stack.push(ContainerKind::Array);
                        self.state = LexState::ValueOrClose;
                        return Ok(Some(Event::ArrayStart));
                    }
                    b'"' => return self.lex_string_value(buf, eof),
                    b't' | b'f' | b'n' => return self.lex_literal(buf, eof),
                    b'-' | b'0'..=b'9' => return self.lex_number(buf, eof),
                    _ => {
                        return Err(Error::syntax(
                            format!("unexpected byte 0x{byte:02x}, expected a value"),
                            buf.consumed(),
                        ));
                    }
                },
            }
        }
    }

    /// Buffer drained at end of input: fine at the root or after the
    /// document, an error anywhere inside it.
    fn at_end_of_input(&self, buf: &FeedBuffer) -> Result<Option<Event>> {
        if self.state == LexState::Done || !self.started {
            Ok(None)
        } else {
            Err(Error::syntax("unexpected end of input", buf.consumed()))
        }
    }

    fn close_container(&mut self, buf: &mut FeedBuffer) -> Event {
        buf.consume(1);
        let kind = self.stack.pop();
        self.state = self.after_value_state();
        match kind {
            Some(ContainerKind::Array) => Event::ArrayEnd,
            _ => Event::ObjectEnd,
        }
    }

    fn after_value_state(&self) -> LexState {
        if self.stack.is_empty() {
            LexState::Done
        } else {
            LexState::Delim
        }
    }

    fn lex_key(&mut self, buf: &mut FeedBuffer, eof: bool) -> Result<Option<Event>> {
        match scan::scan_string(buf.as_slice(), buf.consumed())? {
            Some((key, used)) => {
                buf.consume(used);
                self.state = LexState::Colon;
                Ok(Some(Event::Key(key)))
            }
            None if eof => Err(Error::syntax(
                "unexpected end of input inside string",
                buf.consumed() + buf.len() as u64,
            )),
            None => Ok(None),
        }
    }

    fn lex_string_value(&mut self, buf: &mut FeedBuffer, eof: bool) -> Result<Option<Event>> {
        match scan::scan_string(buf.as_slice(), buf.consumed())? {
            Some((text, used)) => {
                buf.consume(used);
                self.state = self.after_value_state();
                Ok(Some(Event::Scalar(Value::String(text))))
            }
            None if eof => Err(Error::syntax(
                "unexpected end of input inside string",
                buf.consumed() + buf.len() as u64,
            )),
            None => Ok(None),
        }
    }

    fn lex_literal(&mut self, buf: &mut FeedBuffer, eof: bool) -> Result<Option<Event>> {
        match scan::scan_literal(buf.as_slice(), eof, buf.consumed())? {
            Some((value, used)) => {
                buf.consume(used);
                self.state = self.after_value_state();
                Ok(Some(Event::Scalar(value)))
            }
            None => Ok(None),
        }
    }

    fn lex_number(&mut self, buf: &mut FeedBuffer, eof: bool) -> Result<Option<Event>> {
        match scan::scan_number(buf.as_slice(), eof, buf.consumed())? {
            Some((value, used)) => {
                buf.consume(used);
                self.state = self.after_value_state();
                Ok(Some(Event::Scalar(value)))
            }
            None => Ok(None),
        }
    }
}

fn skip_whitespace(buf: &mut FeedBuffer) {
    let n = buf
        .as_slice()
        .iter()
        .take_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
        .count();
    if n > 0 {
        buf.consume(n);
    }
}
