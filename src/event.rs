//! Parse events
//!
//! The lexer reduces the byte stream to this closed variant; every
//! downstream component (path tracker, filter engine, sinks) consumes it
//! through a single dispatch point instead of open-ended callbacks.

use serde_json::Value;

/// One notification of parsed structure, emitted in document order.
///
/// `Scalar` carries only leaf values (string, number, boolean, null);
/// containers are reconstructed from the surrounding start/end pairs.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// `{` — an object opens at the current path.
    ObjectStart,
    /// `}` — the innermost object closes.
    ObjectEnd,
    /// `[` — an array opens at the current path.
    ArrayStart,
    /// `]` — the innermost array closes.
    ArrayEnd,
    /// An object member key. Subject to the configured key transform.
    Key(String),
    /// A leaf value.
    Scalar(Value),
}

impl Event {
    /// True for the two container-open events.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Event::ObjectStart | Event::ArrayStart)
    }

    /// True for the two container-close events.
    #[must_use]
    pub fn is_close(&self) -> bool {
        matches!(self, Event::ObjectEnd | Event::ArrayEnd)
    }
}

/// Which kind of container a structural event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Object,
    Array,
}
