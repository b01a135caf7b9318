//! Emission sink: the push/pull bridge
//!
//! Completed values flow here exactly once, in document order. With a
//! registered callback they are delivered synchronously (push mode);
//! otherwise they queue for the pull iterators. Event capture backs the
//! event-level pull surface and is off unless that surface is in use.

use std::collections::VecDeque;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::event::Event;

/// A completed value produced by a selector match.
///
/// `path` is populated only when with-path delivery was requested at
/// construction; it is the rendered path at which the match opened
/// (e.g. `/rows/` for each element of a top-level `rows` array).
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub path: Option<String>,
    pub value: Value,
}

impl Emission {
    /// Discard the path, keeping the value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Deserialize the completed value into a concrete type.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.value)?)
    }
}

/// Callback invoked synchronously for each completed value.
pub type ValueCallback = Box<dyn FnMut(Emission)>;

/// Buffers completed values and parse events for whichever consumer is
/// attached.
pub(crate) struct EmissionSink {
    callback: Option<ValueCallback>,
    values: VecDeque<Emission>,
    events: VecDeque<(String, Event)>,
    capture_events: bool,
}

impl EmissionSink {
    pub(crate) fn new() -> Self {
        Self {
            callback: None,
            values: VecDeque::new(),
            events: VecDeque::new(),
            capture_events: false,
        }
    }

    /// Register (or replace) the push callback, returning the previous
    /// one.
    pub(crate) fn set_callback(&mut self, callback: ValueCallback) -> Option<ValueCallback> {
        self.callback.replace(callback)
    }

    pub(crate) fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Deliver one completed value: straight to the callback when one is
    /// registered, else onto the pull queue.
    pub(crate) fn emit(&mut self, emission: Emission) {
        match &mut self.callback {
            Some(callback) => callback(emission),
            None => self.values.push_back(emission),
        }
    }

    pub(crate) fn pop_value(&mut self) -> Option<Emission> {
        self.values.pop_front()
    }

    /// Turn on event capture for the event-level surfaces.
    pub(crate) fn enable_event_capture(&mut self) {
        self.capture_events = true;
    }

    pub(crate) fn captures_events(&self) -> bool {
        self.capture_events
    }

    pub(crate) fn push_event(&mut self, path: String, event: Event) {
        debug_assert!(self.capture_events);
        self.events.push_back((path, event));
    }

    pub(crate) fn pop_event(&mut self) -> Option<(String, Event)> {
        self.events.pop_front()
    }
}

impl fmt::Debug for EmissionSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmissionSink")
            .field("callback", &self.callback.is_some())
            .field("queued_values", &self.values.len())
            .field("queued_events", &self.events.len())
            .field("capture_events", &self.capture_events)
            .finish()
    }
}
