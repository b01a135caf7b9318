//! Match regions and builder frames
//!
//! A region is one live selector match: it owns a stack of build frames
//! mirroring the structural nesting below its opening event and turns that
//! event stream back into a finished value. Regions never share frames, so
//! a selector firing inside another open region cannot corrupt it.

use serde_json::{Map, Value};

use crate::event::ContainerKind;

/// One in-progress container.
///
/// Objects keep insertion order (serde_json's `preserve_order` map) and a
/// pending-key slot that must be filled before any value lands in them.
#[derive(Debug)]
pub(crate) enum Frame {
    Object {
        map: Map<String, Value>,
        pending: Option<String>,
    },
    Array(Vec<Value>),
}

impl Frame {
    fn new(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Object => Frame::Object {
                map: Map::new(),
                pending: None,
            },
            ContainerKind::Array => Frame::Array(Vec::new()),
        }
    }

    /// Finalize into a value. Empty containers become empty maps/arrays,
    /// never null.
    fn finalize(self) -> Value {
        match self {
            Frame::Object { map, .. } => Value::Object(map),
            Frame::Array(items) => Value::Array(items),
        }
    }
}

/// Live state for one open selector match.
#[derive(Debug)]
pub(crate) struct Region {
    /// Index of the selector that opened this region; used to ignore
    /// reentrant opens for the same pattern.
    pub(crate) selector: usize,
    /// Rendered path of the opening event, kept when with-path delivery
    /// was requested.
    pub(crate) path: Option<String>,
    frames: Vec<Frame>,
}

impl Region {
    /// Open a region at a container-open event.
    pub(crate) fn open(selector: usize, path: Option<String>, kind: ContainerKind) -> Self {
        Self {
            selector,
            path,
            frames: vec![Frame::new(kind)],
        }
    }

    /// A structural start inside this region: one more frame.
    pub(crate) fn push_frame(&mut self, kind: ContainerKind) {
        self.frames.push(Frame::new(kind));
    }

    /// Set the pending key of the innermost object frame.
    pub(crate) fn record_key(&mut self, name: &str) {
        match self.frames.last_mut() {
            Some(Frame::Object { pending, .. }) => *pending = Some(name.to_owned()),
            _ => panic!("key event without an open object frame"),
        }
    }

    /// Append a scalar to the innermost frame.
    pub(crate) fn record_scalar(&mut self, value: Value) {
        match self.frames.last_mut() {
            Some(Frame::Object { map, pending }) => {
                let Some(key) = pending.take() else {
                    panic!("scalar recorded into object frame with no pending key");
                };
                map.insert(key, value);
            }
            Some(Frame::Array(items)) => items.push(value),
            None => panic!("scalar recorded into region with no frames"),
        }
    }

    /// A structural close inside this region: finalize the innermost
    /// frame. Returns the region's completed value once the frame that
    /// opened it closes.
    pub(crate) fn close_frame(&mut self) -> Option<Value> {
        let value = match self.frames.pop() {
            Some(frame) => frame.finalize(),
            None => panic!("close event for region with no frames"),
        };
        if self.frames.is_empty() {
            return Some(value);
        }
        match self.frames.last_mut() {
            Some(Frame::Object { map, pending }) => {
                let Some(key) = pending.take() else {
                    panic!("container closed into object frame with no pending key");
                };
                map.insert(key, value);
            }
            Some(Frame::Array(items)) => items.push(value),
            None => unreachable!(),
        }
        None
    }
}
