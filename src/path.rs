//! Document path tracking
//!
//! Maintains the logical location in the document as a stack of segments,
//! updated in lock-step with structural events. Array elements are not
//! individually addressed: membership in an array is one `Indexed` marker,
//! rendered as an empty segment, so the second element of `rows` and the
//! first both live at `/rows/`.

use std::fmt;

use crate::event::ContainerKind;

/// One step of a document path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An object member, addressed by key.
    Named(String),
    /// One element of an array, carrying no index.
    Indexed,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Named(name) => f.write_str(name),
            PathSegment::Indexed => Ok(()),
        }
    }
}

/// Per-container bookkeeping: objects need to know whether a key segment
/// for their current member is on the stack.
#[derive(Debug)]
struct TrackFrame {
    kind: ContainerKind,
    keyed: bool,
}

/// Stack of path segments mirroring the document nesting.
///
/// Rendering rules match the selector syntax: root is the empty string,
/// every other path starts with `/`, and `Indexed` renders empty
/// (`/rows//id` is the `id` member of a `rows` element).
#[derive(Debug, Default)]
pub(crate) struct PathTracker {
    segments: Vec<PathSegment>,
    frames: Vec<TrackFrame>,
}

impl PathTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Render the current path.
    pub(crate) fn render(&self) -> String {
        if self.segments.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for seg in &self.segments {
            out.push('/');
            if let PathSegment::Named(name) = seg {
                out.push_str(name);
            }
        }
        out
    }

    /// Current nesting depth.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// A just-opened object: children get segments once their key arrives.
    pub(crate) fn enter_object(&mut self) {
        self.frames.push(TrackFrame {
            kind: ContainerKind::Object,
            keyed: false,
        });
    }

    /// A just-opened array: every child shares one `Indexed` marker.
    pub(crate) fn enter_array(&mut self) {
        self.frames.push(TrackFrame {
            kind: ContainerKind::Array,
            keyed: true,
        });
        self.segments.push(PathSegment::Indexed);
    }

    /// Drop the key segment of the previous member, if any. Called before
    /// rendering the path of a `Key` event so that it names the owning
    /// object, not the sibling slot.
    pub(crate) fn drop_pending_key(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            if frame.kind == ContainerKind::Object && frame.keyed {
                self.segments.pop();
                frame.keyed = false;
            }
        }
    }

    /// Assign the next member slot of the innermost object.
    ///
    /// Uses the raw (untransformed) key: path rendering is independent of
    /// any configured key transform.
    pub(crate) fn set_key(&mut self, name: &str) {
        let Some(frame) = self.frames.last_mut() else {
            panic!("key event outside of any container");
        };
        debug_assert_eq!(frame.kind, ContainerKind::Object);
        if frame.keyed {
            self.segments.pop();
        }
        self.segments.push(PathSegment::Named(name.to_owned()));
        frame.keyed = true;
    }

    /// Close the innermost container, popping its child segment.
    ///
    /// Popping past the root would mean the lexer and tracker disagree
    /// about nesting; that is unreachable behind the grammar-checking
    /// lexer, so it is treated as a fatal internal error.
    pub(crate) fn leave(&mut self) -> ContainerKind {
        let Some(frame) = self.frames.pop() else {
            panic!("container close with empty path tracker");
        };
        if frame.keyed {
            self.segments.pop();
        }
        frame.kind
    }
}
