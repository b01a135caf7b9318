//! Per-instance parser configuration
//!
//! Everything configurable lives on this struct and is fixed once the
//! parser is constructed; there are no process-wide defaults.

use std::fmt;
use std::sync::Arc;

/// Pluggable transform applied to every object key before it reaches the
/// value builder or the event stream. Path rendering always uses the raw
/// key.
pub type KeyTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Default chunk size used when slicing in-memory buffers and reading
/// from `io::Read` sources.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8192;

/// Construction options for [`crate::Parser`].
#[derive(Clone)]
pub struct ParserOptions {
    pub(crate) filter: Vec<String>,
    pub(crate) with_path: bool,
    pub(crate) key_transform: Option<KeyTransform>,
    pub(crate) read_buffer_size: usize,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self {
            filter: Vec::new(),
            with_path: false,
            key_transform: None,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    /// Add one selector. Selectors are normalized to a leading `/`; an
    /// empty filter set selects the whole document.
    #[must_use]
    pub fn filter(mut self, selector: impl Into<String>) -> Self {
        self.filter.push(selector.into());
        self
    }

    /// Add several selectors at once.
    #[must_use]
    pub fn filters<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.extend(selectors.into_iter().map(Into::into));
        self
    }

    /// Pair every completed value with the path it was matched at.
    #[must_use]
    pub fn with_path(mut self, with_path: bool) -> Self {
        self.with_path = with_path;
        self
    }

    /// Install a key transform (e.g. interning or case folding).
    #[must_use]
    pub fn key_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.key_transform = Some(Arc::new(transform));
        self
    }

    /// Chunk size for buffer and reader sources.
    #[must_use]
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("filter", &self.filter)
            .field("with_path", &self.with_path)
            .field("key_transform", &self.key_transform.is_some())
            .field("read_buffer_size", &self.read_buffer_size)
            .finish()
    }
}
