//! Error types for streaming extraction
//!
//! One closed taxonomy for everything the parser surfaces: malformed input,
//! API misuse, byte-source failures and typed-extraction failures.

/// A Result alias where the Err case is `json_sieve::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the streaming parser.
///
/// `Syntax` and `Source` are terminal for the parse session: no further
/// events are produced once either is reported. `Usage` is raised
/// synchronously at the misused call and never advances parser state.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed JSON reported by the lexer, with the absolute byte offset
    /// at which the problem was detected.
    #[error("invalid JSON at byte {offset}: {message}")]
    Syntax { message: String, offset: u64 },

    /// The parser was driven in an unsupported way, e.g. pulling from an
    /// instance with no input source, or feeding one with no consumer.
    #[error("parser misuse: {0}")]
    Usage(String),

    /// The byte source failed while producing a chunk.
    #[error("source read failed: {0}")]
    Source(#[from] std::io::Error),

    /// A matched value could not be deserialized into the requested type.
    #[error("deserialization failed: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn syntax(message: impl Into<String>, offset: u64) -> Self {
        Error::Syntax {
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Error::Usage(message.into())
    }

    /// True when this error means the input itself was malformed.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. })
    }

    /// True when this error indicates API misuse rather than bad data.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}
