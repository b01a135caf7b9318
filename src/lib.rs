//! Streaming extraction of sub-values from JSON documents.
//!
//! A strict incremental JSON parser that walks a document as bytes
//! arrive, tracks a path for every structural event, matches the paths
//! against user-supplied selectors, and rebuilds only the matched
//! sub-trees as [`serde_json::Value`]s. Everything outside a match is
//! parsed for validity and discarded, so memory tracks the size of the
//! largest matched value, not the document.
//!
//! Paths use a `/`-separated convention where object members contribute
//! their key and array elements contribute an empty segment: in
//! `{"rows":[{"id":4}]}` the `id` scalar lives at `/rows//id` and each
//! element of `rows` at `/rows/`.
//!
//! ```no_run
//! use json_sieve::{Parser, ParserOptions};
//!
//! # fn main() -> json_sieve::Result<()> {
//! let file = std::fs::File::open("view.json")?;
//! let options = ParserOptions::new().filter("/rows/");
//! for row in Parser::from_reader(file, options).into_values()? {
//!     println!("{}", row?.value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The same pipeline runs push-style: register a callback with
//! [`Parser::on_value`] and hand chunks to [`Parser::feed`] as they
//! arrive, then call [`Parser::finish`].

mod buffer;
mod error;
mod event;
mod filter;
mod lexer;
mod parser;
mod path;
mod sink;

pub use error::{Error, Result};
pub use event::{ContainerKind, Event};
pub use parser::{
    ChannelSource, ChunkSource, ChunkWriter, DEFAULT_READ_BUFFER_SIZE, Events, IterSource,
    KeyTransform, Parser, ParserOptions, Values, chunk_channel, parse_document,
};
pub use path::PathSegment;
pub use sink::{Emission, ValueCallback};
