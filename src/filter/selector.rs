//! Selector normalization and matching
//!
//! Selectors are `/`-separated exact paths. A trailing empty segment means
//! "each element of this array" (`/rows/`), because array elements render
//! as empty path segments. Matching is exact string equality against the
//! rendered path, never prefix or glob.

/// Normalize a user-supplied selector to its canonical leading-`/` form.
pub(crate) fn normalize(selector: &str) -> String {
    if selector.starts_with('/') {
        selector.to_owned()
    } else {
        format!("/{selector}")
    }
}

/// The configured selector patterns.
///
/// An empty filter list selects the document root: the whole document
/// becomes one completed value. Duplicate patterns are kept and emit
/// independently.
#[derive(Debug)]
pub(crate) struct SelectorSet {
    patterns: Vec<String>,
}

impl SelectorSet {
    pub(crate) fn new(filters: &[String]) -> Self {
        let patterns = if filters.is_empty() {
            // The root path renders as the empty string.
            vec![String::new()]
        } else {
            filters.iter().map(|f| normalize(f)).collect()
        };
        Self { patterns }
    }

    /// Indices of every pattern equal to `path`.
    pub(crate) fn matches<'a>(&'a self, path: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.patterns
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.as_str() == path)
            .map(|(i, _)| i)
    }
}
