//! arXiv identifiers and their filesystem-safe form
//!
//! Old-style identifiers (`hep-th/9901001`) contain a slash, which cannot
//! appear in a single path segment. Directory names replace each slash with
//! [`SLASH_SUBSTITUTE`]. An identifier that already contains the substitute
//! does not survive the round trip; no arXiv identifier does in practice.

use std::fmt;

/// Placeholder written in place of `/` in directory names.
pub const SLASH_SUBSTITUTE: &str = "__";

/// Replace every `/` with [`SLASH_SUBSTITUTE`].
pub fn normalize(arxiv_id: &str) -> String {
    arxiv_id.replace('/', SLASH_SUBSTITUTE)
}

/// Inverse of [`normalize`].
pub fn denormalize(dir_name: &str) -> String {
    dir_name.replace(SLASH_SUBSTITUTE, "/")
}

/// Opaque identifier of one paper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArxivId(String);

impl ArxivId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Recover an identifier from a normalized directory name.
    pub fn from_dir_name(dir_name: &str) -> Self {
        Self(denormalize(dir_name))
    }

    /// Directory name for this paper inside a stage directory.
    pub fn dir_name(&self) -> String {
        normalize(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArxivId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArxivId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
