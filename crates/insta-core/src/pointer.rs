//! Pagination cursor

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::connection::PageInfo;

/// Opaque continuation token returned by a paginated fetch.
///
/// Feed it back through the next request to resume where the previous
/// one stopped. `None` in its place means the collection is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pointer(String);

impl Pointer {
    pub fn new(cursor: impl Into<String>) -> Self {
        Self(cursor.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the next pointer from a connection's `page_info`.
    ///
    /// Returns `None` unless the page reports more items and a non-empty cursor.
    pub fn from_page_info(page_info: &PageInfo) -> Option<Self> {
        if !page_info.has_next_page {
            return None;
        }

        page_info
            .end_cursor
            .as_deref()
            .filter(|cursor| !cursor.is_empty())
            .map(Pointer::new)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Pointer {
    fn from(cursor: String) -> Self {
        Self(cursor)
    }
}

impl From<&str> for Pointer {
    fn from(cursor: &str) -> Self {
        Self(cursor.to_string())
    }
}
