//! GraphQL connection pages (`count`, `page_info`, `edges[].node`)

use serde::Deserialize;
use serde_json::Value;

use crate::Pointer;

/// `page_info` of a connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge {
    pub node: Option<Value>,
}

/// One page of a collection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Connection {
    /// Size of the whole collection
    pub count: Option<u64>,
    pub page_info: Option<PageInfo>,
    pub edges: Option<Vec<Edge>>,
}

impl Connection {
    /// Nodes of this page, in order
    pub fn nodes(&self) -> impl Iterator<Item = &Value> {
        self.edges
            .iter()
            .flatten()
            .filter_map(|edge| edge.node.as_ref())
    }

    /// Pointer to the next page, `None` on the last one
    pub fn next_pointer(&self) -> Option<Pointer> {
        self.page_info.as_ref().and_then(Pointer::from_page_info)
    }
}
