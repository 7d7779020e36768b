use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Entity, Media, MediaSource, missing};
use crate::Result;
use crate::config::QueryHashes;
use crate::json::{edge_nodes, lookup, opt_u64};

/// Hashtag identified by name (without `#`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub media_count: Option<u64>,
    pub top_posts: Option<Vec<Media>>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name: name.trim_start_matches('#').to_string(),
            ..Self::default()
        }
    }
}

impl Entity for Tag {
    const KIND: &'static str = "tag";
    const PAYLOAD_PATH: &'static str = "graphql.hashtag";

    fn key(&self) -> String {
        self.name.clone()
    }

    fn page_path(&self) -> String {
        format!("/explore/tags/{}/", self.name)
    }

    fn populate(&mut self, node: &Value) -> Result<()> {
        let media_count = opt_u64(node, "edge_hashtag_to_media.count")
            .ok_or_else(|| missing(Self::KIND, &self.name, "edge_hashtag_to_media"))?;

        // Every public tag page lists its top posts.
        let top_posts: Vec<Media> = lookup(node, "edge_hashtag_to_top_posts")
            .map(|top| edge_nodes(top).filter_map(Media::from_node).collect())
            .unwrap_or_default();
        if top_posts.is_empty() {
            return Err(missing(Self::KIND, &self.name, "edge_hashtag_to_top_posts"));
        }

        self.media_count = Some(media_count);
        self.top_posts = Some(top_posts);
        Ok(())
    }
}

impl MediaSource for Tag {
    const MEDIA_EDGE_PATH: &'static str = "data.hashtag.edge_hashtag_to_media";

    fn media_query_hash(hashes: &QueryHashes) -> &str {
        &hashes.tag_media
    }

    fn media_variables(&self) -> Option<Map<String, Value>> {
        let mut vars = Map::new();
        vars.insert("tag_name".to_string(), Value::String(self.name.clone()));
        Some(vars)
    }

    fn media_count(&self) -> Option<u64> {
        self.media_count
    }

    fn set_media_count(&mut self, count: u64) {
        self.media_count = Some(count);
    }
}
