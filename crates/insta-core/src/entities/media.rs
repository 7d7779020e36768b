use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Entity, missing};
use crate::Result;
use crate::json::{edge_nodes, lookup, lookup_any, opt_bool, opt_str, opt_u64};

const LIKES_PATHS: &[&str] = &["edge_media_preview_like.count", "edge_liked_by.count"];
const COMMENTS_PATHS: &[&str] = &[
    "edge_media_to_parent_comment.count",
    "edge_media_to_comment.count",
    "edge_media_preview_comment.count",
];

/// Post identified by shortcode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    /// Shortcode
    pub code: String,
    pub id: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub likes_count: Option<u64>,
    pub comments_count: Option<u64>,
    pub comments_disabled: Option<bool>,
    pub is_video: Option<bool>,
    pub display_url: Option<String>,
    pub video_url: Option<String>,
    /// Downloadable resources; one per child for albums
    pub resources: Option<Vec<String>>,
    pub is_album: Option<bool>,
    /// Child shortcodes of an album
    pub album: Option<Vec<String>>,
    pub caption: Option<String>,
    /// Owner username, or owner id when the payload has no username
    pub owner: Option<String>,
    /// Location id
    pub location: Option<String>,
}

impl Media {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Build a media from a feed node; only present fields are set
    pub fn from_node(node: &Value) -> Option<Self> {
        let mut media = Self::new(opt_str(node, "shortcode")?);
        media.fill(node);
        Some(media)
    }

    fn fill(&mut self, node: &Value) {
        if let Some(id) = opt_str(node, "id") {
            self.id = Some(id);
        }
        if let Some(date) = opt_u64(node, "taken_at_timestamp")
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        {
            self.date = Some(date);
        }
        if let Some(count) = lookup_any(node, LIKES_PATHS).and_then(|v| v.as_u64()) {
            self.likes_count = Some(count);
        }
        if let Some(count) = lookup_any(node, COMMENTS_PATHS).and_then(|v| v.as_u64()) {
            self.comments_count = Some(count);
        }
        if let Some(flag) = opt_bool(node, "comments_disabled") {
            self.comments_disabled = Some(flag);
        }
        if let Some(flag) = opt_bool(node, "is_video") {
            self.is_video = Some(flag);
        }
        if let Some(url) = opt_str(node, "display_url") {
            self.display_url = Some(url);
        }
        if let Some(url) = opt_str(node, "video_url") {
            self.video_url = Some(url);
        }
        if let Some(text) = lookup(node, "edge_media_to_caption")
            .and_then(|captions| edge_nodes(captions).find_map(|n| opt_str(n, "text")))
        {
            self.caption = Some(text);
        }
        if let Some(owner) = opt_str(node, "owner.username").or_else(|| opt_str(node, "owner.id")) {
            self.owner = Some(owner);
        }
        if let Some(location) = opt_str(node, "location.id") {
            self.location = Some(location);
        }

        let sidecar = lookup(node, "edge_sidecar_to_children");
        let typename = opt_str(node, "__typename");
        if sidecar.is_some() || typename.is_some() {
            self.is_album = Some(sidecar.is_some() || typename.as_deref() == Some("GraphSidecar"));
        }

        match sidecar {
            Some(children) => {
                let children: Vec<&Value> = edge_nodes(children).collect();
                self.album = Some(
                    children
                        .iter()
                        .filter_map(|child| opt_str(child, "shortcode"))
                        .collect(),
                );
                self.resources = Some(
                    children
                        .iter()
                        .filter_map(|child| opt_str(child, "video_url").or_else(|| opt_str(child, "display_url")))
                        .collect(),
                );
            }
            None => {
                if let Some(resources) = self.single_resources(node) {
                    self.resources = Some(resources);
                }
            }
        }
    }

    fn single_resources(&self, node: &Value) -> Option<Vec<String>> {
        if self.is_video == Some(true) {
            if let Some(url) = &self.video_url {
                return Some(vec![url.clone()]);
            }
        }

        let sized: Vec<String> = lookup(node, "display_resources")
            .and_then(|v| v.as_array())
            .into_iter()
            .flatten()
            .filter_map(|r| opt_str(r, "src"))
            .collect();
        if !sized.is_empty() {
            return Some(sized);
        }

        self.display_url.as_ref().map(|url| vec![url.clone()])
    }
}

impl Entity for Media {
    const KIND: &'static str = "media";
    const PAYLOAD_PATH: &'static str = "graphql.shortcode_media";

    fn key(&self) -> String {
        self.code.clone()
    }

    fn page_path(&self) -> String {
        format!("/p/{}/", self.code)
    }

    fn populate(&mut self, node: &Value) -> Result<()> {
        let mut next = self.clone();
        next.fill(node);

        // Absent on posts that never had comments switched off.
        next.comments_disabled.get_or_insert(false);
        next.is_album.get_or_insert(false);
        if next.is_album == Some(false) {
            next.album.get_or_insert_with(Vec::new);
        }

        let checks = [
            ("id", next.id.is_some()),
            ("taken_at_timestamp", next.date.is_some()),
            ("edge_media_preview_like", next.likes_count.is_some()),
            ("edge_media_to_comment", next.comments_count.is_some()),
            ("is_video", next.is_video.is_some()),
            ("display_url", next.display_url.is_some()),
            ("display_resources", next.resources.is_some()),
        ];
        if let Some((field, _)) = checks.iter().find(|(_, present)| !present) {
            return Err(missing(Self::KIND, &self.code, field));
        }

        *self = next;
        Ok(())
    }
}
