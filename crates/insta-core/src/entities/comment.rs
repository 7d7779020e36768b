use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::json::{opt_str, opt_u64};

/// Comment left on a media
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    /// Shortcode of the commented media
    pub media: String,
    pub owner: Option<String>,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Build a comment from a comment node; requires an id
    pub fn from_node(node: &Value, media: &str) -> Option<Self> {
        Some(Self {
            id: opt_str(node, "id")?,
            media: media.to_string(),
            owner: opt_str(node, "owner.username"),
            text: opt_str(node, "text").unwrap_or_default(),
            created_at: opt_u64(node, "created_at")
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        })
    }
}
