use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Entity, MediaSource, missing};
use crate::Result;
use crate::config::QueryHashes;
use crate::json::{opt_bool, opt_str, opt_u64};

/// Account identified by username
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub id: Option<String>,
    pub full_name: Option<String>,
    pub profile_pic_url: Option<String>,
    pub profile_pic_url_hd: Option<String>,
    pub biography: Option<String>,
    pub external_url: Option<String>,
    pub follows_count: Option<u64>,
    pub followers_count: Option<u64>,
    pub media_count: Option<u64>,
    pub is_private: Option<bool>,
    pub is_verified: Option<bool>,
    pub country_block: Option<bool>,
}

impl Account {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Build an account from a partial user node (likers, comment owners)
    pub fn from_node(node: &Value) -> Option<Self> {
        let mut account = Self::new(opt_str(node, "username")?);
        account.fill(node);
        Some(account)
    }

    /// Set every attribute present in `node`
    fn fill(&mut self, node: &Value) {
        if let Some(id) = opt_str(node, "id") {
            self.id = Some(id);
        }
        if let Some(name) = opt_str(node, "full_name") {
            self.full_name = Some(name);
        }
        if let Some(url) = opt_str(node, "profile_pic_url") {
            self.profile_pic_url = Some(url);
        }
        if let Some(url) = opt_str(node, "profile_pic_url_hd") {
            self.profile_pic_url_hd = Some(url);
        }
        if let Some(bio) = opt_str(node, "biography") {
            self.biography = Some(bio);
        }
        if let Some(url) = opt_str(node, "external_url") {
            self.external_url = Some(url);
        }
        if let Some(count) = opt_u64(node, "edge_follow.count") {
            self.follows_count = Some(count);
        }
        if let Some(count) = opt_u64(node, "edge_followed_by.count") {
            self.followers_count = Some(count);
        }
        if let Some(count) = opt_u64(node, "edge_owner_to_timeline_media.count") {
            self.media_count = Some(count);
        }
        if let Some(flag) = opt_bool(node, "is_private") {
            self.is_private = Some(flag);
        }
        if let Some(flag) = opt_bool(node, "is_verified") {
            self.is_verified = Some(flag);
        }
        if let Some(flag) = opt_bool(node, "country_block") {
            self.country_block = Some(flag);
        }
    }
}

impl Entity for Account {
    const KIND: &'static str = "account";
    const PAYLOAD_PATH: &'static str = "graphql.user";

    fn key(&self) -> String {
        self.username.clone()
    }

    fn page_path(&self) -> String {
        format!("/{}/", self.username)
    }

    fn populate(&mut self, node: &Value) -> Result<()> {
        let mut next = self.clone();
        next.fill(node);

        // Empty profile texts and the HD picture are omitted by the site.
        next.biography.get_or_insert_with(String::new);
        next.country_block.get_or_insert(false);
        if next.profile_pic_url_hd.is_none() {
            next.profile_pic_url_hd = next.profile_pic_url.clone();
        }
        if next.full_name.is_none() {
            next.full_name = Some(String::new());
        }

        let checks = [
            ("id", next.id.is_some()),
            ("profile_pic_url", next.profile_pic_url.is_some()),
            ("edge_follow", next.follows_count.is_some()),
            ("edge_followed_by", next.followers_count.is_some()),
            ("edge_owner_to_timeline_media", next.media_count.is_some()),
            ("is_private", next.is_private.is_some()),
            ("is_verified", next.is_verified.is_some()),
        ];
        if let Some((field, _)) = checks.iter().find(|(_, present)| !present) {
            return Err(missing(Self::KIND, &self.username, field));
        }

        *self = next;
        Ok(())
    }
}

impl MediaSource for Account {
    const MEDIA_EDGE_PATH: &'static str = "data.user.edge_owner_to_timeline_media";

    fn media_query_hash(hashes: &QueryHashes) -> &str {
        &hashes.account_media
    }

    fn media_variables(&self) -> Option<Map<String, Value>> {
        let id = self.id.as_ref()?;
        let mut vars = Map::new();
        vars.insert("id".to_string(), Value::String(id.clone()));
        Some(vars)
    }

    fn media_count(&self) -> Option<u64> {
        self.media_count
    }

    fn set_media_count(&mut self, count: u64) {
        self.media_count = Some(count);
    }
}
