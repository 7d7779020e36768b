//! Session tokens scraped from the site root
//!
//! The home page embeds `window._sharedData = {...};` which carries the
//! CSRF token and, on older deployments, the `rhx_gis` signing secret.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use insta_core::json::{lookup, opt_str, req_str};
use insta_core::{Error, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

static SHARED_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)window\._sharedData\s*=\s*(\{.*?\})\s*;\s*</script>")
        .expect("shared data pattern is valid")
});

/// Tokens authorizing entity and collection requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionTokens {
    /// Signing secret; empty when the site no longer publishes it
    pub rhx_gis: String,
    pub csrf_token: String,
    pub refreshed_at: DateTime<Utc>,
}

impl SessionTokens {
    /// Extract the tokens from a parsed shared-data object
    pub fn from_shared_data(data: &Value) -> Result<Self> {
        Ok(Self {
            rhx_gis: opt_str(data, "rhx_gis").unwrap_or_default(),
            csrf_token: req_str(data, "config.csrf_token")?,
            refreshed_at: Utc::now(),
        })
    }

    /// Extract the tokens from the home page HTML
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_shared_data(&parse_shared_data(html)?)
    }
}

/// Parse the `window._sharedData` object embedded in a page
pub fn parse_shared_data(html: &str) -> Result<Value> {
    let captures = SHARED_DATA
        .captures(html)
        .ok_or_else(|| Error::Parse("page has no window._sharedData".to_string()))?;

    let data: Value = serde_json::from_str(&captures[1])?;
    if lookup(&data, "config").is_none() {
        return Err(Error::Parse("window._sharedData has no config".to_string()));
    }
    Ok(data)
}

/// Shared session state of one agent.
///
/// Reads go through the `RwLock`; refreshes are serialized by `refresh`
/// so concurrent callers never fetch the home page twice for one refresh.
#[derive(Debug, Default)]
pub struct Session {
    tokens: RwLock<Option<SessionTokens>>,
    refresh: Mutex<()>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tokens, if a refresh has succeeded
    pub async fn current(&self) -> Option<SessionTokens> {
        self.tokens.read().await.clone()
    }

    pub async fn store(&self, tokens: SessionTokens) {
        *self.tokens.write().await = Some(tokens);
    }

    /// Drop the tokens so the next request refreshes them
    pub async fn invalidate(&self) {
        self.tokens.write().await.take();
    }

    /// Drop the tokens only if they are still `rejected`
    pub async fn invalidate_if(&self, rejected: &SessionTokens) {
        let mut tokens = self.tokens.write().await;
        if tokens.as_ref() == Some(rejected) {
            tokens.take();
        }
    }

    pub(crate) fn refresh_lock(&self) -> &Mutex<()> {
        &self.refresh
    }
}
