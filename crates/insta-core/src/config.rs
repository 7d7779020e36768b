//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. insta-web.toml 設定ファイル
//! 3. デフォルト値
//!
//! `${VAR_NAME}` references inside the file are expanded from the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::Error;

/// Default configuration file name looked up by [`Config::load`]
pub const DEFAULT_CONFIG_FILE: &str = "insta-web.toml";

/// HTTP agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Site root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Items requested per collection page
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    /// Default pause between collection pages in milliseconds (0 = none)
    #[serde(default)]
    pub delay_ms: u64,

    /// Optional HTTP(S) proxy URL
    pub proxy: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            page_limit: default_page_limit(),
            delay_ms: 0,
            proxy: None,
        }
    }
}

impl AgentConfig {
    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Default inter-page delay, `None` when disabled
    pub fn delay(&self) -> Option<Duration> {
        (self.delay_ms > 0).then(|| Duration::from_millis(self.delay_ms))
    }
}

/// GraphQL query hashes used by the collection endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryHashes {
    pub account_media: String,
    pub location_media: String,
    pub tag_media: String,
    pub likes: String,
    pub comments: String,
}

impl Default for QueryHashes {
    fn default() -> Self {
        Self {
            account_media: "42323d64886122307be10013ad2dcc44".to_string(),
            location_media: "ac38b90f0f3981c42092016a37c59bf7".to_string(),
            tag_media: "ded47faa9a1aaded10161a2ff32abb6b".to_string(),
            likes: "1cb6ec562846122743b61e492c85999f".to_string(),
            comments: "33ba35852cb50da46f5b5e889df7d159".to_string(),
        }
    }
}

/// Known remote identifiers used by the live test suite
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixtureConfig {
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub photo_sets: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub locations: Vec<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl FixtureConfig {
    /// Every known media shortcode regardless of kind
    pub fn all_media(&self) -> Vec<String> {
        self.photos
            .iter()
            .chain(&self.photo_sets)
            .chain(&self.videos)
            .cloned()
            .collect()
    }
}

/// Main configuration for insta-web
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub query_hashes: QueryHashes,

    #[serde(default)]
    pub fixtures: FixtureConfig,
}

fn default_base_url() -> String {
    "https://www.instagram.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0 Safari/537.36"
        .to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_limit() -> usize {
    50
}

impl Config {
    /// 設定ファイルから環境変数を展開する
    ///
    /// Unknown variables expand to the empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Parse a TOML document (after `${VAR}` expansion)
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded = Self::expand_env_vars(content);

        let toml: TomlConfig = toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        Self::from_toml_config(toml)
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// Environment variables override values from the file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        let cfg = Self::from_toml_str(&content)?.with_overrides(|key| std::env::var(key).ok())?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(cfg)
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// Uses `./insta-web.toml` when present, environment and defaults otherwise.
    pub fn load() -> crate::Result<Self> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_toml_file(DEFAULT_CONFIG_FILE);
        }

        Self::from_env()
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> crate::Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides and validate the result
    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        self.apply_overrides(var);
        self.validate()?;
        Ok(self)
    }

    fn from_toml_config(toml: TomlConfig) -> crate::Result<Self> {
        let agent = toml.agent.unwrap_or_default();
        let defaults = AgentConfig::default();

        let agent = AgentConfig {
            base_url: agent
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            user_agent: agent.user_agent.unwrap_or(defaults.user_agent),
            timeout_secs: agent.timeout_secs.unwrap_or(defaults.timeout_secs),
            page_limit: agent.page_limit.unwrap_or(defaults.page_limit),
            delay_ms: agent.delay_ms.unwrap_or(defaults.delay_ms),
            proxy: agent.proxy.filter(|p| !p.is_empty()),
        };

        let hashes = toml.query_hashes.unwrap_or_default();
        let default_hashes = QueryHashes::default();
        let query_hashes = QueryHashes {
            account_media: hashes.account_media.unwrap_or(default_hashes.account_media),
            location_media: hashes.location_media.unwrap_or(default_hashes.location_media),
            tag_media: hashes.tag_media.unwrap_or(default_hashes.tag_media),
            likes: hashes.likes.unwrap_or(default_hashes.likes),
            comments: hashes.comments.unwrap_or(default_hashes.comments),
        };

        let cfg = Config {
            agent,
            query_hashes,
            fixtures: toml.fixtures.unwrap_or_default(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// 環境変数で設定を上書きする
    ///
    /// `var` resolves a variable name; empty and unparsable values are ignored.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("INSTA_BASE_URL").filter(|u| !u.is_empty()) {
            self.agent.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(ua) = var("INSTA_USER_AGENT").filter(|u| !u.is_empty()) {
            self.agent.user_agent = ua;
        }
        if let Some(secs) = var("INSTA_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.agent.timeout_secs = secs;
        }
        if let Some(limit) = var("INSTA_PAGE_LIMIT").and_then(|s| s.parse().ok()) {
            self.agent.page_limit = limit;
        }
        if let Some(delay) = var("INSTA_DELAY_MS").and_then(|s| s.parse().ok()) {
            self.agent.delay_ms = delay;
        }
        if let Some(proxy) = var("INSTA_PROXY") {
            self.agent.proxy = (!proxy.is_empty()).then_some(proxy);
        }
    }

    fn validate(&self) -> crate::Result<()> {
        if self.agent.page_limit == 0 {
            return Err(Error::Config("agent.page_limit must be greater than 0".to_string()));
        }
        if !self.agent.base_url.starts_with("http://") && !self.agent.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "agent.base_url must be an http(s) URL: {}",
                self.agent.base_url
            )));
        }
        Ok(())
    }
}

// ============================================================================
// TOML 構造体定義（ファイル解析用）
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    agent: Option<TomlAgentConfig>,
    query_hashes: Option<TomlQueryHashes>,
    fixtures: Option<FixtureConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlAgentConfig {
    base_url: Option<String>,
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
    page_limit: Option<usize>,
    delay_ms: Option<u64>,
    proxy: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlQueryHashes {
    account_media: Option<String>,
    location_media: Option<String>,
    tag_media: Option<String>,
    likes: Option<String>,
    comments: Option<String>,
}
