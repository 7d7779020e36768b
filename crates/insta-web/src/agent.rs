//! Web agent for the platform's public web endpoints
//!
//! Handles the session tokens, populates entities from their pages and walks
//! GraphQL collections (media feeds, likes, comments) with a cursor.

use std::sync::Arc;

use insta_core::json::{opt_str, required};
use insta_core::{Account, Comment, Config, Connection, Entity, Error, Media, MediaSource, Pointer, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::pagination::PageOptions;
use crate::session::{Session, SessionTokens};
use crate::signature::{GIS_HEADER, gis};

const GRAPHQL_PATH: &str = "/graphql/query/";
const LIKES_EDGE_PATH: &str = "data.shortcode_media.edge_liked_by";
const COMMENTS_EDGE_PATH: &str = "data.shortcode_media.edge_media_to_comment";

/// Items of one fetch plus the pointer to continue from (`None` when exhausted)
pub type Page<T> = (Vec<T>, Option<Pointer>);

/// Asynchronous client for the platform's web API.
///
/// Cloning is cheap; clones share the HTTP connection pool and the session.
#[derive(Clone)]
pub struct WebAgent {
    client: Client,
    config: Arc<Config>,
    session: Arc<Session>,
}

impl WebAgent {
    /// Create a new agent. No request is made until the first call.
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.agent.timeout())
            .user_agent(config.agent.user_agent.clone())
            .cookie_store(true);

        if let Some(proxy) = &config.agent.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        let client = builder.build()?;

        info!("Web agent initialized for: {}", config.agent.base_url);

        Ok(Self {
            client,
            config: Arc::new(config),
            session: Arc::new(Session::new()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current session tokens, if any
    pub async fn tokens(&self) -> Option<SessionTokens> {
        self.session.current().await
    }

    pub async fn rhx_gis(&self) -> Option<String> {
        self.tokens().await.map(|t| t.rhx_gis)
    }

    pub async fn csrf_token(&self) -> Option<String> {
        self.tokens().await.map(|t| t.csrf_token)
    }

    /// Refresh the session tokens from the site root
    pub async fn update(&self) -> Result<SessionTokens> {
        let _guard = self.session.refresh_lock().lock().await;
        self.refresh_tokens().await
    }

    /// Tokens for the next request, refreshing once when there are none
    async fn session_tokens(&self) -> Result<SessionTokens> {
        if let Some(tokens) = self.session.current().await {
            return Ok(tokens);
        }

        let _guard = self.session.refresh_lock().lock().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(tokens) = self.session.current().await {
            return Ok(tokens);
        }
        self.refresh_tokens().await
    }

    // Caller must hold the refresh lock.
    async fn refresh_tokens(&self) -> Result<SessionTokens> {
        let url = format!("{}/", self.config.agent.base_url);
        debug!("Refreshing session tokens from: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Session refresh failed: {}", status);
            return Err(Error::from_status(status.as_u16(), body, "home page"));
        }

        let tokens = SessionTokens::from_html(&body)?;
        self.session.store(tokens.clone()).await;

        info!("Session tokens refreshed");
        Ok(tokens)
    }

    fn signed(&self, request: RequestBuilder, tokens: &SessionTokens, signed: &str) -> RequestBuilder {
        request
            .header(GIS_HEADER, gis(&tokens.rhx_gis, signed))
            .header("X-CSRFToken", tokens.csrf_token.as_str())
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Referer", format!("{}/", self.config.agent.base_url))
    }

    /// Read a JSON body, mapping failing statuses to error kinds.
    ///
    /// Rejected `tokens` are dropped unless another task already replaced them.
    async fn read_json(&self, response: Response, tokens: &SessionTokens, what: &str) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Request for {} failed: {}", what, status);
            debug!("Failed response body: {}", body);

            let err = Error::from_status(status.as_u16(), body, what);
            if err.is_auth_expired() {
                self.session.invalidate_if(tokens).await;
            }
            return Err(err);
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("{} response is not JSON: {}", what, e)))
    }

    /// Fetch the page of `entity` and populate it in place.
    ///
    /// Returns the raw page payload.
    pub async fn update_entity<E: Entity>(&self, entity: &mut E) -> Result<Value> {
        let tokens = self.session_tokens().await?;
        let what = entity.describe();
        let path = entity.page_path();
        let url = format!("{}{}", self.config.agent.base_url, path);

        debug!("Fetching {} from: {}", what, url);

        let request = self.client.get(&url).query(&[("__a", "1")]);
        let response = self.signed(request, &tokens, &path).send().await?;
        let payload = self.read_json(response, &tokens, &what).await?;

        let node = required(&payload, E::PAYLOAD_PATH)
            .map_err(|_| Error::NotFound(what.clone()))?;
        entity.populate(node)?;

        info!("Updated {}", what);
        Ok(payload)
    }

    async fn graphql(&self, query_hash: &str, variables: &Map<String, Value>, what: &str) -> Result<Value> {
        let tokens = self.session_tokens().await?;
        let variables = serde_json::to_string(variables)?;
        let url = format!("{}{}", self.config.agent.base_url, GRAPHQL_PATH);

        debug!("GraphQL query {} for {}: {}", query_hash, what, variables);

        let request = self
            .client
            .get(&url)
            .query(&[("query_hash", query_hash), ("variables", variables.as_str())]);
        let response = self.signed(request, &tokens, &variables).send().await?;
        let data = self.read_json(response, &tokens, what).await?;

        if data.get("status").and_then(|s| s.as_str()) == Some("fail") {
            let message = opt_str(&data, "message").unwrap_or_default();
            warn!("GraphQL query for {} failed: {}", what, message);
            if message.contains("rate limit") || message.contains("wait a few minutes") {
                return Err(Error::RateLimited);
            }
            return Err(Error::Api {
                status: 200,
                body: message,
            });
        }

        Ok(data)
    }

    /// Walk a GraphQL connection according to `opts`.
    ///
    /// `on_total` receives the collection size reported by every page.
    #[allow(clippy::too_many_arguments)]
    async fn paginate<T>(
        &self,
        query_hash: &str,
        base_variables: Map<String, Value>,
        edge_path: &str,
        what: &str,
        opts: &PageOptions,
        mut on_total: impl FnMut(u64),
        parse: impl Fn(&Value) -> Option<T>,
    ) -> Result<Page<T>> {
        let mut items = Vec::new();
        let mut pointer = opts.pointer.clone();

        if opts.count == Some(0) {
            return Ok((items, pointer));
        }

        let limit = opts.limit.unwrap_or(self.config.agent.page_limit);
        let delay = opts.delay.or_else(|| self.config.agent.delay());
        let mut pages = 0usize;

        loop {
            if pages > 0 {
                opts.pause(delay).await?;
            }
            opts.check_cancelled()?;

            let mut variables = base_variables.clone();
            variables.insert("first".to_string(), Value::from(opts.page_size(limit, items.len())));
            if let Some(after) = &pointer {
                variables.insert("after".to_string(), Value::String(after.as_str().to_string()));
            }

            let data = opts.run(self.graphql(query_hash, &variables, what)).await?;
            let connection = Connection::deserialize(required(&data, edge_path)?)
                .map_err(|e| Error::Parse(format!("{} page is malformed: {}", what, e)))?;
            pages += 1;

            if let Some(total) = connection.count {
                on_total(total);
            }

            let before = items.len();
            items.extend(connection.nodes().filter_map(&parse));
            let fetched = items.len() - before;
            pointer = connection.next_pointer();

            debug!("Page {} of {}: {} items, more: {}", pages, what, fetched, pointer.is_some());

            if opts.satisfied(items.len()) || pointer.is_none() {
                break;
            }
            if fetched == 0 {
                warn!("Empty page with a continuation cursor for {}, stopping", what);
                break;
            }
        }

        if let Some(count) = opts.count {
            items.truncate(count);
        }

        info!("Fetched {} items of {} in {} pages", items.len(), what, pages);
        Ok((items, pointer))
    }

    /// Fetch media of an account, location or tag.
    ///
    /// An account whose id is unknown is updated first. The entity's
    /// `media_count` is refreshed from the fetched pages.
    pub async fn get_media<E: MediaSource>(&self, entity: &mut E, opts: PageOptions) -> Result<Page<Media>> {
        if entity.media_variables().is_none() {
            self.update_entity(entity).await?;
        }
        let variables = entity
            .media_variables()
            .ok_or_else(|| Error::Parse(format!("{} has no id", entity.describe())))?;

        let what = format!("media of {}", entity.describe());
        let query_hash = E::media_query_hash(&self.config.query_hashes).to_string();

        self.paginate(
            &query_hash,
            variables,
            E::MEDIA_EDGE_PATH,
            &what,
            &opts,
            |total| entity.set_media_count(total),
            Media::from_node,
        )
        .await
    }

    /// Fetch accounts that liked `media`; refreshes `media.likes_count`
    pub async fn get_likes(&self, media: &mut Media, opts: PageOptions) -> Result<Page<Account>> {
        let what = format!("likes of {}", media.describe());

        self.paginate(
            &self.config.query_hashes.likes,
            shortcode_variables(&media.code),
            LIKES_EDGE_PATH,
            &what,
            &opts,
            |total| media.likes_count = Some(total),
            Account::from_node,
        )
        .await
    }

    /// Fetch comments of `media`; refreshes `media.comments_count`
    pub async fn get_comments(&self, media: &mut Media, opts: PageOptions) -> Result<Page<Comment>> {
        let what = format!("comments of {}", media.describe());
        let code = media.code.clone();

        self.paginate(
            &self.config.query_hashes.comments,
            shortcode_variables(&code),
            COMMENTS_EDGE_PATH,
            &what,
            &opts,
            |total| media.comments_count = Some(total),
            |node| Comment::from_node(node, &code),
        )
        .await
    }
}

fn shortcode_variables(code: &str) -> Map<String, Value> {
    let mut vars = Map::new();
    vars.insert("shortcode".to_string(), Value::String(code.to_string()));
    vars
}
