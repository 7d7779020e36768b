//! Command execution
//!
//! Every command returns the JSON document printed on stdout.

use anyhow::Context;
use insta_core::{Account, Entity, Error, Location, Media, MediaSource, Pointer, Tag};
use insta_web::{PageOptions, WebAgent};
use serde::Serialize;
use serde_json::{Value, json};

/// Kind of entity whose media feed is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Account,
    Location,
    Tag,
}

impl std::str::FromStr for FeedKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "account" | "user" => Ok(FeedKind::Account),
            "location" => Ok(FeedKind::Location),
            "tag" | "hashtag" => Ok(FeedKind::Tag),
            other => Err(Error::UnsupportedEntity(other.to_string())),
        }
    }
}

/// Command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Session,
    Account(String),
    Media(String),
    Location(u64),
    Tag(String),
    Feed { kind: FeedKind, key: String },
    Likes(String),
    Comments(String),
}

pub async fn run(agent: &WebAgent, command: Command, opts: PageOptions) -> anyhow::Result<Value> {
    match command {
        Command::Session => {
            let tokens = agent.update().await.context("Failed to refresh session")?;
            Ok(serde_json::to_value(tokens)?)
        }
        Command::Account(username) => update(agent, Account::new(username)).await,
        Command::Media(code) => update(agent, Media::new(code)).await,
        Command::Location(id) => update(agent, Location::new(id)).await,
        Command::Tag(name) => update(agent, Tag::new(name)).await,
        Command::Feed { kind, key } => match kind {
            FeedKind::Account => feed(agent, Account::new(key), opts).await,
            FeedKind::Location => {
                let id = key
                    .parse()
                    .with_context(|| format!("Location id must be numeric: {}", key))?;
                feed(agent, Location::new(id), opts).await
            }
            FeedKind::Tag => feed(agent, Tag::new(key), opts).await,
        },
        Command::Likes(code) => {
            let mut media = Media::new(code);
            let (items, pointer) = agent.get_likes(&mut media, opts).await?;
            Ok(page_json(&items, pointer, media.likes_count)?)
        }
        Command::Comments(code) => {
            let mut media = Media::new(code);
            let (items, pointer) = agent.get_comments(&mut media, opts).await?;
            Ok(page_json(&items, pointer, media.comments_count)?)
        }
    }
}

async fn update<E: Entity + Serialize>(agent: &WebAgent, mut entity: E) -> anyhow::Result<Value> {
    agent
        .update_entity(&mut entity)
        .await
        .with_context(|| format!("Failed to update {}", entity.describe()))?;
    Ok(serde_json::to_value(&entity)?)
}

async fn feed<E: MediaSource>(agent: &WebAgent, mut entity: E, opts: PageOptions) -> anyhow::Result<Value> {
    let (items, pointer) = agent
        .get_media(&mut entity, opts)
        .await
        .with_context(|| format!("Failed to fetch media of {}", entity.describe()))?;
    Ok(page_json(&items, pointer, entity.media_count())?)
}

fn page_json<T: Serialize>(items: &[T], pointer: Option<Pointer>, total: Option<u64>) -> serde_json::Result<Value> {
    Ok(json!({
        "total": total,
        "count": items.len(),
        "pointer": pointer,
        "items": serde_json::to_value(items)?,
    }))
}
