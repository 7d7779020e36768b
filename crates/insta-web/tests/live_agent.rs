//! Live checks against the real site.
//!
//! Ignored by default. Fill the `[fixtures]` table of `insta-web.toml` (or
//! point `INSTA_WEB_CONFIG` at another file) and run
//! `cargo test -p insta-web --test live_agent -- --ignored`.

use std::path::PathBuf;
use std::time::Duration;

use insta_core::{Account, Config, Location, Media, Tag};
use insta_web::{PageOptions, WebAgent};

const COUNT: usize = 150;
const POINTER_ROUNDS: usize = 3;

fn config() -> Config {
    let path = std::env::var("INSTA_WEB_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../insta-web.toml"));
    Config::from_toml_file(&path).expect("live tests need a configuration file with fixtures")
}

fn delay(config: &Config) -> Duration {
    config.agent.delay().unwrap_or(Duration::from_secs(1))
}

#[tokio::test]
#[ignore]
async fn live_update() {
    let agent = WebAgent::new(config()).unwrap();
    agent.update().await.unwrap();

    assert!(agent.rhx_gis().await.is_some());
    assert!(agent.csrf_token().await.is_some());
}

#[tokio::test]
#[ignore]
async fn live_update_account() {
    let config = config();
    let agent = WebAgent::new(config.clone()).unwrap();

    for username in &config.fixtures.accounts {
        let mut account = Account::new(username.as_str());
        let data = agent.update_entity(&mut account).await.unwrap();

        assert!(!data.is_null());
        assert!(account.id.is_some());
        assert!(account.full_name.is_some());
        assert!(account.profile_pic_url.is_some());
        assert!(account.profile_pic_url_hd.is_some());
        assert!(account.biography.is_some());
        assert!(account.follows_count.is_some());
        assert!(account.followers_count.is_some());
        assert!(account.media_count.is_some());
        assert!(account.is_private.is_some());
        assert!(account.is_verified.is_some());
        assert!(account.country_block.is_some());
    }
}

#[tokio::test]
#[ignore]
async fn live_update_media() {
    let config = config();
    let agent = WebAgent::new(config.clone()).unwrap();

    for code in config.fixtures.all_media() {
        let mut media = Media::new(code);
        agent.update_entity(&mut media).await.unwrap();

        assert!(media.id.is_some());
        assert!(media.date.is_some());
        assert!(media.likes_count.is_some());
        assert!(media.comments_count.is_some());
        assert!(media.comments_disabled.is_some());
        assert!(media.is_video.is_some());
        assert!(media.display_url.is_some());
        assert!(media.resources.is_some());
        assert!(media.is_album.is_some());
    }
}

#[tokio::test]
#[ignore]
async fn live_update_location_and_tag() {
    let config = config();
    let agent = WebAgent::new(config.clone()).unwrap();

    for id in &config.fixtures.locations {
        let mut location = Location::new(*id);
        agent.update_entity(&mut location).await.unwrap();
        assert!(location.slug.is_some());
        assert!(location.name.is_some());
        assert!(location.has_public_page.is_some());
        assert!(location.coordinates.is_some());
        assert!(location.media_count.is_some());
    }

    for name in &config.fixtures.tags {
        let mut tag = Tag::new(name.as_str());
        agent.update_entity(&mut tag).await.unwrap();
        assert!(tag.media_count.is_some());
        assert!(!tag.top_posts.unwrap_or_default().is_empty());
    }
}

#[tokio::test]
#[ignore]
async fn live_get_media_count_law() {
    let config = config();
    let agent = WebAgent::new(config.clone()).unwrap();
    let opts = || PageOptions::new().count(COUNT).delay(delay(&config));

    if let Some(username) = config.fixtures.accounts.first() {
        let mut account = Account::new(username.as_str());
        let (data, pointer) = agent.get_media(&mut account, opts()).await.unwrap();
        let total = account.media_count.unwrap() as usize;
        assert_eq!(data.len(), total.min(COUNT));
        assert_eq!(pointer.is_none(), total <= COUNT);
    }

    if let Some(id) = config.fixtures.locations.first() {
        let mut location = Location::new(*id);
        let (data, pointer) = agent.get_media(&mut location, opts()).await.unwrap();
        let total = location.media_count.unwrap() as usize;
        assert_eq!(data.len(), total.min(COUNT));
        assert_eq!(pointer.is_none(), total <= COUNT);
    }

    if let Some(name) = config.fixtures.tags.first() {
        let mut tag = Tag::new(name.as_str());
        let (data, pointer) = agent.get_media(&mut tag, opts()).await.unwrap();
        let total = tag.media_count.unwrap() as usize;
        assert_eq!(data.len(), total.min(COUNT));
        assert_eq!(pointer.is_none(), total <= COUNT);
    }
}

#[tokio::test]
#[ignore]
async fn live_get_media_pointer_chain() {
    let config = config();
    let agent = WebAgent::new(config.clone()).unwrap();

    let Some(username) = config.fixtures.accounts.first() else {
        return;
    };
    let mut account = Account::new(username.as_str());
    let mut pointer = None;
    let mut collected = 0usize;

    for _ in 0..POINTER_ROUNDS {
        let (data, next) = agent
            .get_media(&mut account, PageOptions::new().pointer(pointer))
            .await
            .unwrap();
        collected += data.len();
        pointer = next;
        tokio::time::sleep(delay(&config)).await;
    }

    assert_eq!(pointer.is_none(), account.media_count == Some(collected as u64));
}

#[tokio::test]
#[ignore]
async fn live_get_likes_and_comments() {
    let config = config();
    let agent = WebAgent::new(config.clone()).unwrap();

    for code in config.fixtures.all_media() {
        let mut media = Media::new(code);

        let (likers, _) = agent.get_likes(&mut media, PageOptions::new()).await.unwrap();
        assert!(likers.len() as u64 <= media.likes_count.unwrap());

        let (comments, pointer) = agent
            .get_comments(&mut media, PageOptions::new().count(COUNT).delay(delay(&config)))
            .await
            .unwrap();
        let total = media.comments_count.unwrap() as usize;
        assert_eq!(comments.len(), total.min(COUNT));
        assert_eq!(pointer.is_none(), total <= COUNT);

        tokio::time::sleep(delay(&config)).await;
    }
}
