//! Typed entity handles populated from remote payloads
//!
//! Every entity is created from its natural key alone; attributes stay
//! `None` until the agent fills them.

mod account;
mod comment;
mod location;
mod media;
mod tag;

pub use account::Account;
pub use comment::Comment;
pub use location::{Coordinates, Location};
pub use media::Media;
pub use tag::Tag;

use serde_json::{Map, Value};

use crate::Result;
use crate::config::QueryHashes;

/// An entity with its own page on the site
pub trait Entity {
    /// Kind name used in logs and errors
    const KIND: &'static str;

    /// Dotted path of the entity object inside its page payload
    const PAYLOAD_PATH: &'static str;

    /// Natural key (username, shortcode, id or name)
    fn key(&self) -> String;

    /// Page path relative to the site root, with leading and trailing slash
    fn page_path(&self) -> String;

    /// Fill every attribute from a full entity object.
    ///
    /// Fails with [`crate::Error::Parse`] when a required attribute is missing.
    fn populate(&mut self, node: &Value) -> Result<()>;

    /// Human-readable label, e.g. `account 'instagram'`
    fn describe(&self) -> String {
        format!("{} '{}'", Self::KIND, self.key())
    }
}

/// An entity that owns a paginated media feed
pub trait MediaSource: Entity {
    /// Dotted path of the media connection in a GraphQL response
    const MEDIA_EDGE_PATH: &'static str;

    fn media_query_hash(hashes: &QueryHashes) -> &str;

    /// Variables identifying the feed, without `first`/`after`.
    ///
    /// `None` means the entity has to be updated before its feed can be queried.
    fn media_variables(&self) -> Option<Map<String, Value>>;

    fn media_count(&self) -> Option<u64>;

    fn set_media_count(&mut self, count: u64);
}

pub(crate) fn missing(kind: &str, key: &str, field: &str) -> crate::Error {
    crate::Error::Parse(format!("{} '{}' payload has no '{}'", kind, key, field))
}
