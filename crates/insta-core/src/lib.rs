//! insta-core: shared types for the insta-web client
//!
//! Configuration, the error taxonomy, typed entities (accounts, media,
//! locations, tags, comments), GraphQL connection pages and the pagination
//! pointer.

pub mod config;
pub mod connection;
pub mod entities;
pub mod error;
pub mod json;
pub mod pointer;

pub use config::{AgentConfig, Config, FixtureConfig, QueryHashes};
pub use connection::{Connection, PageInfo};
pub use entities::{Account, Comment, Coordinates, Entity, Location, Media, MediaSource, Tag};
pub use error::{Error, Result};
pub use pointer::Pointer;
