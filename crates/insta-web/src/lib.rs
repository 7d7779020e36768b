//! insta-web: asynchronous client for the platform's public web API
//!
//! [`WebAgent`] keeps the session tokens, populates [`insta_core`] entities
//! in place and pages through media feeds, likes and comments.
//!
//! ```no_run
//! use insta_core::{Account, Config};
//! use insta_web::{PageOptions, WebAgent};
//!
//! # async fn run() -> insta_core::Result<()> {
//! let agent = WebAgent::new(Config::load()?)?;
//! let mut account = Account::new("instagram");
//! let (media, pointer) = agent.get_media(&mut account, PageOptions::new().count(100)).await?;
//! println!("{} of {:?}, more: {}", media.len(), account.media_count, pointer.is_some());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod pagination;
pub mod session;
pub mod signature;

#[cfg(test)]
mod testing;

pub use agent::{Page, WebAgent};
pub use pagination::PageOptions;
pub use session::{Session, SessionTokens};
