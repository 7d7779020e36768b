//! Options and helpers for cursor-based collection fetches

use std::time::Duration;

use insta_core::{Error, Pointer, Result};
use tokio_util::sync::CancellationToken;

/// Options for one paginated fetch
///
/// With no `count`, exactly one page is fetched. With a `count`, pages are
/// fetched until that many items were collected or the collection ends.
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    pub count: Option<usize>,
    pub delay: Option<Duration>,
    pub pointer: Option<Pointer>,
    pub limit: Option<usize>,
    pub cancel: Option<CancellationToken>,
}

impl PageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after `count` items
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Pause between successive page fetches
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Resume from a pointer returned by an earlier fetch
    pub fn pointer(mut self, pointer: Option<Pointer>) -> Self {
        self.pointer = pointer;
        self
    }

    /// Items requested per page
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit.max(1));
        self
    }

    /// Abandon the fetch with [`Error::Cancelled`] once `token` is cancelled
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Items to request for the next page given what was collected so far
    pub(crate) fn page_size(&self, limit: usize, collected: usize) -> usize {
        match self.count {
            Some(count) => limit.min(count.saturating_sub(collected)),
            None => limit,
        }
    }

    /// Whether enough items were collected
    pub(crate) fn satisfied(&self, collected: usize) -> bool {
        match self.count {
            Some(count) => collected >= count,
            None => true,
        }
    }

    pub(crate) fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }

    /// Run `fut` unless the cancellation token fires first
    pub(crate) async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(Error::Cancelled),
                result = fut => result,
            },
            None => fut.await,
        }
    }

    /// Sleep for the inter-page delay, if any
    pub(crate) async fn pause(&self, delay: Option<Duration>) -> Result<()> {
        let Some(delay) = delay.filter(|d| !d.is_zero()) else {
            return Ok(());
        };
        self.run(async {
            tokio::time::sleep(delay).await;
            Ok(())
        })
        .await
    }
}
