//! Storage contract consumed by the session layer
//!
//! A [`Backend`] answers group and article lookups, accepts posts and decides
//! authentication. Sessions hold it as a [`SharedBackend`] and swap it for the
//! handle returned by [`Backend::authenticate`].

mod codec;
mod disk;

pub use codec::ArticleRecord;
pub use disk::{ARTICLE_NUMBER_KEY, DiskBackend};

use std::sync::Arc;

use async_trait::async_trait;

use crate::article::{Article, Group, NumberedArticle};
use crate::error::Result;

/// `limit` value for [`Backend::list_groups`] meaning "no bound"
pub const NO_LIMIT: i64 = -1;

/// Reference-counted backend handle held by sessions
pub type SharedBackend = Arc<dyn Backend>;

/// Capabilities a storage backend provides to NNTP sessions
///
/// All methods may be called concurrently from independent sessions.
#[async_trait]
pub trait Backend: Send + Sync {
    /// All known groups with current `count`/`high`, ordered by name
    ///
    /// A negative `limit` means no bound.
    async fn list_groups(&self, limit: i64) -> Result<Vec<Group>>;

    /// Look up a group by exact name, creating it if it does not exist yet
    async fn get_group(&self, name: &str) -> Result<Group>;

    /// Fetch an article by Message-ID, or by number when a group is given
    ///
    /// # Errors
    ///
    /// - [`crate::NntpError::InvalidMessageId`] - no article with that Message-ID
    /// - [`crate::NntpError::InvalidArticleNumber`] - no article with that number
    async fn get_article(&self, group: Option<&Group>, id: &str) -> Result<Article>;

    /// Articles numbered `from..=to` in a group, for OVER/XOVER
    ///
    /// Backends without per-group numbering return [`crate::NntpError::Unsupported`].
    async fn get_articles(&self, group: &Group, from: i64, to: i64)
    -> Result<Vec<NumberedArticle>>;

    /// Whether this handle already satisfies authentication
    fn authorized(&self) -> bool;

    /// Check credentials, returning the handle the session should use from now on
    ///
    /// # Errors
    ///
    /// - [`crate::NntpError::AuthRejected`] - wrong credentials; the caller keeps its handle
    async fn authenticate(&self, user: &str, pass: &str) -> Result<SharedBackend>;

    /// Whether this handle may post
    fn allow_post(&self) -> bool;

    /// Store an article
    ///
    /// Either the article is stored and the article counter advanced, or
    /// nothing changes.
    async fn post(&self, article: Article) -> Result<()>;

    /// `(number, message-id)` for an article that [`Backend::get_article`] would return
    async fn stat(&self, group: Option<&Group>, id: &str) -> Result<(String, String)> {
        let article = self.get_article(group, id).await?;
        let message_id = article.message_id().unwrap_or(id).to_string();
        Ok((article.number.to_string(), message_id))
    }

    /// Release resources; called once on shutdown
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
