//! POST and IHAVE

use async_trait::async_trait;
use tracing::{debug, warn};

use super::CommandHandler;
use crate::article::{Article, parse_article};
use crate::error::{NntpError, Result};
use crate::response::{codes, status_line};
use crate::server::{Connection, Next, Session};

/// Read a dot-terminated article from the client and parse it
///
/// Malformed headers are a posting failure; the whole block has been consumed
/// by then, so the session stays in sync.
async fn receive_article(conn: &mut Connection) -> Result<Article> {
    let lines = conn.read_block().await?;
    parse_article(&lines).map_err(|reason| {
        debug!("Rejecting malformed article: {}", reason);
        NntpError::PostingFailed
    })
}

/// Hand an article to the backend
///
/// Storage failures are reported to the client as 441 instead of dropping the
/// connection.
async fn store(session: &Session, article: Article) -> Result<()> {
    match session.backend.post(article).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_protocol() => Err(e),
        Err(e) => {
            warn!("Failed to store article: {}", e);
            Err(NntpError::PostingFailed)
        }
    }
}

/// POST
pub struct PostCommand;

#[async_trait]
impl CommandHandler for PostCommand {
    async fn handle(
        &self,
        _: &[String],
        session: &mut Session,
        conn: &mut Connection,
    ) -> Result<Next> {
        if !session.backend.allow_post() {
            return Err(NntpError::PostingNotPermitted);
        }

        conn.write_status(&status_line(codes::SEND_ARTICLE, "Go ahead"))
            .await?;
        let article = receive_article(conn).await?;
        store(session, article).await?;

        conn.write_status(&status_line(codes::ARTICLE_POSTED, "article received OK"))
            .await?;
        Ok(Next::Continue)
    }
}

/// IHAVE: accept an article offered by message-id unless it is already stored
pub struct IhaveCommand;

#[async_trait]
impl CommandHandler for IhaveCommand {
    async fn handle(
        &self,
        args: &[String],
        session: &mut Session,
        conn: &mut Connection,
    ) -> Result<Next> {
        let id = args.first().ok_or(NntpError::Syntax)?;
        if !session.backend.allow_post() {
            return Err(NntpError::NotWanted);
        }
        if session.backend.get_article(None, id).await.is_ok() {
            debug!("IHAVE {}: already stored", id);
            return Err(NntpError::NotWanted);
        }

        conn.write_status(&status_line(codes::SEND_ARTICLE_TRANSFER, "send it"))
            .await?;
        let mut article = receive_article(conn).await?;
        if !article.headers.contains("Message-ID") {
            article.headers.set("Message-ID", id.as_str());
        }
        store(session, article).await?;

        conn.write_status(&status_line(
            codes::ARTICLE_TRANSFERRED,
            "article transferred OK",
        ))
        .await?;
        Ok(Next::Continue)
    }
}
