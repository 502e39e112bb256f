//! ARTICLE, HEAD, BODY and STAT

use async_trait::async_trait;

use super::{CommandHandler, selected_group};
use crate::error::{NntpError, Result};
use crate::response::codes;
use crate::server::{Connection, Next, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Full,
    Head,
    Body,
}

/// ARTICLE, HEAD or BODY, depending on the part served
///
/// Lookups are by message-id; the argument is echoed in the status line.
#[derive(Debug)]
pub struct ArticleCommand {
    part: Part,
}

impl ArticleCommand {
    /// ARTICLE: headers, blank line, body
    pub const ARTICLE: ArticleCommand = ArticleCommand { part: Part::Full };
    /// HEAD: headers only
    pub const HEAD: ArticleCommand = ArticleCommand { part: Part::Head };
    /// BODY: body only
    pub const BODY: ArticleCommand = ArticleCommand { part: Part::Body };

    fn code(&self) -> u16 {
        match self.part {
            Part::Full => codes::ARTICLE_FOLLOWS,
            Part::Head => codes::HEAD_FOLLOWS,
            Part::Body => codes::BODY_FOLLOWS,
        }
    }
}

#[async_trait]
impl CommandHandler for ArticleCommand {
    async fn handle(
        &self,
        args: &[String],
        session: &mut Session,
        conn: &mut Connection,
    ) -> Result<Next> {
        let group = selected_group(session)?;
        let id = args.first().ok_or(NntpError::NoCurrentArticle)?;
        let article = session.backend.get_article(Some(group), id).await?;

        let header_lines = article.headers.to_lines();
        let mut lines: Vec<&[u8]> = Vec::new();
        if self.part != Part::Body {
            lines.extend(header_lines.iter().map(Vec::as_slice));
        }
        if self.part == Part::Full {
            lines.push(b"");
        }
        if self.part != Part::Head {
            lines.extend(article.body_lines());
        }

        let status = format!("{} {} {}", self.code(), article.number, id);
        conn.write_multiline(&status, lines).await?;
        Ok(Next::Continue)
    }
}

/// STAT: confirm an article exists without sending it
pub struct StatCommand;

#[async_trait]
impl CommandHandler for StatCommand {
    async fn handle(
        &self,
        args: &[String],
        session: &mut Session,
        conn: &mut Connection,
    ) -> Result<Next> {
        let group = selected_group(session)?;
        let id = args.first().ok_or(NntpError::NoCurrentArticle)?;
        let (number, id) = session.backend.stat(Some(group), id).await?;
        conn.write_status(&format!("{} {} {}", codes::ARTICLE_STAT, number, id))
            .await?;
        Ok(Next::Continue)
    }
}
