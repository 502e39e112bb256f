//! Server-side NNTP command handlers
//!
//! One handler per protocol verb. Handlers write their own success responses;
//! protocol failures are returned as [`NntpError`] and rendered by the session
//! loop.

// Module declarations
mod article;
mod auth;
mod group;
mod list;
mod over;
mod post;

pub use self::article::{ArticleCommand, StatCommand};
pub use self::auth::AuthinfoCommand;
pub use self::group::{GroupCommand, NewgroupsCommand};
pub use self::list::ListCommand;
pub use self::over::{OverCommand, parse_range};
pub use self::post::{IhaveCommand, PostCommand};

use async_trait::async_trait;

use crate::article::Group;
use crate::error::{NntpError, Result};
use crate::response::{codes, status_line};
use crate::server::{Connection, Next, Session, Verb};

/// Behaviour bound to one protocol verb
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command
    ///
    /// `args` are the whitespace-separated tokens after the verb.
    async fn handle(
        &self,
        args: &[String],
        session: &mut Session,
        conn: &mut Connection,
    ) -> Result<Next>;
}

/// The group selected by GROUP, or 412
fn selected_group(session: &Session) -> Result<&Group> {
    session.group.as_ref().ok_or(NntpError::NoGroupSelected)
}

/// QUIT
pub struct QuitCommand;

#[async_trait]
impl CommandHandler for QuitCommand {
    async fn handle(&self, _: &[String], _: &mut Session, conn: &mut Connection) -> Result<Next> {
        conn.write_status(&status_line(codes::CLOSING_CONNECTION, "bye"))
            .await?;
        Ok(Next::Close)
    }
}

/// CAPABILITIES
///
/// POST/IHAVE and AUTHINFO are only advertised when they would do something
/// for the current identity.
pub struct CapabilitiesCommand;

#[async_trait]
impl CommandHandler for CapabilitiesCommand {
    async fn handle(
        &self,
        _: &[String],
        session: &mut Session,
        conn: &mut Connection,
    ) -> Result<Next> {
        let backend = &session.backend;
        let mut lines = vec!["VERSION 2", "READER"];
        if backend.allow_post() {
            lines.extend(["POST", "IHAVE"]);
        }
        if !backend.authorized() {
            lines.push("AUTHINFO USER");
        }
        lines.extend([
            "OVER",
            "XOVER",
            "LIST ACTIVE NEWSGROUPS OVERVIEW.FMT",
            "NEWGROUPS",
            "DATE",
            "HELP",
        ]);

        conn.write_multiline(&status_line(codes::CAPABILITY_LIST, "Capability list:"), lines)
            .await?;
        Ok(Next::Continue)
    }
}

/// MODE READER (any argument is accepted)
pub struct ModeCommand;

#[async_trait]
impl CommandHandler for ModeCommand {
    async fn handle(
        &self,
        _: &[String],
        session: &mut Session,
        conn: &mut Connection,
    ) -> Result<Next> {
        let reply = if session.backend.allow_post() {
            status_line(codes::READY_POSTING_ALLOWED, "Posting allowed")
        } else {
            status_line(codes::READY_NO_POSTING, "Posting prohibited")
        };
        conn.write_status(&reply).await?;
        Ok(Next::Continue)
    }
}

/// DATE: server time in UTC
pub struct DateCommand;

#[async_trait]
impl CommandHandler for DateCommand {
    async fn handle(&self, _: &[String], _: &mut Session, conn: &mut Connection) -> Result<Next> {
        let now = chrono::Utc::now().format("%Y%m%d%H%M%S");
        conn.write_status(&status_line(codes::SERVER_DATE, now))
            .await?;
        Ok(Next::Continue)
    }
}

/// HELP: the recognized verbs
pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn handle(&self, _: &[String], _: &mut Session, conn: &mut Connection) -> Result<Next> {
        let lines: Vec<String> = Verb::KNOWN
            .iter()
            .map(|verb| format!("  {}", verb.keyword()))
            .collect();
        conn.write_multiline(&status_line(codes::HELP_TEXT_FOLLOWS, "Legal commands"), lines)
            .await?;
        Ok(Next::Continue)
    }
}

/// Fallback for anything the dispatcher does not recognize
pub struct UnknownCommand;

#[async_trait]
impl CommandHandler for UnknownCommand {
    async fn handle(&self, _: &[String], _: &mut Session, _: &mut Connection) -> Result<Next> {
        Err(NntpError::UnknownCommand)
    }
}
