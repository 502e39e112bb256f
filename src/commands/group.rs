//! GROUP and NEWGROUPS

use async_trait::async_trait;

use super::CommandHandler;
use crate::error::{NntpError, Result};
use crate::response::{codes, status_line};
use crate::server::{Connection, Next, Session};

/// GROUP: select a newsgroup, creating it on first use
pub struct GroupCommand;

#[async_trait]
impl CommandHandler for GroupCommand {
    async fn handle(
        &self,
        args: &[String],
        session: &mut Session,
        conn: &mut Connection,
    ) -> Result<Next> {
        let name = args.first().ok_or(NntpError::NoSuchGroup)?;
        let group = session.backend.get_group(name).await?;

        conn.write_status(&format!(
            "{} {} {} {} {}",
            codes::GROUP_SELECTED,
            group.count,
            group.low,
            group.high,
            group.name
        ))
        .await?;
        session.group = Some(group);
        Ok(Next::Continue)
    }
}

/// NEWGROUPS: creation dates are not tracked, so the list is always empty
pub struct NewgroupsCommand;

#[async_trait]
impl CommandHandler for NewgroupsCommand {
    async fn handle(&self, _: &[String], _: &mut Session, conn: &mut Connection) -> Result<Next> {
        conn.write_multiline(
            &status_line(codes::NEW_NEWSGROUPS_FOLLOW, "list of new newsgroups follows"),
            std::iter::empty::<&str>(),
        )
        .await?;
        Ok(Next::Continue)
    }
}
