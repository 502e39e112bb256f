//! LIST [ACTIVE | NEWSGROUPS | OVERVIEW.FMT]

use async_trait::async_trait;

use super::CommandHandler;
use crate::error::Result;
use crate::response::{codes, status_line};
use crate::server::{Connection, Next, Session};
use crate::storage::NO_LIMIT;

/// Fields of an OVER line after the article number
pub const OVERVIEW_FORMAT: [&str; 7] = [
    "Subject:",
    "From:",
    "Date:",
    "Message-ID:",
    "References:",
    ":bytes",
    ":lines",
];

/// LIST; defaults to ACTIVE, unknown keywords yield an empty list
pub struct ListCommand;

#[async_trait]
impl CommandHandler for ListCommand {
    async fn handle(
        &self,
        args: &[String],
        session: &mut Session,
        conn: &mut Connection,
    ) -> Result<Next> {
        let keyword = args
            .first()
            .map(|k| k.to_ascii_uppercase())
            .unwrap_or_else(|| "ACTIVE".to_string());

        if keyword == "OVERVIEW.FMT" {
            conn.write_multiline(
                &status_line(
                    codes::LIST_INFORMATION_FOLLOWS,
                    "Order of fields in overview database.",
                ),
                OVERVIEW_FORMAT,
            )
            .await?;
            return Ok(Next::Continue);
        }

        let groups = session.backend.list_groups(NO_LIMIT).await?;
        let lines: Vec<String> = match keyword.as_str() {
            "ACTIVE" => groups
                .iter()
                .map(|g| format!("{} {} {} {}", g.name, g.high, g.low, g.posting))
                .collect(),
            "NEWSGROUPS" => groups
                .iter()
                .map(|g| format!("{} {}", g.name, g.description))
                .collect(),
            _ => Vec::new(),
        };

        conn.write_multiline(
            &status_line(codes::LIST_INFORMATION_FOLLOWS, "list of newsgroups follows"),
            lines,
        )
        .await?;
        Ok(Next::Continue)
    }
}
