//! OVER/XOVER and article range parsing

use async_trait::async_trait;

use super::{CommandHandler, selected_group};
use crate::article::NumberedArticle;
use crate::error::Result;
use crate::response::{codes, status_line};
use crate::server::{Connection, Next, Session};

/// Parse an OVER range argument into inclusive `(low, high)` bounds
///
/// Permissive: an empty range means everything, a single number `n` means
/// `0..=n`, and an unparseable bound falls back to the widest value.
///
/// # Examples
///
/// ```
/// use nntp_mock::commands::parse_range;
///
/// assert_eq!(parse_range(""), (0, i64::MAX));
/// assert_eq!(parse_range("5"), (0, 5));
/// assert_eq!(parse_range("3-9"), (3, 9));
/// assert_eq!(parse_range("3-"), (3, i64::MAX));
/// ```
pub fn parse_range(range: &str) -> (i64, i64) {
    if range.is_empty() {
        return (0, i64::MAX);
    }
    let mut parts = range.split('-');
    let first = parts.next().unwrap_or("");
    match parts.next() {
        None => (0, first.parse().unwrap_or(i64::MAX)),
        Some(second) => (
            first.parse().unwrap_or(0),
            second.parse().unwrap_or(i64::MAX),
        ),
    }
}

/// OVER and XOVER
pub struct OverCommand;

#[async_trait]
impl CommandHandler for OverCommand {
    async fn handle(
        &self,
        args: &[String],
        session: &mut Session,
        conn: &mut Connection,
    ) -> Result<Next> {
        let group = selected_group(session)?;
        let (from, to) = parse_range(args.first().map(String::as_str).unwrap_or(""));
        let articles = session.backend.get_articles(group, from, to).await?;

        let lines: Vec<Vec<u8>> = articles
            .iter()
            .map(NumberedArticle::overview_line)
            .collect();
        conn.write_multiline(
            &status_line(codes::OVERVIEW_INFO_FOLLOWS, "Overview information follows"),
            lines,
        )
        .await?;
        Ok(Next::Continue)
    }
}
