//! AUTHINFO USER/PASS (RFC 4643 §2.3)

use async_trait::async_trait;

use super::CommandHandler;
use crate::error::{NntpError, Result};
use crate::response::{codes, status_line};
use crate::server::{Connection, Next, Session};

/// Extract the secret from an `AUTHINFO PASS <secret>` line
///
/// The secret is everything after the second space, so it may itself contain
/// spaces.
fn parse_pass_line(line: &str) -> Option<&str> {
    let mut parts = line.splitn(3, ' ');
    let command = parts.next()?;
    let sub = parts.next()?;
    let secret = parts.next()?;
    (command.eq_ignore_ascii_case("AUTHINFO") && sub.eq_ignore_ascii_case("PASS"))
        .then_some(secret)
}

/// AUTHINFO USER, followed by AUTHINFO PASS on the next line
pub struct AuthinfoCommand;

#[async_trait]
impl CommandHandler for AuthinfoCommand {
    async fn handle(
        &self,
        args: &[String],
        session: &mut Session,
        conn: &mut Connection,
    ) -> Result<Next> {
        if args.len() < 2 || !args[0].eq_ignore_ascii_case("USER") {
            return Err(NntpError::Syntax);
        }
        let user = &args[1];

        let accepted = status_line(codes::AUTH_ACCEPTED, "authenticated");
        if session.backend.authorized() {
            conn.write_status(&accepted).await?;
            return Ok(Next::Continue);
        }

        conn.write_status(&status_line(codes::AUTH_CONTINUE, "Continue"))
            .await?;
        let Some(raw) = conn.read_line().await? else {
            return Err(NntpError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed during AUTHINFO",
            )));
        };
        let line = String::from_utf8_lossy(&raw);
        let pass = parse_pass_line(&line).ok_or(NntpError::Syntax)?;

        let backend = session.backend.authenticate(user, pass).await?;
        session.adopt(backend);
        conn.write_status(&accepted).await?;
        Ok(Next::Continue)
    }
}
