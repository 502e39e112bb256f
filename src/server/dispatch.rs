//! Command dispatch and the per-connection command loop

use std::fmt;

use tracing::debug;

use super::{Connection, Session};
use crate::commands::{
    ArticleCommand, AuthinfoCommand, CapabilitiesCommand, CommandHandler, DateCommand,
    GroupCommand, HelpCommand, IhaveCommand, ListCommand, ModeCommand, NewgroupsCommand,
    OverCommand, PostCommand, QuitCommand, StatCommand, UnknownCommand,
};
use crate::error::Result;
use crate::response::{codes, status_line};

/// Greeting text sent with 200 when a client connects
pub const GREETING: &str = "Hello!";

/// What the session loop does after a handler returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// Read the next command
    Continue,
    /// End the session (the handler already answered)
    Close,
}

/// Protocol verbs understood by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Article,
    Authinfo,
    Body,
    Capabilities,
    Date,
    Group,
    Head,
    Help,
    Ihave,
    List,
    Mode,
    Newgroups,
    Over,
    Post,
    Quit,
    Stat,
    Xover,
    /// Anything else, including an empty line
    Unknown,
}

impl Verb {
    /// Every recognized verb, in HELP order
    pub const KNOWN: [Verb; 17] = [
        Verb::Article,
        Verb::Authinfo,
        Verb::Body,
        Verb::Capabilities,
        Verb::Date,
        Verb::Group,
        Verb::Head,
        Verb::Help,
        Verb::Ihave,
        Verb::List,
        Verb::Mode,
        Verb::Newgroups,
        Verb::Over,
        Verb::Post,
        Verb::Quit,
        Verb::Stat,
        Verb::Xover,
    ];

    /// Case-insensitive keyword lookup
    ///
    /// # Examples
    ///
    /// ```
    /// use nntp_mock::server::Verb;
    ///
    /// assert_eq!(Verb::from_keyword("group"), Verb::Group);
    /// assert_eq!(Verb::from_keyword("XYZZY"), Verb::Unknown);
    /// ```
    pub fn from_keyword(keyword: &str) -> Verb {
        Verb::KNOWN
            .into_iter()
            .find(|verb| verb.keyword().eq_ignore_ascii_case(keyword))
            .unwrap_or(Verb::Unknown)
    }

    /// Wire keyword
    pub fn keyword(self) -> &'static str {
        match self {
            Verb::Article => "ARTICLE",
            Verb::Authinfo => "AUTHINFO",
            Verb::Body => "BODY",
            Verb::Capabilities => "CAPABILITIES",
            Verb::Date => "DATE",
            Verb::Group => "GROUP",
            Verb::Head => "HEAD",
            Verb::Help => "HELP",
            Verb::Ihave => "IHAVE",
            Verb::List => "LIST",
            Verb::Mode => "MODE",
            Verb::Newgroups => "NEWGROUPS",
            Verb::Over => "OVER",
            Verb::Post => "POST",
            Verb::Quit => "QUIT",
            Verb::Stat => "STAT",
            Verb::Xover => "XOVER",
            Verb::Unknown => "",
        }
    }

    /// Handler bound to this verb
    pub fn handler(self) -> &'static dyn CommandHandler {
        match self {
            Verb::Article => &ArticleCommand::ARTICLE,
            Verb::Head => &ArticleCommand::HEAD,
            Verb::Body => &ArticleCommand::BODY,
            Verb::Stat => &StatCommand,
            Verb::Authinfo => &AuthinfoCommand,
            Verb::Capabilities => &CapabilitiesCommand,
            Verb::Date => &DateCommand,
            Verb::Group => &GroupCommand,
            Verb::Newgroups => &NewgroupsCommand,
            Verb::Help => &HelpCommand,
            Verb::List => &ListCommand,
            Verb::Mode => &ModeCommand,
            Verb::Over | Verb::Xover => &OverCommand,
            Verb::Post => &PostCommand,
            Verb::Ihave => &IhaveCommand,
            Verb::Quit => &QuitCommand,
            Verb::Unknown => &UnknownCommand,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Unknown => f.write_str("<unknown>"),
            verb => f.write_str(verb.keyword()),
        }
    }
}

/// Split a command line into its verb and arguments
pub fn parse_command(line: &str) -> (Verb, Vec<String>) {
    let mut tokens = line.split_whitespace();
    let verb = Verb::from_keyword(tokens.next().unwrap_or(""));
    (verb, tokens.map(str::to_string).collect())
}

/// Greet the client and run commands until QUIT, end of stream or a fatal error
///
/// Protocol errors are answered with their status line and the loop goes on.
/// Any other error ends the session and is returned to the caller.
pub async fn run_session(conn: &mut Connection, session: &mut Session) -> Result<()> {
    conn.write_status(&status_line(codes::READY_POSTING_ALLOWED, GREETING))
        .await?;

    loop {
        let Some(raw) = conn.read_line().await? else {
            debug!("Client closed the connection");
            return Ok(());
        };
        let line = String::from_utf8_lossy(&raw);
        let (verb, args) = parse_command(&line);

        // AUTHINFO arguments are credentials
        if verb == Verb::Authinfo {
            debug!("Command: {}", verb);
        } else {
            debug!("Command: {} {:?}", verb, args);
        }

        match verb.handler().handle(&args, session, conn).await {
            Ok(Next::Continue) => conn.flush().await?,
            Ok(Next::Close) => return Ok(()),
            Err(e) => match e.status_line() {
                Some(reply) => {
                    debug!("{} failed: {}", verb, reply);
                    conn.write_status(&reply).await?;
                }
                None => return Err(e),
            },
        }
    }
}
