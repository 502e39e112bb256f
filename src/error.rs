//! NNTP error types
//!
//! Errors come in two classes. Protocol errors carry a fixed NNTP status code
//! and are rendered to the client as a single status line; the session keeps
//! going afterwards. Everything else (I/O, storage, codec failures) is fatal
//! to the connection that hit it.

use thiserror::Error;

use crate::response::codes;

/// NNTP protocol and server errors
#[derive(Error, Debug)]
pub enum NntpError {
    /// No such newsgroup (411)
    #[error("No such newsgroup")]
    NoSuchGroup,

    /// No newsgroup selected (412)
    #[error("No newsgroup selected")]
    NoGroupSelected,

    /// Current article number is invalid (420)
    #[error("Current article number is invalid")]
    NoCurrentArticle,

    /// No article with that number (423)
    #[error("No article with that number")]
    InvalidArticleNumber,

    /// No article with that message-id (430)
    #[error("No article with that message-id")]
    InvalidMessageId,

    /// Article not wanted (435)
    #[error("Article not wanted")]
    NotWanted,

    /// Posting not permitted (440)
    #[error("Posting not permitted")]
    PostingNotPermitted,

    /// Posting failed (441)
    #[error("posting failed")]
    PostingFailed,

    /// Authorization required (450)
    #[error("authorization required")]
    AuthRequired,

    /// Authorization rejected (452)
    #[error("authorization rejected")]
    AuthRejected,

    /// Authentication required (480)
    #[error("authentication required")]
    NotAuthenticated,

    /// Command not recognized (500)
    #[error("Unknown command")]
    UnknownCommand,

    /// Command syntax error (501)
    #[error("not supported, or syntax error")]
    Syntax,

    /// Operation not supported by the active backend (503)
    #[error("{0} not supported")]
    Unsupported(&'static str),

    /// IO error on the connection or the database file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedded database error
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Persisted record could not be encoded or decoded
    #[error("Record codec error: {0}")]
    Codec(String),

    /// The store was used after `close()`
    #[error("Store is closed")]
    StoreClosed,

    /// Client sent a line longer than the configured limit
    #[error("Line exceeds {0} bytes")]
    LineTooLong(usize),

    /// Blocking storage task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NntpError {
    /// NNTP status code for protocol errors, `None` for fatal ones
    pub fn code(&self) -> Option<u16> {
        let code = match self {
            NntpError::NoSuchGroup => codes::NO_SUCH_GROUP,
            NntpError::NoGroupSelected => codes::NO_GROUP_SELECTED,
            NntpError::NoCurrentArticle => codes::NO_CURRENT_ARTICLE,
            NntpError::InvalidArticleNumber => codes::NO_SUCH_ARTICLE_NUMBER,
            NntpError::InvalidMessageId => codes::NO_SUCH_ARTICLE_ID,
            NntpError::NotWanted => codes::ARTICLE_NOT_WANTED,
            NntpError::PostingNotPermitted => codes::POSTING_NOT_PERMITTED,
            NntpError::PostingFailed => codes::POSTING_FAILED,
            NntpError::AuthRequired => codes::AUTH_REQUIRED,
            NntpError::AuthRejected => codes::AUTH_REJECTED,
            NntpError::NotAuthenticated => codes::NOT_AUTHENTICATED,
            NntpError::UnknownCommand => codes::COMMAND_NOT_RECOGNIZED,
            NntpError::Syntax => codes::COMMAND_SYNTAX_ERROR,
            NntpError::Unsupported(_) => codes::FEATURE_NOT_SUPPORTED,
            _ => return None,
        };
        Some(code)
    }

    /// Whether this error is rendered to the client instead of dropping the connection
    pub fn is_protocol(&self) -> bool {
        self.code().is_some()
    }

    /// Status line for protocol errors, e.g. `"412 No newsgroup selected"`
    pub fn status_line(&self) -> Option<String> {
        self.code().map(|code| format!("{} {}", code, self))
    }
}

/// Result type alias using NntpError
pub type Result<T> = std::result::Result<T, NntpError>;
