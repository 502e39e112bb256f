#![doc = include_str!("../README.md")]

/// Articles, headers and newsgroups
pub mod article;
/// Server-side NNTP command handlers
pub mod commands;
mod config;
mod error;
/// Listener setup
pub mod net;
mod response;
/// Accept loop, sessions and connection I/O
pub mod server;
/// Storage contract and the disk-backed store
pub mod storage;
/// Message-ID and newsgroup name validation
pub mod validation;

pub use article::{Article, Group, Headers, NumberedArticle, PostingStatus, parse_article, parse_headers};
pub use commands::CommandHandler;
pub use config::{
    Credentials, DEFAULT_DB_PATH, DEFAULT_GROUP, DEFAULT_MAX_LINE_LENGTH, DEFAULT_PORT,
    DiskConfig, Durability, ServerConfig,
};
pub use error::{NntpError, Result};
pub use response::{codes, status_line};
pub use server::{Connection, NntpServer, Session};
pub use storage::{ARTICLE_NUMBER_KEY, ArticleRecord, Backend, DiskBackend, NO_LIMIT, SharedBackend};
pub use validation::{validate_message_id, validate_newsgroup_name};
