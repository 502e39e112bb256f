//! Articles, headers and newsgroups
//!
//! This module is organized into:
//! - `types`: Core data structures (Article, Headers, NumberedArticle, Group)
//! - `parsing`: Parsing of articles received over POST and IHAVE

mod parsing;
mod types;

pub use self::parsing::{parse_article, parse_headers, split_article};
pub use self::types::{Article, Group, Headers, NumberedArticle, PostingStatus};
