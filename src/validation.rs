//! Message-ID and newsgroup name checks
//!
//! Looser than RFC 5536: only input that would corrupt the store or the wire
//! format is rejected.

use crate::storage::ARTICLE_NUMBER_KEY;

/// Why a value was rejected
pub type Rejection = &'static str;

/// Validates a Message-ID for use as a storage key
///
/// Any non-blank id is accepted as given, including ids without angle
/// brackets or with several `@` signs. Only a blank id and the reserved
/// counter key are rejected.
///
/// # Examples
///
/// ```
/// use nntp_mock::validation::validate_message_id;
///
/// assert!(validate_message_id("<abc123@example.com>").is_ok());
/// assert!(validate_message_id("abc123@example.com").is_ok());
/// assert!(validate_message_id("<a@b@c>").is_ok());
/// assert!(validate_message_id("  ").is_err());
/// assert!(validate_message_id(nntp_mock::ARTICLE_NUMBER_KEY).is_err());
/// ```
pub fn validate_message_id(message_id: &str) -> Result<(), Rejection> {
    if message_id.trim().is_empty() {
        return Err("Message-ID cannot be empty");
    }
    if message_id == ARTICLE_NUMBER_KEY {
        return Err("Message-ID collides with the article counter key");
    }
    Ok(())
}

/// Validates a newsgroup name
///
/// - Components separated by dots, none of them empty
/// - No leading or trailing dot
/// - No whitespace or control characters
///
/// Upper-case letters are tolerated so test fixtures like `Alt.Test` still work.
///
/// # Examples
///
/// ```
/// use nntp_mock::validation::validate_newsgroup_name;
///
/// assert!(validate_newsgroup_name("comp.lang.rust").is_ok());
/// assert!(validate_newsgroup_name("de.comp.lang.c++").is_ok());
/// assert!(validate_newsgroup_name("comp..rust").is_err());
/// assert!(validate_newsgroup_name(".comp.rust").is_err());
/// ```
pub fn validate_newsgroup_name(newsgroup: &str) -> Result<(), Rejection> {
    if newsgroup.is_empty() {
        return Err("Newsgroup name cannot be empty");
    }

    if newsgroup.starts_with('.') || newsgroup.ends_with('.') {
        return Err("Newsgroup name cannot start or end with a dot");
    }

    if newsgroup.split('.').any(str::is_empty) {
        return Err("Newsgroup name cannot have empty components");
    }

    if newsgroup
        .chars()
        .any(|ch| ch.is_whitespace() || ch.is_control())
    {
        return Err("Newsgroup name cannot contain whitespace or control characters");
    }

    Ok(())
}

/// Whether a HEAD/BODY/ARTICLE/STAT argument is an article number rather
/// than a Message-ID
pub fn is_article_number(arg: &str) -> bool {
    !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit())
}
