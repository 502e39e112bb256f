//! Server and storage configuration

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Database file used when no path is configured
pub const DEFAULT_DB_PATH: &str = "nntp.db";

/// Default listen port (the standard port is 119; the mock uses 1199)
pub const DEFAULT_PORT: u16 = 1199;

/// Longest command or article line accepted from a client
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Group seeded into a fresh registry
pub const DEFAULT_GROUP: &str = "test";

/// Durability mode for the on-disk store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Durability {
    /// Every commit is synced to disk
    #[default]
    Full,
    /// Commits are not synced; a crash may lose recent articles but a
    /// normal shutdown persists everything
    Fast,
}

/// Username/password pair required before a session may post
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Credentials {
    /// Expected AUTHINFO USER value
    pub username: String,
    /// Expected AUTHINFO PASS value
    pub password: String,
}

impl Credentials {
    /// Create a credentials pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub(crate) fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Disk backend configuration
///
/// # Example
///
/// ```
/// use nntp_mock::{Credentials, DiskConfig, Durability};
///
/// let config = DiskConfig::new("/tmp/news.db")
///     .with_durability(Durability::Fast)
///     .with_credentials(Credentials::new("user", "secret"))
///     .with_group("alt.test");
/// assert_eq!(config.groups, vec!["test".to_string(), "alt.test".to_string()]);
/// ```
#[must_use]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiskConfig {
    /// Database file; an empty path means [`DEFAULT_DB_PATH`]
    #[cfg_attr(feature = "serde", serde(default))]
    pub db_path: PathBuf,

    /// Wipe the store and delete its files on close
    #[cfg_attr(feature = "serde", serde(default))]
    pub clean_on_close: bool,

    /// Sync mode for commits
    #[cfg_attr(feature = "serde", serde(default))]
    pub durability: Durability,

    /// When set, sessions start unauthenticated and may only post after
    /// AUTHINFO with these credentials
    #[cfg_attr(feature = "serde", serde(default))]
    pub credentials: Option<Credentials>,

    /// Whether posting is accepted at all
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub allow_posting: bool,

    /// Assign a Message-ID to posted articles that lack one instead of
    /// rejecting them
    #[cfg_attr(feature = "serde", serde(default))]
    pub generate_message_ids: bool,

    /// Right-hand side of generated Message-IDs
    #[cfg_attr(feature = "serde", serde(default = "default_domain"))]
    pub message_id_domain: String,

    /// Groups present in the registry before any GROUP command
    #[cfg_attr(feature = "serde", serde(default = "default_groups"))]
    pub groups: Vec<String>,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

fn default_domain() -> String {
    "nntp-mock.invalid".to_string()
}

fn default_groups() -> Vec<String> {
    vec![DEFAULT_GROUP.to_string()]
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::new(),
            clean_on_close: false,
            durability: Durability::Full,
            credentials: None,
            allow_posting: true,
            generate_message_ids: false,
            message_id_domain: default_domain(),
            groups: default_groups(),
        }
    }
}

impl DiskConfig {
    /// Configuration for a persistent store at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: path.into(),
            ..Self::default()
        }
    }

    /// Configuration for a throwaway store: unsynced writes, removed on close
    pub fn temporary(path: impl Into<PathBuf>) -> Self {
        Self {
            clean_on_close: true,
            durability: Durability::Fast,
            ..Self::new(path)
        }
    }

    /// Set the sync mode
    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }

    /// Require AUTHINFO before posting
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Enable or disable posting
    pub fn with_posting(mut self, allow: bool) -> Self {
        self.allow_posting = allow;
        self
    }

    /// Generate Message-IDs for articles posted without one
    pub fn with_generated_message_ids(mut self, generate: bool) -> Self {
        self.generate_message_ids = generate;
        self
    }

    /// Delete the store when the backend is closed
    pub fn with_clean_on_close(mut self, clean: bool) -> Self {
        self.clean_on_close = clean;
        self
    }

    /// Seed an additional group
    pub fn with_group(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.groups.contains(&name) {
            self.groups.push(name);
        }
        self
    }

    /// Database path with the empty-path default applied
    pub fn resolved_path(&self) -> &Path {
        if self.db_path.as_os_str().is_empty() {
            Path::new(DEFAULT_DB_PATH)
        } else {
            &self.db_path
        }
    }
}

/// Listener configuration
#[must_use]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: SocketAddr,

    /// Longest line accepted from a client before the connection is dropped
    pub max_line_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl ServerConfig {
    /// Listen on `bind` with default limits
    pub fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            ..Self::default()
        }
    }
}
