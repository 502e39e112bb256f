//! Disk-backed store
//!
//! Articles live in an embedded SQLite database used as a single key-value
//! namespace:
//!
//! ```text
//! kv(key TEXT PRIMARY KEY, value BLOB)
//!   "<local@domain>"  -> encoded ArticleRecord
//!   "article_number"  -> decimal article counter
//! ```
//!
//! Message-IDs are validated before they are used as keys, so they can never
//! collide with the counter key.
//!
//! The counter is cached in memory for lock-free reads. It is written through
//! in the same transaction as the article row, so after a crash the counter
//! on disk always matches the stored articles; it is written once more on
//! [`Backend::close`].
//!
//! Group `count`/`high` are derived from the one global counter, so every
//! group reports the same size.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ArticleRecord, Backend, SharedBackend};
use crate::article::{Article, Group, NumberedArticle};
use crate::config::{DiskConfig, Durability};
use crate::error::{NntpError, Result};
use crate::validation::{is_article_number, validate_message_id, validate_newsgroup_name};

/// Reserved key holding the article counter
pub const ARTICLE_NUMBER_KEY: &str = "article_number";

const GROUP_DESCRIPTION: &str = "A test group";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY NOT NULL,
    value BLOB NOT NULL
)";

const UPSERT: &str = "INSERT INTO kv (key, value) VALUES (?1, ?2)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value";

/// State shared by every handle of one store
struct DiskStore {
    /// `None` once closed
    db: Mutex<Option<Connection>>,
    /// Only written while `db` is locked
    article_count: AtomicI64,
    groups: RwLock<BTreeMap<String, Group>>,
    config: DiskConfig,
    path: PathBuf,
}

/// [`Backend`] persisting articles to an embedded database
///
/// Cloning the backend (or authenticating) yields another handle to the same
/// store.
///
/// # Example
///
/// ```no_run
/// use nntp_mock::{Backend, DiskBackend, DiskConfig};
///
/// # async fn example() -> nntp_mock::Result<()> {
/// let backend = DiskBackend::open(DiskConfig::new("news.db"))?;
/// let group = backend.get_group("test").await?;
/// println!("{} has {} articles", group.name, group.count);
/// backend.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DiskBackend {
    store: Arc<DiskStore>,
    authenticated: bool,
}

impl DiskBackend {
    /// Open or create the store described by `config`
    ///
    /// # Errors
    ///
    /// Returns [`NntpError::Storage`] if the database cannot be opened or
    /// initialised, or [`NntpError::Config`] if the stored counter is corrupt.
    pub fn open(config: DiskConfig) -> Result<Self> {
        let path = config.resolved_path().to_path_buf();
        let conn = Connection::open(&path)?;

        let journal: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        let synchronous = match config.durability {
            Durability::Full => "FULL",
            Durability::Fast => "OFF",
        };
        conn.pragma_update(None, "synchronous", synchronous)?;
        conn.execute_batch(SCHEMA)?;

        let article_count = load_counter(&conn)?;

        let groups = config
            .groups
            .iter()
            .map(|name| (name.clone(), Group::new(name.clone(), GROUP_DESCRIPTION)))
            .collect();

        info!(
            "Opened article store at {:?} ({} articles, journal={}, synchronous={})",
            path, article_count, journal, synchronous
        );

        Ok(Self {
            store: Arc::new(DiskStore {
                db: Mutex::new(Some(conn)),
                article_count: AtomicI64::new(article_count),
                groups: RwLock::new(groups),
                config,
                path,
            }),
            authenticated: false,
        })
    }

    /// Number of articles stored so far
    pub fn article_count(&self) -> i64 {
        self.store.article_count.load(Ordering::Acquire)
    }

    /// Database file in use
    pub fn path(&self) -> &Path {
        &self.store.path
    }

    /// Run `f` against the database on the blocking pool
    async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection, &DiskStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut guard = store.lock_db();
            let conn = guard.as_mut().ok_or(NntpError::StoreClosed)?;
            f(conn, store.as_ref())
        })
        .await?
    }

    fn group_snapshot(&self, group: &Group) -> Group {
        group.clone().with_count(self.article_count())
    }
}

impl DiskStore {
    // A panic mid-transaction rolls the transaction back, so a poisoned lock
    // still guards a consistent connection.
    fn lock_db(&self) -> MutexGuard<'_, Option<Connection>> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn shutdown(&self) -> Result<()> {
        let mut guard = self.lock_db();
        let Some(conn) = guard.take() else {
            return Ok(());
        };

        let count = self.article_count.load(Ordering::Acquire);
        conn.execute(UPSERT, params![ARTICLE_NUMBER_KEY, count.to_string().into_bytes()])?;

        if self.config.clean_on_close {
            conn.execute("DELETE FROM kv", [])?;
        }
        conn.close().map_err(|(_, e)| e)?;

        if self.config.clean_on_close {
            remove_db_files(&self.path)?;
            info!("Removed article store at {:?}", self.path);
        } else {
            info!("Closed article store at {:?} ({} articles)", self.path, count);
        }
        Ok(())
    }
}

fn load_counter(conn: &Connection) -> Result<i64> {
    let value: Option<Vec<u8>> = conn
        .query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![ARTICLE_NUMBER_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(raw) => std::str::from_utf8(&raw)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| NntpError::Config("stored article counter is not a number".to_string())),
    }
}

fn remove_db_files(path: &Path) -> Result<()> {
    let mut targets = vec![path.to_path_buf()];
    for suffix in ["-wal", "-shm"] {
        let mut side = path.as_os_str().to_owned();
        side.push(suffix);
        targets.push(PathBuf::from(side));
    }
    for target in targets {
        match std::fs::remove_file(&target) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

#[async_trait]
impl Backend for DiskBackend {
    async fn list_groups(&self, limit: i64) -> Result<Vec<Group>> {
        let groups = self
            .store
            .groups
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(groups
            .values()
            .take(limit)
            .map(|group| self.group_snapshot(group))
            .collect())
    }

    async fn get_group(&self, name: &str) -> Result<Group> {
        if let Err(reason) = validate_newsgroup_name(name) {
            debug!("Rejecting group name {:?}: {}", name, reason);
            return Err(NntpError::NoSuchGroup);
        }

        {
            let groups = self
                .store
                .groups
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(group) = groups.get(name) {
                return Ok(self.group_snapshot(group));
            }
        }

        let mut groups = self
            .store
            .groups
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let group = groups.entry(name.to_string()).or_insert_with(|| {
            debug!("Creating group {}", name);
            Group::new(name, GROUP_DESCRIPTION)
        });
        Ok(self.group_snapshot(group))
    }

    async fn get_article(&self, group: Option<&Group>, id: &str) -> Result<Article> {
        if group.is_some() && is_article_number(id) {
            return Err(NntpError::InvalidArticleNumber);
        }
        if validate_message_id(id).is_err() {
            return Err(NntpError::InvalidMessageId);
        }

        let key = id.to_string();
        let value: Option<Vec<u8>> = self
            .with_db(move |conn, _| {
                conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(NntpError::from)
            })
            .await?;

        let Some(value) = value else {
            return Err(NntpError::InvalidMessageId);
        };
        Ok(ArticleRecord::from_bytes(&value)?.into_article())
    }

    async fn get_articles(
        &self,
        _group: &Group,
        _from: i64,
        _to: i64,
    ) -> Result<Vec<NumberedArticle>> {
        Err(NntpError::Unsupported("OVER"))
    }

    fn authorized(&self) -> bool {
        self.store.config.credentials.is_none() || self.authenticated
    }

    async fn authenticate(&self, user: &str, pass: &str) -> Result<SharedBackend> {
        match &self.store.config.credentials {
            Some(credentials) if credentials.matches(user, pass) => {
                info!("Authenticated user {}", user);
                Ok(Arc::new(DiskBackend {
                    store: Arc::clone(&self.store),
                    authenticated: true,
                }))
            }
            _ => {
                info!("Rejected credentials for user {}", user);
                Err(NntpError::AuthRejected)
            }
        }
    }

    fn allow_post(&self) -> bool {
        self.store.config.allow_posting && self.authorized()
    }

    async fn post(&self, mut article: Article) -> Result<()> {
        if !self.allow_post() {
            return Err(NntpError::PostingNotPermitted);
        }

        let config = &self.store.config;
        if article.message_id().is_none() && article.headers.contains("Message-ID") {
            debug!("Rejecting article with a non-UTF-8 Message-ID");
            return Err(NntpError::PostingFailed);
        }
        let id = match article.message_id() {
            Some(id) => id.to_string(),
            None if config.generate_message_ids => {
                let id = format!("<{}@{}>", Uuid::new_v4().simple(), config.message_id_domain);
                article.headers.set("Message-ID", id.clone());
                id
            }
            None => {
                debug!("Rejecting article without Message-ID");
                return Err(NntpError::PostingFailed);
            }
        };
        if let Err(reason) = validate_message_id(&id) {
            debug!("Rejecting article {:?}: {}", id, reason);
            return Err(NntpError::PostingFailed);
        }

        let key = id.clone();
        let number = self
            .with_db(move |conn, store| {
                let tx = conn.transaction()?;
                let exists = tx
                    .query_row("SELECT 1 FROM kv WHERE key = ?1", params![key], |_| Ok(()))
                    .optional()?
                    .is_some();
                if exists {
                    debug!("Rejecting duplicate article {}", key);
                    return Err(NntpError::PostingFailed);
                }

                let number = store.article_count.load(Ordering::Acquire) + 1;
                let record = ArticleRecord::from_article(key.as_str(), number, &article).to_bytes()?;
                tx.execute("INSERT INTO kv (key, value) VALUES (?1, ?2)", params![key, record])?;
                tx.execute(UPSERT, params![ARTICLE_NUMBER_KEY, number.to_string().into_bytes()])?;
                tx.commit()?;

                store.article_count.store(number, Ordering::Release);
                Ok(number)
            })
            .await?;

        debug!("Stored article {} as number {}", id, number);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || store.shutdown()).await?;
        if let Err(e) = &result {
            warn!("Failed to close article store: {}", e);
        }
        result
    }
}
