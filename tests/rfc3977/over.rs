//! RFC 3977 Section 8.3 - OVER / XOVER
//!
//! The disk store has no per-group numbering and answers 503; a backend that
//! numbers its articles gets tab-separated overview lines.

use std::sync::Arc;

use async_trait::async_trait;
use nntp_mock::{
    Article, Backend, Group, Headers, NntpError, NumberedArticle, Result, SharedBackend,
};

use crate::support::TestServer;

/// Read-only backend with a fixed, numbered article list
struct NumberedBackend {
    articles: Vec<NumberedArticle>,
}

impl NumberedBackend {
    fn new() -> Self {
        let articles = (1..=3)
            .map(|n| {
                let headers: Headers = [
                    ("Subject", format!("Article {}", n)),
                    ("From", "poster@example.com".to_string()),
                    ("Date", "Mon, 20 Jan 2025 12:00:00 +0000".to_string()),
                    ("Message-ID", format!("<{}@numbered>", n)),
                ]
                .into_iter()
                .collect();
                let mut article = Article::from_body_lines(headers, &["line one", "line two"]);
                article.number = n;
                NumberedArticle { number: n, article }
            })
            .collect();
        Self { articles }
    }
}

#[async_trait]
impl Backend for NumberedBackend {
    async fn list_groups(&self, _limit: i64) -> Result<Vec<Group>> {
        Ok(vec![Group::new("numbered", "").with_count(3)])
    }

    async fn get_group(&self, name: &str) -> Result<Group> {
        if name == "numbered" {
            Ok(Group::new(name, "").with_count(3))
        } else {
            Err(NntpError::NoSuchGroup)
        }
    }

    async fn get_article(&self, _group: Option<&Group>, id: &str) -> Result<Article> {
        self.articles
            .iter()
            .find(|a| a.article.message_id() == Some(id))
            .map(|a| a.article.clone())
            .ok_or(NntpError::InvalidMessageId)
    }

    async fn get_articles(
        &self,
        _group: &Group,
        from: i64,
        to: i64,
    ) -> Result<Vec<NumberedArticle>> {
        Ok(self
            .articles
            .iter()
            .filter(|a| a.number >= from && a.number <= to)
            .cloned()
            .collect())
    }

    fn authorized(&self) -> bool {
        true
    }

    async fn authenticate(&self, _user: &str, _pass: &str) -> Result<SharedBackend> {
        Err(NntpError::AuthRejected)
    }

    fn allow_post(&self) -> bool {
        false
    }

    async fn post(&self, _article: Article) -> Result<()> {
        Err(NntpError::PostingNotPermitted)
    }
}

async fn numbered_server() -> TestServer {
    TestServer::with_backend(Arc::new(NumberedBackend::new())).await
}

#[tokio::test]
async fn test_over_disk_backend_unsupported() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.command("GROUP test").await;
    assert_eq!(client.command("OVER 1-10").await, "503 OVER not supported");
    assert_eq!(client.command("XOVER").await, "503 OVER not supported");
    // Connection survives
    assert_eq!(client.command("GROUP test").await, "211 0 1 0 test");
}

#[tokio::test]
async fn test_over_requires_group() {
    let server = numbered_server().await;
    let mut client = server.connect().await;
    assert_eq!(client.command("OVER").await, "412 No newsgroup selected");
}

#[tokio::test]
async fn test_over_all() {
    let server = numbered_server().await;
    let mut client = server.connect().await;

    assert_eq!(client.command("GROUP numbered").await, "211 3 1 3 numbered");
    assert_eq!(
        client.command("OVER").await,
        "224 Overview information follows"
    );
    let lines = client.block().await;
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "1\tArticle 1\tposter@example.com\tMon, 20 Jan 2025 12:00:00 +0000\t<1@numbered>\t\t20\t2"
    );
}

#[tokio::test]
async fn test_xover_range() {
    let server = numbered_server().await;
    let mut client = server.connect().await;

    client.command("GROUP numbered").await;
    assert_eq!(
        client.command("XOVER 2-3").await,
        "224 Overview information follows"
    );
    let numbers: Vec<String> = client
        .block()
        .await
        .iter()
        .map(|line| line.split('\t').next().unwrap().to_string())
        .collect();
    assert_eq!(numbers, vec!["2", "3"]);

    client.command("XOVER 2").await;
    assert_eq!(client.block().await.len(), 2);

    client.command("XOVER 3-").await;
    assert_eq!(client.block().await.len(), 1);
}

#[tokio::test]
async fn test_numbered_backend_article_lookup() {
    let server = numbered_server().await;
    let mut client = server.connect().await;

    client.command("GROUP numbered").await;
    assert_eq!(client.command("STAT <2@numbered>").await, "223 2 <2@numbered>");
    assert_eq!(client.command("POST").await, "440 Posting not permitted");
}
