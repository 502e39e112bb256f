//! RFC 3977 Section 6.3.2 - IHAVE

use crate::support::{TestServer, article};

#[tokio::test]
async fn test_ihave_transfer() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.command("IHAVE <t@x>").await, "335 send it");
    client.send_article(&article("<t@x>", &["payload"])).await;
    assert_eq!(client.line().await, "235 article transferred OK");

    client.command("GROUP test").await;
    assert_eq!(client.command("STAT <t@x>").await, "223 1 <t@x>");
}

#[tokio::test]
async fn test_ihave_already_present() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.post(&article("<have@x>", &["x"])).await;
    assert_eq!(client.command("IHAVE <have@x>").await, "435 Article not wanted");
}

#[tokio::test]
async fn test_ihave_uses_offered_id() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.command("IHAVE <offered@x>").await, "335 send it");
    client.send_article(&["Subject: no id", "", "body"]).await;
    assert_eq!(client.line().await, "235 article transferred OK");

    let stored = server.backend.get_article(None, "<offered@x>").await.unwrap();
    assert_eq!(stored.message_id(), Some("<offered@x>"));
}

#[tokio::test]
async fn test_ihave_without_id() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    assert_eq!(
        client.command("IHAVE").await,
        "501 not supported, or syntax error"
    );
}

#[tokio::test]
async fn test_ihave_read_only() {
    let server = TestServer::with_config(|c| c.with_posting(false)).await;
    let mut client = server.connect().await;
    assert_eq!(client.command("IHAVE <t@x>").await, "435 Article not wanted");
}
