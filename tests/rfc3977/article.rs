//! RFC 3977 Sections 6.2.1-6.2.3 - ARTICLE, HEAD, BODY
//!
//! Articles are looked up by message-id and require a selected group.

use crate::support::{TestServer, article};

async fn server_with_article() -> (TestServer, crate::support::Client) {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    let lines = article("<art@x>", &["first line", ".starts with dot", "", "last"]);
    assert_eq!(client.post(&lines).await, "240 article received OK");
    assert_eq!(client.command("GROUP test").await, "211 1 1 1 test");
    (server, client)
}

#[tokio::test]
async fn test_article_full() {
    let (_server, mut client) = server_with_article().await;

    assert_eq!(client.command("ARTICLE <art@x>").await, "220 1 <art@x>");
    assert_eq!(
        client.block().await,
        vec![
            "Message-ID: <art@x>",
            "Subject: test article",
            "From: tester@example.com",
            "",
            "first line",
            ".starts with dot",
            "",
            "last",
        ]
    );
}

#[tokio::test]
async fn test_head() {
    let (_server, mut client) = server_with_article().await;

    assert_eq!(client.command("HEAD <art@x>").await, "221 1 <art@x>");
    assert_eq!(
        client.block().await,
        vec![
            "Message-ID: <art@x>",
            "Subject: test article",
            "From: tester@example.com",
        ]
    );
}

#[tokio::test]
async fn test_body_is_dot_stuffed_on_the_wire() {
    let (_server, mut client) = server_with_article().await;

    client.send("BODY <art@x>").await;
    assert_eq!(client.line().await, "222 1 <art@x>");
    assert_eq!(client.line().await, "first line");
    // Raw wire line keeps the stuffing
    assert_eq!(client.line().await, "..starts with dot");
    assert_eq!(client.line().await, "");
    assert_eq!(client.line().await, "last");
    assert_eq!(client.line().await, ".");
}

#[tokio::test]
async fn test_requires_group() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    for verb in ["ARTICLE", "HEAD", "BODY"] {
        assert_eq!(
            client.command(&format!("{} <art@x>", verb)).await,
            "412 No newsgroup selected"
        );
    }
}

#[tokio::test]
async fn test_requires_argument() {
    let (_server, mut client) = server_with_article().await;
    assert_eq!(
        client.command("ARTICLE").await,
        "420 Current article number is invalid"
    );
}

#[tokio::test]
async fn test_numeric_lookup_rejected() {
    let (_server, mut client) = server_with_article().await;
    assert_eq!(client.command("HEAD 1").await, "423 No article with that number");
}

#[tokio::test]
async fn test_unknown_message_id() {
    let (_server, mut client) = server_with_article().await;
    assert_eq!(
        client.command("BODY <missing@x>").await,
        "430 No article with that message-id"
    );
}

#[tokio::test]
async fn test_binary_safe_body() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.command("POST").await, "340 Go ahead");
    client
        .send_raw(b"Message-ID: <bin@x>\r\n\r\ncaf\xc3\xa9 \xe2\x82\xac\r\n.\r\n")
        .await;
    assert_eq!(client.line().await, "240 article received OK");

    client.command("GROUP test").await;
    assert_eq!(client.command("BODY <bin@x>").await, "222 1 <bin@x>");
    assert_eq!(client.block().await, vec!["café €"]);
}
