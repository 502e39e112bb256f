//! RFC 3977 Section 5.3 - MODE READER

use crate::support::TestServer;

#[tokio::test]
async fn test_mode_reader_posting_allowed() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    assert_eq!(client.command("MODE READER").await, "200 Posting allowed");
}

#[tokio::test]
async fn test_mode_reader_read_only() {
    let server = TestServer::with_config(|c| c.with_posting(false)).await;
    let mut client = server.connect().await;
    assert_eq!(client.command("mode reader").await, "201 Posting prohibited");
}
