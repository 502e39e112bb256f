//! RFC 3977 Section 7.3 - NEWGROUPS

use crate::support::TestServer;

#[tokio::test]
async fn test_newgroups_always_empty() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.command("GROUP alt.created").await;
    assert_eq!(
        client.command("NEWGROUPS 20240101 000000 GMT").await,
        "231 list of new newsgroups follows"
    );
    assert!(client.block().await.is_empty());
}
