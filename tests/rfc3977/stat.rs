//! RFC 3977 Section 6.2.4 - STAT

use crate::support::{TestServer, article};

#[tokio::test]
async fn test_stat_existing() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.post(&article("<one@x>", &["a"])).await;
    client.post(&article("<two@x>", &["b"])).await;
    client.command("GROUP test").await;

    assert_eq!(client.command("STAT <one@x>").await, "223 1 <one@x>");
    assert_eq!(client.command("STAT <two@x>").await, "223 2 <two@x>");
}

#[tokio::test]
async fn test_stat_errors() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.command("STAT <one@x>").await, "412 No newsgroup selected");
    client.command("GROUP test").await;
    assert_eq!(
        client.command("STAT").await,
        "420 Current article number is invalid"
    );
    assert_eq!(client.command("STAT 5").await, "423 No article with that number");
    assert_eq!(
        client.command("STAT <none@x>").await,
        "430 No article with that message-id"
    );
}
