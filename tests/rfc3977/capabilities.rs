//! RFC 3977 Section 5.2 - CAPABILITIES

use nntp_mock::Credentials;

use crate::support::TestServer;

#[tokio::test]
async fn test_capabilities_default() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.command("CAPABILITIES").await, "101 Capability list:");
    assert_eq!(
        client.block().await,
        vec![
            "VERSION 2",
            "READER",
            "POST",
            "IHAVE",
            "OVER",
            "XOVER",
            "LIST ACTIVE NEWSGROUPS OVERVIEW.FMT",
            "NEWGROUPS",
            "DATE",
            "HELP",
        ]
    );
}

#[tokio::test]
async fn test_capabilities_read_only() {
    let server = TestServer::with_config(|c| c.with_posting(false)).await;
    let mut client = server.connect().await;

    client.command("CAPABILITIES").await;
    let caps = client.block().await;
    assert!(!caps.contains(&"POST".to_string()));
    assert!(!caps.contains(&"IHAVE".to_string()));
    assert!(caps.contains(&"READER".to_string()));
}

#[tokio::test]
async fn test_capabilities_change_after_auth() {
    let server =
        TestServer::with_config(|c| c.with_credentials(Credentials::new("user", "pass"))).await;
    let mut client = server.connect().await;

    client.command("CAPABILITIES").await;
    let before = client.block().await;
    assert!(before.contains(&"AUTHINFO USER".to_string()));
    assert!(!before.contains(&"POST".to_string()));

    assert_eq!(client.command("AUTHINFO USER user").await, "350 Continue");
    assert_eq!(client.command("AUTHINFO PASS pass").await, "250 authenticated");

    client.command("CAPABILITIES").await;
    let after = client.block().await;
    assert!(!after.contains(&"AUTHINFO USER".to_string()));
    assert!(after.contains(&"POST".to_string()));
}
