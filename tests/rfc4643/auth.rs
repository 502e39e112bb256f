//! RFC 4643 Section 2.3 - AUTHINFO USER/PASS
//!
//! A successful exchange swaps the session onto an authenticated backend
//! handle; posting is only allowed afterwards.

use nntp_mock::Credentials;

use crate::support::{TestServer, article};

async fn guarded_server() -> TestServer {
    TestServer::with_config(|c| c.with_credentials(Credentials::new("alice", "s3cret pass"))).await
}

#[tokio::test]
async fn test_posting_requires_auth() {
    let server = guarded_server().await;
    let mut client = server.connect().await;

    assert_eq!(client.command("MODE READER").await, "201 Posting prohibited");
    assert_eq!(client.command("POST").await, "440 Posting not permitted");
}

#[tokio::test]
async fn test_auth_success_enables_posting() {
    let server = guarded_server().await;
    let mut client = server.connect().await;

    assert_eq!(client.command("AUTHINFO USER alice").await, "350 Continue");
    // Password may contain spaces
    assert_eq!(
        client.command("AUTHINFO PASS s3cret pass").await,
        "250 authenticated"
    );
    assert_eq!(client.command("MODE READER").await, "200 Posting allowed");
    assert_eq!(
        client.post(&article("<auth@x>", &["x"])).await,
        "240 article received OK"
    );

    // Already authorized: no second round trip
    assert_eq!(client.command("AUTHINFO USER alice").await, "250 authenticated");
}

#[tokio::test]
async fn test_auth_rejected() {
    let server = guarded_server().await;
    let mut client = server.connect().await;

    assert_eq!(client.command("AUTHINFO USER alice").await, "350 Continue");
    assert_eq!(
        client.command("AUTHINFO PASS wrong").await,
        "452 authorization rejected"
    );
    assert_eq!(client.command("POST").await, "440 Posting not permitted");

    // A second attempt on the same connection can still succeed
    client.command("AUTHINFO USER alice").await;
    assert_eq!(
        client.command("AUTHINFO PASS s3cret pass").await,
        "250 authenticated"
    );
    assert_eq!(client.command("POST").await, "340 Go ahead");
}

#[tokio::test]
async fn test_auth_is_per_connection() {
    let server = guarded_server().await;
    let mut first = server.connect().await;
    let mut second = server.connect().await;

    first.command("AUTHINFO USER alice").await;
    assert_eq!(first.command("AUTHINFO PASS s3cret pass").await, "250 authenticated");

    assert_eq!(second.command("POST").await, "440 Posting not permitted");
}

#[tokio::test]
async fn test_auth_syntax_errors() {
    let server = guarded_server().await;
    let mut client = server.connect().await;

    let syntax = "501 not supported, or syntax error";
    assert_eq!(client.command("AUTHINFO").await, syntax);
    assert_eq!(client.command("AUTHINFO USER").await, syntax);
    assert_eq!(client.command("AUTHINFO SASL PLAIN").await, syntax);

    assert_eq!(client.command("AUTHINFO USER alice").await, "350 Continue");
    assert_eq!(client.command("GROUP test").await, syntax);
    // Session continues
    assert_eq!(client.command("GROUP test").await, "211 0 1 0 test");
}

#[tokio::test]
async fn test_auth_without_credentials_configured() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    assert_eq!(client.command("AUTHINFO USER anyone").await, "250 authenticated");
}

#[tokio::test]
async fn test_wrong_user_rejected() {
    let server = guarded_server().await;
    let mut client = server.connect().await;

    client.command("AUTHINFO USER mallory").await;
    assert_eq!(
        client.command("AUTHINFO PASS s3cret pass").await,
        "452 authorization rejected"
    );
}
