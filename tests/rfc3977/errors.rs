//! RFC 3977 Section 3.2.1 - Generic error responses and connection handling

use crate::support::{Client, TestServer};

#[tokio::test]
async fn test_unknown_command() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.command("XYZZY").await, "500 Unknown command");
    // Session is still usable
    assert_eq!(client.command("GROUP test").await, "211 0 1 0 test");
}

#[tokio::test]
async fn test_empty_line_is_unknown() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    assert_eq!(client.command("").await, "500 Unknown command");
}

#[tokio::test]
async fn test_quit() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.command("QUIT").await, "205 bye");
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn test_overlong_line_drops_connection() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let long = "A".repeat(70 * 1024);
    client.send(&long).await;
    assert!(client.is_closed().await);

    // Other clients are unaffected
    let mut other = server.connect().await;
    assert_eq!(other.command("GROUP test").await, "211 0 1 0 test");
}

#[tokio::test]
async fn test_bare_lf_accepted() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;
    assert_eq!(client.line().await, "200 Hello!");

    client.send_raw(b"GROUP test\n").await;
    assert_eq!(client.line().await, "211 0 1 0 test");
}

#[tokio::test]
async fn test_pipelined_commands() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send_raw(b"GROUP test\r\nSTAT <a@b>\r\nQUIT\r\n").await;
    assert_eq!(client.line().await, "211 0 1 0 test");
    assert_eq!(client.line().await, "430 No article with that message-id");
    assert_eq!(client.line().await, "205 bye");
    assert!(client.is_closed().await);
}
