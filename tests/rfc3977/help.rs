//! RFC 3977 Sections 7.1 and 7.2 - DATE and HELP

use crate::support::TestServer;

#[tokio::test]
async fn test_help() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.command("HELP").await, "100 Legal commands");
    let verbs: Vec<String> = client
        .block()
        .await
        .into_iter()
        .map(|line| line.trim().to_string())
        .collect();
    for verb in ["ARTICLE", "AUTHINFO", "GROUP", "POST", "QUIT", "XOVER"] {
        assert!(verbs.contains(&verb.to_string()), "{} missing from HELP", verb);
    }
}

#[tokio::test]
async fn test_date() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let reply = client.command("DATE").await;
    let stamp = reply.strip_prefix("111 ").expect("111 response");
    assert_eq!(stamp.len(), 14);
    assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    assert!(stamp.starts_with("20"));
}
