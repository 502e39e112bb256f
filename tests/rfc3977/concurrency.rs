//! Independent sessions posting at the same time

use crate::support::{TestServer, article};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_posts_counted_exactly() {
    const CLIENTS: usize = 8;
    const PER_CLIENT: usize = 10;

    let server = TestServer::start().await;

    let mut tasks = Vec::new();
    for c in 0..CLIENTS {
        let mut client = server.connect().await;
        tasks.push(tokio::spawn(async move {
            for i in 0..PER_CLIENT {
                let id = format!("<{}.{}@concurrent>", c, i);
                assert_eq!(
                    client.post(&article(&id, &["body"])).await,
                    "240 article received OK"
                );
            }
            client.command("QUIT").await
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), "205 bye");
    }

    let total = CLIENTS * PER_CLIENT;
    let mut client = server.connect().await;
    assert_eq!(
        client.command("GROUP test").await,
        format!("211 {} 1 {} test", total, total)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_id_posted_concurrently_stored_once() {
    let server = TestServer::start().await;

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let mut client = server.connect().await;
        tasks.push(tokio::spawn(async move {
            client.post(&article("<race@x>", &["body"])).await
        }));
    }
    let mut accepted = 0;
    for task in tasks {
        let status = task.await.unwrap();
        if status.starts_with("240") {
            accepted += 1;
        } else {
            assert_eq!(status, "441 posting failed");
        }
    }
    assert_eq!(accepted, 1);

    let mut client = server.connect().await;
    assert_eq!(client.command("GROUP test").await, "211 1 1 1 test");
}
