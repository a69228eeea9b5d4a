//! Integration tests for `OpenAiNarrator` and `narrate_best_effort`.
//!
//! Uses a raw TCP test server to simulate the chat-completions endpoint:
//! success, retryable and permanent errors, malformed bodies, and a server
//! that never answers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use gitsafe_narrator::{OpenAiNarrator, RetryConfig, narrate_best_effort};
use gitsafe_types::{NarrationError, Narrator};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        body.len(),
        body
    )
}

fn http_200(content: &str) -> String {
    let body = serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string();
    http_response("200 OK", &body)
}

fn http_500() -> String {
    http_response("500 Internal Server Error", r#"{"error":{"message":"internal error"}}"#)
}

fn http_401() -> String {
    http_response("401 Unauthorized", r#"{"error":{"message":"invalid api key"}}"#)
}

/// Start a test TCP server that returns pre-configured responses, one per
/// incoming connection. Connections past the end of `responses` are held
/// open without an answer.
async fn start_test_server(responses: Vec<String>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = Arc::clone(&counter);

    tokio::spawn(async move {
        let responses = Arc::new(responses);
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let idx = counter_clone.fetch_add(1, Ordering::SeqCst);
            let responses = Arc::clone(&responses);

            tokio::spawn(async move {
                let mut buf = vec![0u8; 16384];
                let _ = socket.read(&mut buf).await;

                match responses.get(idx) {
                    Some(response) => {
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.flush().await;
                        let _ = socket.shutdown().await;
                    }
                    None => tokio::time::sleep(Duration::from_secs(3600)).await,
                }
            });
        }
    });

    (format!("http://{addr}"), counter)
}

fn make_narrator(base_url: &str) -> OpenAiNarrator {
    OpenAiNarrator::new("test-key", base_url, "gpt-4o", 150)
        .unwrap()
        .with_retry_config(RetryConfig {
            max_retries: 1,
            initial_delay_ms: 10,
            max_delay_ms: 50,
            backoff_factor: 2.0,
        })
}

#[tokio::test]
async fn test_explain_success() {
    let (base_url, counter) =
        start_test_server(vec![http_200("  Pushing to main skips review.  ")]).await;

    let text = make_narrator(&base_url)
        .explain("Developer tried to push directly to main")
        .await
        .unwrap();

    assert_eq!(text, "Pushing to main skips review.");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retry_on_500_then_success() {
    let (base_url, counter) = start_test_server(vec![http_500(), http_200("ok")]).await;

    let text = make_narrator(&base_url).explain("x").await.unwrap();

    assert_eq!(text, "ok");
    assert_eq!(counter.load(Ordering::SeqCst), 2, "should have made 2 requests");
}

#[tokio::test]
async fn test_retry_exhausted() {
    let (base_url, counter) = start_test_server(vec![http_500(), http_500()]).await;

    let err = make_narrator(&base_url).explain("x").await.unwrap_err();

    assert!(matches!(err, NarrationError::Server { status: 500, .. }), "{err:?}");
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_no_retry_on_401() {
    let (base_url, counter) = start_test_server(vec![http_401(), http_200("unreached")]).await;

    let err = make_narrator(&base_url).explain("x").await.unwrap_err();

    assert!(matches!(err, NarrationError::Auth { .. }), "{err:?}");
    assert_eq!(counter.load(Ordering::SeqCst), 1, "401 must not be retried");
}

#[tokio::test]
async fn test_malformed_body() {
    let (base_url, _) =
        start_test_server(vec![http_response("200 OK", "this is not json")]).await;

    let err = make_narrator(&base_url).explain("x").await.unwrap_err();
    assert!(matches!(err, NarrationError::Malformed(_)), "{err:?}");
}

#[tokio::test]
async fn test_empty_choices_is_malformed() {
    let (base_url, _) =
        start_test_server(vec![http_response("200 OK", r#"{"choices":[]}"#)]).await;

    let err = make_narrator(&base_url).explain("x").await.unwrap_err();
    assert!(matches!(err, NarrationError::Malformed(_)), "{err:?}");
}

#[tokio::test]
async fn test_best_effort_returns_text() {
    let (base_url, _) = start_test_server(vec![http_200("Because review matters.")]).await;
    let narrator = make_narrator(&base_url);

    let text = narrate_best_effort(&narrator, "x", Duration::from_secs(10)).await;
    assert_eq!(text.as_deref(), Some("Because review matters."));
}

#[tokio::test]
async fn test_best_effort_times_out_on_silent_server() {
    let (base_url, counter) = start_test_server(Vec::new()).await;
    let narrator = make_narrator(&base_url);

    let started = Instant::now();
    let text = narrate_best_effort(&narrator, "x", Duration::from_millis(300)).await;

    assert_eq!(text, None);
    assert!(started.elapsed() < Duration::from_secs(5), "timeout not enforced");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_best_effort_swallows_connection_refused() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let narrator = make_narrator(&format!("http://{addr}"));
    let text = narrate_best_effort(&narrator, "x", Duration::from_secs(5)).await;
    assert_eq!(text, None);
}
