//! End-to-end endpoint contract tests over real TCP.

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

mod common;
use common::{client, spawn_gateway, StubProvider, StubReply};

#[tokio::test]
async fn chat_completion_passes_short_conversation_through() {
    let mut server = spawn_gateway(29101, StubProvider::fixed("synthetic echo")).await;

    // Ten short turns; the full rendering is well under budget, so the
    // provider sees it verbatim and its reply comes back untouched.
    let messages: Vec<Value> = (0..10)
        .map(|i| {
            json!({
                "role": if i % 2 == 0 { "user" } else { "assistant" },
                "content": format!("turn {}", i)
            })
        })
        .collect();

    let response = client()
        .post("http://127.0.0.1:29101/v1/chat/completions")
        .json(&json!({"model": "apple.local:latest", "messages": messages}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["object"], "chat.completion");
    assert_eq!(body["model"], "apple.local:latest");
    assert_eq!(body["choices"][0]["message"]["content"], "synthetic echo");
    assert_eq!(body["choices"][0]["message"]["role"], "assistant");
    assert_eq!(body["choices"][0]["finish_reason"], "stop");
    assert!(body["id"].as_str().unwrap().starts_with("chatcmpl_"));

    server.stop().await;
}

#[tokio::test]
async fn text_completion_contract() {
    let mut server = spawn_gateway(29102, StubProvider::fixed("completed text")).await;

    let response = client()
        .post("http://127.0.0.1:29102/v1/completions")
        .json(&json!({"model": "apple.local:latest", "prompt": "Once upon"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["object"], "text_completion");
    assert!(body["id"].as_str().unwrap().starts_with("cmpl_"));
    assert_eq!(body["choices"][0]["text"], "completed text");
    assert!(body["choices"][0]["logprobs"].is_null());
    assert_eq!(body["choices"][0]["finish_reason"], "stop");

    server.stop().await;
}

#[tokio::test]
async fn options_preflight_on_any_path() {
    let mut server = spawn_gateway(29103, StubProvider::fixed("unused")).await;

    let response = client()
        .request(
            reqwest::Method::OPTIONS,
            "http://127.0.0.1:29103/v1/chat/completions",
        )
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 204);
    let headers = response.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "POST, OPTIONS"
    );
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "Content-Type, Authorization"
    );
    assert_eq!(headers.get("access-control-max-age").unwrap(), "600");

    server.stop().await;
}

#[tokio::test]
async fn unknown_path_is_plain_404() {
    let mut server = spawn_gateway(29104, StubProvider::fixed("unused")).await;

    let response = client()
        .get("http://127.0.0.1:29104/nope")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), "Not Found");

    server.stop().await;
}

#[tokio::test]
async fn model_catalog_endpoints() {
    let mut server = spawn_gateway(29105, StubProvider::fixed("unused")).await;
    let client = client();

    let list: Value = client
        .get("http://127.0.0.1:29105/v1/models")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["object"], "list");
    assert_eq!(list["data"][0]["id"], "apple.local:latest");
    assert_eq!(list["data"][0]["object"], "model");

    let found = client
        .get("http://127.0.0.1:29105/v1/models/apple.local:latest")
        .send()
        .await
        .unwrap();
    assert_eq!(found.status(), 200);

    let missing = client
        .get("http://127.0.0.1:29105/v1/models/unknown")
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);

    let tags: Value = client
        .get("http://127.0.0.1:29105/api/tags")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tags["models"][0]["name"], "apple.local:latest");
    assert!(tags["models"][0]["details"]["family"].is_string());
    assert!(tags["models"][0]["digest"].is_string());

    server.stop().await;
}

#[tokio::test]
async fn ollama_chat_contract() {
    let mut server = spawn_gateway(29106, StubProvider::fixed("local answer")).await;

    let response = client()
        .post("http://127.0.0.1:29106/api/chat")
        .json(&json!({
            "model": "apple.local:latest",
            "messages": [{"role": "user", "content": "hi"}],
            "options": {"temperature": 0.2, "num_predict": 128}
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["model"], "apple.local:latest");
    assert_eq!(body["done"], true);
    assert_eq!(body["message"]["role"], "assistant");
    assert_eq!(body["message"]["content"], "local answer");
    assert!(body["created_at"].as_str().unwrap().contains('T'));
    assert!(body["total_duration"].is_u64());

    server.stop().await;
}

#[tokio::test]
async fn invalid_json_body_yields_error_envelope() {
    let mut server = spawn_gateway(29107, StubProvider::fixed("unused")).await;

    let response = client()
        .post("http://127.0.0.1:29107/v1/chat/completions")
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]["message"].as_str().unwrap().len() > 0);

    server.stop().await;
}

#[tokio::test]
async fn provider_unavailable_surfaces_in_error_message() {
    let mut server = spawn_gateway(29108, StubProvider::unavailable()).await;

    let response = client()
        .post("http://127.0.0.1:29108/v1/chat/completions")
        .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("unavailable"));

    server.stop().await;
}

#[tokio::test]
async fn streamed_chat_buffers_all_segments() {
    // Script: compact summary, then a long segment and a short closer.
    let provider = StubProvider::scripted(vec![
        StubReply::Reply("compact".to_string()),
        StubReply::Reply("A".repeat(1000)),
        StubReply::Reply("B".repeat(50)),
    ]);
    let mut server = spawn_gateway(29109, provider).await;

    let response = client()
        .post("http://127.0.0.1:29109/v1/chat/completions")
        .json(&json!({
            "messages": [{"role": "user", "content": "write at length"}],
            "stream": true
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let content = body["choices"][0]["message"]["content"].as_str().unwrap();
    assert_eq!(content.len(), 1050);
    assert!(content.starts_with(&"A".repeat(1000)));
    assert!(content.ends_with(&"B".repeat(50)));

    server.stop().await;
}

#[tokio::test]
async fn streamed_interruption_keeps_emitted_segments_with_notice() {
    let provider = StubProvider::scripted(vec![
        StubReply::Reply("compact".to_string()),
        StubReply::Reply("C".repeat(1000)),
        StubReply::Fail("engine crashed".to_string()),
    ]);
    let mut server = spawn_gateway(29112, provider).await;

    let response = client()
        .post("http://127.0.0.1:29112/v1/chat/completions")
        .json(&json!({
            "messages": [{"role": "user", "content": "write at length"}],
            "stream": true
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let content = body["choices"][0]["message"]["content"].as_str().unwrap();
    assert!(content.starts_with(&"C".repeat(1000)));
    assert!(content.contains("[generation interrupted:"));

    server.stop().await;
}

#[tokio::test]
async fn truncated_body_yields_400_not_truncated_ok() {
    let mut server = spawn_gateway(29110, StubProvider::fixed("unused")).await;

    let mut stream = TcpStream::connect("127.0.0.1:29110").await.unwrap();
    stream
        .write_all(
            b"POST /v1/chat/completions HTTP/1.1\r\nContent-Length: 500\r\n\r\n{\"partial\":",
        )
        .await
        .unwrap();
    // Close our write half; the declared body never arrives.
    stream.shutdown().await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8_lossy(&raw);
    assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(text.contains("Bad Request"));

    server.stop().await;
}

#[tokio::test]
async fn missing_content_length_uses_buffered_trailing_bytes() {
    let mut server = spawn_gateway(29111, StubProvider::fixed("framed ok")).await;

    // Head and body in a single write so they arrive together; without
    // Content-Length the trailing bytes become the body.
    let message = b"POST /v1/chat/completions HTTP/1.1\r\nHost: localhost\r\n\r\n{\"messages\": [{\"role\": \"user\", \"content\": \"hi\"}]}";
    let mut stream = TcpStream::connect("127.0.0.1:29111").await.unwrap();
    stream.write_all(message).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8_lossy(&raw);
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.contains("framed ok"));

    server.stop().await;
}
