use serde_json::json;
use std::collections::BTreeMap;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use apilens::config::{CompletionConfig, Config, SessionConfig, SourceConfig};
use apilens::ContextMode;

#[allow(dead_code)]
pub const API_KEY: &str = "gsk_test_key";

#[allow(dead_code)]
pub const DATA_PATH: &str = "/status";

#[allow(dead_code)]
pub const COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";

/// Config pointing both remotes at the given mock server
#[allow(dead_code)]
pub fn config_for(server: &MockServer, mode: ContextMode) -> Config {
    Config {
        completion: CompletionConfig {
            api_key: Some(API_KEY.to_string()),
            endpoint: format!("{}{}", server.uri(), COMPLETIONS_PATH),
            ..Default::default()
        },
        source: SourceConfig {
            url: Some(format!("{}{}", server.uri(), DATA_PATH)),
            headers: BTreeMap::new(),
            ..Default::default()
        },
        session: SessionConfig { mode },
    }
}

/// Success envelope with a single answer
#[allow(dead_code)]
pub fn completion_body(answer: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": answer },
            "finish_reason": "stop"
        }]
    })
}

/// Mount a JSON data source answering `body`
#[allow(dead_code)]
pub async fn mount_json_source(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(server)
        .await;
}

/// Mount a completion endpoint answering `answer` to authorized requests
#[allow(dead_code)]
pub async fn mount_completion(server: &MockServer, answer: &str) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", format!("Bearer {}", API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(answer)))
        .mount(server)
        .await;
}

/// Decode the JSON bodies of every request the server received on `route`
#[allow(dead_code)]
pub async fn json_bodies(server: &MockServer, route: &str) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .into_iter()
        .filter(|r| r.url.path() == route)
        .map(|r| serde_json::from_slice(&r.body).expect("request body is JSON"))
        .collect()
}

/// Serve one response whose body is cut short of its `Content-Length`
///
/// Returns the base URL. The connection is half-closed after the partial
/// body, so reading the body fails while the status line arrives intact.
#[allow(dead_code)]
pub async fn spawn_truncated_server(status_line: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: text/plain\r\ncontent-length: 100\r\n\r\npartial",
            status_line
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;

        // Drain the request so closing does not reset the connection
        let mut buf = [0u8; 1024];
        while let Ok(n) = socket.read(&mut buf).await {
            if n == 0 {
                break;
            }
        }
    });

    format!("http://{}", addr)
}

/// Port with nothing listening on it
#[allow(dead_code)]
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
