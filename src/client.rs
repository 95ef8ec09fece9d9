use reqwest::Client;
use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use std::time::Duration;

use crate::status::StatusSnapshot;

#[derive(Serialize)]
struct ChatRequest {
    text: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

/// HTTP client for the two empath service endpoints (`/status` and `/chat`),
/// plus the address of the passive video feed.
#[derive(Clone)]
pub struct EmpathClient {
    client: Client,
    base_url: String,
}

impl EmpathClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Same endpoints, but every request gives up after `timeout`. Used so a
    /// stalled service cannot pin the poller or the chat round-trip forever.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn status(&self) -> Result<StatusSnapshot> {
        let url = format!("{}/status", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("Status request failed with status: {}", response.status()));
        }

        let snapshot: StatusSnapshot = response.json().await?;
        Ok(snapshot)
    }

    pub async fn chat(&self, text: &str) -> Result<String> {
        let url = format!("{}/chat", self.base_url);

        let request = ChatRequest {
            text: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Chat request failed with status: {}", response.status()));
        }

        let chat_response: ChatResponse = response.json().await?;
        Ok(chat_response.response)
    }

    /// Address of the MJPEG feed. The dashboard never consumes the stream
    /// itself; it only hands this reference to whatever renders it.
    pub fn video_feed_url(&self) -> String {
        format!("{}/video_feed", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a loopback port.
    async fn serve_once(status_line: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response.as_bytes()).await;
        });
        format!("http://{}", addr)
    }

    /// Bind a port, then drop the listener so connections are refused.
    async fn dead_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_status_decodes_snapshot() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"emotion":"happy","brain_online":true,"mode":"COMPANION","connected":true}"#,
        )
        .await;
        let client = EmpathClient::new(&base);

        let snapshot = client.status().await.unwrap();
        assert_eq!(snapshot.emotion.as_deref(), Some("happy"));
        assert!(snapshot.brain_online);
        assert_eq!(snapshot.mode.as_deref(), Some("COMPANION"));
        assert_eq!(snapshot.connected, Some(true));
    }

    #[tokio::test]
    async fn test_status_tolerates_partial_body() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"brain_online":false}"#).await;
        let client = EmpathClient::new(&base);

        let snapshot = client.status().await.unwrap();
        assert!(snapshot.emotion.is_none());
        assert!(!snapshot.brain_online);
    }

    #[tokio::test]
    async fn test_status_non_success_is_error() {
        let base = serve_once("HTTP/1.1 500 Internal Server Error", "{}").await;
        let client = EmpathClient::new(&base);

        assert!(client.status().await.is_err());
    }

    #[tokio::test]
    async fn test_chat_returns_response_text() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"response":"Hi"}"#).await;
        let client = EmpathClient::new(&base);

        let reply = client.chat("hello").await.unwrap();
        assert_eq!(reply, "Hi");
    }

    #[tokio::test]
    async fn test_chat_connection_refused_is_error() {
        let base = dead_endpoint().await;
        let client = EmpathClient::new(&base);

        assert!(client.chat("hello").await.is_err());
    }

    #[tokio::test]
    async fn test_chat_malformed_body_is_error() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"unexpected":42}"#).await;
        let client = EmpathClient::new(&base);

        assert!(client.chat("hello").await.is_err());
    }

    #[test]
    fn test_video_feed_url() {
        let client = EmpathClient::new("http://localhost:8080/");
        assert_eq!(client.video_feed_url(), "http://localhost:8080/video_feed");
    }
}
