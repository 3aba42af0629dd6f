//! Analysis service HTTP client.
//!
//! Requests the comment analysis for a video from the analysis service's
//! `GET /analyze?videoId=...` endpoint.

use crate::config::ServiceConfig;
use crate::models::AnalysisResult;
use crate::service::payload::{parse_payload, PayloadError};
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while fetching an analysis.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Cannot connect to analysis service at {0}. Is it running?")]
    Connect(String),

    #[error("Analysis service error {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    /// The service answered, but with an error message instead of data.
    #[error("{0}")]
    Service(String),

    #[error("Failed to send request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Failed to parse analysis response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// FastAPI-style error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Client for the analysis service.
pub struct AnalysisClient {
    http_client: reqwest::Client,
    base_url: String,
    timeout_seconds: u64,
}

impl AnalysisClient {
    /// Create a client from service settings.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the analysis for one video.
    pub async fn analyze(&self, video_id: &str) -> Result<AnalysisResult, FetchError> {
        let url = format!("{}/analyze", self.base_url);
        info!("Requesting analysis for video {}", video_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("videoId", video_id)])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;
        debug!("Analysis service answered {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                detail: error_detail(&body),
            });
        }

        parse_payload(&body).map_err(|e| match e {
            PayloadError::Service(message) => FetchError::Service(message),
            PayloadError::Json(err) => FetchError::Decode(err),
        })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout_seconds)
        } else if err.is_connect() {
            FetchError::Connect(self.base_url.clone())
        } else {
            FetchError::Request(err)
        }
    }
}

/// Prefer the `detail` field of a JSON error body, else the raw body.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.detail,
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response and hand back the request head.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    fn client_for(api_url: String, timeout_seconds: u64) -> AnalysisClient {
        AnalysisClient::new(&ServiceConfig {
            api_url,
            timeout_seconds,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"comments": ["so good", "too long"], "sentiment": ["positive", "negative"], "keywords": [["good"], ["long"]]}"#,
        )
        .await;

        let result = client_for(url, 5).analyze("abc123").await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /analyze?videoId=abc123 "));
        assert_eq!(result.sentiment, vec!["positive", "negative"]);
        assert_eq!(result.keywords_at(1), ["long".to_string()]);
    }

    #[tokio::test]
    async fn test_analyze_service_error_marker() {
        let (url, _server) = serve_once(
            "200 OK",
            r#"{"comments": [], "sentiment": [], "keywords": [], "error": "Video not found or comments disabled"}"#,
        )
        .await;

        let err = client_for(url, 5).analyze("missing").await.unwrap_err();
        assert!(matches!(err, FetchError::Service(ref m) if m == "Video not found or comments disabled"));
    }

    #[tokio::test]
    async fn test_analyze_http_error_uses_detail() {
        let (url, _server) =
            serve_once("422 Unprocessable Entity", r#"{"detail": "videoId is required"}"#).await;

        let err = client_for(url, 5).analyze("x").await.unwrap_err();
        match err {
            FetchError::Status { status, detail } => {
                assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
                assert_eq!(detail, "videoId is required");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_analyze_malformed_body() {
        let (url, _server) = serve_once("200 OK", "<html>oops</html>").await;

        let err = client_for(url, 5).analyze("x").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_analyze_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(format!("http://{}", addr), 5)
            .analyze("x")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Connect(_)));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = client_for("http://localhost:8000/".to_string(), 30);
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_error_detail_fallback() {
        assert_eq!(error_detail(r#"{"detail": "quota exceeded"}"#), "quota exceeded");
        assert_eq!(error_detail("Internal Server Error\n"), "Internal Server Error");
    }

    #[test]
    fn test_timeout_message() {
        let timed_out = tokio_test::block_on(async {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let client = client_for(format!("http://{}", addr), 1);
            // Accept nothing: the connection sits in the backlog until the timeout fires.
            let err = client.analyze("slow").await.unwrap_err();
            drop(listener);
            err
        });

        assert!(matches!(timed_out, FetchError::Timeout(1)));
        assert_eq!(timed_out.to_string(), "Request timed out after 1s");
    }
}
