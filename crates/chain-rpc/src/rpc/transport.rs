use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use tracing::trace;

use crate::error::RpcError;

/// One outbound POST with a JSON body.
#[derive(Debug, Clone, Copy)]
pub struct HttpRequest<'a> {
    pub url: &'a str,
    pub body: &'a serde_json::Value,
    pub auth: Option<(&'a str, &'a str)>,
    pub timeout: Option<Duration>,
}

/// Raw HTTP reply. Interpreting the status is left to the caller.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: StatusCode,
    pub body: String,
}

/// The HTTP boundary every client talks through.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, request: HttpRequest<'_>) -> Result<HttpReply, RpcError>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Client with `reqwest` defaults (no overall request timeout).
    pub fn new() -> Result<Self, RpcError> {
        let client = reqwest::Client::builder().tcp_nodelay(true).build()?;
        Ok(Self { client })
    }

    /// Client that aborts any request running longer than `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, RpcError> {
        let client = reqwest::Client::builder()
            .tcp_nodelay(true)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, request: HttpRequest<'_>) -> Result<HttpReply, RpcError> {
        let mut builder = self
            .client
            .post(request.url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request.body);
        if let Some((user, pass)) = request.auth {
            builder = builder.basic_auth(user, Some(pass));
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        trace!(url = request.url, %status, body = %body, "http reply");

        Ok(HttpReply { status, body })
    }
}
