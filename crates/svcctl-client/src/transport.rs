//! The innermost layer: turning an [`ApiRequest`] into an HTTP exchange.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{instrument, trace};

use svcctl_core::error::{Error, StatusError, TransportError};
use svcctl_core::{ApiUrl, Result};

use crate::config::ClientConfig;
use crate::request::{ApiRequest, ApiResponse};

/// Sends requests to the API server.
///
/// Implementations return `Ok` only for 2xx responses. Failures to reach
/// the server are [`Error::Transport`]; any other status is
/// [`Error::Status`] carrying the server's `error` detail when present.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Error body sent by the console API: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Map a reqwest failure onto the transport error kinds.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: ApiUrl,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &ApiUrl {
        &self.base_url
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.base_url.endpoint(&request.path);

        let mut builder = self
            .client
            .request(request.method, &url)
            .headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        trace!(status = status.as_u16(), "response received");

        let body = response.bytes().await.map_err(transport_error)?;

        if status.is_success() {
            return Ok(ApiResponse::new(status.as_u16(), body.to_vec()));
        }

        let detail = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|e| !e.is_empty());
        let message = format!(
            "Http failure response for {}: {} {}",
            url,
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );

        Err(StatusError::new(status.as_u16(), detail, message.trim_end()).into())
    }
}
