//! Network execution of `HttpRequest` values.
//!
//! # Design
//! `Transport` is the only place I/O happens. It reports failures before a
//! status line was received as `TransportError`, which decides between
//! `NoResponse` and `RequestSetupFailed`; any received status, 2xx or not,
//! is returned as an `HttpResponse` for the client to classify. Transports
//! log at `debug`; the client logs the final classification.

use std::future::Future;

use reqwest::{Client, Method};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP exchange. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport from the timeout and user agent in `config`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Setup` when the reqwest client cannot be
    /// constructed (for example when no TLS backend can be initialised).
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        // The status line arrived but the body did not: still no usable answer.
        let body = response.text().await.map_err(map_transport_error)?;
        debug!(status, bytes = body.len(), "response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_builder() {
        debug!(%error, "request could not be built");
        TransportError::Setup(error.to_string())
    } else {
        debug!(%error, timeout = error.is_timeout(), connect = error.is_connect(), "no response");
        TransportError::NoResponse(error.to_string())
    }
}
