//! Stateless CRUD client for one remote resource.
//!
//! # Design
//! `ResourceClient` holds only a base URL and a `Transport` and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`; the async operations run one
//! build / execute / parse cycle and never retry. Hosts with their own HTTP
//! stack can drive the `build_*` and `parse_*` halves directly.
//!
//! Every failure is classified into a `ClientError`. The single substitution
//! made on purpose is in [`ResourceClient::parse_list`]: a successful list
//! response without a payload is an empty collection.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, GENERIC_FAILURE_MESSAGE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Envelope, RecordKey};

/// CRUD client for records of type `T` under a fixed base endpoint.
pub struct ResourceClient<T, Tr = ReqwestTransport> {
    base_url: String,
    transport: Tr,
    _record: PhantomData<fn() -> T>,
}

impl<T> ResourceClient<T, ReqwestTransport> {
    /// Build a client with a reqwest transport configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns `RequestSetupFailed` when the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(&config, transport))
    }
}

impl<T, Tr> ResourceClient<T, Tr> {
    pub fn with_transport(config: &ClientConfig, transport: Tr) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            transport,
            _record: PhantomData,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &Tr {
        &self.transport
    }

    pub fn build_list(&self) -> Result<HttpRequest, ClientError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.collection_url()?,
            headers: accept_headers(),
            body: None,
        })
    }

    pub fn build_get(&self, key: &RecordKey) -> Result<HttpRequest, ClientError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.record_url(key)?,
            headers: accept_headers(),
            body: None,
        })
    }

    pub fn build_create<F>(&self, fields: &F) -> Result<HttpRequest, ClientError>
    where
        F: Serialize + ?Sized,
    {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.collection_url()?,
            headers: json_headers(),
            body: Some(to_body(fields)?),
        })
    }

    pub fn build_update<F>(&self, key: &RecordKey, fields: &F) -> Result<HttpRequest, ClientError>
    where
        F: Serialize + ?Sized,
    {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.record_url(key)?,
            headers: json_headers(),
            body: Some(to_body(fields)?),
        })
    }

    pub fn build_remove(&self, key: &RecordKey) -> Result<HttpRequest, ClientError> {
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            url: self.record_url(key)?,
            headers: accept_headers(),
            body: None,
        })
    }

    fn collection_url(&self) -> Result<String, ClientError> {
        Ok(self.parsed_base()?.to_string())
    }

    /// Base URL plus one path segment holding the percent-encoded key.
    fn record_url(&self, key: &RecordKey) -> Result<String, ClientError> {
        if key.is_empty() {
            return Err(ClientError::setup("record key must not be empty"));
        }
        let segment = key.as_segment();
        // URL path normalisation would collapse these onto the collection.
        if segment == "." || segment == ".." {
            return Err(ClientError::setup(format!("record key {segment:?} is not addressable")));
        }
        let mut url = self.parsed_base()?;
        url.path_segments_mut()
            .map_err(|()| ClientError::setup(format!("base URL {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push(&segment);
        Ok(url.to_string())
    }

    fn parsed_base(&self) -> Result<Url, ClientError> {
        Url::parse(&self.base_url)
            .map_err(|e| ClientError::setup(format!("invalid base URL {:?}: {e}", self.base_url)))
    }
}

impl<T, Tr> ResourceClient<T, Tr>
where
    T: DeserializeOwned,
{
    /// Records from a list response, in server order.
    ///
    /// A 2xx envelope whose `data` is absent or `null`, or an empty 2xx body,
    /// yields an empty `Vec`. A dashboard with nothing to show is not an
    /// error.
    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<T>, ClientError> {
        let envelope: Envelope<Vec<T>> = decode_envelope(response)?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<T, ClientError> {
        let status = response.status;
        let envelope: Envelope<T> = decode_envelope(response)?;
        envelope.data.ok_or_else(|| ClientError::InvalidPayload {
            status,
            reason: "success envelope has no data".to_string(),
        })
    }

    /// Envelope of a create, update or remove response. An empty 2xx body
    /// (such as a 204) is an empty envelope.
    pub fn parse_write(&self, response: HttpResponse) -> Result<Envelope<T>, ClientError> {
        decode_envelope(response)
    }
}

impl<T, Tr> ResourceClient<T, Tr>
where
    T: DeserializeOwned,
    Tr: Transport,
{
    /// `GET base`.
    pub async fn list_all(&self) -> Result<Vec<T>, ClientError> {
        self.exchange(self.build_list(), |response| self.parse_list(response))
            .await
    }

    /// `GET base/{key}`.
    pub async fn get_by_key(&self, key: impl Into<RecordKey>) -> Result<T, ClientError> {
        let key = key.into();
        self.exchange(self.build_get(&key), |response| self.parse_get(response))
            .await
    }

    /// `POST base` with `fields` as the JSON body. Not idempotent.
    pub async fn create<F>(&self, fields: &F) -> Result<Envelope<T>, ClientError>
    where
        F: Serialize + ?Sized,
    {
        self.exchange(self.build_create(fields), |response| self.parse_write(response))
            .await
    }

    /// `PUT base/{key}` with `fields` as the JSON body.
    pub async fn update<F>(&self, key: impl Into<RecordKey>, fields: &F) -> Result<Envelope<T>, ClientError>
    where
        F: Serialize + ?Sized,
    {
        let key = key.into();
        self.exchange(self.build_update(&key, fields), |response| {
            self.parse_write(response)
        })
        .await
    }

    /// `DELETE base/{key}`.
    pub async fn remove(&self, key: impl Into<RecordKey>) -> Result<Envelope<T>, ClientError> {
        let key = key.into();
        self.exchange(self.build_remove(&key), |response| self.parse_write(response))
            .await
    }

    async fn exchange<R>(
        &self,
        request: Result<HttpRequest, ClientError>,
        parse: impl FnOnce(HttpResponse) -> Result<R, ClientError>,
    ) -> Result<R, ClientError> {
        let result = match request {
            Ok(request) => {
                let method = request.method.as_str();
                let url = request.url.clone();
                debug!(method, %url, "dispatching request");
                match self.transport.execute(request).await {
                    Ok(response) => parse(response),
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            log_failure(e);
        }
        result
    }
}

impl<T, Tr: Clone> Clone for ResourceClient<T, Tr> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            transport: self.transport.clone(),
            _record: PhantomData,
        }
    }
}

impl<T, Tr> fmt::Debug for ResourceClient<T, Tr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn log_failure(error: &ClientError) {
    match error {
        ClientError::ServerRejected { status, message } => {
            warn!(status, %message, "server rejected request");
        }
        ClientError::NoResponse { reason } => warn!(%reason, "no response"),
        ClientError::RequestSetupFailed { reason } => error!(%reason, "request setup failed"),
        ClientError::InvalidPayload { status, reason } => {
            error!(status, %reason, "undecodable success payload");
        }
    }
}

fn accept_headers() -> Vec<(String, String)> {
    vec![("accept".to_string(), "application/json".to_string())]
}

fn json_headers() -> Vec<(String, String)> {
    vec![
        ("accept".to_string(), "application/json".to_string()),
        ("content-type".to_string(), "application/json".to_string()),
    ]
}

fn to_body<F: Serialize + ?Sized>(fields: &F) -> Result<String, ClientError> {
    serde_json::to_string(fields)
        .map_err(|e| ClientError::setup(format!("request body could not be serialised: {e}")))
}

fn decode_envelope<D: DeserializeOwned>(response: HttpResponse) -> Result<Envelope<D>, ClientError> {
    check_status(&response)?;
    if response.body.trim().is_empty() {
        return Ok(Envelope::default());
    }
    serde_json::from_str(&response.body).map_err(|e| ClientError::InvalidPayload {
        status: response.status,
        reason: e.to_string(),
    })
}

/// Map a non-2xx response to `ServerRejected`, keeping the body's `message`.
fn check_status(response: &HttpResponse) -> Result<(), ClientError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
    Err(ClientError::ServerRejected {
        status: response.status,
        message,
    })
}
