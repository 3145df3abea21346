//! Request builder, response validator and blocking client for jsonstore.
//!
//! # Design
//! `StoreClient` holds a base URL (`<host>/<token>`), a default timeout and a
//! shared `Transport`. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; `get` / `save` / `delete` run both halves around one
//! transport call. Hosts that do their own I/O can use the halves directly.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::codec;
use crate::error::{Result, StoreError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

pub const DEFAULT_HOST: &str = "https://www.jsonstore.io";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const JSON: &str = "application/json";

/// Blocking client for one token's namespace in the store.
///
/// Cloning is cheap and shares the transport.
#[derive(Clone)]
pub struct StoreClient {
    base_url: String,
    timeout: Duration,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Overrides for `StoreClient` construction.
pub struct StoreClientBuilder {
    token: String,
    host: String,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
}

impl StoreClientBuilder {
    /// Point the client at another deployment, e.g. a local stub.
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.trim_end_matches('/').to_string();
        self
    }

    /// Timeout used by `get`, `save` and `delete`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> StoreClient {
        StoreClient {
            base_url: format!("{}/{}", self.host, self.token),
            timeout: self.timeout,
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(UreqTransport::new())),
        }
    }
}

impl StoreClient {
    /// Client for `token` on the public jsonstore host.
    pub fn new(token: &str) -> Self {
        Self::builder(token).build()
    }

    pub fn builder(token: &str) -> StoreClientBuilder {
        StoreClientBuilder {
            token: token.to_string(),
            host: DEFAULT_HOST.to_string(),
            timeout: DEFAULT_TIMEOUT,
            transport: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // -----------------------------------------------------------------------
    // Blocking operations
    // -----------------------------------------------------------------------

    /// Fetch the value stored under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.get_with_timeout(key, self.timeout)
    }

    pub fn get_with_timeout<T: DeserializeOwned>(&self, key: &str, timeout: Duration) -> Result<T> {
        let mut request = self.build_get(key)?;
        request.timeout = timeout;
        let response = self.round_trip(&request)?;
        self.parse_get(response)
            .inspect_err(|err| warn!(url = %request.url, error = %err, "jsonstore get failed"))
    }

    /// Store `value` under `key`, replacing whatever was there.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.save_with_timeout(key, value, self.timeout)
    }

    pub fn save_with_timeout<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        timeout: Duration,
    ) -> Result<()> {
        let mut request = self.build_save(key, value)?;
        request.timeout = timeout;
        let response = self.round_trip(&request)?;
        self.parse_save(response)
            .inspect_err(|err| warn!(url = %request.url, error = %err, "jsonstore save failed"))
    }

    /// Remove the value stored under `key`.
    pub fn delete(&self, key: &str) -> Result<()> {
        self.delete_with_timeout(key, self.timeout)
    }

    pub fn delete_with_timeout(&self, key: &str, timeout: Duration) -> Result<()> {
        let mut request = self.build_delete(key)?;
        request.timeout = timeout;
        let response = self.round_trip(&request)?;
        self.parse_delete(response)
            .inspect_err(|err| warn!(url = %request.url, error = %err, "jsonstore delete failed"))
    }

    fn round_trip(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(
            method = %request.method,
            url = %request.url,
            timeout = ?request.timeout,
            "sending jsonstore request"
        );
        let response = self
            .transport
            .execute(request)
            .inspect_err(|err| warn!(url = %request.url, error = %err, "jsonstore transport failed"))?;
        debug!(status = response.status, "received jsonstore response");
        Ok(response)
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    pub fn build_get(&self, key: &str) -> Result<HttpRequest> {
        self.request(HttpMethod::Get, key, None)
    }

    pub fn build_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<HttpRequest> {
        let body = codec::encode(value)?;
        self.request(HttpMethod::Post, key, Some(body))
    }

    pub fn build_delete(&self, key: &str) -> Result<HttpRequest> {
        self.request(HttpMethod::Delete, key, None)
    }

    fn request(&self, method: HttpMethod, key: &str, body: Option<String>) -> Result<HttpRequest> {
        Ok(HttpRequest {
            method,
            url: self.resource_url(key)?,
            headers: vec![
                ("Accept".to_string(), JSON.to_string()),
                ("Content-Type".to_string(), JSON.to_string()),
            ],
            body,
            timeout: self.timeout,
        })
    }

    /// `<base_url>/<key>`, with every `/`-separated segment of the key
    /// percent-encoded. Dot and empty segments are rejected so a key can
    /// never resolve outside the token's namespace.
    fn resource_url(&self, key: &str) -> Result<String> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey("key must not be empty".to_string()));
        }
        let mut segments = Vec::new();
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(StoreError::InvalidKey(format!(
                    "key {key:?} has an empty, `.` or `..` segment"
                )));
            }
            segments.push(urlencoding::encode(segment).into_owned());
        }
        let path = segments.join("/");
        Ok(format!("{}/{path}", self.base_url))
    }

    // -----------------------------------------------------------------------
    // Response parsers
    // -----------------------------------------------------------------------

    pub fn parse_get<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T> {
        let mut envelope = check_response(&response)?;
        match envelope.remove("result") {
            None => Err(StoreError::MissingResult("`result` field is absent".to_string())),
            Some(Value::Null) => Err(StoreError::MissingResult("`result` is null".to_string())),
            Some(result) => codec::decode(result),
        }
    }

    pub fn parse_save(&self, response: HttpResponse) -> Result<()> {
        check_response(&response).map(|_| ())
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<()> {
        check_response(&response).map(|_| ())
    }
}

/// Validate status and envelope, returning the envelope's fields.
fn check_response(response: &HttpResponse) -> Result<Map<String, Value>> {
    if !response.is_success() {
        return Err(StoreError::Status {
            status: response.status,
            body: response.body.clone(),
        });
    }
    let body: Value = serde_json::from_str(&response.body)
        .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;
    let Value::Object(envelope) = body else {
        return Err(StoreError::MalformedResponse(format!(
            "expected a JSON object, got {body}"
        )));
    };
    match envelope.get("ok") {
        Some(Value::Bool(true)) => Ok(envelope),
        Some(other) => Err(StoreError::NotOk(format!("backend answered ok={other}"))),
        None => Err(StoreError::NotOk("response has no `ok` field".to_string())),
    }
}
