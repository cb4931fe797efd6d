// Transport wrapper around reqwest.
//
// One HTTP call per invocation, bounded by a fixed deadline. Every failure
// mode is classified into `Error`, logged once with its category, and then
// reduced to `None` for the caller.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::error::Error;

/// Deadline applied to every call unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("sutro-rs/", env!("CARGO_PKG_VERSION"));

/// HTTP verbs the wrapper knows how to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
        })
    }
}

/// Settings used to build the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Deadline-bounded JSON-over-HTTP caller.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    timeout: Duration,
}

impl Transport {
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
            timeout: config.timeout,
        })
    }

    /// Wrap a pre-built client. The deadline is still enforced here even if
    /// the client carries no timeout of its own.
    pub fn with_client(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue one call and return the decoded JSON body.
    ///
    /// Returns `None` on timeout, connection/DNS failure, non-2xx status,
    /// empty or malformed JSON, and anything else that goes wrong. The
    /// failure is logged; it is never propagated. `payload` is ignored for
    /// `GET`.
    pub async fn request<P>(
        &self,
        method: Method,
        url: &Url,
        payload: &P,
        headers: HeaderMap,
    ) -> Option<Value>
    where
        P: Serialize + ?Sized,
    {
        match self.try_request(method, url, payload, headers).await {
            Ok(value) => Some(value),
            Err(err) => {
                log_failure(url, &err);
                None
            }
        }
    }

    /// Same as [`request`](Self::request) but keeps the classified error.
    pub async fn try_request<P>(
        &self,
        method: Method,
        url: &Url,
        payload: &P,
        headers: HeaderMap,
    ) -> Result<Value, Error>
    where
        P: Serialize + ?Sized,
    {
        debug!(%method, %url, "sending request");

        let call = async {
            let builder = match method {
                Method::Get => self.http.get(url.clone()),
                Method::Post => self.http.post(url.clone()).json(payload),
                Method::Put => self.http.put(url.clone()).json(payload),
                Method::Patch => self.http.patch(url.clone()).json(payload),
            };

            let resp = builder.headers(headers).send().await?.error_for_status()?;
            let body = resp.text().await?;

            serde_json::from_str::<Value>(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })
        };

        let timeout_secs = self.timeout.as_secs();
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Err(Error::Timeout { .. })) | Err(_) => Err(Error::Timeout { timeout_secs }),
            Ok(result) => result,
        }
    }
}

/// Headers shared by every GraphQL call.
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=UTF-8"),
    );
    headers
}

pub(crate) fn log_failure(url: &Url, err: &Error) {
    match err.category() {
        "timeout" => error!(%url, error = %err, "timeout error fetching information"),
        "parse" => error!(%url, error = %err, "error parsing information"),
        "fetch" => error!(%url, error = %err, "error fetching information"),
        _ => error!(%url, error = %err, "unexpected failure talking to the API"),
    }
}
