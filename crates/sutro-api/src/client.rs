// Authorized data client
//
// Wraps `Transport` with the bearer token, the fixed data query, and the
// shared recommendation completion mutation. Nothing here caches: every
// call goes to the server, and mutations never touch a snapshot.

use chrono::{SecondsFormat, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, error};
use url::Url;

use crate::error::Error;
use crate::graphql::{COMPLETE_RECOMMENDATION_MUTATION, DATA_QUERY, GraphQlRequest, extract_data};
use crate::models::Snapshot;
use crate::transport::{Method, Transport, TransportConfig, json_headers};

/// GraphQL client for one account, authorized with a long-lived token.
pub struct SutroClient {
    transport: Transport,
    endpoint: Url,
    token: SecretString,
}

impl SutroClient {
    pub fn new(endpoint: Url, token: SecretString, config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            transport: Transport::new(config)?,
            endpoint,
            token,
        })
    }

    pub fn with_transport(transport: Transport, endpoint: Url, token: SecretString) -> Self {
        Self {
            transport,
            endpoint,
            token,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the full account snapshot.
    ///
    /// `None` on any transport failure, and on a response without `data`.
    pub async fn fetch(&self) -> Option<Snapshot> {
        debug!("fetching snapshot");
        let body = GraphQlRequest::new(DATA_QUERY);
        let response = self.post(&body).await?;
        extract_data(&self.endpoint, response)
    }

    /// Mark a recommendation done as of now.
    pub async fn complete_recommendation(&self, id: &str) -> Option<Value> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.set_completion(id, Some(now)).await
    }

    /// Clear a recommendation's completion timestamp.
    pub async fn uncomplete_recommendation(&self, id: &str) -> Option<Value> {
        self.set_completion(id, None).await
    }

    /// Both directions use the same mutation; only `completedAt` differs.
    async fn set_completion(&self, id: &str, completed_at: Option<String>) -> Option<Value> {
        debug!(recommendation = %id, completed = completed_at.is_some(), "updating recommendation");
        let body = GraphQlRequest::new(COMPLETE_RECOMMENDATION_MUTATION).with_variables(json!({
            "recommendationId": id,
            "completedAt": completed_at,
        }));
        let response = self.post(&body).await?;
        extract_data(&self.endpoint, response)
    }

    async fn post(&self, body: &GraphQlRequest<'_>) -> Option<Value> {
        let headers = self.auth_headers()?;
        self.transport
            .request(Method::Post, &self.endpoint, body, headers)
            .await
    }

    fn auth_headers(&self) -> Option<HeaderMap> {
        let mut headers = json_headers();
        let bearer = format!("Bearer {}", self.token.expose_secret());
        match HeaderValue::from_str(&bearer) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
                Some(headers)
            }
            Err(e) => {
                error!(error = %e, "token is not a valid header value");
                None
            }
        }
    }
}
