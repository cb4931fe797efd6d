// Login client
//
// Exchanges email/password for a bearer token via the login mutation.
// Invalid credentials and transport failures are deliberately not told
// apart: both come back as `None`.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::graphql::{GraphQlRequest, LOGIN_MUTATION, extract_data};
use crate::transport::{Method, Transport, TransportConfig, json_headers};

/// Label used when the account has no pool type set.
const FALLBACK_POOL_TYPE: &str = "Pool/Spa";

/// Token plus the minimal profile needed to label the account.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: SecretString,
    pub first_name: String,
    pub pool_type: Option<String>,
}

impl LoginResult {
    /// Human label for the account, e.g. `"Ana's Hot Tub"`.
    pub fn account_title(&self) -> String {
        let pool_type = self
            .pool_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .map_or_else(|| FALLBACK_POOL_TYPE.to_owned(), title_case);
        format!("{}'s {pool_type}", self.first_name)
    }
}

// ── Wire shapes ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LoginData {
    login: Option<LoginPayload>,
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    token: String,
    user: LoginUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginUser {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    pool: Option<LoginPool>,
}

#[derive(Debug, Deserialize)]
struct LoginPool {
    #[serde(default, rename = "type")]
    pool_type: Option<String>,
}

impl From<LoginPayload> for LoginResult {
    fn from(payload: LoginPayload) -> Self {
        Self {
            token: SecretString::from(payload.token),
            first_name: payload.user.first_name.unwrap_or_default(),
            pool_type: payload.user.pool.and_then(|p| p.pool_type),
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Unauthenticated client used once, at setup time.
pub struct LoginClient {
    transport: Transport,
    endpoint: Url,
}

impl LoginClient {
    pub fn new(endpoint: Url, config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            transport: Transport::new(config)?,
            endpoint,
        })
    }

    pub fn with_transport(transport: Transport, endpoint: Url) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    /// Run the login mutation.
    ///
    /// Returns `Some` only when the response carries a populated `login`
    /// object. `login: null`, an empty body, and transport failures all
    /// yield `None`.
    pub async fn login(&self, email: &str, password: &SecretString) -> Option<LoginResult> {
        debug!(%email, "logging in");

        let body = GraphQlRequest::new(LOGIN_MUTATION).with_variables(json!({
            "email": email,
            "password": password.expose_secret(),
        }));

        let response = self
            .transport
            .request(Method::Post, &self.endpoint, &body, json_headers())
            .await?;

        let data: LoginData = extract_data(&self.endpoint, response)?;
        let result = data.login.map(LoginResult::from);
        if result.is_none() {
            debug!("login rejected");
        }
        result
    }
}

/// Capitalize the first letter of every word, lowercase the rest.
fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
