// ── Account setup flow ──
//
// Turns email/password into a `ConfigEntry`. The only failure a user sees
// is "login failed, check credentials", whatever actually went wrong.

use std::time::Duration;

use secrecy::SecretString;
use sutro_api::{LoginClient, LoginResult, TransportConfig};
use sutro_api::transport::DEFAULT_TIMEOUT;
use tracing::info;
use url::Url;

use crate::config::{ConfigEntry, DEFAULT_POLL_INTERVAL, MonitorConfig};
use crate::error::CoreError;

/// Credential exchange performed once, at setup time.
pub struct ConfigFlow {
    client: LoginClient,
    endpoint: Url,
    timeout: Duration,
}

impl ConfigFlow {
    pub fn new(endpoint: Url) -> Result<Self, CoreError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, CoreError> {
        let client = LoginClient::new(endpoint.clone(), &TransportConfig { timeout })?;
        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// Validate credentials and return the token plus account profile.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResult, CoreError> {
        self.client
            .login(email, password)
            .await
            .ok_or(CoreError::AuthenticationFailed)
    }

    /// Log in and build a ready-to-start entry keyed by `entry_id`.
    pub async fn create_entry(
        &self,
        entry_id: impl Into<String>,
        email: &str,
        password: &SecretString,
    ) -> Result<ConfigEntry, CoreError> {
        let login = self.login(email, password).await?;
        let title = login.account_title();
        info!(%title, "account linked");

        let monitor = MonitorConfig::new(self.endpoint.clone(), login.token)
            .with_timeout(self.timeout)
            .with_poll_interval(DEFAULT_POLL_INTERVAL);

        Ok(ConfigEntry {
            entry_id: entry_id.into(),
            title,
            monitor,
        })
    }
}
