// ── Runtime monitor configuration ──
//
// Describes *how* to reach one account. Carries the token and timing, but
// never touches disk: the CLI builds a `MonitorConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use sutro_api::TransportConfig;
use sutro_api::transport::DEFAULT_TIMEOUT;
use url::Url;

/// Fixed polling period. Also the whole failure-recovery strategy.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Connection settings for a single account.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// GraphQL endpoint.
    pub endpoint: Url,
    /// Bearer token obtained at login.
    pub token: SecretString,
    /// Per-request deadline.
    pub timeout: Duration,
    /// Period between scheduled refreshes. Zero disables polling.
    pub poll_interval: Duration,
}

impl MonitorConfig {
    pub fn new(endpoint: Url, token: SecretString) -> Self {
        Self {
            endpoint,
            token,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
        }
    }
}

/// One configured account, as the lifecycle registry sees it.
#[derive(Debug, Clone)]
pub struct ConfigEntry {
    /// Registry key.
    pub entry_id: String,
    /// Account label, e.g. "Ana's Pool".
    pub title: String,
    pub monitor: MonitorConfig,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_fixed_cadence() {
        let cfg = MonitorConfig::new(
            Url::parse(sutro_api::DEFAULT_ENDPOINT).unwrap(),
            SecretString::from("t".to_owned()),
        );
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.poll_interval, Duration::from_secs(1800));
        assert_eq!(cfg.transport().timeout, cfg.timeout);
    }
}
