//! Shared configuration for the sutro CLI.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `sutro_core::ConfigEntry`. The CLI layers its
//! `GlobalOpts` overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sutro_core::{ConfigEntry, DEFAULT_ENDPOINT, DEFAULT_POLL_INTERVAL, MonitorConfig};

const KEYRING_SERVICE: &str = "sutro";

/// Environment variable consulted for the token after the profile's own.
pub const TOKEN_ENV: &str = "SUTRO_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given explicitly.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

/// A named account profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Account email, remembered for re-login.
    pub email: Option<String>,

    /// Display title captured at login (e.g., "Ana's Pool").
    pub title: Option<String>,

    /// GraphQL endpoint override.
    pub endpoint: Option<String>,

    /// Bearer token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Override request timeout, in seconds.
    pub timeout: Option<u64>,

    /// Override polling period, in seconds.
    pub poll_interval_secs: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "sutro", "sutro").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sutro");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields defaults.
///
/// `SUTRO_` variables override file values; nested keys use a double
/// underscore (`SUTRO_DEFAULTS__TIMEOUT=5`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SUTRO_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token storage and resolution ────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/token"),
    )?)
}

/// Store a token in the system keyring under the profile's name.
pub fn store_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token.expose_secret())?;
    Ok(())
}

/// Resolve a bearer token from the credential chain (no CLI flag step).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var(TOKEN_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Translation to core types ───────────────────────────────────────

/// Parse the profile's endpoint, falling back to the public API.
pub fn profile_endpoint(profile: &Profile) -> Result<url::Url, ConfigError> {
    let raw = profile.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Build a `MonitorConfig` from a profile and global defaults, no CLI flags.
pub fn profile_to_monitor_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<MonitorConfig, ConfigError> {
    let token = resolve_token(profile, profile_name)?;
    monitor_config_with_token(profile, defaults, token)
}

/// Same as [`profile_to_monitor_config`] but with an already-resolved token.
pub fn monitor_config_with_token(
    profile: &Profile,
    defaults: &Defaults,
    token: SecretString,
) -> Result<MonitorConfig, ConfigError> {
    let endpoint = profile_endpoint(profile)?;

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    let poll_interval = Duration::from_secs(
        profile
            .poll_interval_secs
            .unwrap_or(defaults.poll_interval_secs),
    );

    Ok(MonitorConfig::new(endpoint, token)
        .with_timeout(timeout)
        .with_poll_interval(poll_interval))
}

/// Registry entry for a profile. The title falls back to the profile name.
pub fn profile_entry(profile: &Profile, profile_name: &str, monitor: MonitorConfig) -> ConfigEntry {
    ConfigEntry {
        entry_id: profile_name.to_owned(),
        title: profile
            .title
            .clone()
            .unwrap_or_else(|| profile_name.to_owned()),
        monitor,
    }
}
