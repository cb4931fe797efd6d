//! `GlobalOpts`-aware wrappers over `sutro_config`.
//!
//! This is the single boundary where CLI flags cross into core types.

use secrecy::SecretString;

use sutro_config::{Config, Profile};
use sutro_core::ConfigEntry;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Apply flag overrides that live in the profile itself.
pub fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref endpoint) = global.endpoint {
        profile.endpoint = Some(endpoint.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

/// Build the registry entry for the active profile.
///
/// A profile need not exist on disk: `--token` (or `SUTRO_TOKEN`) alone is
/// enough to reach the public endpoint.
pub fn resolve_entry(global: &GlobalOpts) -> Result<ConfigEntry, CliError> {
    let cfg = sutro_config::load_config_or_default();
    let name = active_profile_name(global, &cfg);

    let mut profile = cfg.profiles.get(&name).cloned().unwrap_or_default();
    apply_overrides(&mut profile, global);

    // 1. CLI flag, then the profile's credential chain
    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => sutro_config::resolve_token(&profile, &name)?,
    };

    let monitor = sutro_config::monitor_config_with_token(&profile, &cfg.defaults, token)?;
    tracing::debug!(profile = %name, endpoint = %monitor.endpoint, "resolved profile");
    Ok(sutro_config::profile_entry(&profile, &name, monitor))
}
