//! Credential exchange.

use std::time::Duration;

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use sutro_core::ConfigFlow;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

/// Read before prompting, for non-interactive use.
const PASSWORD_ENV: &str = "SUTRO_PASSWORD";

#[derive(Serialize)]
struct LoginSummary {
    profile: String,
    title: String,
    email: String,
    saved: bool,
}

fn read_password() -> Result<SecretString, CliError> {
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(pw) => pw,
        Err(_) => rpassword::prompt_password("Password: ").map_err(prompt_err)?,
    };
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(password))
}

pub async fn handle(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = sutro_config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let mut profile = cfg.profiles.get(&profile_name).cloned().unwrap_or_default();
    config::apply_overrides(&mut profile, global);

    // 1. Email (flag > profile > prompt)
    let email = match args.email.or_else(|| profile.email.clone()) {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(prompt_err)?,
    };

    // 2. Password
    let password = read_password()?;

    // 3. Exchange
    let endpoint = sutro_config::profile_endpoint(&profile)?;
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(cfg.defaults.timeout));
    let flow = ConfigFlow::with_timeout(endpoint, timeout)?;
    let login = flow.login(&email, &password).await?;
    let title = login.account_title();

    // 4. Persist
    if args.save {
        if args.plaintext {
            profile.token = Some(login.token.expose_secret().to_owned());
        } else {
            sutro_config::store_token(&profile_name, &login.token)?;
            profile.token = None;
        }
        profile.email = Some(email.clone());
        profile.title = Some(title.clone());
        cfg.profiles.insert(profile_name.clone(), profile);
        let path = sutro_config::save_config(&cfg)?;
        if !global.quiet {
            eprintln!("✓ Profile '{profile_name}' saved to {}", path.display());
        }
    }

    let summary = LoginSummary {
        profile: profile_name,
        title,
        email,
        saved: args.save,
    };
    let out = output::render_single(
        &global.output,
        &summary,
        |s| format!("✓ Logged in as {}", s.title),
        |s| s.title.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
