//! Config subcommand handlers.

use serde_json::Value;

use sutro_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

/// Config as a JSON tree with plaintext tokens masked.
fn redacted_view(cfg: &Config) -> Value {
    let mut view = serde_json::to_value(cfg).unwrap_or(Value::Null);
    if let Some(profiles) = view.get_mut("profiles").and_then(Value::as_object_mut) {
        for profile in profiles.values_mut() {
            if let Some(token) = profile.get_mut("token").filter(|t| !t.is_null()) {
                *token = Value::String(REDACTED.into());
            }
        }
    }
    view
}

fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = sutro_config::config_path();
            if path.exists() {
                eprintln!("Config already exists at {}", path.display());
                return Ok(());
            }
            let path = sutro_config::save_config(&Config::default())?;
            if !global.quiet {
                eprintln!("✓ Configuration written to {}", path.display());
                eprintln!("\n  Link an account: sutro login --save");
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = sutro_config::load_config_or_default();
            let view = redacted_view(&cfg);
            // The table view of a nested document is its YAML form.
            let format = match global.output {
                OutputFormat::Table => OutputFormat::Yaml,
                ref other => other.clone(),
            };
            let out = output::render_single(&format, &view, |_| String::new(), |_| {
                config::active_profile_name(global, &cfg)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(
                &sutro_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = sutro_config::load_config_or_default();
            let default = cfg.active_profile_name();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: sutro login --save");
                return Ok(());
            }
            let mut names: Vec<_> = cfg.profiles.keys().collect();
            names.sort();
            let out = names
                .into_iter()
                .map(|name| {
                    let marker = if name == default { " *" } else { "" };
                    format!("{name}{marker}")
                })
                .collect::<Vec<_>>()
                .join("\n");
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = sutro_config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            sutro_config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use sutro_config::Profile;

    use super::*;

    #[test]
    fn show_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                token: Some("secret-token".into()),
                ..Profile::default()
            },
        );
        cfg.profiles.insert("spa".into(), Profile::default());

        let view = redacted_view(&cfg);
        assert_eq!(view["profiles"]["home"]["token"], REDACTED);
        assert!(view["profiles"]["spa"]["token"].is_null());
        assert!(!view.to_string().contains("secret-token"));
    }
}
