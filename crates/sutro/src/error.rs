//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sutro_config::ConfigError;
use sutro_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not fetch data for '{name}'")]
    #[diagnostic(
        code(sutro::unavailable),
        help(
            "The Sutro API did not answer, or it rejected the stored token.\n\
             Run with -v for details, try again later, or log in again: sutro login --save"
        )
    )]
    Unavailable { name: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login failed, check credentials")]
    #[diagnostic(
        code(sutro::auth_failed),
        help("Verify the email and password you use in the Sutro app.")
    )]
    AuthFailed,

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(sutro::no_credentials),
        help(
            "Link an account with: sutro login --save --profile {profile}\n\
             Or set the SUTRO_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(sutro::not_found),
        help("Run: sutro {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Failed to update recommendation '{id}'")]
    #[diagnostic(
        code(sutro::mutation_failed),
        help("The change was not confirmed by the server. Data was refreshed anyway.")
    )]
    MutationFailed { id: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sutro::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sutro::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sutro login --save --profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(sutro::config))]
    Config(Box<ConfigError>),

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {message}")]
    #[diagnostic(code(sutro::internal))]
    Internal { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unavailable { .. } => exit_code::CONNECTION,
            Self::AuthFailed | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotReady { entry_id: name } | CoreError::UpdateFailed { name } => {
                CliError::Unavailable { name }
            }

            CoreError::AuthenticationFailed => CliError::AuthFailed,

            CoreError::MutationFailed { id } => CliError::MutationFailed { id },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            other @ (CoreError::AlreadyStarted { .. } | CoreError::Internal(_)) => {
                CliError::Internal {
                    message: other.to_string(),
                }
            }
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}
