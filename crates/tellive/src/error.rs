//! CLI error types with miette diagnostics.
//!
//! Maps `tellive_api::Error` and `ConfigError` variants into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use tellive_config::ConfigError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("could not reach Telldus Live: request to {path} did not complete")]
    #[diagnostic(
        code(tellive::connection),
        help("Check your network connection and try again; the cache was left untouched.")
    )]
    Connection { path: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Telldus Live rejected the request: {message}")]
    #[diagnostic(
        code(tellive::api_error),
        help("If the token has expired, re-authorize it at api.telldus.com and run: tellive config init")
    )]
    Api { message: String },

    #[error("command {verb} on device {device} was not confirmed")]
    #[diagnostic(
        code(tellive::rejected),
        help("The server did not report success; the device state is unchanged.")
    )]
    Rejected { verb: &'static str, device: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource} '{identifier}' not found")]
    #[diagnostic(
        code(tellive::not_found),
        help("Run: tellive {list_command} to see what the account reports")
    )]
    NotFound {
        resource: &'static str,
        identifier: String,
        list_command: &'static str,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("no credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(tellive::no_credentials),
        help(
            "Run: tellive config init\n\
             Or set TELLDUS_PRIVATE_KEY and TELLDUS_TOKEN_SECRET."
        )
    )]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found in configuration")]
    #[diagnostic(
        code(tellive::profile_not_found),
        help("Create it with: tellive config init")
    )]
    ProfileNotFound { profile: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(tellive::config))]
    Config(String),

    // ── Validation ───────────────────────────────────────────────────
    #[error("invalid value for {field}: {reason}")]
    #[diagnostic(code(tellive::validation))]
    Validation { field: String, reason: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Connection { .. } => exit_code::CONNECTION,
            Self::NoCredentials { .. } | Self::ProfileNotFound { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Error mappings ───────────────────────────────────────────────────

impl From<tellive_api::Error> for CliError {
    fn from(err: tellive_api::Error) -> Self {
        match err {
            tellive_api::Error::NotFound { kind, id } => CliError::NotFound {
                list_command: if kind == "sensor" { "sensors" } else { "devices" },
                resource: kind,
                identifier: id,
            },
            tellive_api::Error::RemoteApi { message } => CliError::Api { message },
            tellive_api::Error::Incomplete { path } => CliError::Connection { path },
            other => CliError::Api {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { profile } => CliError::ProfileNotFound { profile },
            other => CliError::Config(other.to_string()),
        }
    }
}
