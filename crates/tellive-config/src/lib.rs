//! Shared configuration for the tellive CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `tellive_api::Credentials`. The four OAuth parts come
//! from the Telldus API portal; the two secret parts never have to live in
//! the config file in plaintext.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tellive_api::{Credentials, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found in configuration")]
    ProfileNotFound { profile: String },

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

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            profiles: HashMap::new(),
        }
    }
}

/// A named Telldus Live account profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Application public key.
    pub public_key: String,

    /// Access token.
    pub token: String,

    /// Application private key (plaintext — prefer keyring or env var).
    pub private_key: Option<String>,

    /// Environment variable name containing the private key.
    pub private_key_env: Option<String>,

    /// Access token secret (plaintext — prefer keyring or env var).
    pub token_secret: Option<String>,

    /// Environment variable name containing the token secret.
    pub token_secret_env: Option<String>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "tellive", "tellive").map_or_else(
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
    p.push("tellive");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from an explicit file + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TELLDUS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write to an explicit path.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile selection ───────────────────────────────────────────────

/// The profile name to use: explicit request, else the config default.
pub fn active_profile_name(config: &Config, requested: Option<&str>) -> String {
    requested
        .map(ToOwned::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Look up a profile by name.
pub fn profile<'a>(config: &'a Config, name: &str) -> Result<&'a Profile, ConfigError> {
    config
        .profiles
        .get(name)
        .ok_or_else(|| ConfigError::ProfileNotFound {
            profile: name.to_owned(),
        })
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the four-part credential set for a profile.
///
/// Each secret is tried in order: the env var named by the profile's
/// `*_env` field, the `TELLDUS_PRIVATE_KEY` / `TELLDUS_TOKEN_SECRET`
/// variables, the system keyring, then plaintext in the config.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    if profile.public_key.is_empty() {
        return Err(ConfigError::Validation {
            field: "public_key".into(),
            reason: "must not be empty".into(),
        });
    }
    if profile.token.is_empty() {
        return Err(ConfigError::Validation {
            field: "token".into(),
            reason: "must not be empty".into(),
        });
    }

    let private_key = resolve_secret(
        profile_name,
        "private-key",
        profile.private_key_env.as_deref(),
        "TELLDUS_PRIVATE_KEY",
        profile.private_key.as_deref(),
    )?;
    let token_secret = resolve_secret(
        profile_name,
        "token-secret",
        profile.token_secret_env.as_deref(),
        "TELLDUS_TOKEN_SECRET",
        profile.token_secret.as_deref(),
    )?;

    Ok(Credentials {
        public_key: profile.public_key.clone(),
        private_key,
        token: profile.token.clone(),
        token_secret,
    })
}

fn resolve_secret(
    profile_name: &str,
    keyring_suffix: &str,
    env_override: Option<&str>,
    default_env: &str,
    plaintext: Option<&str>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's *_env → env var lookup
    if let Some(env_name) = env_override {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var(default_env) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new("tellive", &format!("{profile_name}/{keyring_suffix}"))
    {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(value) = plaintext {
        return Ok(SecretString::from(value.to_owned()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Transport settings for a profile (default timeout unless overridden).
pub fn profile_transport(profile: &Profile) -> TransportConfig {
    profile.timeout.map_or_else(TransportConfig::default, |secs| {
        TransportConfig::with_timeout(Duration::from_secs(secs))
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn profile_with_plaintext() -> Profile {
        Profile {
            public_key: "pub".into(),
            token: "tok".into(),
            private_key: Some("priv".into()),
            token_secret: Some("sec".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn plaintext_profile_resolves() {
        let credentials = resolve_credentials(&profile_with_plaintext(), "default").unwrap();
        assert_eq!(credentials.public_key, "pub");
        assert_eq!(credentials.token, "tok");
    }

    #[test]
    fn missing_secret_is_no_credentials() {
        let profile = Profile {
            public_key: "pub".into(),
            token: "tok".into(),
            ..Profile::default()
        };
        let result = resolve_credentials(&profile, "home");
        assert!(
            matches!(result, Err(ConfigError::NoCredentials { ref profile }) if profile == "home")
        );
    }

    #[test]
    fn empty_public_key_is_rejected() {
        let profile = Profile {
            token: "tok".into(),
            private_key: Some("priv".into()),
            token_secret: Some("sec".into()),
            ..Profile::default()
        };
        assert!(matches!(
            resolve_credentials(&profile, "default"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn active_profile_prefers_explicit_request() {
        let config = Config {
            default_profile: Some("home".into()),
            profiles: HashMap::new(),
        };
        assert_eq!(active_profile_name(&config, Some("work")), "work");
        assert_eq!(active_profile_name(&config, None), "home");

        let bare = Config {
            default_profile: None,
            profiles: HashMap::new(),
        };
        assert_eq!(active_profile_name(&bare, None), "default");
    }

    #[test]
    fn config_round_trips_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config
            .profiles
            .insert("home".into(), profile_with_plaintext());
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("default"));
        let profile = profile(&loaded, "home").unwrap();
        assert_eq!(profile.public_key, "pub");
        assert_eq!(profile.private_key.as_deref(), Some("priv"));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let config = Config::default();
        assert!(matches!(
            profile(&config, "nope"),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn transport_honors_timeout_override() {
        let mut p = profile_with_plaintext();
        assert_eq!(
            profile_transport(&p).timeout,
            tellive_api::transport::DEFAULT_TIMEOUT
        );
        p.timeout = Some(30);
        assert_eq!(profile_transport(&p).timeout, Duration::from_secs(30));
    }
}
