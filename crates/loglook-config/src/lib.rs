//! Shared configuration for LogLook clients.
//!
//! TOML profiles, user-identity resolution (env + keyring + plaintext),
//! and translation to `loglook_api::LogClient`. Project and chart
//! settings live here explicitly instead of being inferred from
//! whatever view happens to be open.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use loglook_api::{LogClient, TransportConfig};
use loglook_core::Period;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no user identity configured for profile '{profile}'")]
    NoIdentity { profile: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

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

    /// Named backend profiles.
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

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Chart window used when a profile doesn't pick one.
    #[serde(default = "default_chart_period")]
    pub chart_period: String,

    /// Page size for the report board listing.
    #[serde(default = "default_page_size")]
    pub report_page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            chart_period: default_chart_period(),
            report_page_size: default_page_size(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_chart_period() -> String {
    "day".into()
}
fn default_page_size() -> u32 {
    10
}

/// A named backend profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://logs.example.com").
    pub server: String,

    /// Project whose logs this profile explores.
    pub project: String,

    /// User identity sent as `x-user-id` (plaintext — prefer keyring or env).
    pub user_id: Option<String>,

    /// Environment variable name containing the user identity.
    pub user_id_env: Option<String>,

    /// Override chart period.
    pub chart_period: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "loglook", "loglook").map_or_else(
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
    p.push("loglook");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();
    load_config_from(&path)
}

/// Load a Config from an explicit file path + environment.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LOGLOOK_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Profile lookup ──────────────────────────────────────────────────

/// Select a profile by name, falling back to the config's default.
pub fn select_profile<'a>(
    config: &'a Config,
    name: Option<&str>,
) -> Result<(&'a str, &'a Profile), ConfigError> {
    let name = name
        .or(config.default_profile.as_deref())
        .unwrap_or("default");

    config
        .profiles
        .get_key_value(name)
        .map(|(k, v)| (k.as_str(), v))
        .ok_or_else(|| ConfigError::UnknownProfile {
            profile: name.into(),
        })
}

// ── Identity resolution ─────────────────────────────────────────────

/// Resolve the user identity from the credential chain:
/// env var (named by the profile) → system keyring → plaintext config.
pub fn resolve_user_id(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's user_id_env → env var lookup
    if let Some(ref env_name) = profile.user_id_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new("loglook", &format!("{profile_name}/user-id")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref id) = profile.user_id {
        return Ok(SecretString::from(id.clone()));
    }

    Err(ConfigError::NoIdentity {
        profile: profile_name.into(),
    })
}

// ── Translation to client settings ──────────────────────────────────

/// Build a `LogClient` from a profile.
pub fn profile_to_client(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<LogClient, ConfigError> {
    let url: url::Url = profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })?;

    let user_id = resolve_user_id(profile, profile_name)?;

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    let transport = TransportConfig::default().with_timeout(timeout);

    LogClient::new(url, user_id.expose_secret(), &transport).map_err(|e| {
        ConfigError::Validation {
            field: "server".into(),
            reason: e.to_string(),
        }
    })
}

/// The chart period a profile asks for, validated.
pub fn chart_period(profile: &Profile, defaults: &Defaults) -> Result<Period, ConfigError> {
    let raw = profile
        .chart_period
        .as_deref()
        .unwrap_or(&defaults.chart_period);

    raw.parse().map_err(|_| ConfigError::Validation {
        field: "chart_period".into(),
        reason: format!("expected 'day', 'week', or 'month', got '{raw}'"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(server: &str, project: &str) -> Profile {
        Profile {
            server: server.into(),
            project: project.into(),
            user_id: Some("tester".into()),
            user_id_env: None,
            chart_period: None,
            timeout: None,
        }
    }

    #[test]
    fn defaults_are_sensible() {
        let cfg = Config::default();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.defaults.chart_period, "day");
        assert_eq!(cfg.defaults.report_page_size, 10);
    }

    #[test]
    fn config_parses_from_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    default_profile = "prod"

                    [defaults]
                    timeout = 15

                    [profiles.prod]
                    server = "https://logs.example.com"
                    project = "proj-1"
                    user_id = "kim"
                "#,
            )?;

            let cfg = load_config_from(std::path::Path::new("config.toml")).unwrap();

            assert_eq!(cfg.default_profile.as_deref(), Some("prod"));
            assert_eq!(cfg.defaults.timeout, 15);
            // Unset keys keep their defaults.
            assert_eq!(cfg.defaults.report_page_size, 10);

            let (name, prof) = select_profile(&cfg, None).unwrap();
            assert_eq!(name, "prod");
            assert_eq!(prof.project, "proj-1");
            Ok(())
        });
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        let err = select_profile(&cfg, Some("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { .. }));
    }

    #[test]
    fn user_id_env_takes_precedence_over_plaintext() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("LOGLOOK_TEST_USER", "from-env");

            let mut prof = profile("https://logs.example.com", "proj-1");
            prof.user_id_env = Some("LOGLOOK_TEST_USER".into());

            let id = resolve_user_id(&prof, "default").unwrap();
            assert_eq!(id.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn plaintext_user_id_is_the_last_resort() {
        let prof = profile("https://logs.example.com", "proj-1");
        let id = resolve_user_id(&prof, "an-unlikely-profile-name").unwrap();
        assert_eq!(id.expose_secret(), "tester");
    }

    #[test]
    fn missing_identity_is_an_error() {
        let mut prof = profile("https://logs.example.com", "proj-1");
        prof.user_id = None;

        let err = resolve_user_id(&prof, "an-unlikely-profile-name").unwrap_err();
        assert!(matches!(err, ConfigError::NoIdentity { .. }));
    }

    #[test]
    fn profile_builds_a_client() {
        let prof = profile("https://logs.example.com", "proj-1");
        let client = profile_to_client(&prof, "default", &Defaults::default()).unwrap();
        assert_eq!(client.user_id(), "tester");
        assert_eq!(client.base_url().host_str(), Some("logs.example.com"));
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        let prof = profile("not a url", "proj-1");
        let err = profile_to_client(&prof, "default", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn chart_period_is_validated() {
        let mut prof = profile("https://logs.example.com", "proj-1");
        assert_eq!(chart_period(&prof, &Defaults::default()).unwrap(), Period::Day);

        prof.chart_period = Some("week".into());
        assert_eq!(chart_period(&prof, &Defaults::default()).unwrap(), Period::Week);

        prof.chart_period = Some("fortnight".into());
        assert!(chart_period(&prof, &Defaults::default()).is_err());
    }
}
