//! Profile-based configuration for `unifi-client`.
//!
//! TOML profiles, password resolution (env + plaintext), and translation
//! to `unifi_client::ConnectionConfig`.

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

use unifi_client::{ConnectionConfig, ControllerFlavor, DEFAULT_SITE, TlsMode};

/// Environment variable consulted for the password when a profile names
/// no `password_env` of its own.
pub const PASSWORD_ENV: &str = "UNIFI_PASSWORD";

/// Environment variable consulted when a profile has no `username`.
pub const USERNAME_ENV: &str = "UNIFI_USERNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found in config")]
    UnknownProfile { profile: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Client(#[from] unifi_client::Error),
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
    /// Profile used when none is named explicitly.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
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
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            verify_tls: default_verify_tls(),
            timeout: default_timeout(),
        }
    }
}

fn default_verify_tls() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}

/// A named controller profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "https://192.168.1.1:8443").
    pub controller: String,

    /// Site identifier (the short name, not the description).
    #[serde(default = "default_site")]
    pub site: String,

    /// "legacy" or "unifi-os". Legacy when unset.
    pub flavor: Option<String>,

    pub username: Option<String>,

    /// Password (plaintext; prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override the global TLS verification setting.
    pub verify_tls: Option<bool>,

    /// Path to a custom CA certificate (PEM). Takes precedence over `verify_tls`.
    pub ca_cert: Option<PathBuf>,

    /// Override timeout, in seconds.
    pub timeout: Option<u64>,
}

fn default_site() -> String {
    DEFAULT_SITE.into()
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name, p))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }

    /// Resolve a profile straight to a client configuration.
    pub fn connection_config(&self, name: Option<&str>) -> Result<ConnectionConfig, ConfigError> {
        let (name, profile) = self.profile(name)?;
        profile_to_connection_config(profile, name, &self.defaults)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "unifi-client", "unifi-client").map_or_else(
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
    p.push("unifi-client");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, layered under `UNIFI_`-prefixed env vars.
///
/// Nested keys use a double underscore: `UNIFI_DEFAULTS__TIMEOUT=10`.
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("UNIFI_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Username from the profile, else `UNIFI_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the password from the credential chain.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. UNIFI_PASSWORD
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Build a `ConnectionConfig` from a profile and the global defaults.
pub fn profile_to_connection_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ConnectionConfig, ConfigError> {
    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    let flavor = match profile.flavor.as_deref() {
        Some(raw) => raw
            .parse::<ControllerFlavor>()
            .map_err(|reason| ConfigError::Validation {
                field: "flavor".into(),
                reason,
            })?,
        None => ControllerFlavor::default(),
    };

    let tls = match profile.ca_cert {
        Some(ref ca_path) => TlsMode::CustomCa(ca_path.clone()),
        None => TlsMode::from_verify_flag(profile.verify_tls.unwrap_or(defaults.verify_tls)),
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    let config = ConnectionConfig::new(&profile.controller, &username, password, &profile.site)?
        .with_flavor(flavor)
        .with_tls(tls)
        .with_timeout(timeout);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "home"

[defaults]
timeout = 15

[profiles.home]
controller = "https://192.168.1.1"
flavor = "unifi-os"
username = "admin"
password = "plain"

[profiles.lab]
controller = "https://lab.example.com:8443"
site = "Lab"
username = "ops"
password_env = "LAB_CONTROLLER_PASSWORD"
verify_tls = false
timeout = 5
"#;

    fn profile(controller: &str) -> Profile {
        Profile {
            controller: controller.into(),
            site: default_site(),
            flavor: None,
            username: Some("admin".into()),
            password: Some("plain".into()),
            password_env: None,
            verify_tls: None,
            ca_cert: None,
            timeout: None,
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("absent.toml")).unwrap();
            assert_eq!(cfg.default_profile.as_deref(), Some("default"));
            assert!(cfg.defaults.verify_tls);
            assert_eq!(cfg.defaults.timeout, 30);
            assert!(cfg.profiles.is_empty());
            Ok(())
        });
    }

    #[test]
    fn loads_profiles_and_env_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("UNIFI_DEFAULTS__TIMEOUT", "45");

            let cfg = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert_eq!(cfg.defaults.timeout, 45);
            assert_eq!(cfg.profiles.len(), 2);

            let (name, home) = cfg.profile(None).unwrap();
            assert_eq!(name, "home");
            assert_eq!(home.site, "default");
            assert_eq!(home.flavor.as_deref(), Some("unifi-os"));
            Ok(())
        });
    }

    #[test]
    fn connection_config_from_profile() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("LAB_CONTROLLER_PASSWORD", "from-env");

            let cfg = load_config_from(&jail.directory().join("config.toml")).unwrap();

            let home = cfg.connection_config(None).unwrap();
            assert_eq!(home.flavor(), ControllerFlavor::UnifiOs);
            assert_eq!(home.timeout(), Duration::from_secs(15));
            assert_eq!(home.transport().tls, TlsMode::Verify);
            assert_eq!(home.password().expose_secret(), "plain");

            let lab = cfg.connection_config(Some("lab")).unwrap();
            assert_eq!(lab.site(), "lab");
            assert_eq!(lab.flavor(), ControllerFlavor::Legacy);
            assert_eq!(lab.timeout(), Duration::from_secs(5));
            assert_eq!(lab.transport().tls, TlsMode::DangerAcceptInvalid);
            assert_eq!(lab.password().expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        let err = cfg.connection_config(Some("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { ref profile } if profile == "nope"));
    }

    #[test]
    fn password_env_beats_plaintext() {
        Jail::expect_with(|jail| {
            jail.set_env("HOME_CONTROLLER_PASSWORD", "secret-from-env");
            let mut p = profile("https://unifi.local");
            p.password_env = Some("HOME_CONTROLLER_PASSWORD".into());

            let pw = resolve_password(&p, "home").unwrap();
            assert_eq!(pw.expose_secret(), "secret-from-env");
            Ok(())
        });
    }

    #[test]
    fn unifi_password_env_is_second_in_chain() {
        Jail::expect_with(|jail| {
            jail.set_env(PASSWORD_ENV, "global");
            let mut p = profile("https://unifi.local");
            p.password_env = Some("UNSET_CONTROLLER_PASSWORD".into());

            let pw = resolve_password(&p, "home").unwrap();
            assert_eq!(pw.expose_secret(), "global");
            Ok(())
        });
    }

    #[test]
    fn no_password_anywhere() {
        Jail::expect_with(|_| {
            let mut p = profile("https://unifi.local");
            p.password = None;
            let err = resolve_password(&p, "home").unwrap_err();
            assert!(matches!(err, ConfigError::NoCredentials { .. }));
            Ok(())
        });
    }

    #[test]
    fn bad_flavor_is_validation_error() {
        let mut p = profile("https://unifi.local");
        p.flavor = Some("cloud".into());
        let err = profile_to_connection_config(&p, "home", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "flavor"));
    }

    #[test]
    fn plain_http_controller_rejected() {
        let p = profile("http://unifi.example.com");
        let err = profile_to_connection_config(&p, "home", &Defaults::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Client(unifi_client::Error::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn ca_cert_overrides_verify_flag() {
        let mut p = profile("https://unifi.local");
        p.verify_tls = Some(false);
        p.ca_cert = Some(PathBuf::from("/etc/ssl/unifi.pem"));
        let cfg = profile_to_connection_config(&p, "home", &Defaults::default()).unwrap();
        assert_eq!(
            cfg.transport().tls,
            TlsMode::CustomCa(PathBuf::from("/etc/ssl/unifi.pem"))
        );
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), profile("https://unifi.local"));
        save_config_to(&cfg, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[profiles.default]"), "{text}");

        let loaded = load_config_from(&path).unwrap();
        let (_, p) = loaded.profile(None).unwrap();
        assert_eq!(p.controller, "https://unifi.local");
    }
}
