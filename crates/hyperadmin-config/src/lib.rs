//! Shared configuration for the hyperadmin CLI.
//!
//! TOML profiles layered with environment overrides, and translation to
//! `hyperadmin_core::ClientConfig`. The CLI applies its flag overrides on
//! top of what this crate resolves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hyperadmin_core::config::DEFAULT_ENTRY_PATH;
use hyperadmin_core::{ClientConfig, UnregisteredPolicy};

/// Environment prefix; nested keys are separated by a double underscore
/// (`HYPERADMIN_PROFILES__LOCAL__API_URL`).
pub const ENV_PREFIX: &str = "HYPERADMIN_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

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
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile, falling back to `default_profile`.
    ///
    /// An explicitly requested profile must exist; a missing default
    /// profile yields `Ok(None)`.
    pub fn profile(&self, name: Option<&str>) -> Result<Option<(String, &Profile)>, ConfigError> {
        if let Some(name) = name {
            return self
                .profiles
                .get(name)
                .map(|p| Some((name.to_owned(), p)))
                .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() });
        }
        Ok(self
            .default_profile
            .as_deref()
            .and_then(|name| self.profiles.get(name).map(|p| (name.to_owned(), p))))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds; unset waits for the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Reject link relations outside the known vocabulary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_relations: Option<bool>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: None,
            strict_relations: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named forum API profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Base URL of the API server (e.g., "http://localhost:5000").
    pub api_url: String,

    /// Path of the users collection.
    #[serde(default = "default_entry_path")]
    pub entry_path: String,

    /// Override timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override relation strictness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_relations: Option<bool>,
}

fn default_entry_path() -> String {
    DEFAULT_ENTRY_PATH.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "hyperadmin", "hyperadmin").map_or_else(
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
    p.push("hyperadmin");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment. A missing file is not an
/// error: defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ClientConfig` from a profile and the global defaults.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL '{}': {e}", profile.api_url),
        })?;

    let mut config = ClientConfig::new(api_url);
    config.entry_path.clone_from(&profile.entry_path);
    config.timeout = profile
        .timeout
        .or(defaults.timeout)
        .map(Duration::from_secs);
    config.unregistered_relations =
        relation_policy(profile.strict_relations.or(defaults.strict_relations));
    Ok(config)
}

/// `Some(true)` → fatal, `Some(false)` → log and ignore, unset → build default.
pub fn relation_policy(strict: Option<bool>) -> UnregisteredPolicy {
    match strict {
        Some(true) => UnregisteredPolicy::Fatal,
        Some(false) => UnregisteredPolicy::LogAndIgnore,
        None => UnregisteredPolicy::default(),
    }
}
