//! Resolution of the runtime `ClientConfig` from the config file, the
//! active profile, and CLI flag overrides.
//!
//! Precedence: flag > environment > profile > `[defaults]`.

use std::time::Duration;

use hyperadmin_config::{
    Config, ConfigError, config_path, profile_to_client_config, relation_policy,
};
use hyperadmin_core::ClientConfig;
use tracing::debug;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `ClientConfig` for the current invocation.
pub fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = hyperadmin_config::load_config()?;
    resolve(&cfg, global)
}

fn resolve(cfg: &Config, global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let profile = cfg
        .profile(global.profile.as_deref())
        .map_err(|e| match e {
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: available_profiles(cfg),
            },
            other => other.into(),
        })?;

    let mut client = match profile {
        Some((name, profile)) => {
            debug!(profile = %name, "using profile");
            profile_to_client_config(profile, &cfg.defaults)?
        }
        // No profile -- the API URL must come from flags / env alone
        None => {
            let url_str = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            let mut client = ClientConfig::new(parse_api_url(url_str)?);
            client.timeout = cfg.defaults.timeout.map(Duration::from_secs);
            client.unregistered_relations = relation_policy(cfg.defaults.strict_relations);
            client
        }
    };

    if let Some(url_str) = global.api_url.as_deref() {
        client.api_url = parse_api_url(url_str)?;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Some(Duration::from_secs(secs));
    }
    Ok(client)
}

fn parse_api_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "api-url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}
