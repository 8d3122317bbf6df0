// ── Runtime client configuration ──
//
// Describes *where* the forum API lives and how strictly relation
// dispatch behaves. Never touches disk: the CLI (via hyperadmin-config)
// constructs a `ClientConfig` and hands it in.

use std::time::Duration;

use url::Url;

use crate::error::CoreError;

/// Default entry point of the forum API.
pub const DEFAULT_ENTRY_PATH: &str = "/forum/api/users/";

/// What to do when a relation name outside the vocabulary is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnregisteredPolicy {
    /// Surface `CoreError::UnregisteredRelation`.
    Fatal,
    /// Log a warning and treat the relation as absent.
    LogAndIgnore,
}

impl Default for UnregisteredPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Fatal
        } else {
            Self::LogAndIgnore
        }
    }
}

/// Configuration for talking to one forum API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL relative links are resolved against (e.g. `http://localhost:5000`).
    pub api_url: Url,
    /// Path of the users collection, relative to `api_url`.
    pub entry_path: String,
    /// Request timeout; `None` waits for the server.
    pub timeout: Option<Duration>,
    pub unregistered_relations: UnregisteredPolicy,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            entry_path: DEFAULT_ENTRY_PATH.into(),
            timeout: None,
            unregistered_relations: UnregisteredPolicy::default(),
        }
    }

    /// Absolute URL of the users collection.
    pub fn entry_url(&self) -> Result<Url, CoreError> {
        self.api_url
            .join(&self.entry_path)
            .map_err(|e| CoreError::Config {
                message: format!("invalid entry path `{}`: {e}", self.entry_path),
            })
    }

    /// Transport settings derived from this config.
    pub fn transport_config(&self) -> hyperadmin_api::TransportConfig {
        hyperadmin_api::TransportConfig {
            timeout: self.timeout,
            ..Default::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entry_url_joins_default_path() {
        let config = ClientConfig::new(Url::parse("http://localhost:5000").unwrap());
        assert_eq!(
            config.entry_url().unwrap().as_str(),
            "http://localhost:5000/forum/api/users/"
        );
        assert!(config.transport_config().timeout.is_none());
    }
}
