// ── Core error types ──
//
// Errors surfaced by hyperadmin-core. Transport-layer failures are folded
// into the four classes the orchestrator applies recovery policy to; the
// remaining variants are caller mistakes against the form and selection
// APIs.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Failure classes ──────────────────────────────────────────────
    /// Connection failure or a non-success status other than 404.
    #[error("Request to {url} failed: {message}")]
    TransportFailure {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// The server reported the resource as absent.
    #[error("Not found: {url}")]
    NotFound { url: String, message: Option<String> },

    /// The payload did not match the expected media type.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// A relation name outside the known vocabulary was dispatched.
    #[error("Unregistered link relation: {rel}")]
    UnregisteredRelation { rel: String },

    // ── Caller errors ────────────────────────────────────────────────
    #[error("No user is selected")]
    NoSelection,

    #[error("Field `{name}` is read-only")]
    FieldNotEditable { name: String },

    #[error("Form has no field named `{name}`")]
    UnknownField { name: String },

    #[error("Form has no action URL")]
    MissingAction,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The message the server attached to a failed exchange, falling back
    /// to the error's own rendering.
    pub fn user_message(&self) -> String {
        match self {
            Self::TransportFailure { message, .. } => message.clone(),
            Self::NotFound {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hyperadmin_api::Error> for CoreError {
    fn from(err: hyperadmin_api::Error) -> Self {
        use hyperadmin_api::Error as ApiError;

        match err {
            ApiError::Status {
                url,
                status: 404,
                message,
            } => CoreError::NotFound { url, message },
            ApiError::Status {
                url,
                status,
                message,
            } => CoreError::TransportFailure {
                message: message.unwrap_or_else(|| format!("HTTP {status}")),
                url,
                status: Some(status),
            },
            ApiError::Transport(ref e) => {
                let url = e.url().map(ToString::to_string).unwrap_or_default();
                if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound { url, message: None }
                } else {
                    CoreError::TransportFailure {
                        url,
                        status: e.status().map(|s| s.as_u16()),
                        message: e.to_string(),
                    }
                }
            }
            ApiError::Serialization { url, source } => CoreError::TransportFailure {
                url,
                status: None,
                message: source.to_string(),
            },
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            e @ (ApiError::Deserialization { .. }
            | ApiError::Malformed { .. }
            | ApiError::UnsupportedMediaType { .. }) => CoreError::MalformedResponse {
                message: e.to_string(),
            },
        }
    }
}
