use thiserror::Error;

/// Top-level error type for the `hyperadmin-api` crate.
///
/// Covers every failure mode at the transport boundary: the HTTP
/// exchange itself, non-success statuses, and payloads that do not match
/// either media type. `hyperadmin-core` maps these into its own taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing or joining error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The server answered with a non-success status.
    ///
    /// `message` is the `message` field of the JSON error body, when the
    /// server sent one.
    #[error("HTTP {status} from {url}{}", suffix(.message.as_deref()))]
    Status {
        url: String,
        status: u16,
        message: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A request body could not be encoded as JSON.
    #[error("Cannot encode request body for {url}: {source}")]
    Serialization {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The payload parsed as JSON but lacks the shape of the expected
    /// media type (e.g. a HAL document without `_links`).
    #[error("Malformed {expected} document: {message}")]
    Malformed {
        expected: &'static str,
        message: String,
    },

    /// A response declared a content type this client does not read.
    #[error("Unsupported media type: {content_type}")]
    UnsupportedMediaType { content_type: String },
}

fn suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl Error {
    /// Returns `true` if the server reported the resource as absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 404,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// HTTP status of the failed exchange, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The human-readable message the server attached to an error status.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` for payload-shape failures (as opposed to transport
    /// or status failures).
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Deserialization { .. } | Self::Malformed { .. } | Self::UnsupportedMediaType { .. }
        )
    }
}
