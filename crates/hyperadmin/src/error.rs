//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use hyperadmin_config::ConfigError;
use hyperadmin_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const PROTOCOL: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the forum API at {url}")]
    #[diagnostic(
        code(hyperadmin::connection_failed),
        help(
            "Check that the forum service is running and accessible.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Resource '{url}' not found")]
    #[diagnostic(
        code(hyperadmin::not_found),
        help("Run: hyperadmin users list to see available users")
    )]
    NotFound { url: String },

    #[error("Conflict: {message}")]
    #[diagnostic(
        code(hyperadmin::conflict),
        help("A user with the same nickname probably exists already.")
    )]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({status}): {message}")]
    #[diagnostic(code(hyperadmin::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response: {message}")]
    #[diagnostic(
        code(hyperadmin::malformed_response),
        help("The server answered with a document that is neither Collection+JSON nor HAL.")
    )]
    MalformedResponse { message: String },

    #[error("The server advertised an unknown link relation '{rel}'")]
    #[diagnostic(
        code(hyperadmin::unregistered_relation),
        help(
            "This client may be older than the server.\n\
             Set `strict_relations = false` in your profile to ignore unknown relations."
        )
    )]
    UnregisteredRelation { rel: String },

    #[error("Operation '{operation}' is not offered for this resource")]
    #[diagnostic(
        code(hyperadmin::unsupported),
        help("The server did not advertise the link relation this operation needs.")
    )]
    Unsupported { operation: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hyperadmin::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hyperadmin::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: hyperadmin config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No forum API configured")]
    #[diagnostic(
        code(hyperadmin::no_config),
        help(
            "Pass --api-url, set HYPERADMIN_API_URL, or create a profile with: hyperadmin config init\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(hyperadmin::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(hyperadmin::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON output: {0}")]
    #[diagnostic(code(hyperadmin::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::MalformedResponse { .. } | Self::UnregisteredRelation { .. } => {
                exit_code::PROTOCOL
            }
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TransportFailure {
                url,
                status: None,
                message,
            } => CliError::ConnectionFailed {
                url,
                reason: message,
            },

            CoreError::TransportFailure {
                status: Some(409),
                message,
                ..
            } => CliError::Conflict { message },

            CoreError::TransportFailure {
                status: Some(status),
                message,
                ..
            } => CliError::ApiError { status, message },

            CoreError::NotFound { url, .. } => CliError::NotFound { url },

            CoreError::MalformedResponse { message } => CliError::MalformedResponse { message },

            CoreError::UnregisteredRelation { rel } => CliError::UnregisteredRelation { rel },

            CoreError::NoSelection => CliError::Unsupported {
                operation: "reload".into(),
            },

            CoreError::MissingAction => CliError::Unsupported {
                operation: "submit".into(),
            },

            CoreError::FieldNotEditable { name } => CliError::Validation {
                field: name,
                reason: "the field is read-only".into(),
            },

            CoreError::UnknownField { name } => CliError::Validation {
                field: name,
                reason: "the form has no such field".into(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_map_by_status() {
        let offline = CliError::from(CoreError::TransportFailure {
            url: "http://localhost:5000/forum/api/users/".into(),
            status: None,
            message: "connection refused".into(),
        });
        assert_eq!(offline.exit_code(), exit_code::CONNECTION);

        let conflict = CliError::from(CoreError::TransportFailure {
            url: "/forum/api/users/".into(),
            status: Some(409),
            message: "Nickname already in use".into(),
        });
        assert_eq!(conflict.exit_code(), exit_code::CONFLICT);

        let server = CliError::from(CoreError::TransportFailure {
            url: "/forum/api/users/".into(),
            status: Some(500),
            message: "HTTP 500".into(),
        });
        assert!(matches!(server, CliError::ApiError { status: 500, .. }));
    }

    #[test]
    fn form_errors_are_usage_errors() {
        let err = CliError::from(CoreError::FieldNotEditable {
            name: "nickname".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(err.to_string().contains("nickname"));
    }
}
