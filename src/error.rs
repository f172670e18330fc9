use thiserror::Error;

/// Inline validation feedback from document and collection edits.
///
/// These never abort an operation past its boundary: the caller shows the
/// message next to the offending field and the document stays unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} already contains '{key}'")]
    Duplicate { field: &'static str, key: String },

    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },
}

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] ureq::Error),

    #[error("Backend returned {status}: {message}")]
    NetworkError { status: u16, message: String },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("A target is already being edited; commit or discard it first")]
    SessionBusy,

    #[error("No target is being edited")]
    NoSession,

    #[error("Target index {index} is out of range ({len} targets)")]
    TargetIndexOutOfRange { index: usize, len: usize },

    #[error("The target under edit was removed from the template")]
    StaleTarget,

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Prompt aborted: {0}")]
    PromptError(String),
}

impl ConsoleError {
    /// Get an actionable hint for how to resolve this error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ConsoleError::HttpError(_) | ConsoleError::NetworkError { .. } => Some(
                "Check that the backend is reachable, then retry:\n  probectl config show"
            ),
            ConsoleError::TemplateNotFound(_) => Some(
                "Run `probectl list` to see available templates"
            ),
            ConsoleError::UrlParseError(_) => Some(
                "Use an absolute URL including the scheme, e.g. https://example.com/health"
            ),
            ConsoleError::SessionBusy => Some(
                "Commit or discard the open target draft before starting another"
            ),
            ConsoleError::StaleTarget => Some(
                "Discard the draft and reload the template with `probectl show <name>`"
            ),
            ConsoleError::TargetIndexOutOfRange { .. } => Some(
                "Run `probectl show <template>` to see target numbers"
            ),
            ConsoleError::ConfigError(_) => Some(
                "Fix the backend address with:\n  probectl config set --api-url http://host:port"
            ),
            _ => None,
        }
    }

    /// Whether this error is inline feedback the user can correct in place
    pub fn is_recoverable_input(&self) -> bool {
        matches!(
            self,
            ConsoleError::UrlParseError(_) | ConsoleError::Validation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
