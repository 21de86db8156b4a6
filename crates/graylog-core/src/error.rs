use thiserror::Error;

/// Boxed cause carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error types for Graylog reconciliation operations
#[derive(Debug, Error)]
pub enum GraylogError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {message}: {cause}")]
    Transport { message: String, cause: BoxError },

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Multiple {kind}s found with title: {title}. Please use id instead.")]
    Ambiguous {
        kind: String,
        title: String,
        count: usize,
    },

    #[error("No {kind} found with {field}: {value}")]
    NotFound {
        kind: String,
        field: String,
        value: String,
    },

    #[error("failed to {operation} {target}: {cause}")]
    Operation {
        operation: String,
        target: String,
        cause: Box<GraylogError>,
    },
}

impl GraylogError {
    /// Create a new Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a new Transport error wrapping the underlying cause
    pub fn transport(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Transport {
            message: message.into(),
            cause: cause.into(),
        }
    }

    /// Create a new Api error from a non-2xx response
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a new Ambiguous error for a title that matched `count` records
    pub fn ambiguous(kind: impl Into<String>, title: impl Into<String>, count: usize) -> Self {
        Self::Ambiguous {
            kind: kind.into(),
            title: title.into(),
            count,
        }
    }

    /// Create a new NotFound error
    pub fn not_found(
        kind: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            kind: kind.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Wrap an error with the operation and target it failed on.
    ///
    /// Validation errors are returned unchanged: they already name the
    /// offending field and never reach the network.
    pub fn during(self, operation: impl Into<String>, target: impl Into<String>) -> Self {
        match self {
            Self::Validation(_) => self,
            other => Self::Operation {
                operation: operation.into(),
                target: target.into(),
                cause: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping operation context.
    pub fn root(&self) -> &GraylogError {
        match self {
            Self::Operation { cause, .. } => cause.root(),
            other => other,
        }
    }

    /// HTTP status of the remote response, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error means the remote record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound { .. }) || self.status() == Some(404)
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self.root() {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::Api { .. } => ErrorCategory::Api,
            Self::Ambiguous { .. } => ErrorCategory::Ambiguous,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Operation { .. } => unreachable!("root() never returns an Operation"),
        }
    }
}

impl From<serde_json::Error> for GraylogError {
    fn from(e: serde_json::Error) -> Self {
        Self::transport("JSON encoding failed", e)
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Transport,
    Api,
    Ambiguous,
    NotFound,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Configuration => write!(f, "configuration"),
            Self::Transport => write!(f, "transport"),
            Self::Api => write!(f, "api"),
            Self::Ambiguous => write!(f, "ambiguous"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}

/// Convenience result type for Graylog operations
pub type Result<T> = std::result::Result<T, GraylogError>;
