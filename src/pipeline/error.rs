use std::fmt;

/// Errors that a stage can short-circuit a pipeline with
///
/// Every error carries a stable machine-readable code (see [`code`](Self::code))
/// and a human-readable description via `Display`. A failing stage may return
/// one or more of these in a single error outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Request data failed validation
    Validation {
        message: String,
    },

    /// A lookup completed but matched no data
    NotFound {
        message: String,
    },

    /// A context path referenced by a stage does not exist
    PathNotFound {
        path: String,
    },

    /// A request-scoped dependency (e.g. the repository) failed
    Service {
        message: String,
    },

    /// The invocation's cancellation signal was observed by a stage
    Cancelled {
        stage: String,
    },

    /// Generic error for custom codes and messages
    Custom {
        code: String,
        message: String,
    },
}

impl PipelineError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a PathNotFound error
    pub fn path_not_found(path: impl Into<String>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Create a Service error
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
        }
    }

    /// Create a Cancelled error naming the stage that observed the signal
    pub fn cancelled(stage: impl Into<String>) -> Self {
        Self::Cancelled {
            stage: stage.into(),
        }
    }

    /// Create a Custom error with an explicit code
    pub fn custom(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Custom {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error
    pub fn code(&self) -> &str {
        match self {
            PipelineError::Validation { .. } => "validation",
            PipelineError::NotFound { .. } => "not_found",
            PipelineError::PathNotFound { .. } => "path_not_found",
            PipelineError::Service { .. } => "service",
            PipelineError::Cancelled { .. } => "cancelled",
            PipelineError::Custom { code, .. } => code,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Validation { message } => {
                write!(f, "Validation failed: {}", message)
            }
            PipelineError::NotFound { message } => {
                write!(f, "Not found: {}", message)
            }
            PipelineError::PathNotFound { path } => {
                write!(f, "Path not found: {}", path)
            }
            PipelineError::Service { message } => {
                write!(f, "Service error: {}", message)
            }
            PipelineError::Cancelled { stage } => {
                write!(f, "Cancelled during stage '{}'", stage)
            }
            PipelineError::Custom { message, .. } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for PipelineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        let err = PipelineError::validation("title must not be empty");
        assert_eq!(err.code(), "validation");
        assert_eq!(err.to_string(), "Validation failed: title must not be empty");
    }

    #[test]
    fn test_not_found() {
        let err = PipelineError::not_found("No data found in 'posts'");
        assert_eq!(err.code(), "not_found");
        assert_eq!(err.to_string(), "Not found: No data found in 'posts'");
    }

    #[test]
    fn test_path_not_found() {
        let err = PipelineError::path_not_found("request.id");
        assert_eq!(err.code(), "path_not_found");
        assert_eq!(err.to_string(), "Path not found: request.id");
    }

    #[test]
    fn test_cancelled() {
        let err = PipelineError::cancelled("fetch");
        assert_eq!(err.code(), "cancelled");
        assert_eq!(err.to_string(), "Cancelled during stage 'fetch'");
    }

    #[test]
    fn test_custom_code() {
        let err = PipelineError::custom("rate_limited", "Too many requests");
        assert_eq!(err.code(), "rate_limited");
        assert_eq!(err.to_string(), "Too many requests");
    }
}
