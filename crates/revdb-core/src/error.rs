//! Error types for revdb operations.
//!
//! Every failure a caller can observe maps to one variant here and carries a
//! stable [`ErrorCode`] for programmatic handling. Broken store invariants are
//! not represented: they panic.

use thiserror::Error;

/// Result type alias for revdb operations.
pub type RevResult<T> = Result<T, RevError>;

/// Main error type for all revdb operations.
#[derive(Error, Debug)]
pub enum RevError {
    /// Input validation failed (empty title, bad maintainer email, unsupported filter).
    #[error("Validation error: {message}")]
    Validation { message: String, code: ErrorCode },

    /// Application is absent, or soft-deleted where presence is required.
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        title: Option<String>,
    },

    /// The requested transition is not allowed from the key's current state.
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        code: ErrorCode,
        title: Option<String>,
    },

    /// Admission control rejected the request.
    ///
    /// `retry_after` is the number of whole seconds until a token is available,
    /// or `None` when the gate never refills.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        code: ErrorCode,
        retry_after: Option<u64>,
    },

    /// A document in a YAML stream could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_yaml::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValMissingField,
    ValInvalidFormat,
    ValInvalidFilter,

    // Application state (APP_xxx)
    AppNotFound,
    AppDeleted,
    AppAlreadyExists,
    AppUnchanged,

    // Rate Limit (RATE_xxx)
    RateLimitExceeded,

    // Decode (DEC_xxx)
    DecInvalidYaml,

    // Configuration (CFG_xxx)
    CfgInvalid,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValMissingField => "VAL_001",
            ErrorCode::ValInvalidFormat => "VAL_002",
            ErrorCode::ValInvalidFilter => "VAL_003",
            ErrorCode::AppNotFound => "APP_001",
            ErrorCode::AppDeleted => "APP_002",
            ErrorCode::AppAlreadyExists => "APP_003",
            ErrorCode::AppUnchanged => "APP_004",
            ErrorCode::RateLimitExceeded => "RATE_001",
            ErrorCode::DecInvalidYaml => "DEC_001",
            ErrorCode::CfgInvalid => "CFG_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl RevError {
    /// Create a validation error for a missing required field.
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValMissingField,
        }
    }

    /// Create a validation error for a malformed field value.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidFormat,
        }
    }

    /// Create a validation error for an unsupported list filter.
    pub fn invalid_filter(key: impl AsRef<str>) -> Self {
        Self::Validation {
            message: format!("the query key {} is not supported", key.as_ref()),
            code: ErrorCode::ValInvalidFilter,
        }
    }

    /// The key has never been created.
    pub fn not_found(title: impl Into<String>) -> Self {
        let title = title.into();
        Self::NotFound {
            message: format!("application with title {} does not exist", title),
            code: ErrorCode::AppNotFound,
            title: Some(title),
        }
    }

    /// The key exists but its newest revision is soft-deleted.
    pub fn deleted(title: impl Into<String>) -> Self {
        let title = title.into();
        Self::NotFound {
            message: format!("application with title {} has been deleted", title),
            code: ErrorCode::AppDeleted,
            title: Some(title),
        }
    }

    /// Create on a key whose newest revision is active.
    pub fn already_exists(title: impl Into<String>) -> Self {
        let title = title.into();
        Self::Conflict {
            message: format!("application {} has already been created", title),
            code: ErrorCode::AppAlreadyExists,
            title: Some(title),
        }
    }

    /// Update or delete on a key whose newest revision is soft-deleted.
    pub fn conflict_deleted(title: impl Into<String>) -> Self {
        let title = title.into();
        Self::Conflict {
            message: format!("application {} has been deleted", title),
            code: ErrorCode::AppDeleted,
            title: Some(title),
        }
    }

    /// Update that would not change any comparable attribute.
    pub fn unchanged(title: impl Into<String>) -> Self {
        let title = title.into();
        Self::Conflict {
            message: format!("application {} is up-to-date, abort update", title),
            code: ErrorCode::AppUnchanged,
            title: Some(title),
        }
    }

    /// Create a rate limit error.
    pub fn rate_limit(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            code: ErrorCode::RateLimitExceeded,
            retry_after,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Conflict { code, .. } => *code,
            Self::RateLimit { code, .. } => *code,
            Self::Decode(_) => ErrorCode::DecInvalidYaml,
            Self::Configuration(_) => ErrorCode::CfgInvalid,
            Self::Io(_) => ErrorCode::Internal,
        }
    }

    /// Whether this error is a `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error is a `Conflict`.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Whether this error is a `Validation`.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = RevError::not_found("nginx");
        assert_eq!(err.code(), ErrorCode::AppNotFound);
        assert!(err.is_not_found());
        assert!(err.to_string().contains("nginx"));
    }

    #[test]
    fn test_deleted_is_not_found_but_conflict_deleted_is_conflict() {
        assert!(RevError::deleted("x").is_not_found());
        assert!(RevError::conflict_deleted("x").is_conflict());
        assert_eq!(RevError::conflict_deleted("x").code(), ErrorCode::AppDeleted);
    }

    #[test]
    fn test_invalid_filter_message() {
        let err = RevError::invalid_filter("owner");
        assert!(err.is_validation());
        assert_eq!(err.code().as_str(), "VAL_003");
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn test_rate_limit_carries_retry_after() {
        let err = RevError::rate_limit("slow down", Some(2));
        assert_eq!(err.code(), ErrorCode::RateLimitExceeded);
        assert!(matches!(
            err,
            RevError::RateLimit {
                retry_after: Some(2),
                ..
            }
        ));
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::AppUnchanged.as_str(), "APP_004");
        assert_eq!(ErrorCode::RateLimitExceeded.as_str(), "RATE_001");
    }
}
