//! Error types for lexis operations.
//!
//! Every failure is scoped to a single request. Store failures are the only
//! retryable class; missing records and bad input are reported as-is.

use thiserror::Error;

/// Result type alias for lexis operations.
pub type LexisResult<T> = Result<T, LexisError>;

/// Main error type for all lexis operations.
#[derive(Error, Debug)]
pub enum LexisError {
    /// A word or learner record required by the operation is missing.
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        resource: Option<String>,
    },

    /// The word store could not serve the request.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input failed validation at the boundary.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        code: ErrorCode,
        field: Option<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Not found (NF_xxx)
    WordNotFound,
    SettingsNotFound,

    // Store (STORE_xxx)
    StoreOperationFailed,
    StoreLockPoisoned,
    StoreCorruptRecord,

    // Validation (VAL_xxx)
    ValInvalidInput,
    ValOutOfRange,
    ValMissingField,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::WordNotFound => "NF_001",
            ErrorCode::SettingsNotFound => "NF_002",
            ErrorCode::StoreOperationFailed => "STORE_001",
            ErrorCode::StoreLockPoisoned => "STORE_002",
            ErrorCode::StoreCorruptRecord => "STORE_003",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValOutOfRange => "VAL_002",
            ErrorCode::ValMissingField => "VAL_003",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl LexisError {
    /// Create a not found error for a word, looked up by id or term.
    pub fn word_not_found(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::NotFound {
            message: format!("Word '{}' not found", key),
            code: ErrorCode::WordNotFound,
            resource: Some(key),
        }
    }

    /// Create a not found error for missing learner settings.
    pub fn settings_not_found(learner_id: impl Into<String>) -> Self {
        let learner_id = learner_id.into();
        Self::NotFound {
            message: format!("Settings for learner '{}' not found", learner_id),
            code: ErrorCode::SettingsNotFound,
            resource: Some(learner_id),
        }
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            code: ErrorCode::StoreOperationFailed,
            source: None,
        }
    }

    /// Create a store error for a poisoned lock.
    pub fn lock_poisoned(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            code: ErrorCode::StoreLockPoisoned,
            source: None,
        }
    }

    /// Create a store error for a row that could not be decoded.
    pub fn corrupt_record(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            code: ErrorCode::StoreCorruptRecord,
            source: None,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            field: None,
        }
    }

    /// Create an out-of-range error for a named field.
    pub fn out_of_range(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            code: ErrorCode::ValOutOfRange,
            field: Some(field.into()),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::InvalidInput {
            message: format!("Field '{}' is required", field),
            code: ErrorCode::ValMissingField,
            field: Some(field),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { code, .. } => *code,
            Self::StoreUnavailable { code, .. } => *code,
            Self::InvalidInput { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self.code() {
            ErrorCode::WordNotFound => Some("Check the word key; the vocabulary may not be seeded"),
            ErrorCode::SettingsNotFound => Some("Save learner settings before submitting answers"),
            ErrorCode::StoreOperationFailed | ErrorCode::StoreLockPoisoned => {
                Some("The word store is unavailable, try again shortly")
            }
            ErrorCode::ValOutOfRange => Some("Adjust the value to the allowed range"),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for LexisError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StoreUnavailable {
            message: err.to_string(),
            code: ErrorCode::StoreOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}
