use crate::domain::ledger::LedgerError;

/// Fallback message shown when the server gives no `detail`.
pub const GENERIC_API_ERROR: &str = "An API error occurred. Please try again.";

/// Simplified error system - one enum for every call site.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Request never reached the server or the connection dropped.
    NetworkError(String),
    /// Server answered with a non-2xx status.
    ApiError { status: u16, detail: Option<String> },
    /// Response body did not match the expected shape.
    DecodeError(String),
    ValidationError(String),
    StorageError(String),
    LedgerError(LedgerError),
}

impl AppError {
    /// Text suitable for a toast or an inline alert.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ApiError { detail: Some(detail), .. } => detail.clone(),
            AppError::ApiError { detail: None, .. }
            | AppError::NetworkError(_)
            | AppError::DecodeError(_) => GENERIC_API_ERROR.to_string(),
            AppError::ValidationError(msg) | AppError::StorageError(msg) => msg.clone(),
            AppError::LedgerError(err) => err.to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NetworkError(msg) => write!(f, "Network Error: {}", msg),
            AppError::ApiError { status, detail } => match detail {
                Some(detail) => write!(f, "API Error {}: {}", status, detail),
                None => write!(f, "API Error {}", status),
            },
            AppError::DecodeError(msg) => write!(f, "Decode Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::StorageError(msg) => write!(f, "Storage Error: {}", msg),
            AppError::LedgerError(err) => write!(f, "Ledger Error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError::LedgerError(err)
    }
}

// Simple convenience type aliases
pub type ApiResult<T> = Result<T, AppError>;
pub type StorageResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_detail_wins_over_generic_message() {
        let err = AppError::ApiError { status: 400, detail: Some("Username already exists".into()) };
        assert_eq!(err.user_message(), "Username already exists");

        let err = AppError::ApiError { status: 500, detail: None };
        assert_eq!(err.user_message(), GENERIC_API_ERROR);
        assert_eq!(AppError::NetworkError("offline".into()).user_message(), GENERIC_API_ERROR);
    }
}
