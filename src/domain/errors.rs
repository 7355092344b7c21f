/// Application errors surfaced to views. Every variant is terminal for the
/// view that hit it; recovery is a user-initiated retry or navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    NetworkError(String),
    ParseError(String),
    NotFound(String),
    ValidationError(String),
    WalletError(String),
}

impl AppError {
    /// Short label used by the error banner in views.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NetworkError(_) => "network",
            AppError::ParseError(_) => "parse",
            AppError::NotFound(_) => "not_found",
            AppError::ValidationError(_) => "validation",
            AppError::WalletError(_) => "wallet",
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NetworkError(msg) => write!(f, "Network Error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse Error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::WalletError(msg) => write!(f, "Wallet Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_kind() {
        let err = AppError::NotFound("token 'pepe'".to_string());
        assert_eq!(err.to_string(), "Not Found: token 'pepe'");
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.kind(), "parse");
    }
}
