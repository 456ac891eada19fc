use postboard_types::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Field errors carried by a 400 response, if any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Short message suitable for a transient notice in the UI
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Network Error: Connection failed. Check your network and try again".to_string()
            }
            ApiError::Unauthorized(_) => {
                "Authorization Error: Session expired or insufficient permissions".to_string()
            }
            ApiError::NotFound(_) => "Not Found: The item no longer exists".to_string(),
            ApiError::Validation(errors) => format!("Validation Error: {}", errors),
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
