use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    #[error("Timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Authentication failed for {endpoint}: invalid credentials")]
    Unauthorized { endpoint: String },

    #[error("API {endpoint} returned {status}: {body}")]
    Status { endpoint: String, status: u16, body: String },

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Credentials were rejected, as opposed to the engine being unreachable
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_status() && err.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
            return ApiError::Unauthorized { endpoint: err.url().map(|url| url.path().to_string()).unwrap_or_default() };
        }
        ApiError::RequestFailed(err)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
