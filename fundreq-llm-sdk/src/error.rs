use thiserror::Error;

/// Everything that can go wrong between a completion request and its answer
#[derive(Error, Debug)]
pub enum LlmError {
    /// HTTP 401/403, or an API key that cannot be sent
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// HTTP 429
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// HTTP 400, or a request the client refuses to send
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// The response body was not the JSON we expected
    #[error("Parse error: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    /// The model answered without any text, e.g. a blocked prompt
    #[error("Empty response: {message}")]
    EmptyResponse { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LlmError {
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn rate_limit<S: Into<String>>(message: S, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn api_error(status: u16, message: String) -> Self {
        Self::Api { status, message }
    }

    pub fn empty_response<S: Into<String>>(message: S) -> Self {
        Self::EmptyResponse {
            message: message.into(),
        }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Status code for errors that came back from the API
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => None,
            Self::RateLimit { .. } => Some(429),
            Self::InvalidRequest { .. } => None,
            Self::Api { status, .. } => Some(*status),
            Self::Network { source } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
