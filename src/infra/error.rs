use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("session is not authorized")]
    Unauthorized,
    #[error("Request failed with status code {status}")]
    Status {
        status: u16,
        detail: Option<String>,
        body: String,
    },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Structured `detail` from the error payload, when the service sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => Some(detail.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            ApiError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Pulls `detail` out of an error body. String details are used verbatim,
/// anything else (e.g. a validation error list) as compact JSON.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
