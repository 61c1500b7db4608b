use faststr::FastStr;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(FastStr),
    #[error("Reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("upstream returned {status}: {message}")]
    UpstreamStatus { status: u16, message: FastStr },
    #[error("Invalid response data: {0} status: {1}")]
    InvalidResponseData(FastStr, u16),
    #[error("Invalid response event stream: {0}")]
    InvalidResponseEventStream(FastStr),
    #[error("serde error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl Error {
    /// Builds the error for a non-2xx upstream answer, preferring the
    /// structured `{"error": {"message": ...}}` detail over the raw body.
    pub fn upstream_status(status: u16, body: &str) -> Self {
        let message = error_detail(body).unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                reason_phrase(status)
            } else {
                body.to_owned().into()
            }
        });
        Self::UpstreamStatus { status, message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Extracts the upstream error description from a JSON error body.
pub fn error_detail(body: &str) -> Option<FastStr> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    match error.get("message") {
        Some(Value::String(message)) => Some(message.clone().into()),
        Some(message) => Some(message.to_string().into()),
        None => match error {
            Value::String(text) => Some(text.clone().into()),
            other => Some(other.to_string().into()),
        },
    }
}

fn reason_phrase(status: u16) -> FastStr {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(FastStr::from_static_str)
        .unwrap_or_else(|| FastStr::from_static_str("no response body"))
}
