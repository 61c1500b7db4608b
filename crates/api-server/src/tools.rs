use common::data::ModelEntry;
use faststr::FastStr;
use forwarder::{Error as ForwardError, ErrorKind};
use reqwest::StatusCode;
use serde_json::json;

#[inline]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::ModelResolution => StatusCode::NOT_FOUND,
        ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Upstream | ErrorKind::Transport => StatusCode::BAD_GATEWAY,
    }
}

/// Status and display text for a failed forward.
#[inline]
pub fn error_reply(err: &ForwardError) -> (StatusCode, FastStr) {
    (status_for(err.kind()), format!("Error: {err}").into())
}

pub fn model_list(entries: &[ModelEntry]) -> FastStr {
    json!({
        "object": "list",
        "data": entries.iter().map(|m| json!({
            "id": m.id,
            "object": "model",
            "created": 0,
            "owned_by": "infomaniak",
            "name": m.display_name,
        }))
        .collect::<Vec<_>>(),
    })
    .to_string()
    .into()
}
