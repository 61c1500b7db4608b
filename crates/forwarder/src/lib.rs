mod error;
mod request;
mod service;

use common::ChatStream;
use faststr::FastStr;
use serde_json::Value;

pub use error::{Error, ErrorKind, Result};
pub use request::{lookup_id, short_id, validate};
pub use service::Forwarder;

/// Successful outcome of [`Forwarder::forward`].
#[derive(Debug)]
pub enum Completion {
    Stream(ChatStream),
    Json(Value),
}

/// Outcome of [`Forwarder::relay`], errors already rendered for display.
#[derive(Debug)]
pub enum Reply {
    Stream(ChatStream),
    Json(Value),
    Message(FastStr),
}

impl From<Completion> for Reply {
    fn from(value: Completion) -> Self {
        match value {
            Completion::Stream(stream) => Reply::Stream(stream),
            Completion::Json(json) => Reply::Json(json),
        }
    }
}
