mod chat;
pub mod sse;

use crate::error::Result;
use bytes::Bytes;
use futures_util::Stream;
use std::pin::Pin;

pub use chat::ChatStream;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

pub(crate) fn is_event_stream_type(content_type: Option<&str>) -> bool {
    content_type
        .is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/event-stream"))
}
