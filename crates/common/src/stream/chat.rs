use super::{
    ByteStream, is_event_stream_type,
    sse::{SseLines, SseMessage, sse_messages},
};
use crate::error::{Error, Result};
use bytes::Bytes;
use faststr::FastStr;
use futures_util::{Stream, StreamExt};
use serde_json::Value;
use std::{
    fmt,
    pin::Pin,
    task::{Context, Poll},
};
use tracing::debug;

/// A live upstream response body.
///
/// The underlying body (and with it the connection) is dropped as soon as it
/// is drained or yields an error, or when the `ChatStream` itself is dropped,
/// whichever happens first.
pub struct ChatStream {
    status:       u16,
    content_type: Option<FastStr>,
    body:         Option<ByteStream>,
}

impl ChatStream {
    pub fn new(status: u16, content_type: Option<FastStr>, body: ByteStream) -> Self {
        Self {
            status,
            content_type,
            body: Some(body),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Whether the upstream body is still held open.
    pub fn is_open(&self) -> bool {
        self.body.is_some()
    }

    pub fn is_event_stream(&self) -> bool {
        is_event_stream_type(self.content_type())
    }

    /// Raw body lines.
    pub fn lines(self) -> SseLines<Self> {
        SseLines::new(self)
    }

    /// Decoded server-sent events.
    pub fn events(self) -> impl Stream<Item = Result<SseMessage>> + Send + Unpin {
        sse_messages(self)
    }

    /// Reads the whole body and parses it, for answers that are not an
    /// event stream.
    pub async fn into_json(mut self) -> Result<Value> {
        let status = self.status;
        let mut buf = Vec::new();
        while let Some(chunk) = self.next().await {
            buf.extend_from_slice(&chunk?);
        }
        serde_json::from_slice(&buf).map_err(|_| {
            Error::InvalidResponseData(String::from_utf8_lossy(&buf).into_owned().into(), status)
        })
    }

    fn release(&mut self) {
        if self.body.take().is_some() {
            debug!(status = self.status, "upstream body released");
        }
    }
}

impl Stream for ChatStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(body) = self.body.as_mut() else {
            return Poll::Ready(None);
        };
        match body.poll_next_unpin(cx) {
            Poll::Ready(None) => {
                self.release();
                Poll::Ready(None)
            }
            Poll::Ready(Some(Err(err))) => {
                self.release();
                Poll::Ready(Some(Err(err)))
            }
            other => other,
        }
    }
}

impl fmt::Debug for ChatStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatStream")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("open", &self.is_open())
            .finish()
    }
}
