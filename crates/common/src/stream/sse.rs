use crate::error::{Error, Result};
use bytes::{Bytes, BytesMut};
use eventsource_stream::{EventStreamError, Eventsource};
use faststr::FastStr;
use futures_util::{Stream, StreamExt};
use std::{
    pin::Pin,
    task::{Context, Poll},
};

/// Splits a byte stream into text lines, the way an event-stream body is
/// read line by line. Line terminators (`\n` or `\r\n`) are stripped; a
/// trailing line without terminator is still yielded.
pub struct SseLines<S> {
    inner:    S,
    buffer:   BytesMut,
    finished: bool,
}

impl<S> SseLines<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: BytesMut::new(),
            finished: false,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn take_line(&mut self) -> Option<FastStr> {
        let pos = self.buffer.iter().position(|b| *b == b'\n')?;
        let mut line = self.buffer.split_to(pos + 1);
        line.truncate(pos);
        if line.last() == Some(&b'\r') {
            line.truncate(pos - 1);
        }
        Some(to_text(line.freeze()))
    }

    fn take_rest(&mut self) -> Option<FastStr> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = self.buffer.split();
        Some(to_text(rest.freeze()))
    }
}

fn to_text(bytes: Bytes) -> FastStr {
    String::from_utf8_lossy(&bytes).into_owned().into()
}

impl<S> Stream for SseLines<S>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    type Item = Result<FastStr>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(line) = self.take_line() {
                return Poll::Ready(Some(Ok(line)));
            }
            if self.finished {
                return Poll::Ready(self.take_rest().map(Ok));
            }
            match self.inner.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(chunk))) => self.buffer.extend_from_slice(&chunk),
                Poll::Ready(Some(Err(err))) => {
                    self.finished = true;
                    self.buffer.clear();
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => self.finished = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// One decoded server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseMessage {
    pub event: FastStr,
    pub data:  FastStr,
    pub id:    FastStr,
}

impl SseMessage {
    /// Whether the event carries a type other than the default `message`.
    pub fn is_named(&self) -> bool {
        !self.event.is_empty() && self.event.as_str() != "message"
    }
}

/// Decodes an event-stream body into messages. Multi-line `data:` fields
/// are joined with `\n`, comments are skipped.
pub fn sse_messages<S>(body: S) -> impl Stream<Item = Result<SseMessage>> + Send + Unpin
where
    S: Stream<Item = Result<Bytes>> + Send + Unpin,
{
    body.eventsource().map(|event| match event {
        Ok(event) => Ok(SseMessage {
            event: event.event.into(),
            data:  event.data.into(),
            id:    event.id.into(),
        }),
        Err(EventStreamError::Transport(err)) => Err(err),
        Err(err) => Err(Error::InvalidResponseEventStream(err.to_string().into())),
    })
}
