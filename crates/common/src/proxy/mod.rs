mod infomaniak;

use crate::{
    data::CatalogModel,
    error::Result,
    stream::{ByteStream, ChatStream, is_event_stream_type},
};
use faststr::FastStr;
use serde_json::Value;

pub use infomaniak::{InfomaniakClient, build_http_client};

/// The remote LLM API as seen by the forwarder.
pub trait Upstream: Send + Sync {
    /// Full model catalog, unfiltered.
    fn models(&self) -> impl Future<Output = Result<Vec<CatalogModel>>> + Send;

    /// Sends one chat-completion payload. Non-2xx answers come back as
    /// [`crate::error::Error::UpstreamStatus`].
    fn chat_completions(
        &self,
        payload: Value,
    ) -> impl Future<Output = Result<UpstreamResponse>> + Send;
}

/// A successful upstream answer whose body has not been read yet.
pub struct UpstreamResponse {
    pub status:       u16,
    pub content_type: Option<FastStr>,
    pub body:         ByteStream,
}

impl UpstreamResponse {
    pub fn new(status: u16, content_type: Option<FastStr>, body: ByteStream) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    pub fn is_event_stream(&self) -> bool {
        is_event_stream_type(self.content_type.as_deref())
    }

    pub fn into_stream(self) -> ChatStream {
        ChatStream::new(self.status, self.content_type, self.body)
    }

    /// Reads the whole body and parses it; the body is dropped on return.
    pub async fn into_json(self) -> Result<Value> {
        self.into_stream().into_json().await
    }
}
