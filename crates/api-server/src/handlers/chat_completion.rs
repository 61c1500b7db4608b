use crate::{
    SharedForwarder,
    error::{Error, Result},
    tools::error_reply,
};
use async_stream::stream;
use common::{
    ChatStream, data::ChatRequest, error::Result as UpstreamResult, stream::sse::SseMessage,
};
use faststr::FastStr;
use forwarder::Completion;
use futures_util::{Stream, pin_mut};
use reqwest::StatusCode;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tokio_stream::{StreamExt, wrappers::UnboundedReceiverStream};
use tracing::{debug, info, warn};
use volo_http::{
    response::Response,
    server::{
        IntoResponse,
        extract::Json,
        response::sse::{Event, Sse},
        route::{Router, post},
    },
    utils::Extension,
};

async fn chat_completion_handler(
    Extension(forwarder): Extension<SharedForwarder>,
    Json(req): Json<ChatRequest>,
) -> Response {
    debug!(req = ?req);
    match forwarder.forward(req).await {
        Ok(Completion::Json(value)) => (StatusCode::OK, value.to_string()).into_response(),
        Ok(Completion::Stream(stream)) if stream.is_event_stream() => {
            info!(status = stream.status(), "relaying event stream");
            let (tx, rx) = unbounded_channel();
            tokio::spawn(pump_events(stream, tx));
            let rx = UnboundedReceiverStream::new(rx);
            create_sse_response(rx).await.into_response()
        }
        Ok(Completion::Stream(stream)) => buffered_reply(stream).await.into_response(),
        Err(err) => {
            warn!(error = %err, "chat completion failed");
            error_reply(&err).into_response()
        }
    }
}

/// A stream was asked for but upstream answered with a plain body.
async fn buffered_reply(stream: ChatStream) -> (StatusCode, FastStr) {
    debug!(content_type = ?stream.content_type(), "upstream answered without an event stream");
    match stream.into_json().await {
        Ok(value) => (StatusCode::OK, value.to_string().into()),
        Err(err) => {
            let err = forwarder::Error::from(err);
            warn!(error = %err, "chat completion failed");
            error_reply(&err)
        }
    }
}

/// Copies every decoded upstream event into `tx`. A decode or transport
/// failure is passed on once and ends the pump; so does a closed channel,
/// which drops the upstream body.
async fn pump_events(stream: ChatStream, tx: UnboundedSender<UpstreamResult<SseMessage>>) {
    let mut events = stream.events();
    while let Some(event) = events.next().await {
        match event {
            Ok(message) => {
                if tx.send(Ok(message)).is_err() {
                    warn!("send event error: channel may closed");
                    break;
                }
            }
            Err(err) => {
                warn!(error = %err, "upstream event stream broke off");
                let _ = tx.send(Err(err));
                break;
            }
        }
    }
    debug!("event stream finished");
}

fn sse_event(message: SseMessage) -> Event {
    let mut event = Event::new().data(message.data.clone());
    if message.is_named() {
        event = event.event(message.event);
    }
    if !message.id.is_empty() {
        event = event.id(message.id);
    }
    event
}

async fn create_sse_response<S>(input: S) -> Sse<impl Stream<Item = Result<Event>>>
where
    S: Stream<Item = UpstreamResult<SseMessage>> + 'static,
{
    let stream = stream! {
        pin_mut!(input);
        while let Some(message) = input.next().await {
            match message {
                Ok(message) => yield Ok(sse_event(message)),
                Err(err) => {
                    yield Err(Error::from(err));
                    break;
                }
            }
        }
    };

    Sse::new(stream)
}

pub fn chat_completion_router() -> Router {
    Router::new().route("/v1/chat/completions", post(chat_completion_handler))
}
