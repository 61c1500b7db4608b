use crate::{SharedForwarder, tools::model_list};
use reqwest::StatusCode;
use tracing::debug;
use volo_http::{
    response::Response,
    server::{IntoResponse, Router, route::get},
    utils::Extension,
};

async fn models_handler(Extension(forwarder): Extension<SharedForwarder>) -> Response {
    let entries = forwarder.list_models().await;
    debug!(count = entries.len(), "listing models");
    (StatusCode::OK, model_list(&entries)).into_response()
}

pub fn models_router() -> Router {
    Router::new().route("/v1/models", get(models_handler))
}
