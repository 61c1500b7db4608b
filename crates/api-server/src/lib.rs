pub use common::logging_stdout;
use common::InfomaniakClient;
use forwarder::Forwarder;
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info};
use volo_http::Address;
use volo_http::server::{Router, Server};
use volo_http::utils::Extension;

pub mod error;
pub mod handlers;
pub mod tools;

pub type SharedForwarder = Arc<Forwarder<InfomaniakClient>>;

pub async fn run_api_server(addr: SocketAddr, forwarder: SharedForwarder) {
    let app = Router::new()
        .merge(handlers::chat_completion_router())
        .merge(handlers::models_router())
        .layer(Extension(forwarder));
    info!(addr = %addr, "api server listening");
    let addr = Address::from(addr);
    if let Err(e) = Server::new(app).run(addr).await {
        error!(error = ?e, "api server stopped");
    }
}
