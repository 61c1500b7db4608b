use anyhow::Result;
use common::{Config, InfomaniakClient, build_http_client};
use dotenvy::dotenv;
use forwarder::Forwarder;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let _guard = api_server::logging_stdout();

    let config = Config::from_env()?;
    info!(config = ?config, "loaded configuration");

    let http = build_http_client(config.connect_timeout)?;
    let upstream = InfomaniakClient::new(http, &config);
    let forwarder = Forwarder::new(&config, upstream)?;

    let models = forwarder.list_models().await;
    match models.first() {
        Some(entry) if entry.is_unavailable() => warn!("model catalog unavailable at startup"),
        _ => info!(count = models.len(), "model catalog loaded"),
    }

    api_server::run_api_server(config.listen_addr, Arc::new(forwarder)).await;

    Ok(())
}
