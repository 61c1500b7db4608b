pub mod config;
pub mod data;
pub mod error;
pub mod proxy;
pub mod stream;

mod log;

pub use config::Config;
pub use log::logging_stdout;
pub use proxy::{InfomaniakClient, Upstream, UpstreamResponse, build_http_client};
pub use reqwest::RequestBuilder;
pub use stream::ChatStream;
