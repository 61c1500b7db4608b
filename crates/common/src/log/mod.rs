use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

/// Installs the stdout subscriber. `RUST_LOG` overrides the default level.
///
/// The returned guard flushes buffered lines on drop, keep it alive in `main`.
pub fn logging_stdout() -> WorkerGuard {
    let (nonblocking, guard) = tracing_appender::non_blocking(std::io::stdout());

    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(nonblocking)
                .with_file(cfg!(debug_assertions))
                .with_line_number(cfg!(debug_assertions)),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .try_init();
    if installed.is_err() {
        tracing::warn!("a global subscriber is already installed, keeping it");
    }

    guard
}
