use anyhow::Result;
use std::env;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins, then `REPRODOT_LOG`, then `info`.
/// `REPRODOT_LOG_FORMAT=compact` switches to the compact formatter.
pub fn init() -> Result<()> {
    let log_level = env::var("REPRODOT_LOG").unwrap_or_else(|_| "info".to_string());
    let log_format = env::var("REPRODOT_LOG_FORMAT").unwrap_or_default();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match log_format.as_str() {
        "compact" => tracing_subscriber::fmt()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter)
            .try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
