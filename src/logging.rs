use tracing_subscriber::EnvFilter;

/// Installs a compact `tracing` subscriber. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .try_init()
}
