use tracing_subscriber::EnvFilter;

use crate::HostConfig;

/// Installs a fmt subscriber filtered by `filter`, falling back to `info` when the
/// filter does not parse. Does nothing if a global subscriber is already set.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

pub fn init_from_config(config: &HostConfig) {
    init(config.log_filter());
}
