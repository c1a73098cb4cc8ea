//! Process wide log output. Records emitted through the `log` macros are
//! forwarded to the subscriber installed here.
use tracing_subscriber::EnvFilter;

use config::Log;

/// Installs the global subscriber. `RUST_LOG` overrides the configured filter.
pub fn init(config: &Log) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.filter.as_str()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if config.json { builder.json().try_init() } else { builder.try_init() };
    if let Err(e) = result {
        eprintln!("Failed to install logger: {}", e);
    }
}
