use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

/// Builds the run's subscriber. Callers scope it with
/// `tracing::subscriber::with_default` instead of installing it globally.
pub fn subscriber(filter: &str) -> impl Subscriber + Send + Sync + use<> {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish()
}
