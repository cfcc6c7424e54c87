//! Logging setup for the tools binary using `tracing_subscriber`.
//!
//! Output goes to stderr so that JSON written to stdout stays parseable.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `directives` when set.
pub fn setup_logging(directives: &str, pretty: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    if pretty {
        let layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr);
        tracing_subscriber::registry().with(filter).with(layer).init();
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr);
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}
