//! Tracing initialisation shared by doctriage binaries.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. With `json` set, log
/// lines come out as newline-delimited JSON for CI log collection.
///
/// Installing a second subscriber in the same process is not possible, so
/// repeat calls are silently ignored.
pub fn init_tracing(json: bool, default_level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));
    let base = tracing_subscriber::registry().with(filter);

    let installed = if json {
        base.with(fmt::layer().json().flatten_event(true).with_target(false))
            .try_init()
    } else {
        base.with(fmt::layer().with_target(false)).try_init()
    };
    drop(installed);
}
