//! Area-scoped place finder.
//!
//! Geocodes a named area, pages through the provider's place search, keeps
//! the places that belong to the area and ranks them by review count.

pub mod config;
pub mod error;
pub mod finder;
pub mod geo;
pub mod maps;
pub mod normalize;
pub mod report;
pub mod server;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::INFO } else { LevelFilter::WARN };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy("ureq=warn")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
