//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// `default_level` applies when `RUST_LOG` is not set; an unparsable level
/// falls back to `info`.
pub fn init(default_level: &str) {
    let level = default_level
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // A second init (tests, embedding) keeps the first logger
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
