// =====================================================================
// File: logger.rs
//
// Description:
//   One-time `env_logger` setup for the binary and the tests. The level
//   passed in is the default; `RUST_LOG` overrides it.
// =====================================================================
use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs the global logger once. Later calls are ignored.
pub fn initialize_logger(level: LevelFilter) {
    // call_once_force so an earlier panicked attempt does not poison setup
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(level)
            .filter_module("recordindex::index", level)
            .filter_module("recordindex::hash", level)
            .format_timestamp_millis()
            .parse_default_env();

        // Another logger may already be installed (test harnesses)
        let _ = builder.try_init();
    });
}

/// Reads a level name such as `"debug"`, falling back to `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Info)
}
