//! VisionGen command line.
//!
//! Generates pipeline source for the built-in demonstration graph in any
//! supported language. The graph editor that normally supplies nodes lives
//! outside this workspace.

pub mod commands;
pub mod nodes;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber driven by `RUST_LOG`; a no-op when it is
/// unset or on later calls.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
