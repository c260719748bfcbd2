//! Logging setup with verbosity level control.
//!
//! Verbosity levels map onto `tracing` levels:
//! - 0: SILENT (warnings and errors only)
//! - 1: CHANGES (run milestones: tasks loaded, graph built, schedule solved)
//! - 2: CHECKS (per-stage details)
//! - 3: DEBUG (full algorithm internals, per node)
//!
//! `RUST_LOG` takes precedence over the verbosity level when set.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Map a verbosity level to the most detailed level it enables.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        VERBOSITY_SILENT => LevelFilter::WARN,
        VERBOSITY_CHANGES => LevelFilter::INFO,
        VERBOSITY_CHECKS => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbosity).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
