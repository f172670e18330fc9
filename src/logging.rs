//! Logging configuration using tracing
//!
//! Logs go to stderr so that `--json` output on stdout stays parseable.
//! The filter is taken from `PROBECTL_LOG` when set; otherwise the
//! `-v` count picks the level.
//!
//! ```bash
//! PROBECTL_LOG=probectl=debug probectl show checkout
//! probectl -vv verify https://example.com
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding an EnvFilter directive
pub const LOG_ENV: &str = "PROBECTL_LOG";

/// Initialize the logging subsystem. Safe to call more than once.
pub fn init(verbosity: u8) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "probectl=warn",
        1 => "probectl=info",
        _ => "probectl=debug",
    }
}
