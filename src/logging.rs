//! Diagnostic logging to stderr
//!
//! Filter comes from `DEBUGMATE_LOG` (e.g. `debugmate=debug`); `--debug`
//! forces debug output for this crate. stdout stays reserved for the
//! conversation with the user.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const ENV_LOG: &str = "DEBUGMATE_LOG";

/// Install the global subscriber. Safe to call more than once.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debugmate=debug")
    } else {
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
