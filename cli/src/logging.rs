//! Diagnostic logging setup.
//!
//! Logs go to stderr so that stdout carries only command output and
//! health-check lines.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive, e.g. `debug`
/// or `a10_monitoring_client=trace`.
pub const LOG_ENV_VAR: &str = "A10_MONITORING_LOG";

/// Filter used when [`LOG_ENV_VAR`] is unset or invalid.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Installs the global stderr subscriber.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(true), "debug");
        assert_eq!(default_directive(false), "warn");
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
    }
}
