//! Options shared by every utility.

use a10_monitoring_core::OptionSpec;

pub const VERBOSE: &str = "verbose";
pub const SLB: &str = "slb";

/// Text printed by `--version`.
pub fn version_text() -> String {
    format!("a10-monitoring {}\n", env!("CARGO_PKG_VERSION"))
}

/// `-s, --slb HOST[:PORT]`.
pub fn slb() -> OptionSpec {
    OptionSpec::new(
        SLB,
        Some("-s"),
        "--slb HOST[:PORT]",
        "SLB host and port. Assumes port 80 if not specified.",
    )
}

/// `-v, --verbose`.
pub fn verbose() -> OptionSpec {
    OptionSpec::new(
        VERBOSE,
        Some("-v"),
        "--verbose",
        "Enable verbose output, including error causes.",
    )
}

/// `--version`, which prints [`version_text`] and stops.
pub fn version() -> OptionSpec {
    OptionSpec::new("version", None, "--version", "Print the version string and exit.")
        .exits_with(version_text())
}
