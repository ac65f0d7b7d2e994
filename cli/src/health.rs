//! Health-check reporting for Icinga/Nagios style monitoring.
//!
//! A check prints exactly one `LABEL: message` line on stdout and exits with
//! the status code the monitoring system expects.

use std::fmt;
use std::process::ExitCode;

use crate::format::write_stdout;

/// Result of a health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Process exit code understood by the monitoring system.
    pub fn code(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }

    /// Classifies `value` against thresholds.
    ///
    /// A value equal to a threshold does not cross it.
    ///
    /// ```
    /// use a10_monitoring_cli::health::Status;
    ///
    /// assert_eq!(Status::from_thresholds(80.0, 80.0, 90.0), Status::Ok);
    /// assert_eq!(Status::from_thresholds(80.1, 80.0, 90.0), Status::Warning);
    /// assert_eq!(Status::from_thresholds(95.0, 80.0, 90.0), Status::Critical);
    /// ```
    pub fn from_thresholds(value: f64, warning: f64, critical: f64) -> Self {
        if value > critical {
            Status::Critical
        } else if value > warning {
            Status::Warning
        } else {
            Status::Ok
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A status paired with its human-readable message.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub status: Status,
    pub message: String,
}

impl CheckResult {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status.code())
    }

    /// The status line as printed, newline included.
    pub fn line(&self) -> String {
        format!("{self}\n")
    }

    /// Prints the status line to stdout and returns the exit code.
    ///
    /// The exit code carries the status even when stdout is closed or
    /// unwritable, so a write failure is dropped here.
    pub fn report(&self) -> ExitCode {
        let _ = write_stdout(&self.line());
        self.exit_code()
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_labels() {
        let all = [Status::Ok, Status::Warning, Status::Critical, Status::Unknown];
        let codes: Vec<u8> = all.iter().map(|s| s.code()).collect();
        let labels: Vec<&str> = all.iter().map(|s| s.label()).collect();

        assert_eq!(codes, vec![0, 1, 2, 3]);
        assert_eq!(labels, vec!["OK", "WARNING", "CRITICAL", "UNKNOWN"]);
    }

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(Status::from_thresholds(90.0, 80.0, 90.0), Status::Warning);
        assert_eq!(Status::from_thresholds(90.01, 80.0, 90.0), Status::Critical);
        assert_eq!(Status::from_thresholds(0.0, 80.0, 90.0), Status::Ok);
    }

    #[test]
    fn test_inverted_thresholds_favor_critical() {
        assert_eq!(Status::from_thresholds(50.0, 60.0, 40.0), Status::Critical);
    }

    #[test]
    fn test_result_line() {
        let result = CheckResult::new(Status::Warning, "memory usage is 85.0% (3.4 GB of 4.0 GB)");
        assert_eq!(
            result.to_string(),
            "WARNING: memory usage is 85.0% (3.4 GB of 4.0 GB)"
        );
        assert_eq!(result.line(), format!("{result}\n"));
    }
}
