//! Output formatting helpers.

use std::error::Error;
use std::io::{self, Write};

const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Formats a byte count with 1024-based units and one decimal.
///
/// # Examples
///
/// ```
/// use a10_monitoring_cli::format::pretty_size;
///
/// assert_eq!(pretty_size(512), "512 B");
/// assert_eq!(pretty_size(1536), "1.5 KB");
/// assert_eq!(pretty_size(8 << 30), "8.0 GB");
/// ```
pub fn pretty_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", SIZE_UNITS[unit])
}

/// Renders an error followed by its `source()` chain, one cause per line.
///
/// Causes whose text is already part of the previous line are skipped.
pub fn error_chain(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut previous = out.clone();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !previous.contains(&text) {
            out.push_str("\n  caused by: ");
            out.push_str(&text);
        }
        previous = text;
        source = cause.source();
    }
    out
}

/// Writes `text` to stdout, treating a closed pipe as success.
///
/// A consumer such as `head` may exit before all output is written; that is
/// not an error for the utility.
///
/// # Errors
///
/// Returns any other I/O error.
pub fn write_stdout(text: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
