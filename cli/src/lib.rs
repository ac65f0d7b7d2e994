//! Shared pieces of the A10 monitoring utilities.
//!
//! The binaries in this package parse their options with
//! [`a10_monitoring_core`], query the device with [`a10_monitoring_client`],
//! and report through the helpers here:
//!
//! - [`health`]: OK/WARNING/CRITICAL/UNKNOWN status lines and exit codes.
//! - [`format`]: human-readable sizes, error chains, and stdout writing.
//! - [`logging`]: `tracing` subscriber setup on stderr.
//! - [`options`]: options every utility declares.

pub mod error;
pub mod format;
pub mod health;
pub mod logging;
pub mod options;

pub use error::AppError;
