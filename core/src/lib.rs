//! Declarative command-line options for the A10 monitoring utilities.
//!
//! This crate is the argument and help-text framework shared by every
//! utility in the workspace:
//!
//! - [`OptionSpec`]: declares an option with short/long flags, a
//!   description, an optional default, and an optional transform.
//! - [`CommandLine`]: registers options, parses an argument vector into
//!   values and positional arguments, and exposes values by name.
//! - [`usage`]: renders the `NAME` / `DESCRIPTION` / `EXAMPLES` / `OPTIONS`
//!   help text.
//!
//! Help requests never exit the process from inside the parser. They come
//! back as [`ParseOutcome::Stop`] and the binary decides when to print and
//! terminate.
//!
//! # Example
//!
//! ```
//! use a10_monitoring_core::*;
//!
//! let mut cli = CommandLine::new("check-a10-memory")
//!     .with_description("Check A10 load balancer memory usage.")
//!     .with_examples("__APPNAME__ -s 10.0.0.1");
//! cli.option(
//!     OptionSpec::new("warning_threshold", Some("-w"), "--warning PCT", "Warning threshold")
//!         .with_default(80.0)
//!         .with_transform(|v| v.parse::<f64>()),
//! )?;
//!
//! assert_eq!(cli.parse(Vec::<String>::new(), Input::Redirected)?, ParseOutcome::Proceed);
//! assert_eq!(cli.get::<f64>("warning_threshold")?, Some(80.0));
//!
//! match cli.parse(["--help"], Input::Redirected)? {
//!     ParseOutcome::Stop(stop) => {
//!         assert_eq!(stop.reason, StopReason::Help);
//!         assert!(stop.output.contains("    check-a10-memory -s 10.0.0.1"));
//!     }
//!     ParseOutcome::Proceed => unreachable!(),
//! }
//! # Ok::<(), CliError>(())
//! ```

mod error;
mod parser;
mod types;
pub mod usage;
mod validate;

pub use error::{CliError, DeclarationError, LookupError, ParseError};
pub use parser::{CommandLine, Input, ParseOutcome, Stop, StopReason, appname_from_env};
pub use types::{DeclaredOption, FlagSpec, FromValue, HELP_OPTION, OptionSpec, Value};
pub use validate::validate_option;
