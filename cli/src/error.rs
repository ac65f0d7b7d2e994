//! Top-level error type of the utilities.

use a10_monitoring_client::ClientError;
use a10_monitoring_core::{CliError, DeclarationError, LookupError, ParseError};
use thiserror::Error;

/// Anything that can stop a utility before it produces its result.
#[derive(Debug, Error)]
pub enum AppError {
    /// Option declaration, parsing, validation, or lookup failure.
    #[error(transparent)]
    Cli(#[from] CliError),

    /// A10 API, transport, or configuration failure.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Writing results to stdout failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// Returns `true` for mistakes in the command line rather than the device.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, AppError::Cli(err) if err.is_user_error())
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::Cli(err.into())
    }
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        AppError::Cli(err.into())
    }
}

impl From<DeclarationError> for AppError {
    fn from(err: DeclarationError) -> Self {
        AppError::Cli(err.into())
    }
}
