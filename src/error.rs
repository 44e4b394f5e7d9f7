//! Top-level error taxonomy and process exit codes.
//!
//! Only errors with no safe fallback end up here; recoverable ones
//! (watch errors, conversion failures while a good snapshot exists) are
//! absorbed and logged where they happen.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::converter::ConversionError;

/// Exit code for unreadable input (EX_NOINPUT).
const EXIT_NO_INPUT: u8 = 66;
/// Exit code when the converter executable cannot be found.
const EXIT_NOT_FOUND: u8 = 127;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("failed to write output `{}`", .0.display())]
    Output(PathBuf, #[source] std::io::Error),

    #[error("failed to bind HTTP server on {0}")]
    Transport(SocketAddr, #[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("pandoc not found. Please install pandoc and ensure it is on your PATH.")]
    ConverterMissing,

    #[error("aborting; not overwriting `{}`", .0.display())]
    Declined(PathBuf),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Conversion(ConversionError::MissingInput(_) | ConversionError::Io(..)) => {
                EXIT_NO_INPUT
            }
            Self::Conversion(e) => e
                .exit_code()
                .and_then(|code| u8::try_from(code).ok())
                .unwrap_or(1),
            Self::ConverterMissing => EXIT_NOT_FOUND,
            Self::Output(..) | Self::Transport(..) | Self::Declined(_) => 1,
        }
    }
}

/// Exit code for any error chain: the first `Error` found decides, otherwise 1.
pub fn exit_code_of(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map_or(1, Error::exit_code)
}
