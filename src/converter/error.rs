//! Conversion error types.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure of the external converter to produce HTML.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("input file `{}` is missing", .0.display())]
    MissingInput(PathBuf),

    #[error("failed to spawn `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` failed with exit code {code}{}", stderr_suffix(.stderr))]
    Failed {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("`{program}` did not finish within {}s", .limit.as_secs_f32())]
    Timeout { program: String, limit: Duration },

    #[error("`{program}` was stopped by shutdown")]
    Cancelled { program: String },

    #[error("I/O error while converting `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
}

impl ConversionError {
    /// Exit code to propagate from batch mode, mirroring the converter's own status.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Failed { code, .. } if *code > 0 && *code < 256 => Some(*code),
            Self::Spawn { .. } => Some(127),
            Self::Cancelled { .. } => Some(130),
            _ => None,
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(":\n{stderr}")
    }
}
