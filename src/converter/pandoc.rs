//! Pandoc-backed converter.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use super::assets::Assets;
use super::title::{fallback_title, has_title_metadata};
use super::{ConversionError, Converter};
use crate::config::ConvertConfig;
use crate::utils::exec::{Cmd, Outcome};

/// Executable looked up on `PATH`.
const PROGRAM: &str = "pandoc";

/// Converter that shells out to pandoc with the embedded theme.
pub struct Pandoc {
    program: PathBuf,
    assets: Assets,
    katex_url: String,
    timeout: Duration,
}

impl Pandoc {
    /// Locate pandoc on `PATH` and prepare the assets it needs.
    ///
    /// Fails with [`crate::error::Error::ConverterMissing`] when pandoc is not installed.
    pub fn locate(config: &ConvertConfig) -> Result<Self> {
        let program = which::which(PROGRAM).map_err(|_| crate::error::Error::ConverterMissing)?;
        crate::debug!("convert"; "using {}", program.display());

        let assets = Assets::materialize().context("failed to prepare converter assets")?;

        Ok(Self {
            program,
            assets,
            katex_url: config.katex_url.clone(),
            timeout: config.timeout,
        })
    }

    /// Assemble the pandoc invocation for `source`.
    fn command(&self, source: &Path, content: &str) -> Cmd {
        let mut cmd = Cmd::new(&self.program)
            .arg(format!("--katex={}", self.katex_url))
            .args(["--from", "markdown+tex_math_single_backslash"])
            .arg("--embed-resources")
            .arg("--lua-filter")
            .arg(&self.assets.lua_filter)
            .args(["--to", "html5+smart", "--standalone"]);

        if !has_title_metadata(content) {
            cmd = cmd
                .arg("--metadata")
                .arg(format!("title={}", fallback_title(source)));
        }

        cmd.arg("--template")
            .arg(&self.assets.template)
            .arg("--css")
            .arg(&self.assets.theme_css)
            .arg("--css")
            .arg(&self.assets.skylighting_css)
            .args(["--toc", "--wrap=none"])
            .arg(source)
            .timeout(self.timeout)
            .cancel_when(crate::core::is_shutdown)
    }
}

impl Converter for Pandoc {
    fn convert(&self, source: &Path) -> Result<Vec<u8>, ConversionError> {
        let content = std::fs::read_to_string(source).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConversionError::MissingInput(source.to_path_buf()),
            _ => ConversionError::Io(source.to_path_buf(), e),
        })?;

        let cmd = self.command(source, &content);
        crate::debug_do! {
            let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
            crate::debug!("convert"; "{} {}", PROGRAM, args.join(" "));
        }

        let start = Instant::now();
        let outcome = cmd.run().map_err(|source| ConversionError::Spawn {
            program: PROGRAM.to_string(),
            source,
        })?;

        match outcome {
            Outcome::Exited(finished) if finished.status.success() => {
                crate::debug!("convert"; "{} done in {:?}", source.display(), start.elapsed());
                Ok(finished.stdout)
            }
            Outcome::Exited(finished) => Err(ConversionError::Failed {
                program: PROGRAM.to_string(),
                code: finished.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&finished.stderr).into_owned(),
            }),
            Outcome::TimedOut => Err(ConversionError::Timeout {
                program: PROGRAM.to_string(),
                limit: self.timeout,
            }),
            Outcome::Cancelled => Err(ConversionError::Cancelled {
                program: PROGRAM.to_string(),
            }),
        }
    }
}
