//! Batch conversion, and the initial build every mode starts with.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::converter::Converter;
use crate::error::Error;
use crate::log;
use crate::utils::output::write_output;

/// Convert once, write the output file, done.
pub fn run(config: &Config, converter: &dyn Converter) -> Result<()> {
    let start = Instant::now();
    build_once(config, converter)?;
    log!(
        "convert";
        "{} -> {} in {}ms",
        config.input.display(),
        config.output.display(),
        start.elapsed().as_millis()
    );
    Ok(())
}

/// Convert the input and write the output file.
///
/// Nothing is written unless the conversion succeeds.
pub fn build_once(config: &Config, converter: &dyn Converter) -> Result<Vec<u8>> {
    let html = converter.convert(&config.input).map_err(Error::from)?;
    write_output(&config.output, &html).map_err(|e| Error::Output(config.output.clone(), e))?;
    Ok(html)
}

/// Ask before replacing an existing output file (`-n`).
pub fn confirm_overwrite(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    confirm_with(path, &mut io::stdin().lock(), &mut io::stderr())
}

fn confirm_with(path: &Path, input: &mut impl BufRead, prompt: &mut impl Write) -> Result<()> {
    writeln!(prompt, "output file already exists: {}", path.display())?;
    write!(prompt, "Overwrite? [y/N]: ")?;
    prompt.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("failed to read confirmation")?;

    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(()),
        _ => Err(Error::Declined(path.to_path_buf()).into()),
    }
}
