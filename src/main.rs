//! mdr - render a markdown document to pretty HTML, and serve it with live
//! reload while you write.

mod actor;
mod cli;
mod config;
mod converter;
mod core;
mod embed;
mod error;
mod freshness;
mod logger;
mod reload;
mod utils;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::{Config, KATEX_ENV, Mode};
use converter::{Converter, Pandoc};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log!("error"; "{:#}", e);
            ExitCode::from(error::exit_code_of(&e))
        }
    }
}

fn run() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Arc::new(Config::from_cli(&cli, std::env::var(KATEX_ENV).ok()));
    debug_do! {
        if let Ok(json) = serde_json::to_string_pretty(&*config) {
            debug!("config"; "{}", json);
        }
    }

    let converter: Arc<dyn Converter> = Arc::new(Pandoc::locate(&config.convert)?);

    if config.no_clobber {
        cli::convert::confirm_overwrite(&config.output)?;
    }

    match config.mode {
        Mode::Batch => cli::convert::run(&config, converter.as_ref()),
        Mode::Watch => cli::watch::run(config, converter),
        Mode::Serve => cli::serve::run(config, converter),
    }
}
