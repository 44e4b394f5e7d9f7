//! Runtime configuration resolved from CLI flags and the environment.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/
//! │   ├── convert    # converter (KaTeX URL, build timeout)
//! │   ├── serve      # HTTP server (interface, port, wait timeout)
//! │   └── watch      # file watcher (debounce)
//! └── mod.rs         # Config (this file)
//! ```
//!
//! There is no config file: everything is ephemeral and lives for one process.

pub mod section;

pub use section::{ConvertConfig, KATEX_ENV, ServeConfig, WatchConfig};

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::cli::Cli;

/// How the process runs after the initial conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Convert once, write the output file, exit.
    Batch,
    /// Keep rewriting the output file on every change.
    Watch,
    /// Serve over HTTP with live reload.
    Serve,
}

/// Root configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: Mode,
    pub no_clobber: bool,
    pub verbose: bool,
    pub serve: ServeConfig,
    pub watch: WatchConfig,
    pub convert: ConvertConfig,
}

impl Config {
    /// Build the configuration from parsed CLI arguments and the `MDR_KATEX` value.
    pub fn from_cli(cli: &Cli, katex_env: Option<String>) -> Self {
        let mode = if cli.wants_serve() {
            Mode::Serve
        } else if cli.watch {
            Mode::Watch
        } else {
            Mode::Batch
        };

        let output = cli
            .explicit_output()
            .cloned()
            .unwrap_or_else(|| default_output(&cli.input));

        let mut serve = ServeConfig::default();
        if let Some(host) = cli.host {
            serve.interface = host;
        } else if cli.public {
            serve.interface = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        }
        if let Some(port) = cli.port {
            serve.port = port;
        }
        if let Some(secs) = cli.wait_timeout {
            serve.wait_timeout = Duration::from_secs(secs.max(1));
        }

        let mut watch = WatchConfig::default();
        if let Some(ms) = cli.debounce {
            watch.debounce = Duration::from_millis(ms);
        }

        let mut convert = ConvertConfig {
            katex_url: ConvertConfig::katex_url(katex_env),
            ..Default::default()
        };
        if let Some(secs) = cli.build_timeout {
            convert.timeout = Duration::from_secs(secs.max(1));
        }

        Self {
            input: cli.input.clone(),
            output,
            mode,
            no_clobber: cli.no_clobber,
            verbose: cli.verbose,
            serve,
            watch,
            convert,
        }
    }
}

/// `notes/doc.md` → `notes/doc.html`
fn default_output(input: &std::path::Path) -> PathBuf {
    input.with_extension("html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> Config {
        let cli = Cli::try_parse_from(std::iter::once("mdr").chain(args.iter().copied())).unwrap();
        Config::from_cli(&cli, None)
    }

    #[test]
    fn test_batch_defaults() {
        let config = config(&["notes/doc.md"]);
        assert_eq!(config.mode, Mode::Batch);
        assert_eq!(config.output, PathBuf::from("notes/doc.html"));
        assert_eq!(config.watch.debounce, Duration::from_millis(100));
        assert_eq!(config.convert.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(config(&["-w", "a.md"]).mode, Mode::Watch);
        assert_eq!(config(&["-s", "a.md"]).mode, Mode::Serve);
        // serve wins over watch
        assert_eq!(config(&["-w", "--port", "9000", "a.md"]).mode, Mode::Serve);
    }

    #[test]
    fn test_serve_overrides() {
        let config = config(&["-P", "--port", "9000", "--wait-timeout", "5", "a.md"]);
        assert_eq!(config.serve.addr().to_string(), "0.0.0.0:9000");
        assert_eq!(config.serve.wait_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_host_flag() {
        let config = config(&["--host", "::1", "a.md"]);
        assert_eq!(config.serve.addr().to_string(), "[::1]:8080");
    }

    #[test]
    fn test_zero_timeouts_clamped() {
        let config = config(&["--wait-timeout", "0", "--build-timeout", "0", "a.md"]);
        assert_eq!(config.serve.wait_timeout, Duration::from_secs(1));
        assert_eq!(config.convert.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_katex_from_env() {
        let cli = Cli::try_parse_from(["mdr", "a.md"]).unwrap();
        let config = Config::from_cli(&cli, Some("file:///tmp/katex".into()));
        assert_eq!(config.convert.katex_url, "file:///tmp/katex/");
    }

    #[test]
    fn test_serializes_for_debug_dump() {
        let json = serde_json::to_value(config(&["-s", "a.md"])).unwrap();
        assert_eq!(json["mode"], "serve");
        assert_eq!(json["serve"]["port"], 8080);
    }
}
