//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::net::IpAddr;
use std::path::PathBuf;

/// Render a markdown document to pretty HTML, optionally serving it with live reload
#[derive(Parser, Debug, Clone)]
#[command(name = "mdr", version, about, long_about = None)]
pub struct Cli {
    /// Markdown document to render
    #[arg(value_name = "INPUT", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output HTML file (default: INPUT with an .html extension)
    #[arg(value_name = "OUTPUT", value_hint = clap::ValueHint::FilePath, conflicts_with = "output")]
    pub output_positional: Option<PathBuf>,

    /// Output HTML file (same as the OUTPUT positional)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Rebuild the output file whenever INPUT changes
    #[arg(short, long)]
    pub watch: bool,

    /// Serve the rendered page with live reload (implies watching)
    #[arg(short, long)]
    pub serve: bool,

    /// Serve on all interfaces (0.0.0.0) instead of localhost
    #[arg(short = 'P', long)]
    pub public: bool,

    /// Port to serve on (implies --serve)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Interface to bind (implies --serve)
    #[arg(long, conflicts_with = "public")]
    pub host: Option<IpAddr>,

    /// Ask before overwriting an existing output file
    #[arg(short = 'n', long)]
    pub no_clobber: bool,

    /// Seconds a browser's reload poll is held open before it retries
    #[arg(long, value_name = "SECS")]
    pub wait_timeout: Option<u64>,

    /// Quiet period after the last file event before rebuilding
    #[arg(long, value_name = "MS")]
    pub debounce: Option<u64>,

    /// Seconds a single conversion may run before it is killed
    #[arg(long, value_name = "SECS")]
    pub build_timeout: Option<u64>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

impl Cli {
    /// Serve mode is requested by any of the serve-related flags.
    pub fn wants_serve(&self) -> bool {
        self.serve || self.public || self.port.is_some() || self.host.is_some()
    }

    /// Output path given on the command line, in either form.
    pub fn explicit_output(&self) -> Option<&PathBuf> {
        self.output.as_ref().or(self.output_positional.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mdr").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_batch_with_output_flag() {
        let cli = parse(&["-o", "out.html", "doc.md"]);
        assert_eq!(cli.input, PathBuf::from("doc.md"));
        assert_eq!(cli.explicit_output(), Some(&PathBuf::from("out.html")));
        assert!(!cli.wants_serve());
    }

    #[test]
    fn test_output_positional() {
        let cli = parse(&["doc.md", "page.html"]);
        assert_eq!(cli.explicit_output(), Some(&PathBuf::from("page.html")));
    }

    #[test]
    fn test_output_forms_conflict() {
        let result = Cli::try_parse_from(["mdr", "doc.md", "page.html", "-o", "other.html"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_port_implies_serve() {
        let cli = parse(&["--port", "4000", "doc.md"]);
        assert_eq!(cli.port, Some(4000));
        assert!(cli.wants_serve());
    }

    #[test]
    fn test_public_implies_serve() {
        assert!(parse(&["-P", "doc.md"]).wants_serve());
        assert!(parse(&["--host", "::1", "doc.md"]).wants_serve());
    }

    #[test]
    fn test_input_required() {
        assert!(Cli::try_parse_from(["mdr"]).is_err());
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["mdr", "--port", "99999", "doc.md"]).is_err());
    }
}
