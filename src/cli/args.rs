//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Convert a markdown document with numbered captions and cross references
/// into a print-ready PDF
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Markdown source file, or `-` to read ready-made HTML from stdin
    #[arg(value_name = "INPUT", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Custom stylesheet, linked after the bundled ones
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub style: Option<PathBuf>,

    /// Output PDF path (default: <INPUT>.pdf, or output.pdf for stdin)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Paper size (A0-A6, Letter, Legal, Tabloid, Ledger)
    #[arg(long)]
    pub paper: Option<String>,

    /// Serve the document for viewing in a browser instead of writing a PDF
    #[arg(long)]
    pub browser: bool,

    /// Highlight fenced code blocks
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub highlight: Option<bool>,

    /// Config file path (default: markdown-pdf.toml, searched upward from INPUT)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Chrome or Chromium executable
    #[arg(long, value_hint = clap::ValueHint::ExecutablePath)]
    pub chrome: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

/// Input argument that selects stdin HTML mode.
const STDIN_INPUT: &str = "-";

impl Cli {
    /// Whether the document is ready-made HTML read from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == STDIN_INPUT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_minimal_invocation() {
        let cli = Cli::try_parse_from(["markdown-pdf", "doc.md"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("doc.md"));
        assert!(cli.output.is_none());
        assert!(cli.paper.is_none());
        assert!(!cli.browser);
        assert!(cli.highlight.is_none());
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "markdown-pdf",
            "doc.md",
            "--style",
            "custom.css",
            "-o",
            "out.pdf",
            "--paper",
            "letter",
            "--browser",
            "--highlight",
            "-C",
            "conf.toml",
            "--chrome",
            "/usr/bin/chromium",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.style, Some(PathBuf::from("custom.css")));
        assert_eq!(cli.output, Some(PathBuf::from("out.pdf")));
        assert_eq!(cli.paper.as_deref(), Some("letter"));
        assert!(cli.browser);
        assert_eq!(cli.highlight, Some(true));
        assert_eq!(cli.config, Some(PathBuf::from("conf.toml")));
        assert_eq!(cli.chrome, Some(PathBuf::from("/usr/bin/chromium")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_highlight_explicit_false() {
        let cli = Cli::try_parse_from(["markdown-pdf", "doc.md", "--highlight", "false"]).unwrap();
        assert_eq!(cli.highlight, Some(false));
    }

    #[test]
    fn test_short_flags_do_not_clash_with_version() {
        let cli = Cli::try_parse_from(["markdown-pdf", "doc.md", "-v"]).unwrap();
        assert!(cli.verbose);

        let err = Cli::try_parse_from(["markdown-pdf", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_dash_selects_stdin() {
        let cli = Cli::try_parse_from(["markdown-pdf", "-", "-o", "out.pdf"]).unwrap();
        assert!(cli.reads_stdin());
        assert_eq!(cli.output, Some(PathBuf::from("out.pdf")));

        let cli = Cli::try_parse_from(["markdown-pdf", "doc.md"]).unwrap();
        assert!(!cli.reads_stdin());
    }

    #[test]
    fn test_input_required() {
        assert!(Cli::try_parse_from(["markdown-pdf"]).is_err());
    }
}
