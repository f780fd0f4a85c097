//! Document configuration for `markdown-pdf.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── page       # [page]
//! │   ├── render     # [render]
//! │   ├── serve      # [serve]
//! │   └── style      # [style]
//! ├── error          # ConfigError
//! └── mod.rs         # DocConfig (this file)
//! ```
//!
//! Values are layered: defaults, then the config file, then CLI flags. The
//! config file is `--config` when given, otherwise the nearest
//! `markdown-pdf.toml` at or above the source document's directory (the
//! working directory when the document is HTML read from stdin).

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{PageConfig, RenderConfig, ServeConfig, StyleConfig};

use crate::{cli::Cli, log};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::{absolute_from, find_config_file};

/// Config file name searched for next to the document.
pub const CONFIG_FILE: &str = "markdown-pdf.toml";

/// Default PDF name when the document comes from stdin.
const STDIN_OUTPUT: &str = "output.pdf";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing markdown-pdf.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocConfig {
    /// Config file the values came from (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Absolute path of the markdown source, or the working directory for
    /// stdin (internal use only)
    #[serde(skip)]
    pub input: PathBuf,

    /// Document is ready-made HTML read from stdin (internal use only)
    #[serde(skip)]
    pub from_stdin: bool,

    /// Absolute path of the PDF to write (internal use only)
    #[serde(skip)]
    pub output: PathBuf,

    /// Serve for a browser instead of capturing (internal use only)
    #[serde(skip)]
    pub browse: bool,

    /// Paper, margins, header and footer
    #[serde(default)]
    pub page: PageConfig,

    /// User stylesheet and highlighting
    #[serde(default)]
    pub style: StyleConfig,

    /// Content server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Headless browser settings
    #[serde(default)]
    pub render: RenderConfig,
}

impl DocConfig {
    /// Load configuration for the document named on the command line.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(cli, &cwd)
    }

    /// Load configuration with relative CLI paths resolved against `cwd`.
    fn load_from(cli: &Cli, cwd: &Path) -> Result<Self> {
        let from_stdin = cli.reads_stdin();
        let input = if from_stdin {
            cwd.to_path_buf()
        } else {
            absolute_from(cwd, &cli.input)
        };
        let search_dir = if from_stdin {
            Some(input.as_path())
        } else {
            input.parent()
        };

        let config_path = match &cli.config {
            Some(path) => Some(absolute_from(cwd, path)),
            None => search_dir.and_then(|dir| find_config_file(dir, CONFIG_FILE)),
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        if let Some(path) = &config_path {
            crate::debug!("config"; "using {}", path.display());
            let base = path.parent().unwrap_or(cwd).to_path_buf();
            config.normalize_paths(&base);
        }
        config.config_path = config_path;
        config.input = input;
        config.from_stdin = from_stdin;
        config.apply_cli(cli, cwd)?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve file paths from the config file against its directory.
    fn normalize_paths(&mut self, base: &Path) {
        if let Some(stylesheet) = self.style.stylesheet.take() {
            self.style.stylesheet = Some(absolute_from(base, &stylesheet));
        }
        // A bare executable name is left for PATH lookup
        if let Some(browser) = self.render.browser.take() {
            self.render.browser = Some(if browser.components().count() > 1 {
                absolute_from(base, &browser)
            } else {
                browser
            });
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-line overrides.
    fn apply_cli(&mut self, cli: &Cli, cwd: &Path) -> Result<()> {
        self.browse = cli.browser;

        self.output = match &cli.output {
            Some(output) => absolute_from(cwd, output),
            None if self.from_stdin => cwd.join(STDIN_OUTPUT),
            None => default_output(&self.input),
        };

        if let Some(style) = &cli.style {
            self.style.stylesheet = Some(absolute_from(cwd, style));
        }
        if let Some(chrome) = &cli.chrome {
            self.render.browser = Some(chrome.clone());
        }
        if let Some(paper) = &cli.paper {
            self.page.size = paper.parse()?;
        }
        Self::update_option(&mut self.style.highlight, cli.highlight.as_ref());

        Ok(())
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the merged configuration.
    pub fn validate(&self) -> Result<()> {
        if self.render.launch_timeout == 0 {
            bail!(ConfigError::Validation(
                "render.launch_timeout must be at least 1 second".into()
            ));
        }

        let (width, height) = self.page.size.inches();
        let margin = &self.page.margin;
        if margin.left.to_inches() + margin.right.to_inches() >= width
            || margin.top.to_inches() + margin.bottom.to_inches() >= height
        {
            bail!(ConfigError::Validation(format!(
                "page.margin leaves no printable area on {}",
                self.page.size.name()
            )));
        }

        Ok(())
    }

    /// Directory relative assets of the document resolve against.
    pub fn source_dir(&self) -> &Path {
        if self.from_stdin {
            return &self.input;
        }
        self.input.parent().unwrap_or(Path::new("/"))
    }
}

/// `<input>.pdf`, keeping the original extension.
fn default_output(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".pdf");
    PathBuf::from(name)
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config text, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> DocConfig {
    let (parsed, ignored) = DocConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
