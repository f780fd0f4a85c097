//! markdown-pdf - Markdown with numbered captions and cross references to
//! print-ready PDF.

mod cli;
mod config;
mod core;
mod document;
mod embed;
mod group;
mod logger;
mod markdown;
mod render;
mod resolve;
mod server;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::DocConfig;
use markdown::MarkdownOptions;
use render::{CaptureJob, ChromeEngine, PrintOptions};
use resolve::GitHistory;
use server::{Site, StyleBundle};
use std::{
    fs,
    io::{self, Read},
    process::ExitCode,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log!("error"; "{e:#}");
            ExitCode::FAILURE
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

    let config = DocConfig::load(&cli)?;
    let site = build_site(&config, io::stdin().lock())?;

    if config.browse {
        render::browse(config.serve.interface, site)?;
        if core::is_shutdown() {
            debug!("browse"; "stopped");
        }
        return Ok(());
    }

    let job = CaptureJob {
        site,
        interface: config.serve.interface,
        print: PrintOptions::from_page(&config.page),
        output: config.output.clone(),
        group: !config.from_stdin,
    };
    let report = render::capture(job, || ChromeEngine::launch(&config.render))?;
    log!("capture"; "wrote {} ({} bytes)", report.output.display(), report.bytes);

    Ok(())
}

/// Read, resolve and convert the source into the page the server will host.
///
/// Ready-made HTML from `stdin` is served as is, rooted at the working
/// directory.
fn build_site(config: &DocConfig, mut stdin: impl Read) -> Result<Site> {
    let styles = StyleBundle::new(config.style.highlight, config.style.stylesheet.clone());

    if config.from_stdin {
        let mut document = String::new();
        stdin
            .read_to_string(&mut document)
            .context("Failed to read HTML from stdin")?;
        debug!("stdin"; "read {} bytes of HTML", document.len());
        return Ok(Site {
            document,
            styles,
            root: config.source_dir().to_path_buf(),
        });
    }

    let source = fs::read_to_string(&config.input)
        .with_context(|| format!("Failed to read {}", config.input.display()))?;

    let resolved = resolve::resolve(&source, &config.input, &GitHistory);
    debug!("resolve"; "{} captions, {} unresolved", resolved.table.len(), resolved.unresolved.len());

    let options = MarkdownOptions::all().with_highlight(config.style.highlight);
    let mut content = markdown::to_html(&resolved.text, &options);

    // No page hook runs in browser mode, so group ahead of time
    if config.browse {
        let (grouped, stats) = group::regroup_html(&content)?;
        debug!("group"; "{} captioned, {} kept together", stats.captioned, stats.kept);
        content = grouped;
    }

    let title = config
        .input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document = document::assemble(&title, &content, &styles.links(), embed::script::GROUPING_JS);

    Ok(Site {
        document,
        styles,
        root: config.source_dir().to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn markdown_config(dir: &TempDir, source: &str) -> DocConfig {
        let input = dir.path().join("guide.md");
        fs::write(&input, source).unwrap();
        DocConfig {
            input,
            ..DocConfig::default()
        }
    }

    #[test]
    fn test_markdown_source_is_resolved_and_assembled() {
        let dir = TempDir::new().unwrap();
        let config = markdown_config(
            &dir,
            "See @reference(figure, arch).\n\n![arch](arch.png)\n@define(figure, arch, \"Overview\")\n",
        );

        let site = build_site(&config, io::empty()).unwrap();

        assert!(site.document.contains("<title>guide</title>"));
        assert!(site.document.contains(r#"<span class="caption-label">figure 1</span> Overview"#));
        assert!(site.document.contains(r##"<a class="reference" href="#figure-arch">1</a>"##));
        assert!(site.document.contains(embed::script::GROUPING_JS));
        assert_eq!(site.root, dir.path());
    }

    #[test]
    fn test_browse_mode_groups_ahead_of_time() {
        let dir = TempDir::new().unwrap();
        let config = DocConfig {
            browse: true,
            ..markdown_config(&dir, "![arch](arch.png)\n@define(figure, arch, \"Overview\")\n")
        };

        let site = build_site(&config, io::empty()).unwrap();

        assert!(site.document.contains("class=\"captioned\""));
    }

    #[test]
    fn test_stdin_html_served_verbatim() {
        let dir = TempDir::new().unwrap();
        let config = DocConfig {
            input: dir.path().to_path_buf(),
            from_stdin: true,
            ..DocConfig::default()
        };
        let html = "<!DOCTYPE html><p>Ready @define(figure, a, \"kept\")</p>";

        let site = build_site(&config, html.as_bytes()).unwrap();

        assert_eq!(site.document, html);
        assert_eq!(site.root, dir.path());
    }

    #[test]
    fn test_missing_source_is_error() {
        let dir = TempDir::new().unwrap();
        let config = DocConfig {
            input: dir.path().join("absent.md"),
            ..DocConfig::default()
        };

        let err = build_site(&config, io::empty()).unwrap_err();

        assert!(err.to_string().contains("absent.md"));
    }
}
