//! The capture sequence: serve, launch, load, group, print, write.
//!
//! Resources are released in reverse order of acquisition. On the success
//! path every step is explicit; on an error path the server and engine are
//! dropped, and their `Drop` impls stop them.

use super::{PrintOptions, RenderEngine};
use crate::{
    core, debug,
    embed::script::GROUPING_CALL,
    group::GroupStats,
    log,
    logger::StepLine,
    server::{ContentServer, Site},
};
use anyhow::{Context, Result};
use std::{fs, net::IpAddr, path::PathBuf};

const STEPS: &[&str] = &["serve", "launch", "load", "group", "print", "write"];

/// Everything one capture needs.
#[derive(Debug)]
pub struct CaptureJob {
    pub site: Site,
    pub interface: IpAddr,
    pub print: PrintOptions,
    pub output: PathBuf,
    /// Run the in-page grouping hook. Off for documents that do not ship it.
    pub group: bool,
}

/// Outcome of a successful capture.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureReport {
    pub output: PathBuf,
    /// Size of the written PDF.
    pub bytes: usize,
    pub groups: GroupStats,
}

/// Serve `job.site`, render it with the engine `launch` starts, and write
/// the PDF to `job.output`.
///
/// The engine is launched after the server is listening, so a missing
/// browser is reported without anything being written.
pub fn capture<E, F>(job: CaptureJob, launch: F) -> Result<CaptureReport>
where
    E: RenderEngine,
    F: FnOnce() -> Result<E>,
{
    let CaptureJob {
        site,
        interface,
        print,
        output,
        group,
    } = job;
    let steps = StepLine::new("capture", STEPS);

    let server = ContentServer::start(interface, site)?;
    steps.advance();

    let mut engine = launch()?;
    let page = engine.open_page()?;
    steps.advance();

    let url = server.url();
    engine.navigate(&page, &url)?;
    steps.advance();

    let groups = if group {
        let value = engine.evaluate(&page, GROUPING_CALL)?;
        serde_json::from_value::<GroupStats>(value).unwrap_or_else(|e| {
            log!("capture"; "grouping hook returned an unexpected value: {e}");
            GroupStats::default()
        })
    } else {
        GroupStats::default()
    };
    debug!("capture"; "{} captioned, {} kept together", groups.captioned, groups.kept);
    steps.advance();

    let pdf = engine.print(&page, &print)?;
    steps.advance();

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&output, &pdf).with_context(|| format!("Failed to write {}", output.display()))?;
    steps.finish();

    if let Err(e) = engine.close_page(page) {
        debug!("capture"; "closing page: {e:#}");
    }
    if let Err(e) = engine.shutdown() {
        debug!("capture"; "stopping browser: {e:#}");
    }
    server.shutdown();

    Ok(CaptureReport {
        output,
        bytes: pdf.len(),
        groups,
    })
}

/// Serve `site` until interrupted, for viewing in a regular browser.
pub fn browse(interface: IpAddr, site: Site) -> Result<()> {
    let server = ContentServer::start(interface, site)?;
    core::register_server(server.handle());

    log!("browse"; "Open {} in a browser to see output", server.url());
    log!("browse"; "Ctrl-c to exit");

    server.wait();
    Ok(())
}
