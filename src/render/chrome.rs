//! Headless Chrome driven over the DevTools protocol.
//!
//! The browser runs with a throwaway profile directory and a DevTools port
//! chosen by the OS. Its address is read from the first stderr line that
//! announces it; the rest of stderr is drained into debug output.

use super::{PrintOptions, RenderEngine, RenderError, cdp::Connection};
use crate::{config::RenderConfig, debug};
use anyhow::{Context, Result};
use base64::Engine as _;
use crossbeam::channel::{self, RecvTimeoutError};
use serde_json::{Value, json};
use std::{
    env,
    ffi::OsString,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};
use tempfile::TempDir;

/// Executable names tried on `PATH`, in order.
const CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
    "msedge",
];

#[cfg(target_os = "macos")]
const MACOS_APP: &str = "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome";

/// Environment variable naming the browser executable.
const CHROME_ENV: &str = "CHROME";

/// Stderr line prefix carrying the DevTools address.
const DEVTOOLS_PREFIX: &str = "DevTools listening on ";

/// How long `Browser.close` gets before the process is killed.
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Find the browser executable.
///
/// `configured` comes from `--chrome` or `[render] browser`. A value with a
/// directory part is used as given; a bare name is looked up on `PATH`.
pub fn locate(configured: Option<&Path>) -> Result<PathBuf, RenderError> {
    locate_with(configured, env::var_os(CHROME_ENV))
}

fn locate_with(configured: Option<&Path>, from_env: Option<OsString>) -> Result<PathBuf, RenderError> {
    if let Some(path) = configured.map(Path::to_path_buf).or(from_env.map(PathBuf::from)) {
        if path.components().count() > 1 {
            return Ok(path);
        }
        return which::which(&path)
            .map_err(|_| RenderError::NotFound(format!("`{}`", path.display())));
    }

    if let Some(found) = CANDIDATES.iter().find_map(|name| which::which(name).ok()) {
        return Ok(found);
    }

    #[cfg(target_os = "macos")]
    if Path::new(MACOS_APP).is_file() {
        return Ok(PathBuf::from(MACOS_APP));
    }

    Err(RenderError::NotFound(
        CANDIDATES
            .iter()
            .map(|name| format!("`{name}`"))
            .collect::<Vec<_>>()
            .join(", "),
    ))
}

/// WebSocket address announced on a browser stderr line.
fn devtools_url(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix(DEVTOOLS_PREFIX)
        .map(str::trim)
        .filter(|url| url.starts_with("ws://"))
}

/// One open tab, attached in flat session mode.
#[derive(Debug)]
pub struct ChromePage {
    target_id: String,
    session_id: String,
}

/// A running headless browser.
pub struct ChromeEngine {
    child: Child,
    connection: Connection,
    // Removed after the process is gone
    _profile: TempDir,
}

impl ChromeEngine {
    /// Start the browser and connect to its DevTools endpoint.
    pub fn launch(config: &RenderConfig) -> Result<Self> {
        let exe = locate(config.browser.as_deref())?;
        let profile = tempfile::Builder::new()
            .prefix("markdown-pdf-")
            .tempdir()
            .context("Failed to create browser profile directory")?;

        debug!("chrome"; "launching {}", exe.display());
        let mut child = Command::new(&exe)
            .args([
                "--headless=new",
                "--remote-debugging-port=0",
                "--no-first-run",
                "--no-default-browser-check",
                "--disable-gpu",
                "--hide-scrollbars",
                "--mute-audio",
            ])
            .arg(format!("--user-data-dir={}", profile.path().display()))
            .args(&config.args)
            .arg("about:blank")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RenderError::Launch(exe.clone(), e))?;

        let url = match wait_for_devtools(&mut child, config.launch_timeout) {
            Ok(url) => url,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e.into());
            }
        };
        debug!("chrome"; "devtools at {url}");

        let connection = match Connection::connect(&url) {
            Ok(connection) => connection,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e).context("Failed to connect to the browser");
            }
        };

        Ok(Self {
            child,
            connection,
            _profile: profile,
        })
    }

    fn call(&mut self, method: &str, params: Value, page: &ChromePage) -> Result<Value> {
        Ok(self
            .connection
            .call(method, params, Some(&page.session_id))?)
    }
}

/// Read stderr until the DevTools line shows up, then keep draining it on the
/// reader thread so the browser never blocks on a full pipe.
fn wait_for_devtools(child: &mut Child, timeout_secs: u64) -> Result<String, RenderError> {
    let Some(stderr) = child.stderr.take() else {
        return Err(RenderError::LaunchExited);
    };

    let (tx, rx) = channel::bounded(1);
    let spawned = thread::Builder::new()
        .name("chrome-stderr".into())
        .spawn(move || {
            let mut announced = false;
            for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                if !announced && let Some(url) = devtools_url(&line) {
                    announced = true;
                    let _ = tx.try_send(url.to_owned());
                    continue;
                }
                debug!("chrome"; "{line}");
            }
        });
    if spawned.is_err() {
        return Err(RenderError::LaunchExited);
    }

    match rx.recv_timeout(Duration::from_secs(timeout_secs)) {
        Ok(url) => Ok(url),
        Err(RecvTimeoutError::Timeout) => Err(RenderError::LaunchTimeout(timeout_secs)),
        Err(RecvTimeoutError::Disconnected) => Err(RenderError::LaunchExited),
    }
}

impl RenderEngine for ChromeEngine {
    type Page = ChromePage;

    fn open_page(&mut self) -> Result<ChromePage> {
        let created = self
            .connection
            .call("Target.createTarget", json!({ "url": "about:blank" }), None)?;
        let target_id = string_field(&created, "targetId", "Target.createTarget")?;

        let attached = self.connection.call(
            "Target.attachToTarget",
            json!({ "targetId": target_id, "flatten": true }),
            None,
        )?;
        let session_id = string_field(&attached, "sessionId", "Target.attachToTarget")?;

        let page = ChromePage {
            target_id,
            session_id,
        };
        self.call("Page.enable", json!({}), &page)?;
        self.call("Page.setLifecycleEventsEnabled", json!({ "enabled": true }), &page)?;
        Ok(page)
    }

    fn navigate(&mut self, page: &ChromePage, url: &str) -> Result<()> {
        let navigated = self.call("Page.navigate", json!({ "url": url }), page)?;
        if let Some(reason) = navigated.get("errorText").and_then(Value::as_str)
            && !reason.is_empty()
        {
            return Err(RenderError::Navigation {
                url: url.to_owned(),
                reason: reason.to_owned(),
            }
            .into());
        }

        let frame_id = string_field(&navigated, "frameId", "Page.navigate")?;
        let loader_id = navigated.get("loaderId").and_then(Value::as_str);

        self.connection.wait_event(|event| {
            event.method == "Page.lifecycleEvent"
                && event.session_id.as_deref() == Some(page.session_id.as_str())
                && event.params["name"] == "networkIdle"
                && event.params["frameId"] == frame_id.as_str()
                && loader_id.is_none_or(|id| event.params["loaderId"] == id)
        })?;
        Ok(())
    }

    fn evaluate(&mut self, page: &ChromePage, expression: &str) -> Result<Value> {
        let mut evaluated = self.call(
            "Runtime.evaluate",
            json!({
                "expression": expression,
                "returnByValue": true,
                "awaitPromise": true,
            }),
            page,
        )?;

        if let Some(details) = evaluated.get("exceptionDetails") {
            let message = details["exception"]["description"]
                .as_str()
                .or_else(|| details["text"].as_str())
                .unwrap_or("uncaught exception");
            return Err(RenderError::Script(message.to_owned()).into());
        }

        Ok(evaluated
            .get_mut("result")
            .and_then(|result| result.get_mut("value"))
            .map(Value::take)
            .unwrap_or(Value::Null))
    }

    fn print(&mut self, page: &ChromePage, options: &PrintOptions) -> Result<Vec<u8>> {
        let params = serde_json::to_value(options).context("Failed to encode print options")?;
        let printed = self.call("Page.printToPDF", params, page)?;
        let data = string_field(&printed, "data", "Page.printToPDF")?;

        base64::engine::general_purpose::STANDARD
            .decode(data)
            .context("Browser returned an undecodable PDF payload")
    }

    fn close_page(&mut self, page: ChromePage) -> Result<()> {
        self.connection
            .call("Target.closeTarget", json!({ "targetId": page.target_id }), None)?;
        self.connection.forget_session(&page.session_id);
        Ok(())
    }

    fn shutdown(mut self) -> Result<()> {
        // The browser may drop the socket before it answers
        let _ = self.connection.call("Browser.close", json!({}), None);
        self.connection.close();

        let deadline = Instant::now() + EXIT_GRACE;
        while Instant::now() < deadline {
            if self.child.try_wait()?.is_some() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(50));
        }

        debug!("chrome"; "browser ignored Browser.close, killing it");
        self.child.kill().context("Failed to kill the browser")?;
        self.child.wait()?;
        Ok(())
    }
}

impl Drop for ChromeEngine {
    fn drop(&mut self) {
        if matches!(self.child.try_wait(), Ok(None)) {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn string_field(value: &Value, field: &str, method: &str) -> Result<String, RenderError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| RenderError::Malformed(format!("`{method}` response lacks `{field}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_devtools_url() {
        assert_eq!(
            devtools_url("DevTools listening on ws://127.0.0.1:41231/devtools/browser/ab-cd\n"),
            Some("ws://127.0.0.1:41231/devtools/browser/ab-cd")
        );
        assert_eq!(devtools_url("[0101/000000.000:ERROR:gpu_init.cc] nope"), None);
        assert_eq!(devtools_url("DevTools listening on "), None);
    }

    #[test]
    fn test_locate_explicit_path_used_as_given() {
        let dir = TempDir::new().unwrap();
        let exe = dir.path().join("my-chrome");
        std::fs::write(&exe, "").unwrap();

        assert_eq!(locate_with(Some(&exe), None).unwrap(), exe);
        // Explicit setting wins over the environment
        assert_eq!(
            locate_with(Some(&exe), Some("/elsewhere/chrome".into())).unwrap(),
            exe
        );
    }

    #[test]
    fn test_locate_environment_path() {
        let found = locate_with(None, Some("/opt/browsers/chrome".into())).unwrap();
        assert_eq!(found, PathBuf::from("/opt/browsers/chrome"));
    }

    #[test]
    fn test_locate_unknown_bare_name() {
        let name = Path::new("markdown-pdf-no-such-browser");
        let err = locate_with(Some(name), None).unwrap_err();

        assert!(matches!(err, RenderError::NotFound(_)));
        assert!(err.to_string().contains("markdown-pdf-no-such-browser"));
    }

    #[test]
    fn test_not_found_lists_candidates() {
        let err = RenderError::NotFound("`chromium`, `chrome`".into());
        let message = err.to_string();
        assert!(message.contains("`chromium`"));
        assert!(message.contains("--chrome"));
    }

    #[test]
    fn test_launch_reports_missing_executable() {
        let config = RenderConfig {
            browser: Some(PathBuf::from("/nonexistent/dir/chrome")),
            ..RenderConfig::default()
        };
        let err = ChromeEngine::launch(&config).err().unwrap();
        let render = err.downcast_ref::<RenderError>().unwrap();
        assert!(matches!(render, RenderError::Launch(path, _) if path.ends_with("chrome")));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_launch_detects_early_exit() {
        let config = RenderConfig {
            browser: Some(PathBuf::from("/bin/true")),
            launch_timeout: 10,
            ..RenderConfig::default()
        };
        let err = ChromeEngine::launch(&config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::LaunchExited)
        ));
    }

    /// Runs the bundled grouping script in a real browser. Does nothing on
    /// machines without Chrome or Chromium.
    #[test]
    fn test_grouping_script_in_browser() {
        use crate::{
            document,
            embed::script::{GROUPING_CALL, GROUPING_JS},
            group,
            server::{ContentServer, Site, StyleBundle},
        };
        use std::net::{IpAddr, Ipv4Addr};

        let Ok(browser) = locate(None) else {
            return;
        };
        let content = concat!(
            "<h2>A</h2><div class=\"caption\">one</div>",
            "<h2>B</h2><figure><img alt=\"b\"></figure><div class=\"caption\">two</div>",
        );
        let dir = TempDir::new().unwrap();
        let site = Site {
            document: document::assemble("grouping", content, &[], GROUPING_JS),
            styles: StyleBundle::default(),
            root: dir.path().to_path_buf(),
        };
        let server = ContentServer::start(IpAddr::V4(Ipv4Addr::LOCALHOST), site).unwrap();
        let config = RenderConfig {
            browser: Some(browser),
            args: vec!["--no-sandbox".into()],
            ..RenderConfig::default()
        };

        let mut engine = ChromeEngine::launch(&config).unwrap();
        let page = engine.open_page().unwrap();
        engine.navigate(&page, &server.url()).unwrap();

        let stats = engine.evaluate(&page, GROUPING_CALL).unwrap();
        let (_, expected) = group::regroup_html(content).unwrap();
        assert_eq!(stats, json!({ "captioned": 2, "kept": 1 }));
        assert_eq!(
            stats,
            json!({ "captioned": expected.captioned, "kept": expected.kept })
        );

        let shape = engine
            .evaluate(
                &page,
                r#"[
                    "article > .captioned > h2 + .caption",
                    "article > .keep-together > h2 + .captioned > figure + .caption",
                    "article > h2",
                ].map(s => document.querySelectorAll(s).length)"#,
            )
            .unwrap();
        assert_eq!(shape, json!([1, 1, 0]));

        let pdf = engine.print(&page, &PrintOptions::from_page(&Default::default())).unwrap();
        assert!(pdf.starts_with(b"%PDF"));

        engine.close_page(page).unwrap();
        engine.shutdown().unwrap();
        server.shutdown();
    }
}
