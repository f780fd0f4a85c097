//! Ephemeral content server for one capture session.
//!
//! Binds an OS-assigned port, answers requests on a small thread pool, and
//! stops when [`ContentServer::shutdown`] is called or the handle is
//! dropped. Everything it serves is immutable for its lifetime.

pub mod assets;
mod response;
pub mod route;

pub use assets::{InternalAsset, StyleBundle};
pub use route::{Route, classify};

use crate::{debug, log, utils::mime};
use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
    thread::{self, JoinHandle},
};
use tiny_http::{Request, Server};

/// Worker threads answering requests.
const POOL_THREADS: usize = 4;

/// Everything a session serves.
#[derive(Debug)]
pub struct Site {
    /// Assembled document served at `/`.
    pub document: String,
    pub styles: StyleBundle,
    /// Directory relative asset paths resolve against.
    pub root: PathBuf,
}

/// A running content server.
pub struct ContentServer {
    server: Arc<Server>,
    addr: SocketAddr,
    worker: Option<JoinHandle<()>>,
}

impl ContentServer {
    /// Bind an ephemeral port on `interface` and start answering requests.
    ///
    /// The configured user stylesheet is read here.
    pub fn start(interface: IpAddr, mut site: Site) -> Result<Self> {
        site.styles.load();

        let server = Server::http(SocketAddr::new(interface, 0))
            .map_err(|e| anyhow!("Failed to bind content server on {interface}: {e}"))?;
        let addr = server
            .server_addr()
            .to_ip()
            .context("Content server is not listening on an IP address")?;
        let server = Arc::new(server);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(POOL_THREADS)
            .thread_name(|i| format!("serve-{i}"))
            .build()
            .context("Failed to create server thread pool")?;

        let site = Arc::new(site);
        let listener = Arc::clone(&server);
        let worker = thread::Builder::new()
            .name("serve".into())
            .spawn(move || run_request_loop(&listener, &pool, &site))
            .context("Failed to spawn server thread")?;

        debug!("serve"; "listening on http://{addr}/");

        Ok(Self {
            server,
            addr,
            worker: Some(worker),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Root URL of the document.
    pub fn url(&self) -> String {
        // SocketAddr's Display brackets IPv6 hosts
        format!("http://{}/", self.addr())
    }

    /// Shared handle, for unblocking from a signal handler.
    pub fn handle(&self) -> Arc<Server> {
        Arc::clone(&self.server)
    }

    /// Block until the server is unblocked from elsewhere.
    pub fn wait(mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    /// Stop accepting requests and wait for the request loop to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.server.unblock();
            let _ = worker.join();
            debug!("serve"; "stopped http://{}/", self.addr);
        }
    }
}

impl Drop for ContentServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_request_loop(server: &Server, pool: &rayon::ThreadPool, site: &Arc<Site>) {
    for request in server.incoming_requests() {
        let site = Arc::clone(site);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &site) {
                log!("serve"; "request error: {e}");
            }
        });
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, site: &Site) -> Result<()> {
    use mime::types::{CSS, HTML, PLAIN};

    debug!("serve"; "{} {}", request.method(), request.url());

    let route = classify(request.url());
    match route {
        Route::Root => response::send_body(request, 200, HTML, site.document.as_bytes().to_vec()),
        Route::Internal(name) => {
            let body = InternalAsset::from_name(&name).and_then(|asset| site.styles.content(asset));
            match body {
                Some(body) => response::send_body(request, 200, CSS, body.to_vec()),
                None => {
                    log!("serve"; "internal file not found: {name}");
                    response::send_empty(request, 200, CSS)
                }
            }
        }
        Route::File(relative) => {
            let path = site.root.join(&relative);
            match fs::read(&path) {
                Ok(body) => response::send_body(request, 200, mime::from_path(&path), body),
                Err(_) => {
                    log!("serve"; "not found: {}", path.display());
                    response::send_empty(request, 404, PLAIN)
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// Parsed HTTP response.
    pub struct Fetched {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: Vec<u8>,
    }

    impl Fetched {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        }
    }

    /// Issue a one-shot HTTP/1.0 GET over loopback TCP.
    pub fn get(addr: SocketAddr, path: &str) -> Fetched {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
        write!(stream, "GET {path} HTTP/1.0\r\nHost: {addr}\r\n\r\n").unwrap();

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).unwrap();

        let split = raw.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let head = String::from_utf8_lossy(&raw[..split]).into_owned();
        let body = raw[split + 4..].to_vec();

        let mut lines = head.lines();
        let status = lines.next().unwrap().split(' ').nth(1).unwrap().parse().unwrap();
        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();

        Fetched { status, headers, body }
    }
}
