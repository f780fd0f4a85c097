//! HTTP response helpers.

use anyhow::Result;
use tiny_http::{Header, Request, Response, StatusCode};

/// Respond with `body` and an explicit byte-length header.
pub fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<()> {
    let length = body.len().to_string();
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?)
        .with_header(make_header("Content-Length", &length)?);
    request.respond(response)?;
    Ok(())
}

/// Respond with a status and no body.
pub fn send_empty(request: Request, status: u16, content_type: &str) -> Result<()> {
    send_body(request, status, content_type, Vec::new())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow::anyhow!("invalid header {key}: {value}"))
}
