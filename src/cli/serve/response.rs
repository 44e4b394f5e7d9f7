//! HTTP response handlers.

use anyhow::Result;
use serde::Serialize;
use tiny_http::{Header, Request, Response, StatusCode};

use super::inject::inject_live_script;
use super::route::WAIT_PATH;
use crate::embed::serve::{LIVE_JS, LiveVars, VERSION_COOKIE};
use crate::reload::{Snapshot, WaitOutcome};
use crate::utils::mime::types::{HTML, JAVASCRIPT, JSON, PLAIN};

/// Longest build error carried in a response header.
const ERROR_HEADER_MAX: usize = 200;

/// `/__wait` response body.
#[derive(Debug, Serialize)]
struct WaitBody {
    status: &'static str,
    version: u64,
}

/// Respond with the current page, reload client injected.
pub fn respond_page(request: Request, snapshot: &Snapshot) -> Result<()> {
    let body = inject_live_script(&snapshot.html).into_owned();
    let version = snapshot.version.to_string();
    let cookie = version_cookie(snapshot.version);

    let mut response = Response::from_data(body).with_status_code(StatusCode(200));
    add_headers(
        &mut response,
        &[
            ("Content-Type", HTML),
            ("Cache-Control", "no-store"),
            ("X-Mdr-Version", &version),
            ("Set-Cookie", &cookie),
        ],
    );
    if let Some(error) = &snapshot.build_error {
        add_headers(&mut response, &[("X-Mdr-Build-Error", &header_safe(error))]);
    }

    request.respond(response)?;
    Ok(())
}

/// Pins the page's version for the live.js that loads after it, so a build
/// landing between the two requests is still reported as newer.
fn version_cookie(version: u64) -> String {
    format!("{VERSION_COOKIE}={version}; Path=/; SameSite=Strict")
}

/// Respond with live.js; the current version is only a fallback.
pub fn respond_live_js(request: Request, version: u64) -> Result<()> {
    let body = LIVE_JS.render(&LiveVars {
        version,
        wait_path: WAIT_PATH,
    });
    send_body(request, 200, JAVASCRIPT, body.into_bytes())
}

/// Respond to a finished long-poll.
///
/// A timeout reports the caller's own version back, so a build that lands
/// between the timeout and this response is still seen on the next poll.
pub fn respond_wait(request: Request, outcome: &WaitOutcome, known: u64) -> Result<()> {
    let (status, body) = match outcome {
        WaitOutcome::Newer(snapshot) => (
            200,
            WaitBody {
                status: "changed",
                version: snapshot.version,
            },
        ),
        WaitOutcome::Timeout => (
            200,
            WaitBody {
                status: "current",
                version: known,
            },
        ),
        WaitOutcome::Stopping => (
            503,
            WaitBody {
                status: "stopping",
                version: known,
            },
        ),
    };

    let json = serde_json::to_vec(&body)?;
    send_body(request, status, JSON, json)
}

pub fn respond_not_found(request: Request) -> Result<()> {
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    send_body(request, 405, PLAIN, b"405 Method Not Allowed".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<()> {
    let mut response = Response::from_data(body).with_status_code(StatusCode(status));
    add_headers(
        &mut response,
        &[("Content-Type", content_type), ("Cache-Control", "no-store")],
    );
    request.respond(response)?;
    Ok(())
}

fn add_headers<R: std::io::Read>(response: &mut Response<R>, headers: &[(&str, &str)]) {
    for (key, value) in headers {
        if let Ok(header) = Header::from_bytes(key.as_bytes(), value.as_bytes()) {
            response.add_header(header);
        }
    }
}

/// First line of `message`, printable ASCII only, bounded length.
fn header_safe(message: &str) -> String {
    message
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '?' })
        .take(ERROR_HEADER_MAX)
        .collect()
}
