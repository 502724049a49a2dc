//! HTTP response helpers.

use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, StatusCode};

pub mod mime {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const JSON: &str = "application/json";
}

/// Respond with an HTML page that must never be cached.
pub fn respond_html(request: Request, body: &str) -> Result<()> {
    send_body(request, 200, mime::HTML, body.as_bytes().to_vec())
}

pub fn respond_json(request: Request, body: String) -> Result<()> {
    send_body(request, 200, mime::JSON, body.into_bytes())
}

/// Acknowledge a POST.
pub fn respond_no_content(request: Request) -> Result<()> {
    request.respond(Response::empty(StatusCode(204)))?;
    Ok(())
}

pub fn respond_bad_request(request: Request, message: &str) -> Result<()> {
    send_body(request, 400, mime::PLAIN, message.as_bytes().to_vec())
}

pub fn respond_not_found(request: Request) -> Result<()> {
    send_body(request, 404, mime::PLAIN, b"404 Not Found".to_vec())
}

pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    send_body(request, 405, mime::PLAIN, b"405 Method Not Allowed".to_vec())
}

/// Respond while no document has been written yet, or during shutdown.
pub fn respond_unavailable(request: Request) -> Result<()> {
    let response = Response::from_string("503 Service Unavailable")
        .with_status_code(StatusCode(503))
        .with_header(make_header("Content-Type", mime::PLAIN))
        .with_header(make_header("Retry-After", "1"));
    request.respond(response)?;
    Ok(())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_body(request: Request, status: u16, content_type: &'static str, body: Vec<u8>) -> Result<()> {
    if is_head_request(&request) {
        let response = Response::empty(StatusCode(status))
            .with_header(make_header("Content-Type", content_type))
            .with_header(make_header("Cache-Control", "no-store"));
        request.respond(response)?;
        return Ok(());
    }

    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type))
        .with_header(make_header("Cache-Control", "no-store"));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    // Both sides are static ASCII.
    Header::from_bytes(key.as_bytes(), value.as_bytes()).unwrap_or_else(|()| unreachable!())
}
