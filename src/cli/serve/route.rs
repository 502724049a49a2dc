//! Request routing for the preview server.

use tiny_http::Method;

/// Prefix of every surface endpoint.
pub const SURFACE_PREFIX: &str = "/__surface/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Shell page with the iframe and toolbar.
    Shell,
    /// Current document fingerprint, entry and refresh mode (JSON).
    Version,
    /// The composed document. Any other path under the prefix maps here so
    /// relative links that slip through still land on the preview.
    Document,
    /// A click inside the surface (JSON `InteractEvent`).
    Interact,
    /// Manual refresh.
    Refresh,
    /// Toggle auto-refresh (body `true` / `false`).
    AutoRefresh,
    NotFound,
    MethodNotAllowed,
}

impl Route {
    pub fn parse(method: &Method, url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);

        let Some(endpoint) = path.strip_prefix(SURFACE_PREFIX) else {
            return match (method, path) {
                (Method::Get | Method::Head, "/" | "/index.html") => Self::Shell,
                _ => Self::NotFound,
            };
        };

        match (method, endpoint) {
            (Method::Post, "interact") => Self::Interact,
            (Method::Post, "refresh") => Self::Refresh,
            (Method::Post, "auto") => Self::AutoRefresh,
            (Method::Post, _) => Self::NotFound,
            (Method::Get | Method::Head, "version") => Self::Version,
            (Method::Get | Method::Head, _) => Self::Document,
            _ => Self::MethodNotAllowed,
        }
    }
}

/// Parse an auto-refresh toggle body.
pub fn parse_toggle(body: &str) -> Option<bool> {
    match body.trim() {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" => Some(false),
        _ => None,
    }
}
