//! Request routing.

use tiny_http::Method;

use crate::embed::serve::LIVE_JS_PATH;

/// Long-poll endpoint.
pub const WAIT_PATH: &str = "/__wait";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The rendered document.
    Page,
    /// The reload client.
    LiveJs,
    /// Park until a version newer than `known` exists.
    Wait { known: u64 },
    NotFound,
    MethodNotAllowed,
}

pub fn route(method: &Method, url: &str) -> Route {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    let read_only = matches!(method, Method::Get | Method::Head);
    match path {
        "/" | "/index.html" if read_only => Route::Page,
        p if p == LIVE_JS_PATH && read_only => Route::LiveJs,
        WAIT_PATH if *method == Method::Get => Route::Wait {
            known: parse_version(query),
        },
        "/" | "/index.html" | WAIT_PATH => Route::MethodNotAllowed,
        p if p == LIVE_JS_PATH => Route::MethodNotAllowed,
        _ => Route::NotFound,
    }
}

/// `version=N` from a query string; missing or invalid counts as 0.
fn parse_version(query: &str) -> u64 {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "version")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_routes() {
        assert_eq!(route(&Method::Get, "/"), Route::Page);
        assert_eq!(route(&Method::Head, "/"), Route::Page);
        assert_eq!(route(&Method::Get, "/index.html"), Route::Page);
        assert_eq!(route(&Method::Get, "/?utm=x"), Route::Page);
    }

    #[test]
    fn test_live_js_route() {
        assert_eq!(route(&Method::Get, "/live.js"), Route::LiveJs);
        assert_eq!(route(&Method::Post, "/live.js"), Route::MethodNotAllowed);
    }

    #[test]
    fn test_wait_version_parsing() {
        assert_eq!(route(&Method::Get, "/__wait?version=7"), Route::Wait { known: 7 });
        assert_eq!(route(&Method::Get, "/__wait?a=1&version=12"), Route::Wait { known: 12 });
        assert_eq!(route(&Method::Get, "/__wait"), Route::Wait { known: 0 });
        assert_eq!(route(&Method::Get, "/__wait?version=abc"), Route::Wait { known: 0 });
        assert_eq!(route(&Method::Get, "/__wait?version=-1"), Route::Wait { known: 0 });
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(route(&Method::Get, "/favicon.ico"), Route::NotFound);
        assert_eq!(route(&Method::Get, "/doc.md"), Route::NotFound);
        assert_eq!(route(&Method::Delete, "/"), Route::MethodNotAllowed);
    }
}
