//! MIME type constants for the dev server responses.

pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const JAVASCRIPT: &str = "application/javascript";
    pub const JSON: &str = "application/json";
}
