//! Converter settings.

use std::time::Duration;

use serde::Serialize;

/// Environment variable overriding the KaTeX asset base URL.
pub const KATEX_ENV: &str = "MDR_KATEX";

/// Public KaTeX distribution used when `MDR_KATEX` is unset.
pub const DEFAULT_KATEX_URL: &str = "https://cdn.jsdelivr.net/npm/katex@0.15.1/dist/";

#[derive(Debug, Clone, Serialize)]
pub struct ConvertConfig {
    /// Base URL for KaTeX assets, always ending in `/`.
    pub katex_url: String,

    /// Upper bound for one converter run; longer runs are killed and count as failed.
    pub timeout: Duration,
}

impl ConvertConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Resolve the KaTeX base URL from the (optional) environment value.
    ///
    /// Empty values fall back to the default; a trailing `/` is appended when missing.
    pub fn katex_url(env: Option<String>) -> String {
        match env.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => {
                if v.ends_with('/') {
                    v
                } else {
                    format!("{v}/")
                }
            }
            _ => DEFAULT_KATEX_URL.to_string(),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            katex_url: DEFAULT_KATEX_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}
