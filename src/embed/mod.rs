//! Embedded static resources for mdr.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Dev server resources (live.js)
//! - `pandoc` - Converter resources (HTML template, stylesheets, Lua filter)
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{LIVE_JS, LiveVars};
//!
//! let js = LIVE_JS.render(&LiveVars { version: 3, wait_path: "/__wait" });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// URL the reload client is served from.
    pub const LIVE_JS_PATH: &str = "/live.js";

    /// Cookie carrying the version of the page a tab loaded.
    pub const VERSION_COOKIE: &str = "mdr_version";

    /// Script tag injected into served pages.
    pub const LIVE_JS_TAG: &str = r#"<script src="/live.js"></script>"#;

    /// Variables for live.js.
    pub struct LiveVars {
        /// Current version, used when the page's version cookie is missing.
        pub version: u64,
        /// Long-poll endpoint path.
        pub wait_path: &'static str,
    }

    impl TemplateVars for LiveVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__MDR_VERSION__", &self.version.to_string())
                .replace("__MDR_WAIT_PATH__", self.wait_path)
                .replace("__MDR_COOKIE__", VERSION_COOKIE)
        }
    }

    /// Long-poll reload client.
    pub const LIVE_JS: Template<LiveVars> = Template::new(include_str!("serve/live.js"));
}

pub mod pandoc {
    /// Standalone HTML template.
    pub const TEMPLATE_HTML: &str = include_str!("pandoc/template.html5");
    /// Page theme (layout, typography, sidenotes).
    pub const THEME_CSS: &str = include_str!("pandoc/theme.css");
    /// Syntax highlighting colors.
    pub const SKYLIGHTING_CSS: &str = include_str!("pandoc/skylighting-solarized-theme.css");
    /// Footnote → sidenote filter.
    pub const SIDENOTE_LUA: &str = include_str!("pandoc/pandoc-sidenote.lua");
}
