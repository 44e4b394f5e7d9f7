//! Converter assets materialized on disk.
//!
//! Pandoc only accepts templates, stylesheets and filters as file paths, so
//! the embedded copies are written once per process into a private temporary
//! directory. The directory is removed when `Assets` is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::embed::pandoc::{SIDENOTE_LUA, SKYLIGHTING_CSS, TEMPLATE_HTML, THEME_CSS};

/// On-disk copies of the embedded pandoc resources.
#[derive(Debug)]
pub struct Assets {
    /// Keeps the directory alive; removed on drop.
    dir: TempDir,
    pub template: PathBuf,
    pub lua_filter: PathBuf,
    pub theme_css: PathBuf,
    pub skylighting_css: PathBuf,
}

impl Assets {
    /// Write all embedded resources into a fresh temporary directory.
    pub fn materialize() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("mdr-")
            .tempdir()
            .context("failed to create temp dir")?;
        let root = dir.path();

        let template = root.join("template.html5");
        let lua_filter = root.join("pandoc-sidenote.lua");
        let theme_css = root.join("css").join("theme.css");
        let skylighting_css = root.join("css").join("skylighting-solarized-theme.css");

        let writes = [
            (template.as_path(), TEMPLATE_HTML),
            (lua_filter.as_path(), SIDENOTE_LUA),
            (theme_css.as_path(), THEME_CSS),
            (skylighting_css.as_path(), SKYLIGHTING_CSS),
        ];

        for (path, contents) in writes {
            write_file(path, contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }

        crate::debug!("convert"; "assets in {}", root.display());

        Ok(Self {
            dir,
            template,
            lua_filter,
            theme_css,
            skylighting_css,
        })
    }

    /// Directory holding the assets.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}
