//! Document title detection.
//!
//! Pandoc refuses to emit a standalone page without a title, so documents
//! that don't declare one get their file stem as a fallback.

use std::path::Path;

/// Title used when the path has no usable file stem.
const DEFAULT_TITLE: &str = "Document";

/// Check whether the document declares its own title.
///
/// Recognized forms:
/// - YAML front matter (`---` block) with a `title:` key
/// - Pandoc title block (first line starting with `%`)
pub fn has_title_metadata(content: &str) -> bool {
    if let Some(rest) = content.strip_prefix("---\n")
        && let Some(end) = rest.find("\n---")
        && rest[..end]
            .lines()
            .any(|l| l.trim_start().to_ascii_lowercase().starts_with("title:"))
    {
        return true;
    }

    content
        .lines()
        .next()
        .is_some_and(|first| first.starts_with('%') && first.len() > 1)
}

/// Fallback title derived from the file name.
pub fn fallback_title(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_TITLE)
}
