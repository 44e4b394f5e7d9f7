//! Reload-client injection.

use std::borrow::Cow;

use crate::embed::serve::{LIVE_JS_PATH, LIVE_JS_TAG};

/// Append the reload client tag unless the page already references it.
///
/// The tag goes after the document (same bytes as batch output, plus one
/// line), so the served body is a strict extension of the file on disk.
pub fn inject_live_script(html: &[u8]) -> Cow<'_, [u8]> {
    if contains(html, LIVE_JS_PATH.as_bytes()) {
        return Cow::Borrowed(html);
    }

    let mut body = Vec::with_capacity(html.len() + LIVE_JS_TAG.len() + 2);
    body.extend_from_slice(html);
    body.push(b'\n');
    body.extend_from_slice(LIVE_JS_TAG.as_bytes());
    body.push(b'\n');
    Cow::Owned(body)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
