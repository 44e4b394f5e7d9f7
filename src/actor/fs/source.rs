use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::EventKind;

use crate::freshness::{ContentHash, fingerprint_file};

const BACKOFF_INITIAL: Duration = Duration::from_millis(100);
const BACKOFF_MAX: Duration = Duration::from_secs(5);

/// Result of re-reading the source after events settle.
#[derive(Debug)]
pub(super) enum Check {
    /// Bytes differ from the last observed fingerprint.
    Changed(ContentHash),
    /// Event fired but the content is identical (touch, chmod, same-bytes save).
    Unchanged,
    /// Missing or unreadable right now; try again later.
    Unavailable(io::Error),
}

/// The watched document: where it lives, how to recognize its events,
/// and the last content fingerprint seen.
pub(super) struct SourceDocument {
    path: PathBuf,
    canonical: PathBuf,
    watch_dir: PathBuf,
    fingerprint: Option<ContentHash>,
}

impl SourceDocument {
    /// Capture the current fingerprint of `path`.
    ///
    /// Call this before the initial build so edits made while it runs are
    /// seen as changes afterwards.
    pub(super) fn new(path: PathBuf) -> Self {
        let watch_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
        let fingerprint = fingerprint_file(&path).ok();

        Self {
            path,
            canonical,
            watch_dir,
            fingerprint,
        }
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }

    /// Directory watched (non-recursively) for events about the document.
    pub(super) fn watch_dir(&self) -> &Path {
        &self.watch_dir
    }

    /// Does this notify event concern the document?
    pub(super) fn is_relevant(&self, event: &notify::Event) -> bool {
        let kind_matches = matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
        );
        kind_matches && event.paths.iter().any(|p| self.targets(p))
    }

    /// Match by canonical path, then file name, then literal path.
    fn targets(&self, path: &Path) -> bool {
        let candidate = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.watch_dir.join(path)
        };

        if candidate
            .canonicalize()
            .is_ok_and(|canon| canon == self.canonical)
        {
            return true;
        }

        match (candidate.file_name(), self.path.file_name()) {
            (Some(event_name), Some(name)) if event_name == name => true,
            _ => candidate == self.path,
        }
    }

    /// Re-read the document and compare with the last fingerprint.
    pub(super) fn check(&mut self) -> Check {
        match fingerprint_file(&self.path) {
            Ok(hash) if self.fingerprint == Some(hash) => Check::Unchanged,
            Ok(hash) => {
                self.fingerprint = Some(hash);
                Check::Changed(hash)
            }
            Err(e) => Check::Unavailable(e),
        }
    }
}

/// Exponential retry delay for an unavailable document.
pub(super) struct Backoff {
    next: Duration,
    failures: u32,
}

impl Backoff {
    pub(super) const fn new() -> Self {
        Self {
            next: BACKOFF_INITIAL,
            failures: 0,
        }
    }

    /// Delay before the next attempt; doubles up to 5s.
    pub(super) fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(BACKOFF_MAX);
        self.failures += 1;
        delay
    }

    pub(super) fn failures(&self) -> u32 {
        self.failures
    }

    /// Back to the initial delay. Returns whether we were failing.
    pub(super) fn reset(&mut self) -> bool {
        let was_failing = self.failures > 0;
        *self = Self::new();
        was_failing
    }
}
