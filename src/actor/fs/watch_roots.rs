use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

/// Watch-root consistency manager for the document's directory.
///
/// Responsibility:
/// - Attach the directory at startup
/// - Re-attach it after it was removed and recreated
pub(super) struct WatchRoot {
    dir: PathBuf,
    attached: bool,
}

impl WatchRoot {
    pub(super) fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            attached: false,
        }
    }

    pub(super) fn attach(&mut self, watcher: &mut RecommendedWatcher) -> notify::Result<()> {
        watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;
        self.attached = true;
        Ok(())
    }

    pub(super) fn is_attached(&self) -> bool {
        self.attached
    }

    /// Notice a lost directory, or re-attach a recreated one.
    ///
    /// Returns `true` on re-attach: the document may have come back without
    /// any event reaching us, so the caller should check it.
    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) -> bool {
        // The OS drops the watch together with the directory.
        if self.attached && !self.dir.exists() {
            self.attached = false;
            crate::debug!("watch"; "lost watch: {}", self.dir.display());
            return false;
        }

        if !self.attached
            && self.dir.exists()
            && watcher.watch(&self.dir, RecursiveMode::NonRecursive).is_ok()
        {
            self.attached = true;
            crate::debug!("watch"; "re-attached watch: {}", self.dir.display());
            return true;
        }
        false
    }
}
