//! FileSystem Actor
//!
//! Watches the source document and asks the BuilderActor for a rebuild
//! when its content really changed. Implements the "Watcher-First" pattern:
//! the watcher is attached and the fingerprint taken before the initial
//! build, so edits made during that build are not lost.
//!
//! Architecture:
//! ```text
//! Watcher → filter (is it our document?) → Debouncer (pure timing)
//!         → SourceDocument::check (fingerprint) → BuildMsg::Rebuild
//! ```

use std::path::PathBuf;
use std::time::Duration;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::BuildMsg;

// Pure timing.
mod debouncer;
// Document identity, fingerprint and retry backoff.
mod source;
// Watch root attach/re-attach lifecycle.
mod watch_roots;


use debouncer::Debouncer;
use source::{Backoff, Check, SourceDocument};
use watch_roots::WatchRoot;

/// How often the watched directory is checked for removal or recreation,
/// independent of events (a removed directory may report nothing).
const ROOT_CHECK: Duration = Duration::from_secs(1);

/// FileSystem Actor - watches the source document
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// The document's directory, re-attached if it disappears
    root: WatchRoot,
    source: SourceDocument,
    debouncer: Debouncer,
    backoff: Backoff,
    /// Channel to send messages to BuilderActor
    builder_tx: mpsc::Sender<BuildMsg>,
}

impl FsActor {
    /// Attach the watcher and fingerprint the document.
    ///
    /// Events are buffered from here on while the caller performs the
    /// initial build.
    pub fn new(
        path: PathBuf,
        debounce: Duration,
        builder_tx: mpsc::Sender<BuildMsg>,
    ) -> notify::Result<Self> {
        // Create sync channel for notify (it doesn't support async)
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let source = SourceDocument::new(path);
        let mut root = WatchRoot::new(source.watch_dir().to_path_buf());
        root.attach(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            root,
            source,
            debouncer: Debouncer::new(debounce),
            backoff: Backoff::new(),
            builder_tx,
        })
    }

    /// Run the actor event loop until the builder goes away.
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut root,
            mut source,
            mut debouncer,
            mut backoff,
            builder_tx,
        } = self;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Result<notify::Event>>(64);

        // Spawn a thread to poll notify events and send to async channel
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                if async_tx.blocking_send(result).is_err() {
                    break; // Receiver dropped
                }
            }
        });

        crate::debug!("watch"; "watching {}", source.path().display());

        loop {
            tokio::select! {
                biased;
                Some(result) = async_rx.recv() => match result {
                    Ok(event) if source.is_relevant(&event) => {
                        crate::debug!("watch"; "event {:?} {:?}", event.kind, event.paths);
                        debouncer.add_event();
                    }
                    Ok(_) => {}
                    Err(e) => {
                        // Events may have been dropped; let the fingerprint decide.
                        crate::log!("watch"; "notify error: {}", e);
                        debouncer.add_event();
                    }
                },
                _ = tokio::time::sleep(debouncer.sleep_duration().min(ROOT_CHECK)) => {
                    if root.maintain(&mut watcher) {
                        debouncer.add_event();
                    }
                    if !debouncer.take_if_ready() {
                        continue;
                    }
                    if crate::core::is_shutdown() {
                        break;
                    }
                    let settled = settle(&mut source, &mut backoff, &mut debouncer, &builder_tx).await;
                    if settled.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Check the document once events have settled.
///
/// Returns `Err(())` if BuilderActor shut down.
async fn settle(
    source: &mut SourceDocument,
    backoff: &mut Backoff,
    debouncer: &mut Debouncer,
    builder_tx: &mpsc::Sender<BuildMsg>,
) -> Result<(), ()> {
    match source.check() {
        Check::Changed(hash) => {
            if backoff.reset() {
                crate::log!("watch"; "{} is readable again", source.path().display());
            }
            crate::debug!("watch"; "content changed ({})", hash);
            builder_tx.send(BuildMsg::Rebuild).await.map_err(|_| ())
        }
        Check::Unchanged => {
            backoff.reset();
            crate::logger::status_unchanged("saved, content unchanged");
            Ok(())
        }
        Check::Unavailable(e) => {
            let delay = backoff.next_delay();
            if backoff.failures() == 1 {
                crate::log!(
                    "watch";
                    "cannot read {}: {}; waiting for it to reappear",
                    source.path().display(),
                    e
                );
            } else {
                crate::debug!("watch"; "still unavailable, retry in {:?}", delay);
            }
            debouncer.retry_after(delay);
            Ok(())
        }
    }
}
