//! Live-reload engine state.
//!
//! # Architecture
//!
//! ```text
//! FsActor -> BuilderActor -> ServerState ──> HTTP  GET /         (read)
//!  (watch)     (convert)     ├ SnapshotStore      GET /__wait    (park)
//!                            └ ReloadBroker
//! ```
//!
//! # Modules
//!
//! - `snapshot` - immutable rendered pages and the atomic store holding the current one
//! - `broker` - parks long-poll waiters and wakes them when the version advances

mod broker;
mod snapshot;

use std::sync::Arc;
use std::time::Duration;

pub use broker::{ReloadBroker, WaitOutcome};
pub use snapshot::{Snapshot, SnapshotStore};

/// Single owner of the current snapshot and its waiters.
///
/// Only the builder mutates it (`publish`, `record_failure`); HTTP handlers
/// hold an `Arc` and read.
pub struct ServerState {
    store: SnapshotStore,
    broker: ReloadBroker,
}

impl ServerState {
    pub fn new(initial: Snapshot) -> Self {
        let broker = ReloadBroker::new(initial.version);
        Self {
            store: SnapshotStore::new(initial),
            broker,
        }
    }

    #[inline]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.read()
    }

    /// Install a successful build and release waiters.
    pub fn publish(&self, html: Vec<u8>) -> Arc<Snapshot> {
        let snapshot = self.store.advance(html);
        self.broker.publish(snapshot.version);
        snapshot
    }

    /// Keep serving the current page, remember why the rebuild failed.
    pub fn record_failure(&self, error: &str) -> Arc<Snapshot> {
        self.store.mark_failed(error)
    }

    pub async fn wait(&self, known: u64, timeout: Duration) -> WaitOutcome {
        self.broker.wait(&self.store, known, timeout).await
    }

    /// Resolve every parked waiter with `Stopping`.
    pub fn stop(&self) {
        self.broker.stop();
    }
}
