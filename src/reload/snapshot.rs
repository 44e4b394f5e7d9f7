//! Immutable rendered snapshots and the store that swaps them.

use std::sync::Arc;
use std::time::SystemTime;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

/// One rendered page.
///
/// Never mutated after construction; a rebuild produces a new value and the
/// store swaps the reference, so in-flight readers keep a consistent copy.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub html: Arc<[u8]>,
    /// Starts at 1 with the initial build; +1 per successful rebuild.
    pub version: u64,
    pub built_at: SystemTime,
    /// Set when the most recent rebuild failed; `html` is then the last good page.
    pub build_error: Option<Arc<str>>,
}

impl Snapshot {
    /// The snapshot produced by the initial build.
    pub fn initial(html: Vec<u8>) -> Self {
        Self {
            html: html.into(),
            version: 1,
            built_at: SystemTime::now(),
            build_error: None,
        }
    }
}

/// Holder of the current snapshot.
///
/// Reads are a lock-free `ArcSwap` load. Writes are serialized by a mutex so
/// "read current, derive next, store" is atomic with respect to other writers;
/// readers never take that lock.
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
    writer: Mutex<()>,
}

impl SnapshotStore {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            writer: Mutex::new(()),
        }
    }

    /// Latest fully-built snapshot.
    #[inline]
    pub fn read(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Derive the next snapshot from the current one and install it.
    ///
    /// Writers are serialized. A derived snapshot whose version is older than
    /// the current one is rejected and the current snapshot returned.
    pub fn write(&self, derive: impl FnOnce(&Snapshot) -> Snapshot) -> Arc<Snapshot> {
        let _guard = self.writer.lock();
        let current = self.current.load_full();
        let next = derive(&current);
        if next.version < current.version {
            return current;
        }
        let next = Arc::new(next);
        self.current.store(Arc::clone(&next));
        next
    }

    /// Install a successful build as `version + 1`, clearing any recorded error.
    pub fn advance(&self, html: Vec<u8>) -> Arc<Snapshot> {
        self.write(|current| Snapshot {
            html: html.into(),
            version: current.version + 1,
            built_at: SystemTime::now(),
            build_error: None,
        })
    }

    /// Record a failed build: same page, same version, error attached.
    pub fn mark_failed(&self, error: &str) -> Arc<Snapshot> {
        self.write(|current| Snapshot {
            build_error: Some(Arc::from(error)),
            ..current.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_initial_version_is_one() {
        let store = SnapshotStore::new(Snapshot::initial(b"<p>a</p>".to_vec()));
        let snap = store.read();
        assert_eq!(snap.version, 1);
        assert_eq!(&*snap.html, b"<p>a</p>");
        assert!(snap.build_error.is_none());
    }

    #[test]
    fn test_advance_increments_by_one() {
        let store = SnapshotStore::new(Snapshot::initial(b"a".to_vec()));
        assert_eq!(store.advance(b"b".to_vec()).version, 2);
        assert_eq!(store.advance(b"c".to_vec()).version, 3);
        assert_eq!(&*store.read().html, b"c");
    }

    #[test]
    fn test_failure_keeps_page_and_version() {
        let store = SnapshotStore::new(Snapshot::initial(b"good".to_vec()));
        store.advance(b"better".to_vec());

        let failed = store.mark_failed("pandoc exited with code 64");
        assert_eq!(failed.version, 2);
        assert_eq!(&*failed.html, b"better");
        assert_eq!(failed.build_error.as_deref(), Some("pandoc exited with code 64"));

        // next success clears the error
        let ok = store.advance(b"fixed".to_vec());
        assert_eq!(ok.version, 3);
        assert!(ok.build_error.is_none());
        assert!(ok.built_at >= failed.built_at);
    }

    #[test]
    fn test_write_rejects_older_version() {
        let store = SnapshotStore::new(Snapshot::initial(b"a".to_vec()));
        store.advance(b"b".to_vec());
        let kept = store.write(|_| Snapshot::initial(b"stale".to_vec()));
        assert_eq!(kept.version, 2);
        assert_eq!(&*kept.html, b"b");
        assert_eq!(&*store.read().html, b"b");
    }

    #[test]
    fn test_old_snapshot_survives_swap() {
        let store = SnapshotStore::new(Snapshot::initial(b"old".to_vec()));
        let held = store.read();
        store.advance(b"new".to_vec());
        assert_eq!(&*held.html, b"old");
        assert_eq!(&*store.read().html, b"new");
    }

    #[test]
    fn test_concurrent_readers_see_monotonic_versions() {
        let store = Arc::new(SnapshotStore::new(Snapshot::initial(b"0".to_vec())));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let mut last = 0;
                    for _ in 0..2000 {
                        let snap = store.read();
                        assert!(snap.version >= last);
                        // html and version always belong together
                        assert_eq!(snap.html.as_ref(), (snap.version - 1).to_string().as_bytes());
                        last = snap.version;
                    }
                })
            })
            .collect();

        for i in 1..200u64 {
            store.advance(i.to_string().into_bytes());
        }
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(store.read().version, 200);
    }
}
