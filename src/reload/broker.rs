//! Long-poll wakeups on version advance.
//!
//! Waiters subscribe to a `tokio::sync::watch` channel carrying the latest
//! published version. Subscribing happens before the store is consulted, so a
//! publish racing with a new waiter is seen either through the store read or
//! through `changed()`; there is no window where it is missed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::snapshot::{Snapshot, SnapshotStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Signal {
    version: u64,
    stopping: bool,
}

/// How a parked wait ended.
#[derive(Debug, Clone)]
pub enum WaitOutcome {
    /// A version newer than the caller's is available.
    Newer(Arc<Snapshot>),
    /// Nothing changed within the timeout; the client should ask again.
    Timeout,
    /// The server is shutting down.
    Stopping,
}

pub struct ReloadBroker {
    tx: watch::Sender<Signal>,
}

impl ReloadBroker {
    pub fn new(version: u64) -> Self {
        let (tx, _rx) = watch::channel(Signal {
            version,
            stopping: false,
        });
        Self { tx }
    }

    /// Release every waiter whose known version is below `version`.
    pub fn publish(&self, version: u64) {
        self.tx.send_if_modified(|signal| {
            if signal.stopping || version <= signal.version {
                return false;
            }
            signal.version = version;
            true
        });
    }

    /// Resolve all current and future waiters with [`WaitOutcome::Stopping`].
    pub fn stop(&self) {
        self.tx.send_if_modified(|signal| {
            let changed = !signal.stopping;
            signal.stopping = true;
            changed
        });
    }

    /// Park until the store holds a version newer than `known`, `timeout`
    /// elapses, or the broker stops.
    ///
    /// A caller is never answered with a version below the one it reports.
    /// A `known` version ahead of the store (a tab left open across a
    /// restart) just times out; the reload client recovers from restarts itself.
    pub async fn wait(&self, store: &SnapshotStore, known: u64, timeout: Duration) -> WaitOutcome {
        let mut rx = self.tx.subscribe();
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if rx.borrow_and_update().stopping {
                return WaitOutcome::Stopping;
            }

            let current = store.read();
            if current.version > known {
                return WaitOutcome::Newer(current);
            }

            match tokio::time::timeout_at(deadline, rx.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) => return WaitOutcome::Stopping,
                Err(_) => return WaitOutcome::Timeout,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn setup() -> (Arc<SnapshotStore>, Arc<ReloadBroker>) {
        let store = SnapshotStore::new(Snapshot::initial(b"v1".to_vec()));
        let broker = ReloadBroker::new(store.read().version);
        (Arc::new(store), Arc::new(broker))
    }

    #[tokio::test]
    async fn test_stale_client_returns_immediately() {
        let (store, broker) = setup();
        store.advance(b"v2".to_vec());
        broker.publish(2);

        match broker.wait(&store, 1, Duration::from_secs(5)).await {
            WaitOutcome::Newer(snap) => assert_eq!(snap.version, 2),
            other => panic!("expected Newer, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_current_version_times_out() {
        let (store, broker) = setup();
        let outcome = broker.wait(&store, 1, Duration::from_millis(50)).await;
        assert!(matches!(outcome, WaitOutcome::Timeout));
    }

    #[tokio::test]
    async fn test_parked_waiter_released_on_advance() {
        let (store, broker) = setup();

        let waiter = {
            let (store, broker) = (Arc::clone(&store), Arc::clone(&broker));
            tokio::spawn(async move { broker.wait(&store, 1, Duration::from_secs(5)).await })
        };

        sleep(Duration::from_millis(20)).await;
        let snap = store.advance(b"v2".to_vec());
        broker.publish(snap.version);

        match waiter.await.unwrap() {
            WaitOutcome::Newer(snap) => {
                assert_eq!(snap.version, 2);
                assert_eq!(&*snap.html, b"v2");
            }
            other => panic!("expected Newer, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_build_does_not_release_waiter() {
        let (store, broker) = setup();

        let waiter = {
            let (store, broker) = (Arc::clone(&store), Arc::clone(&broker));
            tokio::spawn(async move { broker.wait(&store, 1, Duration::from_millis(150)).await })
        };

        sleep(Duration::from_millis(20)).await;
        store.mark_failed("syntax error");
        // republishing the same version is a no-op
        broker.publish(1);

        assert!(matches!(waiter.await.unwrap(), WaitOutcome::Timeout));
    }

    #[tokio::test]
    async fn test_many_waiters_released_together() {
        let (store, broker) = setup();

        let waiters: Vec<_> = (0..16)
            .map(|_| {
                let (store, broker) = (Arc::clone(&store), Arc::clone(&broker));
                tokio::spawn(async move { broker.wait(&store, 1, Duration::from_secs(5)).await })
            })
            .collect();

        sleep(Duration::from_millis(20)).await;
        store.advance(b"v2".to_vec());
        broker.publish(2);

        for w in waiters {
            assert!(matches!(w.await.unwrap(), WaitOutcome::Newer(s) if s.version == 2));
        }
    }

    #[tokio::test]
    async fn test_stop_resolves_parked_and_future_waiters() {
        let (store, broker) = setup();

        let waiter = {
            let (store, broker) = (Arc::clone(&store), Arc::clone(&broker));
            tokio::spawn(async move { broker.wait(&store, 1, Duration::from_secs(30)).await })
        };

        sleep(Duration::from_millis(20)).await;
        broker.stop();

        assert!(matches!(waiter.await.unwrap(), WaitOutcome::Stopping));
        assert!(matches!(
            broker.wait(&store, 1, Duration::from_secs(30)).await,
            WaitOutcome::Stopping
        ));
    }

    #[tokio::test]
    async fn test_client_ahead_of_server_never_sees_older_version() {
        let (store, broker) = setup();
        let outcome = broker.wait(&store, 5, Duration::from_millis(100)).await;
        assert!(matches!(outcome, WaitOutcome::Timeout));

        // still nothing until the store passes the client's version
        let waiter = {
            let (store, broker) = (Arc::clone(&store), Arc::clone(&broker));
            tokio::spawn(async move { broker.wait(&store, 2, Duration::from_secs(5)).await })
        };
        sleep(Duration::from_millis(20)).await;
        broker.publish(store.advance(b"v2".to_vec()).version);
        sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        broker.publish(store.advance(b"v3".to_vec()).version);
        assert!(matches!(waiter.await.unwrap(), WaitOutcome::Newer(s) if s.version == 3));
    }
}
