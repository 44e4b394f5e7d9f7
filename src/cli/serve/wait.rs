//! Parking `/__wait` requests.
//!
//! Each waiter gets its own small thread that blocks on the broker through
//! the runtime handle, so idle browser tabs never occupy the page pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tiny_http::Request;
use tokio::runtime::Handle;

use super::response;
use crate::reload::ServerState;

const WAITER_STACK: usize = 64 * 1024;

/// Spawns and tracks parked long-poll requests.
pub struct Waiters {
    runtime: Handle,
    state: Arc<ServerState>,
    timeout: Duration,
    in_flight: Arc<AtomicUsize>,
}

/// Counts a waiter from park until its response is written.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Waiters {
    pub fn new(runtime: Handle, state: Arc<ServerState>, timeout: Duration) -> Self {
        Self {
            runtime,
            state,
            timeout,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Hand `request` to a waiter thread and return immediately.
    pub fn park(&self, request: Request, known: u64) {
        let guard = InFlight::enter(&self.in_flight);
        let runtime = self.runtime.clone();
        let state = Arc::clone(&self.state);
        let timeout = self.timeout;

        let spawned = thread::Builder::new()
            .name("mdr-wait".into())
            .stack_size(WAITER_STACK)
            .spawn(move || {
                let _guard = guard;
                let outcome = runtime.block_on(state.wait(known, timeout));
                if let Err(e) = response::respond_wait(request, &outcome, known) {
                    crate::debug!("serve"; "wait response failed: {}", e);
                }
            });

        // The dropped request is answered with a 500 by tiny_http.
        if let Err(e) = spawned {
            crate::log!("serve"; "cannot park wait request: {}", e);
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wait up to `grace` for parked requests to finish responding.
    ///
    /// Returns whether all of them did.
    pub fn drain(&self, grace: Duration) -> bool {
        let deadline = Instant::now() + grace;
        while self.in_flight() > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
        true
    }
}
