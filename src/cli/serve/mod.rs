//! Development server with live reload support.
//!
//! ```text
//! GET /            current snapshot + reload client tag
//! GET /live.js     reload client, pinned to the served version
//! GET /__wait      long-poll until the version changes
//! ```

mod inject;
mod lifecycle;
mod response;
mod route;
mod wait;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tiny_http::{Request, Server};

use crate::actor::{Builder, Coordinator};
use crate::config::Config;
use crate::converter::Converter;
use crate::core::{is_shutdown, register_shutdown};
use crate::reload::{ServerState, Snapshot};
use crate::{debug, log};
use route::Route;
use wait::Waiters;

/// Threads serving pages and live.js; long-polls run outside this pool.
const REQUEST_THREADS: usize = 4;
/// How long parked long-polls get to answer once shutdown starts.
const WAITER_GRACE: Duration = Duration::from_secs(2);

/// Convert, serve, and rebuild on change until interrupted.
pub fn run(config: Arc<Config>, converter: Arc<dyn Converter>) -> Result<()> {
    let shutdown_rx = register_shutdown();

    // Attach the watcher before the initial build so no edit is missed.
    let coordinator = Coordinator::watch(&config)?.with_shutdown_signal(shutdown_rx);

    let html = super::convert::build_once(&config, converter.as_ref())?;
    let state = Arc::new(ServerState::new(Snapshot::initial(html)));

    let requested = config.serve.addr();
    let server = lifecycle::bind(requested)?;
    lifecycle::register_for_shutdown(&server);
    log!("serve"; "http://{}", lifecycle::local_addr(&server, requested));

    let rt = super::runtime()?;
    let builder = Builder::new(converter, config.input.clone(), Arc::clone(&state))
        .with_output(config.output.clone());
    let actors = rt.spawn(coordinator.run(builder));

    let waiters = Arc::new(Waiters::new(
        rt.handle().clone(),
        Arc::clone(&state),
        config.serve.wait_timeout,
    ));
    run_request_loop(&server, &state, &waiters)?;

    state.stop();
    if !waiters.drain(WAITER_GRACE) {
        debug!("serve"; "{} waiters still parked at exit", waiters.in_flight());
    }
    lifecycle::wait_for_shutdown(rt, actors);
    Ok(())
}

fn run_request_loop(
    server: &Server,
    state: &Arc<ServerState>,
    waiters: &Arc<Waiters>,
) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .thread_name(|i| format!("mdr-http-{i}"))
        .build()
        .context("failed to create request pool")?;

    for request in server.incoming_requests() {
        let state = Arc::clone(state);
        let waiters = Arc::clone(waiters);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &state, &waiters) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, state: &ServerState, waiters: &Waiters) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    let route = route::route(request.method(), request.url());
    debug!("serve"; "{} {} -> {:?}", request.method(), request.url(), route);

    match route {
        Route::Page => response::respond_page(request, &state.snapshot()),
        Route::LiveJs => response::respond_live_js(request, state.snapshot().version),
        Route::Wait { known } => {
            waiters.park(request, known);
            Ok(())
        }
        Route::NotFound => response::respond_not_found(request),
        Route::MethodNotAllowed => response::respond_method_not_allowed(request),
    }
}
