//! Command-line interface module.

mod args;
pub mod convert;
pub mod serve;
pub mod watch;

pub use args::Cli;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;

/// Runtime hosting the actor system and parked long-polls.
fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("mdr-actor")
        .enable_all()
        .build()
        .context("failed to create tokio runtime")
}
