//! Actor Coordinator - Wires up the Rebuild Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates the FsActor → BuilderActor channel
//! - Attaches the watcher early (before the initial build)
//! - Runs both actors until shutdown

mod runtime;

use anyhow::{Result, anyhow};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::builder::{Builder, BuilderActor};
use super::fs::FsActor;
use super::messages::BuildMsg;
use crate::config::Config;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    fs: FsActor,
    builder_tx: mpsc::Sender<BuildMsg>,
    builder_rx: mpsc::Receiver<BuildMsg>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// Start watching the configured document.
    ///
    /// Call before the initial build; changes made during it are delivered
    /// once [`Coordinator::run`] starts.
    pub fn watch(config: &Config) -> Result<Self> {
        let (builder_tx, builder_rx) = mpsc::channel::<BuildMsg>(CHANNEL_BUFFER);
        let fs = FsActor::new(config.input.clone(), config.watch.debounce, builder_tx.clone())
            .map_err(|e| anyhow!("watcher failed: {}", e))?;

        Ok(Self {
            fs,
            builder_tx,
            builder_rx,
            shutdown_rx: None,
        })
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system with `builder` performing rebuilds.
    pub async fn run(self, builder: Builder) -> Result<()> {
        let builder_actor = BuilderActor::new(self.builder_rx, builder);

        crate::debug!("actor"; "start");
        runtime::run_actors(self.fs, builder_actor, self.builder_tx, self.shutdown_rx).await;
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
