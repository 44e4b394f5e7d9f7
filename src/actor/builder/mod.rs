//! Builder Actor - Serialized Rebuilds
//!
//! `Builder::rebuild` runs the converter once and installs the result.
//! `BuilderActor` decides *when* to run it: one build at a time on the
//! blocking pool, with change signals that arrive mid-build folded into a
//! single follow-up (see [`Schedule`]).

mod schedule;
mod tasks;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::messages::BuildMsg;
use crate::converter::{ConversionError, Converter};
use crate::freshness::ContentHash;
use crate::logger;
use crate::reload::{ServerState, Snapshot};
use crate::utils::output::write_output;

pub use schedule::Schedule;
use tasks::{spawn_build, wait_task};

pub(super) type BackgroundTask = JoinHandle<BuildOutcome>;

/// Result of one rebuild.
#[derive(Debug)]
pub enum BuildOutcome {
    /// New snapshot installed and waiters released.
    Built(Arc<Snapshot>),
    /// Converter failed; `retained` is the snapshot still being served.
    Failed {
        error: ConversionError,
        retained: Arc<Snapshot>,
    },
}

/// Converts the source document and publishes the result.
pub struct Builder {
    converter: Arc<dyn Converter>,
    source: PathBuf,
    /// Also mirror each successful build to this file.
    output: Option<PathBuf>,
    state: Arc<ServerState>,
}

impl Builder {
    pub fn new(converter: Arc<dyn Converter>, source: PathBuf, state: Arc<ServerState>) -> Self {
        Self {
            converter,
            source,
            output: None,
            state,
        }
    }

    pub fn with_output(mut self, path: PathBuf) -> Self {
        self.output = Some(path);
        self
    }

    /// Convert once. Blocks for the duration of the converter run.
    pub fn rebuild(&self) -> BuildOutcome {
        let start = Instant::now();

        let html = match self.converter.convert(&self.source) {
            Ok(html) => html,
            Err(error) => return self.on_failure(error),
        };

        if let Some(output) = &self.output
            && let Err(e) = write_output(output, &html)
        {
            crate::log!("build"; "failed to write {}: {}", output.display(), e);
        }

        crate::debug!("build"; "output {}", ContentHash::of(&html));
        let snapshot = self.state.publish(html);
        logger::status_success(&format!(
            "rebuilt v{} in {}ms",
            snapshot.version,
            start.elapsed().as_millis()
        ));
        BuildOutcome::Built(snapshot)
    }

    fn on_failure(&self, error: ConversionError) -> BuildOutcome {
        if let ConversionError::Cancelled { .. } = error {
            crate::debug!("build"; "build cancelled by shutdown");
            return BuildOutcome::Failed {
                error,
                retained: self.state.snapshot(),
            };
        }

        let message = error.to_string();
        let retained = self.state.record_failure(&message);
        logger::status_error(
            &format!(
                "build failed, still serving v{} ({})",
                retained.version,
                built_ago(retained.built_at)
            ),
            &message,
        );
        BuildOutcome::Failed { error, retained }
    }
}

/// `"built 42s ago"`, coarse enough for a status line.
fn built_ago(built_at: SystemTime) -> String {
    let secs = built_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    match secs {
        0..60 => format!("built {secs}s ago"),
        60..3600 => format!("built {}m ago", secs / 60),
        _ => format!("built {}h ago", secs / 3600),
    }
}

/// Builder Actor - owns the rebuild schedule
pub struct BuilderActor {
    rx: mpsc::Receiver<BuildMsg>,
    builder: Arc<Builder>,
    schedule: Schedule,
}

impl BuilderActor {
    pub fn new(rx: mpsc::Receiver<BuildMsg>, builder: Builder) -> Self {
        Self {
            rx,
            builder: Arc::new(builder),
            schedule: Schedule::default(),
        }
    }

    /// Main event loop
    pub async fn run(mut self) {
        let mut background: Option<BackgroundTask> = None;

        loop {
            tokio::select! {
                biased;

                msg = self.rx.recv() => match msg {
                    Some(BuildMsg::Rebuild) => {
                        if self.schedule.request() {
                            background = Some(spawn_build(Arc::clone(&self.builder)));
                        } else {
                            crate::debug!("build"; "build in flight, one rebuild owed");
                        }
                    }
                    Some(BuildMsg::Shutdown) | None => break,
                },

                _ = wait_task(&mut background) => {
                    if self.schedule.finish() && !crate::core::is_shutdown() {
                        background = Some(spawn_build(Arc::clone(&self.builder)));
                    }
                }
            }
        }

        // The converter run notices shutdown and ends early.
        if background.is_some() {
            let _ = wait_task(&mut background).await;
        }
        crate::debug!("build"; "stopped");
    }
}
