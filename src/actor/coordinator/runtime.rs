use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::builder::BuilderActor;
use crate::actor::fs::FsActor;
use crate::actor::messages::BuildMsg;

/// Upper bound for the in-flight build to wind down after shutdown.
const BUILDER_GRACE: Duration = Duration::from_secs(2);

/// Run all actors concurrently.
pub(super) async fn run_actors(
    fs: FsActor,
    builder: BuilderActor,
    builder_tx: mpsc::Sender<BuildMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let mut fs_handle = tokio::spawn(async move { fs.run().await });
    let mut builder_handle = tokio::spawn(async move { builder.run().await });

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() || crate::core::is_shutdown() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    } else {
        tokio::select! {
            _ = &mut fs_handle => {}
            _ = &mut builder_handle => {}
        }
    }

    fs_handle.abort();

    crate::debug!("actor"; "sending shutdown to builder");
    let _ = builder_tx.send(BuildMsg::Shutdown).await;
    if tokio::time::timeout(BUILDER_GRACE, &mut builder_handle)
        .await
        .is_err()
    {
        crate::log!("build"; "build still running, abandoning it");
        builder_handle.abort();
    }
}
