use std::sync::Arc;

use super::{BackgroundTask, BuildOutcome, Builder};

/// Run one rebuild on the blocking pool.
pub(super) fn spawn_build(builder: Arc<Builder>) -> BackgroundTask {
    tokio::task::spawn_blocking(move || builder.rebuild())
}

/// Wait for background build (blocks forever if None).
///
/// The handle stays in `task` until it completes, so dropping this future
/// inside `select!` loses nothing. `None` means the build task panicked.
pub(super) async fn wait_task(task: &mut Option<BackgroundTask>) -> Option<BuildOutcome> {
    let Some(handle) = task.as_mut() else {
        return std::future::pending().await;
    };

    let result = handle.await;
    *task = None;

    match result {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            crate::log!("build"; "build task failed: {}", e);
            None
        }
    }
}
