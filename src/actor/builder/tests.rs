use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tempfile::TempDir;
use tokio::sync::mpsc;

use super::{BuildOutcome, Builder, BuilderActor, built_ago};
use crate::actor::messages::BuildMsg;
use crate::converter::{ConversionError, Converter};
use crate::reload::{ServerState, Snapshot};

/// In-memory converter: renders whatever `content` holds when a build starts.
struct FakeConverter {
    content: Mutex<String>,
    delay: Duration,
    builds: AtomicUsize,
    fail: AtomicBool,
}

impl FakeConverter {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            content: Mutex::new("v0".into()),
            delay,
            builds: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        })
    }

    fn edit(&self, content: &str) {
        *self.content.lock() = content.to_string();
    }

    fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl Converter for FakeConverter {
    fn convert(&self, _source: &Path) -> Result<Vec<u8>, ConversionError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let content = self.content.lock().clone();
        std::thread::sleep(self.delay);

        if self.fail.load(Ordering::SeqCst) {
            return Err(ConversionError::Failed {
                program: "fake".into(),
                code: 1,
                stderr: "unexpected end of input".into(),
            });
        }
        Ok(format!("<p>{content}</p>").into_bytes())
    }
}

fn state() -> Arc<ServerState> {
    Arc::new(ServerState::new(Snapshot::initial(b"<p>v0</p>".to_vec())))
}

fn builder(converter: &Arc<FakeConverter>, state: &Arc<ServerState>) -> Builder {
    let converter: Arc<dyn Converter> = converter.clone();
    Builder::new(converter, PathBuf::from("doc.md"), Arc::clone(state))
}

async fn wait_for_html(state: &ServerState, expected: &[u8]) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while &*state.snapshot().html != expected {
        assert!(Instant::now() < deadline, "timed out waiting for snapshot");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// ============================================================================
// Builder::rebuild
// ============================================================================

#[test]
fn test_rebuild_publishes_next_version() {
    let converter = FakeConverter::new(Duration::ZERO);
    let state = state();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("doc.html");
    let builder = builder(&converter, &state).with_output(output.clone());

    converter.edit("v1");
    match builder.rebuild() {
        BuildOutcome::Built(snap) => {
            assert_eq!(snap.version, 2);
            assert_eq!(&*snap.html, b"<p>v1</p>");
        }
        other => panic!("expected Built, got {other:?}"),
    }
    assert_eq!(fs::read(&output).unwrap(), b"<p>v1</p>");
}

#[test]
fn test_failed_rebuild_keeps_last_good() {
    let converter = FakeConverter::new(Duration::ZERO);
    let state = state();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("doc.html");
    fs::write(&output, "<p>v0</p>").unwrap();
    let builder = builder(&converter, &state).with_output(output.clone());

    converter.fail.store(true, Ordering::SeqCst);
    converter.edit("broken");

    match builder.rebuild() {
        BuildOutcome::Failed { error, retained } => {
            assert!(matches!(error, ConversionError::Failed { code: 1, .. }));
            assert_eq!(retained.version, 1);
            assert_eq!(&*retained.html, b"<p>v0</p>");
        }
        other => panic!("expected Failed, got {other:?}"),
    }

    let snap = state.snapshot();
    assert_eq!(snap.version, 1);
    assert!(snap.build_error.as_deref().unwrap().contains("unexpected end of input"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "<p>v0</p>");

    // fixing the document clears the error
    converter.fail.store(false, Ordering::SeqCst);
    converter.edit("fixed");
    assert!(matches!(builder.rebuild(), BuildOutcome::Built(s) if s.version == 2));
    assert!(state.snapshot().build_error.is_none());
}

#[test]
fn test_built_ago() {
    let now = std::time::SystemTime::now();
    assert_eq!(built_ago(now), "built 0s ago");
    assert_eq!(built_ago(now - Duration::from_secs(90)), "built 1m ago");
    assert_eq!(built_ago(now - Duration::from_secs(7300)), "built 2h ago");
    // clock went backwards
    assert_eq!(built_ago(now + Duration::from_secs(30)), "built 0s ago");
}

// ============================================================================
// BuilderActor
// ============================================================================

#[tokio::test]
async fn test_burst_during_build_coalesces() {
    const EDITS: usize = 10;

    let converter = FakeConverter::new(Duration::from_millis(150));
    let state = state();
    let (tx, rx) = mpsc::channel(EDITS * 2);
    let actor = tokio::spawn(BuilderActor::new(rx, builder(&converter, &state)).run());

    // all edits land well inside the first build
    for i in 1..=EDITS {
        converter.edit(&format!("v{i}"));
        tx.send(BuildMsg::Rebuild).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // final state reflects the last edit
    wait_for_html(&state, format!("<p>v{EDITS}</p>").as_bytes()).await;
    // nothing else is owed
    tokio::time::sleep(Duration::from_millis(400)).await;

    let builds = converter.builds();
    assert!((1..EDITS).contains(&builds), "builds = {builds}");
    // versions advanced once per build
    assert_eq!(state.snapshot().version, 1 + builds as u64);

    tx.send(BuildMsg::Shutdown).await.unwrap();
    actor.await.unwrap();
}

#[tokio::test]
async fn test_spaced_changes_each_build() {
    let converter = FakeConverter::new(Duration::from_millis(5));
    let state = state();
    let (tx, rx) = mpsc::channel(8);
    let actor = tokio::spawn(BuilderActor::new(rx, builder(&converter, &state)).run());

    for i in 1..=3 {
        converter.edit(&format!("v{i}"));
        tx.send(BuildMsg::Rebuild).await.unwrap();
        wait_for_html(&state, format!("<p>v{i}</p>").as_bytes()).await;
    }

    assert_eq!(converter.builds(), 3);
    assert_eq!(state.snapshot().version, 4);

    drop(tx);
    actor.await.unwrap();
}

#[tokio::test]
async fn test_failure_then_fix_via_actor() {
    let converter = FakeConverter::new(Duration::ZERO);
    let state = state();
    let (tx, rx) = mpsc::channel(8);
    let actor = tokio::spawn(BuilderActor::new(rx, builder(&converter, &state)).run());

    converter.fail.store(true, Ordering::SeqCst);
    tx.send(BuildMsg::Rebuild).await.unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while state.snapshot().build_error.is_none() {
        assert!(Instant::now() < deadline);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(state.snapshot().version, 1);

    converter.fail.store(false, Ordering::SeqCst);
    converter.edit("ok");
    tx.send(BuildMsg::Rebuild).await.unwrap();
    wait_for_html(&state, b"<p>ok</p>").await;
    assert_eq!(state.snapshot().version, 2);

    tx.send(BuildMsg::Shutdown).await.unwrap();
    actor.await.unwrap();
}
