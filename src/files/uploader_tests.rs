use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;

use super::*;
use crate::files::FileState;

const STORED_NAME: &str = "files/abc";

/// Store double that replays scripted upload results and file states.
struct ScriptedStore {
    uploads: Mutex<VecDeque<Result<RemoteFile, LLMError>>>,
    states: Mutex<VecDeque<Result<RemoteFile, LLMError>>>,
    upload_calls: Arc<AtomicUsize>,
    get_calls: Arc<AtomicUsize>,
    seen_paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl ScriptedStore {
    fn new(uploads: Vec<Result<RemoteFile, LLMError>>) -> Self {
        Self {
            uploads: Mutex::new(uploads.into()),
            states: Mutex::new(VecDeque::new()),
            upload_calls: Arc::new(AtomicUsize::new(0)),
            get_calls: Arc::new(AtomicUsize::new(0)),
            seen_paths: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn with_states(self, states: Vec<Result<RemoteFile, LLMError>>) -> Self {
        *self.states.lock().expect("states lock") = states.into();
        self
    }
}

#[async_trait]
impl FileStore for ScriptedStore {
    async fn upload_file(
        &self,
        path: &Path,
        _display_name: &str,
        _mime_type: &str,
    ) -> Result<RemoteFile, LLMError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        assert!(path.exists(), "scratch file must exist during upload");
        self.seen_paths
            .lock()
            .expect("paths lock")
            .push(path.to_path_buf());
        self.uploads
            .lock()
            .expect("uploads lock")
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    async fn get_file(&self, _name: &str) -> Result<RemoteFile, LLMError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.states
            .lock()
            .expect("states lock")
            .pop_front()
            .unwrap_or_else(|| Ok(stored(Some("PROCESSING"))))
    }
}

fn unavailable() -> LLMError {
    LLMError::from_status(503, "Service Unavailable")
}

fn stored(state: Option<&str>) -> RemoteFile {
    RemoteFile {
        name: STORED_NAME.to_string(),
        uri: Some(format!("https://example.test/v1beta/{STORED_NAME}")),
        mime_type: Some("image/png".to_string()),
        state: state.map(str::to_string),
        ..RemoteFile::default()
    }
}

fn fast_poll() -> PollConfig {
    PollConfig {
        interval_ms: 0,
        max_polls: 12,
    }
}

type Fixture = (
    FileUploader,
    Arc<AtomicUsize>,
    Arc<AtomicUsize>,
    Arc<Mutex<Vec<PathBuf>>>,
);

fn uploader_for(store: ScriptedStore, scratch: &Path) -> Fixture {
    let uploads = store.upload_calls.clone();
    let gets = store.get_calls.clone();
    let paths = store.seen_paths.clone();
    let uploader = FileUploader::new(Arc::new(store))
        .with_retry(RetryConfig::immediate(4))
        .with_poll(fast_poll())
        .with_scratch_dir(scratch);
    (uploader, uploads, gets, paths)
}

fn scratch_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[tokio::test]
async fn succeeds_on_fourth_attempt_after_three_transient_failures() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScriptedStore::new(vec![
        Err(unavailable()),
        Err(unavailable()),
        Err(unavailable()),
        Ok(stored(Some("ACTIVE"))),
    ]);
    let (uploader, uploads, _, _) = uploader_for(store, dir.path());

    let reference = uploader.upload("cat.png", b"png", None).await.unwrap();

    assert_eq!(uploads.load(Ordering::SeqCst), 4);
    assert_eq!(reference.name(), "cat.png");
    assert_eq!(reference.mime_type(), "image/png");
    assert_eq!(reference.file().name, STORED_NAME);
    assert!(scratch_is_empty(dir.path()));
}

#[tokio::test]
async fn gives_up_after_four_transient_failures() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScriptedStore::new(vec![]);
    let (uploader, uploads, _, paths) = uploader_for(store, dir.path());

    let err = uploader.upload("cat.png", b"png", None).await.unwrap_err();

    assert_eq!(uploads.load(Ordering::SeqCst), 4);
    assert!(matches!(err, LLMError::RetryExceeded { attempts: 4, .. }));
    assert!(paths.lock().unwrap().iter().all(|p| !p.exists()));
    assert!(scratch_is_empty(dir.path()));
}

#[tokio::test]
async fn non_transient_failure_is_not_retried() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScriptedStore::new(vec![Err(LLMError::from_status(
        400,
        r#"{"error":{"code":400,"message":"Unsupported file","status":"INVALID_ARGUMENT"}}"#,
    ))]);
    let (uploader, uploads, _, _) = uploader_for(store, dir.path());

    let err = uploader.upload("cat.png", b"png", None).await.unwrap_err();

    assert_eq!(uploads.load(Ordering::SeqCst), 1);
    assert!(matches!(err, LLMError::Request { status: 400, .. }));
    assert!(scratch_is_empty(dir.path()));
}

#[tokio::test]
async fn scratch_copy_keeps_extension_and_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScriptedStore::new(vec![Ok(stored(None))]);
    let (uploader, _, _, paths) = uploader_for(store, dir.path());

    uploader.upload("Report.PDF", b"%PDF", None).await.unwrap();

    let paths = paths.lock().unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].extension().and_then(|e| e.to_str()), Some("PDF"));
    assert!(!paths[0].exists());
}

#[tokio::test]
async fn declared_mime_overrides_extension() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScriptedStore::new(vec![Ok(stored(None))]);
    let (uploader, _, _, _) = uploader_for(store, dir.path());

    let reference = uploader
        .upload("clip.bin", b"data", Some("audio/wav"))
        .await
        .unwrap();
    assert_eq!(reference.mime_type(), "audio/wav");
}

#[tokio::test]
async fn polls_until_file_is_active() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScriptedStore::new(vec![Ok(stored(Some("PROCESSING")))]).with_states(vec![
        Ok(stored(Some("PROCESSING"))),
        Ok(stored(Some("ACTIVE"))),
    ]);
    let (uploader, _, gets, _) = uploader_for(store, dir.path());

    let reference = uploader.upload("cat.png", b"png", None).await.unwrap();

    assert_eq!(gets.load(Ordering::SeqCst), 2);
    assert_eq!(reference.file().state(), Some(FileState::Active));
}

#[tokio::test]
async fn returns_reference_when_poll_budget_runs_out() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScriptedStore::new(vec![Ok(stored(Some("PROCESSING")))]);
    let (uploader, _, gets, _) = uploader_for(store, dir.path());

    let reference = uploader.upload("cat.png", b"png", None).await.unwrap();

    assert_eq!(gets.load(Ordering::SeqCst), 12);
    assert_eq!(reference.file().state(), Some(FileState::Processing));
}

#[tokio::test]
async fn skips_polling_without_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScriptedStore::new(vec![Ok(stored(None))]);
    let (uploader, _, gets, _) = uploader_for(store, dir.path());

    uploader.upload("cat.png", b"png", None).await.unwrap();

    assert_eq!(gets.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn refresh_failure_keeps_last_known_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScriptedStore::new(vec![Ok(stored(Some("PROCESSING")))])
        .with_states(vec![Err(LLMError::from_status(404, "gone"))]);
    let (uploader, _, gets, _) = uploader_for(store, dir.path());

    let reference = uploader.upload("cat.png", b"png", None).await.unwrap();

    assert_eq!(gets.load(Ordering::SeqCst), 1);
    assert_eq!(reference.file().state(), Some(FileState::Processing));
}

#[tokio::test]
async fn upload_all_preserves_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScriptedStore::new(vec![Ok(stored(None)), Ok(stored(None))]);
    let (uploader, uploads, _, _) = uploader_for(store, dir.path());

    let attachments = vec![
        Attachment::new("first.png", b"1".to_vec()),
        Attachment::new("second.mp3", b"2".to_vec()),
    ];
    let references = uploader.upload_all(&attachments).await.unwrap();

    assert_eq!(uploads.load(Ordering::SeqCst), 2);
    let names: Vec<&str> = references.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["first.png", "second.mp3"]);
    assert_eq!(references[1].mime_type(), "audio/mpeg");
    assert!(scratch_is_empty(dir.path()));
}
