//! Scripted backend for controller tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

use crate::docs::backend::{ApiResult, DocsBackend};
use crate::docs::schema::{FileRecord, FileStatus, UploadReceipt, UploadRequest};

pub fn record(name: &str, status: FileStatus, size: u64) -> FileRecord {
    FileRecord {
        name: name.to_string(),
        status,
        size,
        error: None,
    }
}

struct Script<T> {
    queue: Mutex<VecDeque<(Option<oneshot::Receiver<()>>, ApiResult<T>)>>,
    calls: AtomicUsize,
}

impl<T: Default> Script<T> {
    fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn push(&self, result: ApiResult<T>) {
        self.queue.lock().push_back((None, result));
    }

    fn push_gated(&self, result: ApiResult<T>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.queue.lock().push_back((Some(rx), result));
        tx
    }

    /// Take the next scripted result (default when the script ran out), waiting on its gate.
    async fn next(&self) -> ApiResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let entry = self.queue.lock().pop_front();
        match entry {
            Some((gate, result)) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                result
            }
            None => Ok(T::default()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Backend whose responses are queued up front by the test.
pub struct ScriptedBackend {
    list: Script<Vec<FileRecord>>,
    upload: Script<UploadReceipt>,
    clear: Script<String>,
    ask: Script<String>,
    uploads: Mutex<Vec<(String, String)>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            list: Script::new(),
            upload: Script::new(),
            clear: Script::new(),
            ask: Script::new(),
            uploads: Mutex::new(Vec::new()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn push_list(&self, result: ApiResult<Vec<FileRecord>>) {
        self.list.push(result);
    }

    pub fn push_list_gated(&self, result: ApiResult<Vec<FileRecord>>) -> oneshot::Sender<()> {
        self.list.push_gated(result)
    }

    pub fn push_upload(&self, result: ApiResult<UploadReceipt>) {
        self.upload.push(result);
    }

    pub fn push_upload_gated(&self, result: ApiResult<UploadReceipt>) -> oneshot::Sender<()> {
        self.upload.push_gated(result)
    }

    pub fn push_clear(&self, result: ApiResult<String>) {
        self.clear.push(result);
    }

    pub fn push_ask(&self, result: ApiResult<String>) {
        self.ask.push(result);
    }

    pub fn push_ask_gated(&self, result: ApiResult<String>) -> oneshot::Sender<()> {
        self.ask.push_gated(result)
    }

    pub fn list_calls(&self) -> usize {
        self.list.calls()
    }

    pub fn upload_calls(&self) -> usize {
        self.upload.calls()
    }

    pub fn clear_calls(&self) -> usize {
        self.clear.calls()
    }

    pub fn ask_calls(&self) -> usize {
        self.ask.calls()
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploads.lock().iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn uploaded_media_types(&self) -> Vec<String> {
        self.uploads.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn asked(&self) -> Vec<String> {
        self.questions.lock().clone()
    }
}

#[async_trait]
impl DocsBackend for ScriptedBackend {
    async fn upload(&self, request: UploadRequest) -> ApiResult<UploadReceipt> {
        self.uploads
            .lock()
            .push((request.file_name, request.media_type));
        self.upload.next().await
    }

    async fn list_files(&self) -> ApiResult<Vec<FileRecord>> {
        self.list.next().await
    }

    async fn clear(&self) -> ApiResult<String> {
        self.clear.next().await
    }

    async fn ask(&self, question: &str) -> ApiResult<String> {
        self.questions.lock().push(question.to_string());
        self.ask.next().await
    }
}
