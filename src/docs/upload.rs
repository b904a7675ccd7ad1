use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::backend::{ApiError, DocsBackend};
use super::registry::FileRegistry;
use super::schema::UploadRequest;
use super::validate::{guess_media_type, Rejection, UploadPolicy};
use crate::notify::Notifier;
use crate::view::DocsView;

const UPLOADING: &str = "Uploading...";
const UPLOAD_FAILED: &str = "An error occurred while uploading the file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Nothing was selected.
    Cancelled,
    /// Another upload holds the control.
    Busy,
    Rejected(Rejection),
    /// Accepted; carries the server's confirmation message.
    Uploaded(String),
    Failed(ApiError),
}

/// Owns the upload trigger: validate, send, report, re-enable.
pub struct UploadController {
    backend: Arc<dyn DocsBackend>,
    view: Arc<dyn DocsView>,
    notifier: Notifier,
    registry: Arc<FileRegistry>,
    policy: UploadPolicy,
    busy: AtomicBool,
}

impl UploadController {
    pub fn new(
        backend: Arc<dyn DocsBackend>,
        view: Arc<dyn DocsView>,
        notifier: Notifier,
        registry: Arc<FileRegistry>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            backend,
            view,
            notifier,
            registry,
            policy,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Upload the file at `path`. `None` means the picker was dismissed.
    pub async fn submit_path(&self, path: Option<&Path>) -> UploadOutcome {
        let Some(path) = path else {
            return UploadOutcome::Cancelled;
        };
        if self.is_busy() {
            return UploadOutcome::Busy;
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let media_type = guess_media_type(&file_name);

        // Validate on metadata so an oversized file is never read into memory.
        let size = match tokio::fs::metadata(path).await {
            Ok(meta) => meta.len(),
            Err(e) => return self.unreadable(path, e),
        };
        if let Err(rejection) = self.policy.check(media_type, size) {
            return self.reject(rejection);
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => return self.unreadable(path, e),
        };
        self.submit_upload(UploadRequest {
            file_name,
            media_type: media_type.to_string(),
            bytes,
        })
        .await
    }

    /// Validate and send an already-loaded file.
    ///
    /// While another upload is in flight the control is inert: nothing is
    /// validated, notified or reset.
    pub async fn submit_upload(&self, request: UploadRequest) -> UploadOutcome {
        if self.busy.swap(true, Ordering::AcqRel) {
            return UploadOutcome::Busy;
        }
        if let Err(rejection) = self.policy.check(&request.media_type, request.size()) {
            self.busy.store(false, Ordering::Release);
            return self.reject(rejection);
        }

        self.view.set_upload_busy(true);
        self.view.set_upload_status(UPLOADING);

        let file_name = request.file_name.clone();
        let outcome = match self.backend.upload(request).await {
            Ok(receipt) => {
                tracing::info!(
                    file = %file_name,
                    stored_as = receipt.filename.as_deref().unwrap_or(""),
                    "upload accepted"
                );
                self.view.set_upload_status(&receipt.message);
                UploadOutcome::Uploaded(receipt.message)
            }
            Err(e) => {
                if !matches!(e, ApiError::Server { .. }) {
                    tracing::warn!(file = %file_name, error = %e, "upload failed");
                }
                self.view.set_upload_status("");
                self.notifier.notify(e.user_message(UPLOAD_FAILED, UPLOAD_FAILED));
                UploadOutcome::Failed(e)
            }
        };

        self.view.set_upload_busy(false);
        self.view.reset_file_input();
        self.busy.store(false, Ordering::Release);

        if matches!(outcome, UploadOutcome::Uploaded(_)) {
            self.registry.refresh().await;
        }
        outcome
    }

    fn reject(&self, rejection: Rejection) -> UploadOutcome {
        tracing::debug!(?rejection, "upload rejected before sending");
        self.notifier.notify(rejection.to_string());
        self.view.reset_file_input();
        UploadOutcome::Rejected(rejection)
    }

    fn unreadable(&self, path: &Path, e: std::io::Error) -> UploadOutcome {
        tracing::warn!(path = %path.display(), error = %e, "could not read upload source");
        self.notifier.notify(UPLOAD_FAILED);
        self.view.reset_file_input();
        UploadOutcome::Failed(ApiError::Transport(e.to_string()))
    }
}
