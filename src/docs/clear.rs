use std::sync::Arc;

use super::backend::{ApiError, DocsBackend};
use super::registry::FileRegistry;
use crate::notify::Notifier;
use crate::view::DocsView;

pub const CLEAR_PROMPT: &str =
    "Are you sure you want to delete all files? This cannot be undone.";
const CLEARED: &str = "All files were deleted successfully";
const CLEAR_FAILED: &str = "An error occurred while deleting files";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    Declined,
    Cleared(String),
    Failed(ApiError),
}

/// Confirmation-gated wipe of every uploaded document.
pub struct ClearController {
    backend: Arc<dyn DocsBackend>,
    view: Arc<dyn DocsView>,
    notifier: Notifier,
    registry: Arc<FileRegistry>,
}

impl ClearController {
    pub fn new(
        backend: Arc<dyn DocsBackend>,
        view: Arc<dyn DocsView>,
        notifier: Notifier,
        registry: Arc<FileRegistry>,
    ) -> Self {
        Self {
            backend,
            view,
            notifier,
            registry,
        }
    }

    pub async fn clear_all(&self) -> ClearOutcome {
        if !self.view.confirm(CLEAR_PROMPT) {
            return ClearOutcome::Declined;
        }

        match self.backend.clear().await {
            Ok(message) => {
                let message = if message.trim().is_empty() {
                    CLEARED.to_string()
                } else {
                    message
                };
                tracing::info!("all files cleared");
                self.notifier.notify(message.clone());
                self.registry.refresh().await;
                ClearOutcome::Cleared(message)
            }
            Err(e) => {
                if !matches!(e, ApiError::Server { .. }) {
                    tracing::warn!(error = %e, "clear request failed");
                }
                self.notifier.notify(e.user_message(CLEAR_FAILED, CLEAR_FAILED));
                ClearOutcome::Failed(e)
            }
        }
    }
}
