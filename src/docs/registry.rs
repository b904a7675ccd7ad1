use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::backend::{ApiError, DocsBackend};
use super::describe::FileTable;
use crate::notify::Notifier;
use crate::view::DocsView;

/// Interval between background refreshes.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

const LIST_FAILED: &str = "Could not fetch the file list";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Table replaced with this many file rows (zero means the placeholder).
    Rendered(usize),
    /// Listing failed; the table was left as it was.
    Failed(ApiError),
}

/// The status table: fetches the server's file list and re-renders it.
pub struct FileRegistry {
    backend: Arc<dyn DocsBackend>,
    view: Arc<dyn DocsView>,
    notifier: Notifier,
}

impl FileRegistry {
    pub fn new(backend: Arc<dyn DocsBackend>, view: Arc<dyn DocsView>, notifier: Notifier) -> Self {
        Self {
            backend,
            view,
            notifier,
        }
    }

    /// Fetch and fully replace the table.
    ///
    /// Holds no state between calls, so overlapping refreshes are independent
    /// and the table ends up showing whichever response resolved last.
    pub async fn refresh(&self) -> RefreshOutcome {
        match self.backend.list_files().await {
            Ok(files) => {
                let count = files.len();
                self.view.render_table(&FileTable::from_records(&files));
                tracing::debug!(count, "file list rendered");
                RefreshOutcome::Rendered(count)
            }
            Err(e) => {
                if !matches!(e, ApiError::Server { .. }) {
                    tracing::warn!(error = %e, "file list request failed");
                }
                self.notifier.notify(e.user_message(LIST_FAILED, LIST_FAILED));
                RefreshOutcome::Failed(e)
            }
        }
    }
}

/// Background refresh loop with an explicit start/stop lifecycle.
///
/// Dropping the poller stops it.
pub struct RegistryPoller {
    stop: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl RegistryPoller {
    /// Refresh immediately, then every `interval` until stopped.
    ///
    /// Each tick spawns its own refresh so a slow listing never delays the next tick.
    pub fn start(registry: Arc<FileRegistry>, interval: Duration) -> Self {
        let stop = CancellationToken::new();
        let token = stop.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!("registry poller stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let registry = registry.clone();
                        let token = token.clone();
                        tokio::spawn(async move {
                            tokio::select! {
                                _ = token.cancelled() => {}
                                _ = registry.refresh() => {}
                            }
                        });
                    }
                }
            }
        });
        Self {
            stop,
            task: Some(task),
        }
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_cancelled()
    }

    /// Stop ticking and abandon any refresh still in flight.
    pub async fn stop(mut self) {
        self.stop.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("registry poller task failed: {e}");
            }
        }
    }
}

impl Drop for RegistryPoller {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::describe::EMPTY_TABLE_PLACEHOLDER;
    use crate::docs::schema::{FileRecord, FileStatus};
    use crate::testing::{record, ScriptedBackend};
    use crate::view::MemoryView;

    fn registry(backend: Arc<ScriptedBackend>) -> (Arc<MemoryView>, Arc<FileRegistry>) {
        let view = Arc::new(MemoryView::new());
        let notifier = Notifier::new(view.clone());
        let registry = Arc::new(FileRegistry::new(backend, view.clone(), notifier));
        (view, registry)
    }

    #[tokio::test]
    async fn empty_listing_renders_placeholder_without_badge() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_list(Ok(vec![]));
        let (view, registry) = registry(backend);

        assert_eq!(registry.refresh().await, RefreshOutcome::Rendered(0));
        assert_eq!(
            view.table(),
            Some(FileTable::Placeholder(EMPTY_TABLE_PLACEHOLDER.to_string()))
        );
    }

    #[tokio::test]
    async fn listing_replaces_rows() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_list(Ok(vec![
            record("a.pdf", FileStatus::Pending, 10),
            record("b.pdf", FileStatus::Processed, 20),
        ]));
        backend.push_list(Ok(vec![record("b.pdf", FileStatus::Processed, 20)]));
        let (view, registry) = registry(backend);

        registry.refresh().await;
        assert_eq!(view.table().unwrap().row_count(), 2);
        registry.refresh().await;
        let Some(FileTable::Rows(rows)) = view.table() else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "b.pdf");
    }

    #[tokio::test]
    async fn failed_listing_keeps_previous_table() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_list(Ok(vec![record("a.pdf", FileStatus::Processed, 1)]));
        backend.push_list(Err(ApiError::Server {
            status: 500,
            message: Some("database is locked".into()),
        }));
        backend.push_list(Err(ApiError::Transport("connection reset".into())));
        let (view, registry) = registry(backend);

        registry.refresh().await;
        let before = view.table();

        assert!(matches!(registry.refresh().await, RefreshOutcome::Failed(_)));
        assert!(matches!(registry.refresh().await, RefreshOutcome::Failed(_)));
        assert_eq!(view.table(), before);
        assert_eq!(view.state().table_renders, 1);
        assert_eq!(
            view.notifications(),
            vec!["database is locked".to_string(), LIST_FAILED.to_string()]
        );
    }

    #[tokio::test]
    async fn overlapping_refreshes_converge_on_last_resolved() {
        let backend = Arc::new(ScriptedBackend::new());
        let first_gate = backend.push_list_gated(Ok(vec![record("old.pdf", FileStatus::Pending, 1)]));
        let second_gate = backend.push_list_gated(Ok(vec![
            record("new.pdf", FileStatus::Processed, 1),
            record("other.pdf", FileStatus::Processed, 1),
        ]));
        let (view, registry) = registry(backend);

        let timer_driven = tokio::spawn({
            let registry = registry.clone();
            async move { registry.refresh().await }
        });
        let upload_driven = tokio::spawn({
            let registry = registry.clone();
            async move { registry.refresh().await }
        });
        tokio::task::yield_now().await;

        // second request resolves first, first request resolves last
        second_gate.send(()).unwrap();
        assert_eq!(upload_driven.await.unwrap(), RefreshOutcome::Rendered(2));
        first_gate.send(()).unwrap();
        assert_eq!(timer_driven.await.unwrap(), RefreshOutcome::Rendered(1));

        let Some(FileTable::Rows(rows)) = view.table() else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].name, "old.pdf");
        assert!(view.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn poller_refreshes_immediately_then_on_interval() {
        let backend = Arc::new(ScriptedBackend::new());
        let (_view, registry) = registry(backend.clone());

        let poller = RegistryPoller::start(registry, POLL_INTERVAL);
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(backend.list_calls(), 1);

        tokio::time::sleep(POLL_INTERVAL).await;
        assert_eq!(backend.list_calls(), 2);

        tokio::time::sleep(POLL_INTERVAL * 2).await;
        assert_eq!(backend.list_calls(), 4);

        assert!(poller.is_running());
        poller.stop().await;
        tokio::time::sleep(POLL_INTERVAL * 3).await;
        assert_eq!(backend.list_calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_poller_stops_it() {
        let backend = Arc::new(ScriptedBackend::new());
        let (_view, registry) = registry(backend.clone());

        let poller = RegistryPoller::start(registry, POLL_INTERVAL);
        tokio::time::sleep(Duration::from_millis(1)).await;
        drop(poller);
        tokio::time::sleep(POLL_INTERVAL * 3).await;
        assert_eq!(backend.list_calls(), 1);
    }

    #[test]
    fn record_helper_matches_schema_defaults() {
        let r = record("x.pdf", FileStatus::Pending, 3);
        assert_eq!(
            r,
            FileRecord {
                name: "x.pdf".into(),
                status: FileStatus::Pending,
                size: 3,
                error: None
            }
        );
    }
}
