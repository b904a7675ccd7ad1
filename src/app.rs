//! Wires the notifier, registry and controllers around one backend and one view.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::docs::{
    AskOutcome, ClearController, ClearOutcome, DocsBackend, FileRegistry, QueryController,
    RefreshOutcome, RegistryPoller, UploadController, UploadOutcome, UploadPolicy,
};
use crate::notify::Notifier;
use crate::view::DocsView;

/// Tunables for a [`DocsApp`].
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    pub poll_interval: Duration,
    pub notification_ttl: Duration,
    pub upload_policy: UploadPolicy,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            notification_ttl: config.notification_ttl(),
            upload_policy: config.upload_policy(),
        }
    }
}

/// One client session: everything a page would own.
pub struct DocsApp {
    settings: AppSettings,
    notifier: Notifier,
    registry: Arc<FileRegistry>,
    upload: UploadController,
    clear: ClearController,
    query: QueryController,
    poller: Option<RegistryPoller>,
}

impl DocsApp {
    pub fn new(backend: Arc<dyn DocsBackend>, view: Arc<dyn DocsView>, settings: AppSettings) -> Self {
        let notifier = Notifier::with_ttl(view.clone(), settings.notification_ttl);
        let registry = Arc::new(FileRegistry::new(
            backend.clone(),
            view.clone(),
            notifier.clone(),
        ));
        let upload = UploadController::new(
            backend.clone(),
            view.clone(),
            notifier.clone(),
            registry.clone(),
            settings.upload_policy,
        );
        let clear = ClearController::new(
            backend.clone(),
            view.clone(),
            notifier.clone(),
            registry.clone(),
        );
        let query = QueryController::new(backend, view, notifier.clone());
        Self {
            settings,
            notifier,
            registry,
            upload,
            clear,
            query,
            poller: None,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Begin background polling. Calling it twice keeps the first poller.
    pub fn start_polling(&mut self) {
        if self.poller.is_none() {
            tracing::debug!(interval = ?self.settings.poll_interval, "starting registry poller");
            self.poller = Some(RegistryPoller::start(
                self.registry.clone(),
                self.settings.poll_interval,
            ));
        }
    }

    pub async fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(RegistryPoller::is_running)
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        self.registry.refresh().await
    }

    pub async fn upload(&self, path: Option<&Path>) -> UploadOutcome {
        self.upload.submit_path(path).await
    }

    pub async fn ask(&self, question: &str) -> AskOutcome {
        self.query.submit_question(question).await
    }

    pub async fn clear_all(&self) -> ClearOutcome {
        self.clear.clear_all().await
    }
}
