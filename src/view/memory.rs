use parking_lot::Mutex;
use uuid::Uuid;

use super::DocsView;
use crate::docs::describe::FileTable;
use crate::notify::Notification;

/// Snapshot of everything a [`MemoryView`] has been told to show.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub table: Option<FileTable>,
    pub table_renders: usize,
    pub upload_busy: bool,
    pub upload_busy_history: Vec<bool>,
    pub upload_status: String,
    pub file_input_resets: usize,
    pub ask_busy: bool,
    pub ask_busy_history: Vec<bool>,
    pub ask_label: String,
    pub answer_text: String,
    pub answer_visible: bool,
    pub notifications: Vec<Notification>,
    pub dismissed: usize,
    pub prompts: Vec<String>,
}

/// Headless view that records state instead of drawing it.
pub struct MemoryView {
    state: Mutex<ViewState>,
    confirm_answer: Mutex<bool>,
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryView {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ViewState::default()),
            confirm_answer: Mutex::new(false),
        }
    }

    /// Answer every future confirmation prompt with `answer`.
    pub fn answer_confirmations(&self, answer: bool) {
        *self.confirm_answer.lock() = answer;
    }

    pub fn state(&self) -> ViewState {
        self.state.lock().clone()
    }

    pub fn table(&self) -> Option<FileTable> {
        self.state.lock().table.clone()
    }

    /// Messages of the notifications still visible, oldest first.
    pub fn notifications(&self) -> Vec<String> {
        self.state
            .lock()
            .notifications
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn dismissed_count(&self) -> usize {
        self.state.lock().dismissed
    }
}

impl DocsView for MemoryView {
    fn render_table(&self, table: &FileTable) {
        let mut state = self.state.lock();
        state.table = Some(table.clone());
        state.table_renders += 1;
    }

    fn set_upload_busy(&self, busy: bool) {
        let mut state = self.state.lock();
        state.upload_busy = busy;
        state.upload_busy_history.push(busy);
    }

    fn set_upload_status(&self, status: &str) {
        self.state.lock().upload_status = status.to_string();
    }

    fn reset_file_input(&self) {
        self.state.lock().file_input_resets += 1;
    }

    fn set_ask_busy(&self, busy: bool, label: &str) {
        let mut state = self.state.lock();
        state.ask_busy = busy;
        state.ask_busy_history.push(busy);
        state.ask_label = label.to_string();
    }

    fn set_answer_text(&self, text: &str) {
        self.state.lock().answer_text = text.to_string();
    }

    fn show_answer(&self) {
        self.state.lock().answer_visible = true;
    }

    fn hide_answer(&self) {
        self.state.lock().answer_visible = false;
    }

    fn show_notification(&self, notification: &Notification) {
        self.state.lock().notifications.push(notification.clone());
    }

    fn dismiss_notification(&self, id: Uuid) {
        let mut state = self.state.lock();
        state.notifications.retain(|n| n.id != id);
        state.dismissed += 1;
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.state.lock().prompts.push(prompt.to_string());
        *self.confirm_answer.lock()
    }
}
