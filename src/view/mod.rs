//! Presentation seam. Controllers describe what to show; a view decides how.

mod memory;
mod terminal;

pub use memory::MemoryView;
pub use terminal::TerminalView;

use uuid::Uuid;

use crate::docs::describe::FileTable;
use crate::notify::Notification;

/// Everything the controllers need from a user interface.
///
/// Calls arrive from whichever task runs the controller, so implementations
/// keep their own state behind a lock.
pub trait DocsView: Send + Sync {
    /// Replace the whole status table.
    fn render_table(&self, table: &FileTable);

    /// Enable or disable the upload trigger.
    fn set_upload_busy(&self, busy: bool);

    fn set_upload_status(&self, status: &str);

    /// Clear the file picker so the same path can be chosen again.
    fn reset_file_input(&self);

    /// Enable or disable the question submit trigger and set its label.
    fn set_ask_busy(&self, busy: bool, label: &str);

    fn set_answer_text(&self, text: &str);

    fn show_answer(&self);

    fn hide_answer(&self);

    fn show_notification(&self, notification: &Notification);

    fn dismiss_notification(&self, id: Uuid);

    /// Blocking yes/no question. Anything but an explicit yes is a no.
    fn confirm(&self, prompt: &str) -> bool;
}
