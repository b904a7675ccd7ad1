use console::{style, Term};
use dialoguer::Confirm;
use parking_lot::Mutex;
use tokio::runtime::RuntimeFlavor;
use uuid::Uuid;

use super::DocsView;
use crate::docs::describe::{BadgeClass, FileRow, FileTable, StatusBadge};
use crate::notify::Notification;

/// Line-oriented terminal view.
///
/// The table is reprinted only when its content changes, so a background
/// poller stays quiet until an ingestion status actually moves. Output that
/// arrives while a confirmation prompt is open is held and printed after it.
pub struct TerminalView {
    out: Term,
    err: Term,
    assume_yes: bool,
    last_table: Mutex<Option<FileTable>>,
    answer: Mutex<String>,
    held: Mutex<Option<Vec<(Stream, String)>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Out,
    Err,
}

impl TerminalView {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            assume_yes,
            last_table: Mutex::new(None),
            answer: Mutex::new(String::new()),
            held: Mutex::new(None),
        }
    }

    fn line(&self, text: &str) {
        self.emit(Stream::Out, text);
    }

    fn emit(&self, stream: Stream, text: &str) {
        if let Some(held) = self.held.lock().as_mut() {
            held.push((stream, text.to_string()));
            return;
        }
        self.write(stream, text);
    }

    fn write(&self, stream: Stream, text: &str) {
        let term = match stream {
            Stream::Out => &self.out,
            Stream::Err => &self.err,
        };
        if let Err(e) = term.write_line(text) {
            tracing::warn!("failed to write to terminal: {e}");
        }
    }

    /// Run `f` with every other write deferred until it returns.
    fn with_output_held<R>(&self, f: impl FnOnce() -> R) -> R {
        *self.held.lock() = Some(Vec::new());
        let result = f();
        let held = self.held.lock().take().unwrap_or_default();
        for (stream, text) in held {
            self.write(stream, &text);
        }
        result
    }

    fn ask(&self, prompt: &str) -> bool {
        match Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("confirmation prompt failed: {e}");
                false
            }
        }
    }
}

impl DocsView for TerminalView {
    fn render_table(&self, table: &FileTable) {
        {
            let mut last = self.last_table.lock();
            if last.as_ref() == Some(table) {
                return;
            }
            *last = Some(table.clone());
        }
        for line in table_lines(table) {
            self.line(&line);
        }
    }

    fn set_upload_busy(&self, busy: bool) {
        tracing::trace!(busy, "upload control");
    }

    fn set_upload_status(&self, status: &str) {
        if !status.is_empty() {
            self.line(&format!("{}", style(status).cyan()));
        }
    }

    fn reset_file_input(&self) {}

    fn set_ask_busy(&self, busy: bool, label: &str) {
        if busy {
            self.line(&format!("{}", style(label).dim()));
        }
    }

    fn set_answer_text(&self, text: &str) {
        *self.answer.lock() = text.to_string();
    }

    fn show_answer(&self) {
        let answer = self.answer.lock().clone();
        self.line(&format!("{}", style("Answer").bold().underlined()));
        self.line(&answer);
    }

    fn hide_answer(&self) {}

    fn show_notification(&self, notification: &Notification) {
        let text = format!("{} {}", style("!").yellow().bold(), notification.message);
        self.emit(Stream::Err, &text);
    }

    fn dismiss_notification(&self, id: Uuid) {
        tracing::trace!(%id, "notification expired");
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        // keep the runtime's other tasks moving while the prompt blocks this thread
        let multi_thread = tokio::runtime::Handle::try_current()
            .is_ok_and(|h| h.runtime_flavor() == RuntimeFlavor::MultiThread);
        self.with_output_held(|| {
            if multi_thread {
                tokio::task::block_in_place(|| self.ask(prompt))
            } else {
                self.ask(prompt)
            }
        })
    }
}

fn badge_text(badge: &StatusBadge, width: usize) -> String {
    let padded = format!("{:<width$}", badge.label);
    let styled = match badge.class {
        BadgeClass::Success => style(padded).green(),
        BadgeClass::Warning => style(padded).yellow(),
        BadgeClass::Danger => style(padded).red(),
    };
    styled.to_string()
}

/// Lay out the status table as plain lines (styled when the terminal supports it).
pub(crate) fn table_lines(table: &FileTable) -> Vec<String> {
    let rows: &[FileRow] = match table {
        FileTable::Placeholder(text) => return vec![format!("{}", style(text).dim())],
        FileTable::Rows(rows) => rows,
    };

    let name_w = rows
        .iter()
        .map(|r| r.name.chars().count())
        .chain(std::iter::once("Name".len()))
        .max()
        .unwrap_or(4);
    let status_w = "Processed".len();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!(
        "{}",
        style(format!("{:<name_w$}  {:<status_w$}  {}", "Name", "Status", "Size")).bold()
    ));
    for row in rows {
        lines.push(format!(
            "{:<name_w$}  {}  {}",
            row.name,
            badge_text(&row.badge, status_w),
            row.size
        ));
        if let Some(detail) = &row.error_detail {
            lines.push(format!("{:<name_w$}  {}", "", style(detail).red().dim()));
        }
    }
    lines
}
