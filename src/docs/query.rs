use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::backend::{ApiError, DocsBackend};
use crate::notify::Notifier;
use crate::view::DocsView;

pub const ASK_LABEL: &str = "Ask";
const ASKING_LABEL: &str = "Processing...";
const EMPTY_QUESTION: &str = "Please enter a question";
const ASK_FAILED: &str = "An error occurred while answering the question";
const ASK_UNREACHABLE: &str = "An error occurred while asking the question. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    Empty,
    Busy,
    Answered(String),
    Failed(ApiError),
}

/// Owns the question box: one question in flight at a time.
pub struct QueryController {
    backend: Arc<dyn DocsBackend>,
    view: Arc<dyn DocsView>,
    notifier: Notifier,
    busy: AtomicBool,
}

impl QueryController {
    pub fn new(backend: Arc<dyn DocsBackend>, view: Arc<dyn DocsView>, notifier: Notifier) -> Self {
        Self {
            backend,
            view,
            notifier,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn submit_question(&self, text: &str) -> AskOutcome {
        let question = text.trim();
        if question.is_empty() {
            self.notifier.notify(EMPTY_QUESTION);
            return AskOutcome::Empty;
        }
        if self.busy.swap(true, Ordering::AcqRel) {
            return AskOutcome::Busy;
        }

        self.view.set_ask_busy(true, ASKING_LABEL);
        self.view.hide_answer();
        self.view.set_answer_text("");

        let outcome = match self.backend.ask(question).await {
            Ok(answer) => {
                self.view.set_answer_text(&answer);
                self.view.show_answer();
                AskOutcome::Answered(answer)
            }
            Err(e) => {
                if !matches!(e, ApiError::Server { .. }) {
                    tracing::warn!(error = %e, "question request failed");
                }
                self.notifier.notify(e.user_message(ASK_FAILED, ASK_UNREACHABLE));
                AskOutcome::Failed(e)
            }
        };

        self.view.set_ask_busy(false, ASK_LABEL);
        self.busy.store(false, Ordering::Release);
        outcome
    }
}
