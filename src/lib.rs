//! docask: terminal client for a document question-answering server.
//!
//! Uploads documents, follows their ingestion status, and asks questions
//! against whatever the server has ingested.

pub mod app;
pub mod config;
pub mod docs;
pub mod notify;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{AppSettings, DocsApp};
pub use config::Config;
