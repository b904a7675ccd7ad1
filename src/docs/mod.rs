//! Docs: upload documents, track their ingestion, ask questions about them.
//!
//! The server does the ingestion and answering; this module drives its four
//! endpoints and keeps the user-visible state consistent while requests are
//! in flight.

pub mod backend;
pub mod clear;
pub mod describe;
pub mod http;
pub mod query;
pub mod registry;
pub mod schema;
pub mod upload;
pub mod validate;

pub use backend::{ApiError, ApiResult, DocsBackend};
pub use clear::{ClearController, ClearOutcome};
pub use describe::{format_size, FileRow, FileTable, StatusBadge};
pub use http::HttpBackend;
pub use query::{AskOutcome, QueryController};
pub use registry::{FileRegistry, RefreshOutcome, RegistryPoller};
pub use schema::{FileRecord, FileStatus, UploadRequest};
pub use upload::{UploadController, UploadOutcome};
pub use validate::{validate, Rejection, UploadPolicy};
