use async_trait::async_trait;
use thiserror::Error;

use super::schema::{FileRecord, UploadReceipt, UploadRequest};

/// Failure of a single request against the ingestion server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is the body's `error` field when present.
    #[error("server responded {status}: {}", message.as_deref().unwrap_or("no error message"))]
    Server { status: u16, message: Option<String> },

    /// No response at all, or the body could not be read.
    #[error("transport failure: {0}")]
    Transport(String),

    /// 2xx response whose body is not what the endpoint promises.
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// The message a server attached to its error response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Pick the text to show a user: the server's own message for server
    /// errors, otherwise the caller's fallback.
    pub fn user_message<'a>(&'a self, server_fallback: &'a str, transport_fallback: &'a str) -> &'a str {
        match self {
            Self::Server { message, .. } => message.as_deref().unwrap_or(server_fallback),
            _ => transport_fallback,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The four endpoints the client drives.
#[async_trait]
pub trait DocsBackend: Send + Sync {
    /// `POST /upload` with a single multipart `file` field.
    async fn upload(&self, request: UploadRequest) -> ApiResult<UploadReceipt>;

    /// `GET /files`.
    async fn list_files(&self) -> ApiResult<Vec<FileRecord>>;

    /// `POST /clear`. Returns the server's confirmation message (may be empty).
    async fn clear(&self) -> ApiResult<String>;

    /// `POST /ask` with `{ question }`. Returns the answer text.
    async fn ask(&self, question: &str) -> ApiResult<String>;
}
