use serde::{Deserialize, Deserializer, Serialize};

/// Ingestion state the server reports for an uploaded document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Processed,
    Error,
    #[default]
    #[serde(other)]
    Pending,
}

/// Snapshot of one server-side file record. The client only ever reads these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: FileStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileRecord {
    /// Error detail worth showing: present, non-empty, and only for failed ingestion.
    pub fn error_detail(&self) -> Option<&str> {
        match (self.status, self.error.as_deref()) {
            (FileStatus::Error, Some(detail)) if !detail.trim().is_empty() => Some(detail),
            _ => None,
        }
    }
}

/// Read an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `GET /files`.
///
/// Older servers answer with a bare array instead of the `{ files }` object,
/// so both shapes are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FileListResponse {
    Wrapped {
        #[serde(default)]
        files: Option<Vec<FileRecord>>,
    },
    Bare(Vec<FileRecord>),
}

impl FileListResponse {
    pub fn into_files(self) -> Vec<FileRecord> {
        match self {
            Self::Wrapped { files } => files.unwrap_or_default(),
            Self::Bare(files) => files,
        }
    }
}

/// One file about to be sent to `POST /upload`. Dropped once the call returns.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadRequest {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Success body of `POST /upload`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Success body of `POST /clear`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearReceipt {
    #[serde(default)]
    pub message: String,
}

/// Body of `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Success body of `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Error body any endpoint may return alongside a non-2xx status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Parse an error message out of a raw body, ignoring anything unparseable or blank.
    pub fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty())
    }
}
