/// Largest upload the client will attempt (100 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

pub const PDF: &str = "application/pdf";
pub const MS_WORD: &str = "application/msword";
pub const OOXML_WORD: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Media types the ingestion server accepts.
pub const ALLOWED_MEDIA_TYPES: [&str; 3] = [PDF, MS_WORD, OOXML_WORD];

/// Why a file was refused before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Please upload a PDF or Word document")]
    UnsupportedType { media_type: String },
    #[error("File is too large. The maximum upload size is {}MB.", .limit / (1024 * 1024))]
    TooLarge { size: u64, limit: u64 },
}

/// Upload policy. The default is the fixed allow-list and the 100 MiB cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    /// Check a candidate's declared media type and size. Pure and synchronous.
    pub fn check(&self, media_type: &str, size: u64) -> Result<(), Rejection> {
        if !ALLOWED_MEDIA_TYPES.contains(&media_type) {
            return Err(Rejection::UnsupportedType {
                media_type: media_type.to_string(),
            });
        }
        if size > self.max_bytes {
            return Err(Rejection::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Validate against the default policy.
pub fn validate(media_type: &str, size: u64) -> Result<(), Rejection> {
    UploadPolicy::default().check(media_type, size)
}

/// Guess MIME type from filename extension, the way a browser file picker does.
pub fn guess_media_type(filename: &str) -> &'static str {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return "application/octet-stream",
    };
    match ext.as_str() {
        "pdf" => PDF,
        "doc" => MS_WORD,
        "docx" => OOXML_WORD,
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "html" | "htm" => "text/html",
        "rtf" => "application/rtf",
        "odt" => "application/vnd.oasis.opendocument.text",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
