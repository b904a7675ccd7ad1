use super::schema::{FileRecord, FileStatus};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Text of the single row shown when the server reports no files.
pub const EMPTY_TABLE_PLACEHOLDER: &str = "No files uploaded yet";

/// Visual class of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeClass {
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub class: BadgeClass,
    pub label: &'static str,
}

impl StatusBadge {
    pub fn for_status(status: FileStatus) -> Self {
        match status {
            FileStatus::Processed => Self {
                class: BadgeClass::Success,
                label: "Processed",
            },
            FileStatus::Error => Self {
                class: BadgeClass::Danger,
                label: "Error",
            },
            FileStatus::Pending => Self {
                class: BadgeClass::Warning,
                label: "Pending",
            },
        }
    }
}

/// One rendered row of the status table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub name: String,
    pub badge: StatusBadge,
    pub error_detail: Option<String>,
    pub size: String,
}

/// Everything the status table can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTable {
    Placeholder(String),
    Rows(Vec<FileRow>),
}

impl FileTable {
    /// Build the table for a successful listing.
    pub fn from_records(records: &[FileRecord]) -> Self {
        if records.is_empty() {
            return Self::Placeholder(EMPTY_TABLE_PLACEHOLDER.to_string());
        }
        Self::Rows(records.iter().map(describe_record).collect())
    }

    pub fn row_count(&self) -> usize {
        match self {
            Self::Placeholder(_) => 1,
            Self::Rows(rows) => rows.len(),
        }
    }
}

/// Describe a record for display. The name is passed through as supplied.
pub fn describe_record(record: &FileRecord) -> FileRow {
    FileRow {
        name: record.name.clone(),
        badge: StatusBadge::for_status(record.status),
        error_detail: record.error_detail().map(str::to_string),
        size: format_size(record.size),
    }
}

/// Human-readable base-1024 size with up to two decimals.
///
/// Anything at or beyond 1024 GB stays in GB.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let i = (bytes.ilog(1024) as usize).min(SIZE_UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(i as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[i])
}
