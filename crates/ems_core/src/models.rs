use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Employment status as reported by the records service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single employee as served by `GET /employees[/{id}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "emp_id")]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: EmployeeStatus,
    /// Server-assigned; never sent back.
    #[serde(default, skip_serializing)]
    pub created_at: Option<NaiveDateTime>,
}

impl EmployeeRecord {
    /// Minimal record with only the required fields set.
    pub fn new(id: i64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone: None,
            department: None,
            designation: None,
            joining_date: None,
            status: EmployeeStatus::Active,
            created_at: None,
        }
    }

    /// `"first last"` with surrounding whitespace removed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn email(&self) -> Option<&str> {
        non_blank(&self.email)
    }

    pub fn phone(&self) -> Option<&str> {
        non_blank(&self.phone)
    }

    pub fn department(&self) -> Option<&str> {
        non_blank(&self.department)
    }

    pub fn designation(&self) -> Option<&str> {
        non_blank(&self.designation)
    }
}

/// A previous position held by an employee (`GET /employees/{id}/history`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentHistoryEntry {
    #[serde(default)]
    pub history_id: Option<i64>,
    pub company_name: String,
    #[serde(default, alias = "position")]
    pub role: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl EmploymentHistoryEntry {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            history_id: None,
            company_name: company_name.into(),
            role: None,
            start_date: None,
            end_date: None,
        }
    }

    pub fn role(&self) -> Option<&str> {
        non_blank(&self.role)
    }
}

/// Empty and whitespace-only strings count as absent.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// The four file kinds the export pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    Spreadsheet,
    Pdf,
    WordDocument,
    ZipArchive,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        Self::Spreadsheet,
        Self::Pdf,
        Self::WordDocument,
        Self::ZipArchive,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Spreadsheet => "xlsx",
            Self::Pdf => "pdf",
            Self::WordDocument => "docx",
            Self::ZipArchive => "zip",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Pdf => "application/pdf",
            Self::WordDocument => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::ZipArchive => "application/zip",
        }
    }

    /// Map a file extension (case-insensitive, without the dot) to a kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.extension() == ext)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Spreadsheet => "spreadsheet",
            Self::Pdf => "PDF",
            Self::WordDocument => "word-document",
            Self::ZipArchive => "zip-archive",
        };
        f.write_str(label)
    }
}

/// A generated file on disk. Never mutated after creation; the size is read
/// from the filesystem on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    path: PathBuf,
    kind: ArtifactKind,
}

impl ExportArtifact {
    pub fn new(path: impl Into<PathBuf>, kind: ArtifactKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }

    pub fn byte_size(&self) -> std::io::Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}
