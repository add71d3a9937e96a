//! Export pipeline error types.

use ems_client::SourceError;
use std::path::PathBuf;

/// Generic notice shown when an export produced no artifact.
pub const FAILURE_NOTICE: &str = "Failed to generate the export. Please try again.";

/// Why an export produced no artifact.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The referenced employee does not exist.
    #[error("Employee {emp_id} not found")]
    NotFound { emp_id: i64 },

    /// A bulk export found an empty employee collection.
    #[error("No employees to export")]
    NoEmployees,

    /// The record source could not be reached or refused the request.
    #[error("Record source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    /// Document encoding or the artifact write failed.
    #[error("Render failure: {0}")]
    Render(String),

    /// Every per-employee render in an archive export failed.
    #[error("No employee PDFs could be rendered ({attempted} attempted)")]
    NothingArchived { attempted: usize },

    /// The export directory cannot be created. Fatal for every export.
    #[error("Export directory {} is not writable: {source}", .path.display())]
    DirectoryUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub(crate) fn render(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Render(format!("{context}: {err}"))
    }

    /// Only an unusable export directory aborts the caller; everything else
    /// surfaces as "no artifact".
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DirectoryUnwritable { .. })
    }

    /// Generic notice suitable for an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { emp_id } => format!("Employee {emp_id} was not found."),
            Self::NoEmployees => "No employees found. Please add employees first.".into(),
            Self::DirectoryUnwritable { path, .. } => {
                format!("Cannot write to export directory {}.", path.display())
            }
            _ => FAILURE_NOTICE.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_directory_errors_are_fatal() {
        let dir = ExportError::DirectoryUnwritable {
            path: PathBuf::from("/root/x"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(dir.is_fatal());
        assert!(!ExportError::NoEmployees.is_fatal());
        assert!(!ExportError::NotFound { emp_id: 1 }.is_fatal());
        assert!(!ExportError::from(SourceError::Unauthorized).is_fatal());
        assert!(!ExportError::Render("x".into()).is_fatal());
    }

    #[test]
    fn test_user_message_hides_details() {
        let err = ExportError::from(SourceError::Transport("dns lookup failed for db-7".into()));
        assert!(!err.user_message().contains("db-7"));
        assert!(err.to_string().contains("db-7"));
    }
}
