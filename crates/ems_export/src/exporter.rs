use chrono::{Local, NaiveDateTime};
use ems_client::{Credential, RecordSource, SourceError};
use ems_core::{EmployeeRecord, ExportArtifact};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::directory::ExportDirectory;
use crate::error::ExportError;

type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Runs export operations against a record source and writes the results
/// into an [`ExportDirectory`].
///
/// Each operation comes in two forms: `try_export_*` returns the precise
/// [`ExportError`], `export_*` logs non-fatal failures and returns
/// `Ok(None)` for them. Only [`ExportError::DirectoryUnwritable`] is ever
/// returned as `Err` by the `export_*` form.
pub struct Exporter<S> {
    pub(crate) source: S,
    pub(crate) directory: ExportDirectory,
    scratch_root: Option<PathBuf>,
    clock: Clock,
}

impl<S: RecordSource> Exporter<S> {
    pub fn new(source: S, directory: ExportDirectory) -> Self {
        Self {
            source,
            directory,
            scratch_root: None,
            clock: Box::new(|| Local::now().naive_local()),
        }
    }

    /// Replace the wall clock used for filename dates and footer timestamps.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Stage archive scratch directories under `root` instead of the system
    /// temp directory.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn directory(&self) -> &ExportDirectory {
        &self.directory
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub(crate) fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    pub(crate) fn scratch_root(&self) -> Option<&Path> {
        self.scratch_root.as_deref()
    }

    /// All employees, or `NoEmployees` when the collection is empty.
    pub(crate) fn fetch_roster(
        &self,
        credential: &Credential,
    ) -> Result<Vec<EmployeeRecord>, ExportError> {
        let employees = self.source.fetch_all_employees(credential)?;
        debug!(count = employees.len(), "fetched employee roster");
        if employees.is_empty() {
            return Err(ExportError::NoEmployees);
        }
        Ok(employees)
    }
}

/// Map a source failure for one employee, keeping "not found" distinct.
pub(crate) fn employee_error(emp_id: i64) -> impl Fn(SourceError) -> ExportError {
    move |err| match err {
        SourceError::NotFound => ExportError::NotFound { emp_id },
        other => ExportError::SourceUnavailable(other),
    }
}

/// Log the outcome of an export and collapse non-fatal failures to `None`.
pub(crate) fn settle(
    operation: &str,
    result: Result<ExportArtifact, ExportError>,
) -> Result<Option<ExportArtifact>, ExportError> {
    match result {
        Ok(artifact) => {
            info!(operation, path = %artifact.path().display(), "export complete");
            Ok(Some(artifact))
        }
        Err(err) if err.is_fatal() => {
            error!(operation, "export aborted: {err}");
            Err(err)
        }
        Err(err) => {
            warn!(operation, "export produced no artifact: {err}");
            Ok(None)
        }
    }
}
