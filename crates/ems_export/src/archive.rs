//! ZIP archive of per-employee profile PDFs.

use anyhow::{Context, Result};
use ems_client::{Credential, RecordSource};
use ems_core::{ArtifactKind, EmployeeRecord, ExportArtifact};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::directory::write_file;
use crate::error::ExportError;
use crate::exporter::{Exporter, settle};
use crate::naming::{ExportPurpose, bulk_file_name};

impl<S: RecordSource> Exporter<S> {
    /// Write `Employee_PDFs_Archive_<YYYYMMDD>.zip` holding one profile PDF
    /// per employee.
    ///
    /// Employees whose profile cannot be rendered are skipped. The call fails
    /// only when none could be rendered. Profiles are staged in a private
    /// scratch directory that is removed before this returns, whatever the
    /// outcome.
    pub fn try_export_all_pdfs_zip(
        &self,
        credential: &Credential,
    ) -> Result<ExportArtifact, ExportError> {
        self.directory.ensure()?;
        let employees = self.fetch_roster(credential)?;

        let scratch = self.scratch_dir()?;
        let staged = self.stage_profiles(&employees, credential, scratch.path());
        if staged.is_empty() {
            return Err(ExportError::NothingArchived {
                attempted: employees.len(),
            });
        }

        let file_name = bulk_file_name(ExportPurpose::EmployeePdfArchive, self.now().date());
        let path = self.directory.artifact_path(&file_name);
        if let Err(e) = write_zip(&path, &staged) {
            discard(&path);
            return Err(ExportError::Render(format!("failed to write archive: {e:#}")));
        }

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            warn!(path = %scratch_path.display(), "failed to remove scratch directory: {e}");
        }

        debug!(entries = staged.len(), total = employees.len(), "archive written");
        Ok(ExportArtifact::new(path, ArtifactKind::ZipArchive))
    }

    pub fn export_all_pdfs_zip(
        &self,
        credential: &Credential,
    ) -> Result<Option<ExportArtifact>, ExportError> {
        settle("all_pdfs_zip", self.try_export_all_pdfs_zip(credential))
    }

    fn scratch_dir(&self) -> Result<TempDir, ExportError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ems-archive-");
        let dir = match self.scratch_root() {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        dir.map_err(|e| ExportError::render("failed to create scratch directory", e))
    }

    /// Render every employee's profile into `scratch`. Failures are logged
    /// and skipped; the staged paths come back in roster order.
    fn stage_profiles(
        &self,
        employees: &[EmployeeRecord],
        credential: &Credential,
        scratch: &Path,
    ) -> Vec<PathBuf> {
        let total = employees.len();
        let mut used = HashSet::new();
        let mut staged = Vec::with_capacity(total);

        for (i, employee) in employees.iter().enumerate() {
            let rendered = self
                .render_profile_pdf(employee.id, credential)
                .and_then(|(file_name, bytes)| {
                    let path = scratch.join(entry_name(&file_name, employee.id, &mut used));
                    write_file(&path, &bytes)?;
                    Ok(path)
                });

            match rendered {
                Ok(path) => staged.push(path),
                Err(e) => warn!(
                    emp_id = employee.id,
                    "record {} of {total} failed: {e}",
                    i + 1
                ),
            }
        }
        staged
    }
}

/// Archive entry name, suffixed with the employee id when another entry
/// already took the plain profile name.
fn entry_name(file_name: &str, emp_id: i64, used: &mut HashSet<String>) -> String {
    let mut name = file_name.to_string();
    if used.contains(&name) {
        name = match file_name.rsplit_once('.') {
            Some((stem, ext)) => format!("{stem}_{emp_id}.{ext}"),
            None => format!("{file_name}_{emp_id}"),
        };
    }
    used.insert(name.clone());
    name
}

fn write_zip(path: &Path, files: &[PathBuf]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for staged in files {
        let name = staged
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("Staged file has no name: {}", staged.display()))?;
        let bytes = std::fs::read(staged)
            .with_context(|| format!("Failed to read staged {}", staged.display()))?;
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("Failed to create entry {name}"))?;
        zip.write_all(&bytes)
            .with_context(|| format!("Failed to write entry {name}"))?;
    }

    zip.finish().context("Failed to finalize zip")?;
    Ok(())
}

fn discard(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), "could not discard partial archive: {e}");
        }
    }
}
