//! Single-employee profile exports (Word and PDF).

use ems_client::{Credential, RecordSource};
use ems_core::{ArtifactKind, EmployeeRecord, ExportArtifact};
use ems_docs::Document;
use ems_docs::docx::{Margins, generate_docx};
use ems_docs::pdf::generate_pdf;
use tracing::debug;

use crate::error::ExportError;
use crate::exporter::{Exporter, employee_error, settle};
use crate::layout::profile_document;
use crate::naming::profile_file_name;

impl<S: RecordSource> Exporter<S> {
    /// Write `Employee_<first>_<last>_Profile.docx` for one employee.
    pub fn try_export_employee_word(
        &self,
        emp_id: i64,
        credential: &Credential,
    ) -> Result<ExportArtifact, ExportError> {
        self.directory.ensure()?;
        let (employee, document) = self.load_profile(emp_id, credential)?;
        let bytes = generate_docx(&document, Margins::default())
            .map_err(|e| ExportError::Render(format!("failed to encode DOCX: {e:#}")))?;
        let kind = ArtifactKind::WordDocument;
        self.directory
            .write_artifact(&profile_file_name(&employee, kind), kind, &bytes)
    }

    pub fn export_employee_word(
        &self,
        emp_id: i64,
        credential: &Credential,
    ) -> Result<Option<ExportArtifact>, ExportError> {
        settle(
            "employee_word",
            self.try_export_employee_word(emp_id, credential),
        )
    }

    /// Write `Employee_<first>_<last>_Profile.pdf` for one employee.
    pub fn try_export_employee_pdf(
        &self,
        emp_id: i64,
        credential: &Credential,
    ) -> Result<ExportArtifact, ExportError> {
        self.directory.ensure()?;
        let (file_name, bytes) = self.render_profile_pdf(emp_id, credential)?;
        self.directory
            .write_artifact(&file_name, ArtifactKind::Pdf, &bytes)
    }

    pub fn export_employee_pdf(
        &self,
        emp_id: i64,
        credential: &Credential,
    ) -> Result<Option<ExportArtifact>, ExportError> {
        settle(
            "employee_pdf",
            self.try_export_employee_pdf(emp_id, credential),
        )
    }

    /// Fetch and encode one profile PDF without writing it anywhere.
    /// Returns the file name the profile is stored under and its bytes.
    pub(crate) fn render_profile_pdf(
        &self,
        emp_id: i64,
        credential: &Credential,
    ) -> Result<(String, Vec<u8>), ExportError> {
        let (employee, document) = self.load_profile(emp_id, credential)?;
        let bytes = generate_pdf(&document)
            .map_err(|e| ExportError::Render(format!("failed to encode PDF: {e:#}")))?;
        Ok((profile_file_name(&employee, ArtifactKind::Pdf), bytes))
    }

    fn load_profile(
        &self,
        emp_id: i64,
        credential: &Credential,
    ) -> Result<(EmployeeRecord, Document), ExportError> {
        let employee = self
            .source
            .fetch_employee(credential, emp_id)
            .map_err(employee_error(emp_id))?
            .ok_or(ExportError::NotFound { emp_id })?;
        let history = self
            .source
            .fetch_history(credential, emp_id)
            .map_err(employee_error(emp_id))?;
        debug!(emp_id, history = history.len(), "loaded profile");

        let document = profile_document(&employee, &history, self.now());
        Ok((employee, document))
    }
}
