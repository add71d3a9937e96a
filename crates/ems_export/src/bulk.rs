//! Whole-collection exports: one spreadsheet, or one PDF with a page per
//! employee.

use ems_client::{Credential, RecordSource};
use ems_core::ExportArtifact;
use ems_docs::pdf::generate_pdf;
use ems_docs::xlsx::{Cell, HeaderStyle, generate_xlsx};

use crate::error::ExportError;
use crate::exporter::{Exporter, settle};
use crate::layout::{SHEET_NAME, SPREADSHEET_HEADERS, bulk_document, spreadsheet_row};
use crate::naming::{ExportPurpose, bulk_file_name};

impl<S: RecordSource> Exporter<S> {
    /// Write `employee_data_<YYYYMMDD>.xlsx` with one row per employee.
    pub fn try_export_all_excel(
        &self,
        credential: &Credential,
    ) -> Result<ExportArtifact, ExportError> {
        self.directory.ensure()?;
        let employees = self.fetch_roster(credential)?;

        let rows: Vec<Vec<Cell>> = employees.iter().map(spreadsheet_row).collect();
        let bytes = generate_xlsx(
            SHEET_NAME,
            &SPREADSHEET_HEADERS,
            &rows,
            &HeaderStyle::default(),
        )
        .map_err(|e| ExportError::Render(format!("failed to encode XLSX: {e:#}")))?;

        self.write_bulk(ExportPurpose::EmployeeData, &bytes)
    }

    pub fn export_all_excel(
        &self,
        credential: &Credential,
    ) -> Result<Option<ExportArtifact>, ExportError> {
        settle("all_excel", self.try_export_all_excel(credential))
    }

    /// Write `All_Employees_Report_<YYYYMMDD>.pdf`, one page per employee.
    pub fn try_export_all_pdf(&self, credential: &Credential) -> Result<ExportArtifact, ExportError> {
        self.directory.ensure()?;
        let employees = self.fetch_roster(credential)?;

        let document = bulk_document(&employees, self.now());
        let bytes = generate_pdf(&document)
            .map_err(|e| ExportError::Render(format!("failed to encode PDF: {e:#}")))?;

        self.write_bulk(ExportPurpose::AllEmployeesReport, &bytes)
    }

    pub fn export_all_pdf(
        &self,
        credential: &Credential,
    ) -> Result<Option<ExportArtifact>, ExportError> {
        settle("all_pdf", self.try_export_all_pdf(credential))
    }

    fn write_bulk(
        &self,
        purpose: ExportPurpose,
        bytes: &[u8],
    ) -> Result<ExportArtifact, ExportError> {
        let file_name = bulk_file_name(purpose, self.now().date());
        self.directory
            .write_artifact(&file_name, purpose.kind(), bytes)
    }
}
