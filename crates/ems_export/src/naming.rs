//! Output filename policy.
//!
//! Bulk exports are stamped with the calendar day, so a second export of the
//! same purpose on the same day replaces the first. Single-employee exports
//! are named after the employee, so two employees with identical names share
//! one file in the export directory and the later export wins.

use chrono::NaiveDate;
use ems_core::{ArtifactKind, EmployeeRecord};

/// What a bulk export is for; determines its filename prefix and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPurpose {
    /// All employees as one spreadsheet.
    EmployeeData,
    /// All employees as one multi-page PDF.
    AllEmployeesReport,
    /// One PDF per employee, zipped.
    EmployeePdfArchive,
}

impl ExportPurpose {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::EmployeeData => "employee_data",
            Self::AllEmployeesReport => "All_Employees_Report",
            Self::EmployeePdfArchive => "Employee_PDFs_Archive",
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::EmployeeData => ArtifactKind::Spreadsheet,
            Self::AllEmployeesReport => ArtifactKind::Pdf,
            Self::EmployeePdfArchive => ArtifactKind::ZipArchive,
        }
    }
}

/// `YYYYMMDD`
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// `<purpose>_<YYYYMMDD>.<ext>`
pub fn bulk_file_name(purpose: ExportPurpose, date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        purpose.prefix(),
        date_stamp(date),
        purpose.kind().extension()
    )
}

/// `Employee_<first>_<last>_Profile.<ext>`
pub fn profile_file_name(employee: &EmployeeRecord, kind: ArtifactKind) -> String {
    let first = match name_part(&employee.first_name) {
        part if part.is_empty() => "Employee".to_string(),
        part => part,
    };
    let last = name_part(&employee.last_name);
    format!("Employee_{first}_{last}_Profile.{}", kind.extension())
}

/// Trim, then replace whitespace and path separators with underscores.
fn name_part(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\') {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[test]
    fn test_bulk_file_names() {
        assert_eq!(
            bulk_file_name(ExportPurpose::EmployeeData, day()),
            "employee_data_20261014.xlsx"
        );
        assert_eq!(
            bulk_file_name(ExportPurpose::AllEmployeesReport, day()),
            "All_Employees_Report_20261014.pdf"
        );
        assert_eq!(
            bulk_file_name(ExportPurpose::EmployeePdfArchive, day()),
            "Employee_PDFs_Archive_20261014.zip"
        );
    }

    #[test]
    fn test_same_day_same_purpose_shares_a_name() {
        // Documented behaviour: the second export of the day overwrites the first.
        let a = bulk_file_name(ExportPurpose::EmployeeData, day());
        let b = bulk_file_name(ExportPurpose::EmployeeData, day());
        assert_eq!(a, b);
        let next_day = day().succ_opt().unwrap();
        assert_ne!(a, bulk_file_name(ExportPurpose::EmployeeData, next_day));
    }

    #[test]
    fn test_profile_file_name() {
        let emp = EmployeeRecord::new(7, "Ada", "Lovelace");
        assert_eq!(
            profile_file_name(&emp, ArtifactKind::Pdf),
            "Employee_Ada_Lovelace_Profile.pdf"
        );
        assert_eq!(
            profile_file_name(&emp, ArtifactKind::WordDocument),
            "Employee_Ada_Lovelace_Profile.docx"
        );
    }

    #[test]
    fn test_profile_file_name_replaces_interior_whitespace() {
        let emp = EmployeeRecord::new(1, " Mary Ann ", "van der Berg");
        assert_eq!(
            profile_file_name(&emp, ArtifactKind::Pdf),
            "Employee_Mary_Ann_van_der_Berg_Profile.pdf"
        );
    }

    #[test]
    fn test_profile_file_name_never_contains_separators() {
        let emp = EmployeeRecord::new(1, "../etc", "a\\b");
        let name = profile_file_name(&emp, ArtifactKind::Pdf);
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
    }

    #[test]
    fn test_blank_first_name_uses_placeholder() {
        let emp = EmployeeRecord::new(1, "  ", "Smith");
        assert_eq!(
            profile_file_name(&emp, ArtifactKind::Pdf),
            "Employee_Employee_Smith_Profile.pdf"
        );
    }

    #[test]
    fn test_namesakes_collide() {
        // Known limitation: different employees with the same name share a file.
        let a = EmployeeRecord::new(1, "John", "Smith");
        let b = EmployeeRecord::new(2, "John", "Smith");
        assert_eq!(
            profile_file_name(&a, ArtifactKind::Pdf),
            profile_file_name(&b, ArtifactKind::Pdf)
        );
    }
}
