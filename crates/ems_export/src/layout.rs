//! What goes on each page, independent of the output format.

use chrono::NaiveDateTime;
use ems_core::{EmployeeRecord, EmploymentHistoryEntry};
use ems_docs::xlsx::Cell;
use ems_docs::{Block, Document};

pub const PROFILE_TITLE: &str = "Employee Profile";
pub const BULK_TITLE: &str = "All Employees Report";
pub const BASIC_INFORMATION: &str = "Basic Information";
pub const EMPLOYMENT_HISTORY: &str = "Employment History";
pub const NO_HISTORY: &str = "No previous employment history recorded.";
pub const NOT_AVAILABLE: &str = "N/A";
pub const GENERATOR: &str = "Generated by Employee Management System";

pub const SHEET_NAME: &str = "Employees";
pub const SPREADSHEET_HEADERS: [&str; 11] = [
    "Employee ID",
    "First Name",
    "Last Name",
    "Full Name",
    "Email",
    "Phone",
    "Department",
    "Designation",
    "Joining Date",
    "Status",
    "Created At",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

/// The seven labelled basic fields, in display order.
pub fn basic_fields(employee: &EmployeeRecord) -> [(&'static str, String); 7] {
    [
        ("Employee ID", employee.id.to_string()),
        ("Department", or_na(employee.department())),
        ("Designation", or_na(employee.designation())),
        ("Email", or_na(employee.email())),
        ("Phone", or_na(employee.phone())),
        (
            "Joining Date",
            employee
                .joining_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        ("Status", employee.status.to_string()),
    ]
}

/// `"<index>. <company> — <role>, <start>–<end>"`, 1-based.
pub fn history_line(index: usize, entry: &EmploymentHistoryEntry) -> String {
    let company = match entry.company_name.trim() {
        "" => NOT_AVAILABLE,
        name => name,
    };
    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    format!(
        "{index}. {company} — {}, {}–{}",
        or_na(entry.role()),
        date(entry.start_date),
        date(entry.end_date)
    )
}

fn push_basic_information(doc: &mut Document, employee: &EmployeeRecord) {
    doc.push(Block::Heading(BASIC_INFORMATION.into()));
    for (label, value) in basic_fields(employee) {
        doc.push(Block::field(label, value));
    }
}

/// One employee's profile: name, basic fields, history and a timestamp footer.
pub fn profile_document(
    employee: &EmployeeRecord,
    history: &[EmploymentHistoryEntry],
    generated_at: NaiveDateTime,
) -> Document {
    let mut doc = Document::new(format!("{PROFILE_TITLE} - {}", employee.full_name()));
    doc.push(Block::Title(PROFILE_TITLE.into()))
        .push(Block::Subtitle(employee.full_name()))
        .push(Block::Rule);

    push_basic_information(&mut doc, employee);

    doc.push(Block::Rule)
        .push(Block::Heading(EMPLOYMENT_HISTORY.into()));
    if history.is_empty() {
        doc.push(Block::Paragraph(NO_HISTORY.into()));
    } else {
        for (i, entry) in history.iter().enumerate() {
            doc.push(Block::ListItem(history_line(i + 1, entry)));
        }
    }

    doc.push(Block::Footer(format!(
        "{GENERATOR} - {}",
        format_timestamp(generated_at)
    )));
    doc
}

/// Every employee on a page of their own, basic fields only. The single
/// footer with the employee count sits on the final page.
pub fn bulk_document(employees: &[EmployeeRecord], generated_at: NaiveDateTime) -> Document {
    let mut doc = Document::new(BULK_TITLE);

    for (i, employee) in employees.iter().enumerate() {
        if i > 0 {
            doc.push(Block::PageBreak);
        }
        doc.push(Block::Title(BULK_TITLE.into()))
            .push(Block::Subtitle(format!(
                "Employee #{}: {}",
                i + 1,
                employee.full_name()
            )))
            .push(Block::Rule);
        push_basic_information(&mut doc, employee);
    }

    doc.push(Block::Footer(format!(
        "{GENERATOR} | {} | Total Employees: {}",
        format_timestamp(generated_at),
        employees.len()
    )));
    doc
}

/// The eleven spreadsheet columns; absent values are empty strings.
pub fn spreadsheet_row(employee: &EmployeeRecord) -> Vec<Cell> {
    let text = |v: Option<&str>| Cell::Text(v.unwrap_or_default().to_string());
    vec![
        Cell::from(employee.id),
        Cell::Text(employee.first_name.clone()),
        Cell::Text(employee.last_name.clone()),
        Cell::Text(employee.full_name()),
        text(employee.email()),
        text(employee.phone()),
        text(employee.department()),
        text(employee.designation()),
        Cell::Text(
            employee
                .joining_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
        ),
        Cell::Text(employee.status.to_string()),
        Cell::Text(employee.created_at.map(format_timestamp).unwrap_or_default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ems_core::EmployeeStatus;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn ada() -> EmployeeRecord {
        let mut emp = EmployeeRecord::new(7, "Ada", "Lovelace");
        emp.department = Some("Engineering".into());
        emp
    }

    #[test]
    fn test_basic_fields_substitute_na() {
        let fields = basic_fields(&ada());
        let labels: Vec<&str> = fields.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec!["Employee ID", "Department", "Designation", "Email", "Phone", "Joining Date", "Status"]
        );
        assert_eq!(fields[0].1, "7");
        assert_eq!(fields[1].1, "Engineering");
        assert_eq!(fields[2].1, "N/A");
        assert_eq!(fields[5].1, "N/A");
        assert_eq!(fields[6].1, "Active");
    }

    #[test]
    fn test_history_line_format() {
        let mut entry = EmploymentHistoryEntry::new("Acme Corp");
        entry.role = Some("Engineer".into());
        entry.start_date = NaiveDate::from_ymd_opt(2019, 1, 1);
        entry.end_date = NaiveDate::from_ymd_opt(2021, 6, 30);
        assert_eq!(
            history_line(1, &entry),
            "1. Acme Corp — Engineer, 2019-01-01–2021-06-30"
        );
    }

    #[test]
    fn test_history_line_missing_fields() {
        let entry = EmploymentHistoryEntry::new("Initech");
        assert_eq!(history_line(3, &entry), "3. Initech — N/A, N/A–N/A");
    }

    #[test]
    fn test_profile_without_history() {
        let doc = profile_document(&ada(), &[], at());
        let lines = doc.text_lines();
        assert_eq!(lines[0], "Employee Profile");
        assert_eq!(lines[1], "Ada Lovelace");
        assert!(lines.contains(&"Department: Engineering".to_string()));
        assert!(lines.contains(&"Status: Active".to_string()));
        assert!(lines.contains(&NO_HISTORY.to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Generated by Employee Management System - 2026-10-14 09:30:00"
        );
    }

    #[test]
    fn test_profile_lists_history_in_order() {
        let history = vec![
            EmploymentHistoryEntry::new("First"),
            EmploymentHistoryEntry::new("Second"),
            EmploymentHistoryEntry::new("Third"),
        ];
        let doc = profile_document(&ada(), &history, at());
        let items: Vec<&Block> = doc
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::ListItem(_)))
            .collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].text().unwrap(), "1. First — N/A, N/A–N/A");
        assert_eq!(items[2].text().unwrap(), "3. Third — N/A, N/A–N/A");
        assert!(!doc.text_lines().contains(&NO_HISTORY.to_string()));
    }

    #[test]
    fn test_bulk_document_one_page_per_employee() {
        let employees = vec![
            EmployeeRecord::new(1, "A", "One"),
            EmployeeRecord::new(2, "B", "Two"),
            EmployeeRecord::new(3, "C", "Three"),
        ];
        let doc = bulk_document(&employees, at());
        let pages = doc.pages();
        assert_eq!(pages.len(), 3);
        assert!(pages[1].contains(&Block::Subtitle("Employee #2: B Two".into())));

        let footers: Vec<&Block> = doc
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::Footer(_)))
            .collect();
        assert_eq!(footers.len(), 1);
        assert!(pages[2].contains(footers[0]));
        assert!(footers[0].text().unwrap().ends_with("Total Employees: 3"));
    }

    #[test]
    fn test_bulk_document_has_no_history() {
        let doc = bulk_document(&[ada()], at());
        assert!(!doc.text_lines().iter().any(|l| l == EMPLOYMENT_HISTORY));
    }

    #[test]
    fn test_spreadsheet_row_projection() {
        let mut emp = ada();
        emp.status = EmployeeStatus::Inactive;
        emp.created_at = Some(at());
        let row = spreadsheet_row(&emp);
        assert_eq!(row.len(), SPREADSHEET_HEADERS.len());
        assert_eq!(row[0], Cell::Number(7.0));
        assert_eq!(row[3], Cell::Text("Ada Lovelace".into()));
        assert_eq!(row[4], Cell::Text(String::new()));
        assert_eq!(row[6], Cell::Text("Engineering".into()));
        assert_eq!(row[9], Cell::Text("Inactive".into()));
        assert_eq!(row[10], Cell::Text("2026-10-14 09:30:00".into()));
    }
}
