#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use ems_client::{Credential, InMemorySource};
use ems_core::{EmployeeRecord, EmploymentHistoryEntry};
use ems_export::{ExportDirectory, Exporter};
use std::io::Read;
use std::path::Path;

pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 14)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

pub fn cred() -> Credential {
    Credential::new("test-token")
}

pub fn exporter(source: InMemorySource, root: &Path) -> Exporter<InMemorySource> {
    Exporter::new(source, ExportDirectory::new(root.join("exports"))).with_clock(fixed_now)
}

pub fn ada() -> EmployeeRecord {
    let mut emp = EmployeeRecord::new(7, "Ada", "Lovelace");
    emp.department = Some("Engineering".into());
    emp.email = Some("ada@example.com".into());
    emp
}

pub fn employee(id: i64, first: &str, last: &str) -> EmployeeRecord {
    EmployeeRecord::new(id, first, last)
}

pub fn job(company: &str, role: &str, start: (i32, u32, u32)) -> EmploymentHistoryEntry {
    let mut entry = EmploymentHistoryEntry::new(company);
    entry.role = Some(role.into());
    entry.start_date = NaiveDate::from_ymd_opt(start.0, start.1, start.2);
    entry
}

/// Text of every `BT .. ET` block in page order, with the `Tj` strings of
/// one block joined into a single line.
pub fn pdf_lines(bytes: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    text.split("BT\n")
        .skip(1)
        .filter_map(|chunk| chunk.split("ET\n").next())
        .map(pdf_strings)
        .filter(|line| !line.is_empty())
        .collect()
}

fn pdf_strings(block: &str) -> String {
    let mut out = String::new();
    let mut chars = block.chars().peekable();
    let mut inside = false;
    while let Some(c) = chars.next() {
        match (inside, c) {
            (false, '(') => inside = true,
            (true, ')') => inside = false,
            (true, '\\') => match chars.next() {
                Some(d @ '0'..='7') => {
                    let mut code = d.to_digit(8).unwrap();
                    for _ in 0..2 {
                        if let Some(n) = chars.peek().and_then(|c| c.to_digit(8)) {
                            code = code * 8 + n;
                            chars.next();
                        }
                    }
                    out.push(win_ansi_char(code as u8));
                }
                Some(other) => out.push(other),
                None => {}
            },
            (true, c) => out.push(c),
            (false, _) => {}
        }
    }
    out
}

fn win_ansi_char(code: u8) -> char {
    match code {
        0x96 => '–',
        0x97 => '—',
        0x80 => '€',
        other => other as char,
    }
}

fn zip_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

/// Text of every non-empty Word paragraph, runs joined.
pub fn docx_lines(bytes: &[u8]) -> Vec<String> {
    let xml = zip_part(bytes, "word/document.xml");
    xml.split("</w:p>")
        .map(|paragraph| {
            let mut line = String::new();
            let mut rest = paragraph;
            while let Some(start) = find_text_tag(rest) {
                let after = &rest[start..];
                let Some(open_end) = after.find('>') else { break };
                let body = &after[open_end + 1..];
                let Some(close) = body.find("</w:t>") else { break };
                line.push_str(&xml_unescape(&body[..close]));
                rest = &body[close..];
            }
            line
        })
        .filter(|line| !line.is_empty())
        .collect()
}

fn find_text_tag(s: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(i) = s[offset..].find("<w:t") {
        let at = offset + i;
        match s[at + 4..].chars().next() {
            Some('>') | Some(' ') => return Some(at),
            _ => offset = at + 4,
        }
    }
    None
}

fn xml_unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub fn sheet_xml(bytes: &[u8]) -> String {
    zip_part(bytes, "xl/worksheets/sheet1.xml")
}

pub fn styles_xml(bytes: &[u8]) -> String {
    zip_part(bytes, "xl/styles.xml")
}

pub fn pdf_page_count(bytes: &[u8]) -> usize {
    String::from_utf8_lossy(bytes)
        .matches("/Type /Page /Parent")
        .count()
}

/// Every `width` attribute of the sheet's `<col>` elements.
pub fn column_widths(sheet: &str) -> Vec<f64> {
    sheet
        .split("<col ")
        .skip(1)
        .filter_map(|col| {
            let start = col.find(" width=\"")? + " width=\"".len();
            let len = col[start..].find('"')?;
            col[start..start + len].parse().ok()
        })
        .collect()
}
