use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook};

/// Upper bound for auto-sized column widths, in character units.
pub const MAX_COLUMN_WIDTH: usize = 50;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    /// The text a reader sees in the cell.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

/// Header row appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderStyle {
    /// Fill color as `0xRRGGBB`.
    pub fill: u32,
    /// Font color as `0xRRGGBB`.
    pub font_color: u32,
    pub font_size: f64,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            fill: 0x366092,
            font_color: 0xFFFFFF,
            font_size: 11.0,
        }
    }
}

impl HeaderStyle {
    fn format(&self) -> Format {
        Format::new()
            .set_bold()
            .set_font_size(self.font_size)
            .set_font_color(Color::RGB(self.font_color))
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(self.fill))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
    }
}

/// Width of each column: the longest cell (header included), capped at `cap`.
pub fn column_widths(headers: &[&str], rows: &[Vec<Cell>], cap: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            let len = cell.display().chars().count();
            match widths.get_mut(col) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }
    widths.into_iter().map(|w| w.clamp(1, cap)).collect()
}

/// Generate a single-sheet XLSX with a styled header row and sized columns.
///
/// Returns the raw bytes of the xlsx file.
pub fn generate_xlsx(
    sheet_name: &str,
    headers: &[&str],
    rows: &[Vec<Cell>],
    style: &HeaderStyle,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .with_context(|| format!("Failed to set sheet name: {sheet_name}"))?;

    let header_format = style.format();

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .with_context(|| format!("Failed to write header at column {col}"))?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            match cell {
                Cell::Number(num) => {
                    worksheet
                        .write_number(excel_row, col_idx as u16, *num)
                        .with_context(|| {
                            format!("Failed to write number at ({excel_row}, {col_idx})")
                        })?;
                }
                Cell::Text(text) => {
                    worksheet
                        .write_string(excel_row, col_idx as u16, text)
                        .with_context(|| {
                            format!("Failed to write string at ({excel_row}, {col_idx})")
                        })?;
                }
            }
        }
    }

    for (col, width) in column_widths(headers, rows, MAX_COLUMN_WIDTH)
        .into_iter()
        .enumerate()
    {
        worksheet
            .set_column_width(col as u16, width as f64)
            .with_context(|| format!("Failed to set width of column {col}"))?;
    }

    let bytes = workbook
        .save_to_buffer()
        .context("Failed to save workbook to buffer")?;

    Ok(bytes)
}
