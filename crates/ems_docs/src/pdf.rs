//! PDF document generation.
//!
//! Generates minimal but valid multi-page PDF 1.4 files by writing the
//! object graph directly. Text uses the built-in Helvetica family with
//! WinAnsi encoding, so no font files are embedded.

use anyhow::{Result, bail};

use crate::document::{Block, Document, field_label};

/// A4 in points.
pub const PAGE_WIDTH: f64 = 595.0;
pub const PAGE_HEIGHT: f64 = 842.0;

const MARGIN_X: f64 = 72.0;
const TOP_Y: f64 = 770.0;
const BOTTOM_Y: f64 = 72.0;
const FOOTER_Y: f64 = 40.0;

// Font resource names
const BOLD: &str = "F1";
const REGULAR: &str = "F2";
const ITALIC: &str = "F3";

/// Width available to text between the side margins.
const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN_X;
const LIST_INDENT: f64 = 12.0;

/// Generate a PDF from a [`Document`].
///
/// Every [`Block::PageBreak`] starts a new page. A page that runs out of
/// vertical space also continues on a new page, and lines wider than the
/// text area wrap. Footers are drawn at the bottom of the page they appear
/// on.
///
/// Fails when any text contains a character the WinAnsi encoding of the
/// built-in fonts cannot represent.
pub fn generate_pdf(document: &Document) -> Result<Vec<u8>> {
    let mut writer = PageWriter::new();

    for block in &document.blocks {
        match block {
            Block::PageBreak => writer.break_page(),
            Block::Footer(text) => writer.footer(text)?,
            other => writer.draw(other)?,
        }
    }

    let mut builder = PdfBuilder::new();
    for page in writer.finish() {
        builder.add_page(page);
    }
    builder.build(&document.title)
}

/// Lays blocks out top to bottom and accumulates one content stream per page.
struct PageWriter {
    pages: Vec<String>,
    current: String,
    y: f64,
}

/// Font, size, left indent and the vertical space of a one-line block.
struct TextStyle {
    font: &'static str,
    size: f64,
    indent: f64,
    height: f64,
}

impl TextStyle {
    fn of(block: &Block) -> Option<Self> {
        let (font, size, indent, height) = match block {
            Block::Title(_) => (BOLD, 22.0, 0.0, 36.0),
            Block::Subtitle(_) => (BOLD, 16.0, 0.0, 30.0),
            Block::Heading(_) => (BOLD, 14.0, 0.0, 26.0),
            Block::Field { .. } => (REGULAR, 11.0, 0.0, 18.0),
            Block::Paragraph(_) => (REGULAR, 11.0, 0.0, 16.0),
            Block::ListItem(_) => (REGULAR, 11.0, LIST_INDENT, 16.0),
            Block::Rule | Block::Footer(_) | Block::PageBreak => return None,
        };
        Some(Self {
            font,
            size,
            indent,
            height,
        })
    }

    fn leading(&self) -> f64 {
        leading(self.size)
    }
}

fn leading(size: f64) -> f64 {
    size + 4.0
}

const RULE_HEIGHT: f64 = 14.0;
const FOOTER_SIZE: f64 = 9.0;

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: String::new(),
            y: TOP_Y,
        }
    }

    fn break_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.y = TOP_Y;
    }

    fn finish(mut self) -> Vec<String> {
        self.pages.push(self.current);
        self.pages
    }

    /// Start a new page unless `height` still fits above the bottom margin.
    fn reserve(&mut self, height: f64) {
        if self.y - height < BOTTOM_Y && !self.current.is_empty() {
            self.break_page();
        }
    }

    fn draw(&mut self, block: &Block) -> Result<()> {
        let Some(style) = TextStyle::of(block) else {
            if matches!(block, Block::Rule) {
                self.rule();
            }
            return Ok(());
        };

        let width = CONTENT_WIDTH - style.indent;
        let (label, segments) = match block {
            Block::Field { label, value } => {
                let label = format!("{} ", field_label(label));
                let first = width - text_width(&label, BOLD, style.size);
                let segments = wrap(value, style.font, style.size, first, width);
                (Some(label), segments)
            }
            Block::Title(text)
            | Block::Subtitle(text)
            | Block::Heading(text)
            | Block::Paragraph(text)
            | Block::ListItem(text) => (None, wrap(text, style.font, style.size, width, width)),
            Block::Rule | Block::Footer(_) | Block::PageBreak => return Ok(()),
        };

        let extra = (segments.len() - 1) as f64 * style.leading();
        self.reserve(style.height + extra);

        let y = self.y;
        self.text(
            style.font,
            style.size,
            MARGIN_X + style.indent,
            y,
            label.as_deref(),
            &segments,
        )?;
        self.y -= style.height + extra;
        Ok(())
    }

    fn rule(&mut self) {
        self.reserve(RULE_HEIGHT);
        let line_y = self.y + 6.0;
        self.current.push_str("0.6 0.6 0.6 RG\n"); // stroke color
        self.current.push_str("0.5 w\n"); // line width
        self.current.push_str(&format!(
            "{MARGIN_X:.0} {line_y:.0} m {:.0} {line_y:.0} l S\n",
            PAGE_WIDTH - MARGIN_X
        ));
        self.y -= RULE_HEIGHT;
    }

    /// Footer lines stack upwards so the last one sits on `FOOTER_Y`.
    fn footer(&mut self, text: &str) -> Result<()> {
        let segments = wrap(text, ITALIC, FOOTER_SIZE, CONTENT_WIDTH, CONTENT_WIDTH);
        let y = FOOTER_Y + (segments.len() - 1) as f64 * leading(FOOTER_SIZE);
        self.current.push_str("0.4 0.4 0.4 rg\n");
        self.text(ITALIC, FOOTER_SIZE, MARGIN_X, y, None, &segments)?;
        self.current.push_str("0 0 0 rg\n");
        Ok(())
    }

    /// One text object: an optional bold `label` followed by `segments`,
    /// one per line.
    fn text(
        &mut self,
        font: &str,
        size: f64,
        x: f64,
        y: f64,
        label: Option<&str>,
        segments: &[String],
    ) -> Result<()> {
        let mut out = String::from("BT\n");
        out.push_str(&format!("{x:.0} {y:.0} Td\n"));
        if let Some(label) = label {
            out.push_str(&format!("/{BOLD} {size:.0} Tf\n"));
            out.push_str(&format!("({}) Tj\n", pdf_escape(label)?));
        }
        out.push_str(&format!("/{font} {size:.0} Tf\n"));
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                out.push_str(&format!("0 -{:.0} Td\n", leading(size)));
            }
            out.push_str(&format!("({}) Tj\n", pdf_escape(segment)?));
        }
        out.push_str("ET\n");
        self.current.push_str(&out);
        Ok(())
    }
}

/// Split `text` into lines no wider than `first` (the first line) and
/// `rest` (every later line).
///
/// Lines break after a space where one is available and mid-word
/// otherwise. The segments concatenate back to `text` exactly. There is
/// always at least one segment.
pub fn wrap(text: &str, font: &str, size: f64, first: f64, rest: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0.0;
    // Byte offset just past the last space in `line`, and the width up to it.
    let mut break_at: Option<(usize, f64)> = None;

    for c in text.chars() {
        let advance = char_width(c, font, size);
        loop {
            let limit = if lines.is_empty() { first } else { rest };
            if line.is_empty() || width + advance <= limit {
                break;
            }
            match break_at.take() {
                Some((idx, before)) if idx < line.len() => {
                    let tail = line.split_off(idx);
                    lines.push(std::mem::replace(&mut line, tail));
                    width -= before;
                }
                _ => {
                    lines.push(std::mem::take(&mut line));
                    width = 0.0;
                }
            }
        }
        line.push(c);
        width += advance;
        if c == ' ' {
            break_at = Some((line.len(), width));
        }
    }
    lines.push(line);
    lines
}

/// Estimated rendered width of `text` in points.
pub fn text_width(text: &str, font: &str, size: f64) -> f64 {
    text.chars().map(|c| char_width(c, font, size)).sum()
}

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, //
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, //
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, //
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

// Helvetica-Bold runs wider than regular; this covers its widest glyphs.
const BOLD_FACTOR: f64 = 1.15;

fn char_width(c: char, font: &str, size: f64) -> f64 {
    let units = match c {
        ' '..='~' => HELVETICA_WIDTHS[c as usize - 32],
        '—' | '…' | '‰' | '™' => 1000,
        '•' => 350,
        _ => 667,
    };
    let factor = if font == BOLD { BOLD_FACTOR } else { 1.0 };
    f64::from(units) * factor * size / 1000.0
}

/// Escape text for a PDF string literal in WinAnsi encoding.
///
/// Characters outside ASCII are written as octal escapes. Characters WinAnsi
/// has no code for are an error.
pub fn pdf_escape(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            ' '..='~' => out.push(c),
            c if c.is_control() => out.push(' '),
            _ => match win_ansi_code(c) {
                Some(code) => out.push_str(&format!("\\{code:03o}")),
                None => bail!("{c:?} (U+{:04X}) cannot be encoded in WinAnsi", c as u32),
            },
        }
    }
    Ok(out)
}

fn win_ansi_code(c: char) -> Option<u8> {
    let code = match c {
        '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‰' => 0x89,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => return None,
    };
    Some(code)
}

/// Minimal PDF file builder. Constructs valid PDF 1.4 files.
struct PdfBuilder {
    pages: Vec<String>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self { pages: Vec::new() }
    }

    fn add_page(&mut self, content: String) {
        self.pages.push(content);
    }

    /// Object number of page `i`'s page dictionary; its content stream follows it.
    fn page_object(i: usize) -> usize {
        7 + i * 2
    }

    /// Build the complete PDF file as bytes.
    ///
    /// Layout: 1 catalog, 2 page tree, 3-5 fonts, 6 info, then a page
    /// dictionary and content stream per page.
    fn build(&self, title: &str) -> Result<Vec<u8>> {
        let mut pdf = String::new();
        let mut offsets: Vec<usize> = Vec::new();

        // Header
        pdf.push_str("%PDF-1.4\n");

        // Obj 1: Catalog
        offsets.push(pdf.len());
        pdf.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        // Obj 2: Pages
        let kids: Vec<String> = (0..self.pages.len())
            .map(|i| format!("{} 0 R", Self::page_object(i)))
            .collect();
        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
            kids.join(" "),
            self.pages.len()
        ));

        // Obj 3-5: Fonts
        for (num, base) in [
            (3, "Helvetica-Bold"),
            (4, "Helvetica"),
            (5, "Helvetica-Oblique"),
        ] {
            offsets.push(pdf.len());
            pdf.push_str(&format!(
                "{num} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>\nendobj\n"
            ));
        }

        // Obj 6: Info (title)
        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "6 0 obj\n<< /Title ({}) /Producer (EMS Export) >>\nendobj\n",
            pdf_escape(title)?
        ));

        for (i, stream) in self.pages.iter().enumerate() {
            let page_num = Self::page_object(i);
            let content_num = page_num + 1;

            offsets.push(pdf.len());
            pdf.push_str(&format!("{page_num} 0 obj\n<< /Type /Page /Parent 2 0 R "));
            pdf.push_str(&format!("/MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] "));
            pdf.push_str(&format!("/Contents {content_num} 0 R /Resources << /Font << "));
            pdf.push_str(&format!(
                "/{BOLD} 3 0 R /{REGULAR} 4 0 R /{ITALIC} 5 0 R >> >> >>\nendobj\n"
            ));

            offsets.push(pdf.len());
            pdf.push_str(&format!(
                "{content_num} 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
                stream.len(),
                stream
            ));
        }

        // Cross-reference table
        let xref_offset = pdf.len();
        let num_objects = offsets.len() + 1; // +1 for free entry
        pdf.push_str(&format!("xref\n0 {num_objects}\n"));
        pdf.push_str("0000000000 65535 f \n");
        for offset in &offsets {
            pdf.push_str(&format!("{:010} 00000 n \n", offset));
        }

        // Trailer
        pdf.push_str(&format!(
            "trailer\n<< /Size {num_objects} /Root 1 0 R /Info 6 0 R >>\n"
        ));
        pdf.push_str(&format!("startxref\n{xref_offset}\n%%EOF\n"));

        Ok(pdf.into_bytes())
    }
}
