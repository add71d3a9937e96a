use anyhow::Result;
use docx_rs::*;
use std::io::Cursor;

use crate::document::{Block, Document, field_label};

/// Page margins in twentieths of a point (1440 = 1 inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 720,
            bottom: 720,
            left: 1440,
            right: 1440,
        }
    }
}

/// Generate a DOCX file from a [`Document`].
///
/// Titles and subtitles are centered and bold, fields render as a bold
/// label run followed by a regular value run, footers are small italic
/// centered lines. Sizes are in half-points.
pub fn generate_docx(document: &Document, margins: Margins) -> Result<Vec<u8>> {
    let mut docx = Docx::new().page_margin(
        PageMargin::new()
            .top(margins.top)
            .bottom(margins.bottom)
            .left(margins.left)
            .right(margins.right),
    );

    for block in &document.blocks {
        docx = match block {
            Block::Title(text) => {
                let run = Run::new().add_text(text).bold().size(48); // 24pt
                docx.add_paragraph(Paragraph::new().add_run(run).align(AlignmentType::Center))
            }
            Block::Subtitle(text) => {
                let run = Run::new().add_text(text).bold().size(40); // 20pt
                docx.add_paragraph(Paragraph::new().add_run(run).align(AlignmentType::Center))
            }
            Block::Heading(text) => {
                let run = Run::new().add_text(text).bold().size(32); // 16pt
                docx.add_paragraph(Paragraph::new().add_run(run))
            }
            Block::Field { label, value } => {
                let label_run = Run::new()
                    .add_text(format!("{} ", field_label(label)))
                    .bold()
                    .size(22);
                let value_run = Run::new().add_text(value).size(22);
                docx.add_paragraph(Paragraph::new().add_run(label_run).add_run(value_run))
            }
            Block::Paragraph(text) | Block::ListItem(text) => {
                let run = Run::new().add_text(text).size(22); // 11pt
                docx.add_paragraph(Paragraph::new().add_run(run))
            }
            // Spacer paragraph
            Block::Rule => docx.add_paragraph(Paragraph::new()),
            Block::Footer(text) => {
                let run = Run::new().add_text(text).italic().size(18); // 9pt
                docx.add_paragraph(Paragraph::new().add_run(run).align(AlignmentType::Center))
            }
            Block::PageBreak => docx.add_paragraph(
                Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
            ),
        };
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| anyhow::anyhow!("Failed to pack DOCX: {}", e))?;

    Ok(buf.into_inner())
}
