//! Format-neutral document layout.
//!
//! Renderers in this crate walk the same [`Block`] sequence, so a DOCX and a
//! PDF built from one [`Document`] carry the same text in the same order.

/// One layout element.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Large bold heading at the top of a page.
    Title(String),
    /// Prominent bold line below the title (e.g. a person's name).
    Subtitle(String),
    /// Section heading.
    Heading(String),
    /// Bold `label:` followed by a regular value on the same line.
    Field { label: String, value: String },
    Paragraph(String),
    ListItem(String),
    /// Horizontal separator. Carries no text.
    Rule,
    /// Small italic line pinned to the bottom of the current page.
    Footer(String),
    PageBreak,
}

impl Block {
    pub fn field(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Field {
            label: label.into(),
            value: value.into(),
        }
    }

    /// The block's visible text as one line, or `None` for layout-only blocks.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Title(t)
            | Self::Subtitle(t)
            | Self::Heading(t)
            | Self::Paragraph(t)
            | Self::ListItem(t)
            | Self::Footer(t) => Some(t.clone()),
            Self::Field { label, value } => Some(format!("{} {value}", field_label(label))),
            Self::Rule | Self::PageBreak => None,
        }
    }
}

/// `"Label:"` as rendered in front of a field value.
pub fn field_label(label: &str) -> String {
    format!("{label}:")
}

/// A titled sequence of blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Metadata title (PDF `/Title`); not rendered as a block.
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// Visible text lines in document order.
    pub fn text_lines(&self) -> Vec<String> {
        self.blocks.iter().filter_map(Block::text).collect()
    }

    /// Blocks grouped by explicit page breaks. Always at least one page.
    pub fn pages(&self) -> Vec<&[Block]> {
        self.blocks
            .split(|b| matches!(b, Block::PageBreak))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines_skip_layout_blocks() {
        let mut doc = Document::new("Report");
        doc.push(Block::Title("Report".into()))
            .push(Block::Rule)
            .push(Block::field("Status", "Active"))
            .push(Block::PageBreak)
            .push(Block::Footer("done".into()));
        assert_eq!(doc.text_lines(), vec!["Report", "Status: Active", "done"]);
    }

    #[test]
    fn test_pages_split_on_breaks() {
        let mut doc = Document::new("x");
        doc.push(Block::Paragraph("a".into()))
            .push(Block::PageBreak)
            .push(Block::Paragraph("b".into()))
            .push(Block::PageBreak)
            .push(Block::Paragraph("c".into()));
        assert_eq!(doc.pages().len(), 3);
    }

    #[test]
    fn test_empty_document_has_one_page() {
        assert_eq!(Document::new("empty").pages().len(), 1);
    }
}
