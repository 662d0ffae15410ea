//! Render-ready view of the document
//!
//! Flattens [`DocumentContent`] into an ordered list of blocks, each carrying
//! its content and fully resolved style. Export renderers consume this list
//! and never look at style records directly.

use crate::{DocumentContent, FieldPath, LogoStyle, ResolvedStyle};
use serde::Serialize;
use serde_json::Value;

/// What a text block represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockRole {
    Date,
    CompanyName,
    Address,
    Extra,
    Title,
    Recipient,
    Body,
    SectionTitle,
    SectionContent,
    ListItem,
    Footer,
}

/// One block of the rendered document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DocumentBlock {
    Logo {
        source: String,
        width: Option<f64>,
        height: Option<f64>,
        style: LogoStyle,
    },
    Text {
        path: FieldPath,
        role: BlockRole,
        lines: Vec<String>,
        style: ResolvedStyle,
    },
}

impl DocumentBlock {
    /// Selection ID of the field behind this block
    pub fn selection_id(&self) -> String {
        match self {
            DocumentBlock::Logo { .. } => crate::LOGO_SELECTION_ID.to_string(),
            DocumentBlock::Text { path, .. } => format!("{}{}", crate::DOCUMENT_SELECTION_PREFIX, path),
        }
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim().to_string()).collect()
}

struct BlockBuilder<'a> {
    document: &'a DocumentContent,
    blocks: Vec<DocumentBlock>,
}

impl BlockBuilder<'_> {
    fn text(&mut self, path: FieldPath, role: BlockRole, text: &str) {
        let style = self.document.resolved_style(&path);
        self.blocks.push(DocumentBlock::Text {
            path,
            role,
            lines: split_lines(text),
            style,
        });
    }
}

/// Build the document blocks in reading order: logo, date, company name,
/// addresses, extra text fields, title, recipient, body, sections, list items, footer.
pub fn document_blocks(document: &DocumentContent) -> Vec<DocumentBlock> {
    let mut builder = BlockBuilder {
        document,
        blocks: Vec::new(),
    };

    if let Some(source) = &document.logo {
        builder.blocks.push(DocumentBlock::Logo {
            source: source.clone(),
            width: document.logo_width,
            height: document.logo_height,
            style: document.logo_style(),
        });
    }

    builder.text(FieldPath::field("date"), BlockRole::Date, &document.date);
    builder.text(FieldPath::field("companyName"), BlockRole::CompanyName, &document.company_name);
    for (index, address) in document.addresses.iter().enumerate() {
        builder.text(FieldPath::item("addresses", index), BlockRole::Address, address);
    }
    for (name, value) in &document.extra {
        if let Value::String(text) = value {
            builder.text(FieldPath::field(name.clone()), BlockRole::Extra, text);
        }
    }
    builder.text(FieldPath::field("title"), BlockRole::Title, &document.title);
    builder.text(FieldPath::field("recipient"), BlockRole::Recipient, &document.recipient);
    builder.text(FieldPath::field("body"), BlockRole::Body, &document.body);
    for (index, section) in document.sections.iter().enumerate() {
        builder.text(
            FieldPath::item_field("sections", index, "title"),
            BlockRole::SectionTitle,
            &section.title,
        );
        builder.text(
            FieldPath::item_field("sections", index, "content"),
            BlockRole::SectionContent,
            &section.content,
        );
    }
    for (index, item) in document.list_items.iter().enumerate() {
        builder.text(FieldPath::item("listItems", index), BlockRole::ListItem, item);
    }
    builder.text(FieldPath::field("footer"), BlockRole::Footer, &document.footer);

    builder.blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FontWeight, StyleDefaults, StyleRecord};

    fn roles(blocks: &[DocumentBlock]) -> Vec<BlockRole> {
        blocks
            .iter()
            .filter_map(|block| match block {
                DocumentBlock::Text { role, .. } => Some(*role),
                DocumentBlock::Logo { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_canonical_block_order() {
        let doc = DocumentContent::canonical(&StyleDefaults::default());
        let blocks = document_blocks(&doc);
        let roles = roles(&blocks);

        assert_eq!(roles[0], BlockRole::Date);
        assert_eq!(roles[1], BlockRole::CompanyName);
        assert_eq!(&roles[2..5], &[BlockRole::Address; 3]);
        assert_eq!(roles[5], BlockRole::Extra);
        assert_eq!(roles[6], BlockRole::Title);
        assert_eq!(*roles.last().unwrap(), BlockRole::Footer);
        assert_eq!(roles.iter().filter(|r| **r == BlockRole::ListItem).count(), 3);
        assert!(!blocks.iter().any(|b| matches!(b, DocumentBlock::Logo { .. })));
    }

    #[test]
    fn test_logo_block_first_when_present() {
        let mut doc = DocumentContent::canonical(&StyleDefaults::default());
        doc.logo = Some("data:image/png;base64,AA".to_string());
        doc.logo_width = Some(80.0);
        let blocks = document_blocks(&doc);
        match &blocks[0] {
            DocumentBlock::Logo { width, .. } => assert_eq!(*width, Some(80.0)),
            other => panic!("expected logo block, got {:?}", other),
        }
        assert_eq!(blocks[0].selection_id(), "logo-element");
    }

    #[test]
    fn test_address_blocks_inherit_base_style() {
        let mut doc = DocumentContent::canonical(&StyleDefaults::default());
        doc.set_field_style(
            &FieldPath::field("addresses"),
            &StyleRecord {
                font_weight: Some(FontWeight::Bold),
                ..Default::default()
            },
        );
        let blocks = document_blocks(&doc);
        let address = blocks
            .iter()
            .find(|b| b.selection_id() == "document-addresses[2]")
            .unwrap();
        match address {
            DocumentBlock::Text { style, lines, .. } => {
                assert_eq!(style.font_weight, FontWeight::Bold);
                assert_eq!(lines, &vec!["Vietnam".to_string()]);
            }
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_multiline_text_is_split() {
        let doc = DocumentContent::canonical(&StyleDefaults::default());
        let blocks = document_blocks(&doc);
        let extra = blocks
            .iter()
            .find_map(|b| match b {
                DocumentBlock::Text {
                    role: BlockRole::Extra,
                    lines,
                    ..
                } => Some(lines.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(extra.len(), 4);
        assert_eq!(extra[3], "Vietnam");
    }
}
