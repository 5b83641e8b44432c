use serde::{Deserialize, Serialize};

/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Bold(Vec<Span>),
    Italic(Vec<Span>),
    Underline(Vec<Span>),
}

impl Span {
    pub fn text(text: impl Into<String>) -> Self {
        Span::Text(text.into())
    }

    /// Text content with all formatting dropped.
    pub fn plain_text(&self) -> String {
        match self {
            Span::Text(text) => text.clone(),
            Span::Bold(inner) | Span::Italic(inner) | Span::Underline(inner) => {
                spans_plain_text(inner)
            }
        }
    }
}

pub fn spans_plain_text(spans: &[Span]) -> String {
    spans.iter().map(Span::plain_text).collect()
}

/// Block-level elements of the note markup dialect.
///
/// Every block corresponds to exactly one source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, content: Vec<Span> },
    Paragraph { content: Vec<Span> },
    BulletItem { text: String },
    CheckboxItem { checked: bool, text: String },
    NumberedItem { index: u32, text: String },
    BlankLine,
}

impl Block {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        let text = text.into();
        let content = if text.is_empty() {
            Vec::new()
        } else {
            vec![Span::Text(text)]
        };
        Block::Heading { level, content }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph {
            content: vec![Span::Text(text.into())],
        }
    }

    /// A heading with no text. Kept as an editor affordance, never persisted.
    pub fn is_placeholder(&self) -> bool {
        match self {
            Block::Heading { content, .. } => spans_plain_text(content).is_empty(),
            _ => false,
        }
    }
}
