//! The editable document tree.
//!
//! A language-neutral stand-in for the document tree of a rich-text editing
//! surface: tagged elements with classes, free-form attributes and children,
//! plus text leaves. Editing may leave this tree in any shape; the
//! [normalizer](crate::normalize) brings it back to a canonical form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const BULLET_ITEM: &str = "bullet-item";
pub const CHECKBOX_ITEM: &str = "checkbox-item";
pub const NUMBERED_ITEM: &str = "numbered-item";
pub const HEADING_PLACEHOLDER: &str = "heading-placeholder";

/// Classes that carry document structure. Everything else is presentation.
pub const STRUCTURAL_MARKERS: [&str; 4] =
    [BULLET_ITEM, CHECKBOX_ITEM, NUMBERED_ITEM, HEADING_PLACEHOLDER];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Root,
    Heading(u8),
    Paragraph,
    Div,
    Span,
    /// Text label of a checkbox item.
    Label,
    /// Checkbox control. The state is part of the tag, like a DOM property,
    /// so it survives attribute stripping.
    Checkbox {
        checked: bool,
    },
    Bold,
    Italic,
    Underline,
    LineBreak,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: Tag,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Text { text: String },
    Element(Element),
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// The first structural marker class on this element, if any.
    pub fn marker(&self) -> Option<&'static str> {
        STRUCTURAL_MARKERS
            .into_iter()
            .find(|marker| self.has_class(marker))
    }

    /// Headings, paragraphs, generic block containers and list items. These
    /// each serialize to their own line(s).
    pub fn is_structural(&self) -> bool {
        matches!(self.tag, Tag::Heading(_) | Tag::Paragraph | Tag::Div)
            || self.marker().is_some()
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(element) => &element.children,
            Node::Text { .. } => &[],
        }
    }

    pub fn is_structural(&self) -> bool {
        self.as_element().is_some_and(Element::is_structural)
    }

    /// Concatenated text of every text leaf, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { text } => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Follow a path of child indices from this node.
    pub fn at_path(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, &idx| node.children().get(idx))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}
