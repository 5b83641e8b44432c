use crate::block::{Block, Span};
use crate::config::MarkupConfig;
use crate::tree::{
    BULLET_ITEM, CHECKBOX_ITEM, Element, HEADING_PLACEHOLDER, NUMBERED_ITEM, Node, Tag,
};

/// Convert blocks to the editable tree handed to the editing surface.
pub fn blocks_to_tree(blocks: &[Block], config: &MarkupConfig) -> Node {
    Element::new(Tag::Root)
        .with_children(blocks.iter().map(|block| block_to_node(block, config)))
        .into()
}

fn block_to_node(block: &Block, config: &MarkupConfig) -> Node {
    match block {
        Block::Heading { level, content } => {
            let heading = Element::new(Tag::Heading(*level));
            if block.is_placeholder() {
                heading
                    .with_class(HEADING_PLACEHOLDER)
                    .with_child(Element::new(Tag::LineBreak))
                    .into()
            } else {
                heading.with_children(spans_to_nodes(content)).into()
            }
        }
        Block::Paragraph { content } => Element::new(Tag::Paragraph)
            .with_children(spans_to_nodes(content))
            .into(),
        Block::BulletItem { text } => {
            let text = if config.render_bullet_glyph {
                format!("{} {}", config.bullet_glyph, text)
            } else {
                text.clone()
            };
            Element::new(Tag::Div)
                .with_class(BULLET_ITEM)
                .with_child(Node::text(text))
                .into()
        }
        Block::CheckboxItem { checked, text } => Element::new(Tag::Div)
            .with_class(CHECKBOX_ITEM)
            .with_child(Element::new(Tag::Checkbox { checked: *checked }))
            .with_child(Element::new(Tag::Label).with_child(Node::text(text.clone())))
            .into(),
        Block::NumberedItem { index, text } => Element::new(Tag::Div)
            .with_class(NUMBERED_ITEM)
            .with_attr("data-index", index.to_string())
            .with_child(Node::text(text.clone()))
            .into(),
        Block::BlankLine => Element::new(Tag::Paragraph)
            .with_child(Element::new(Tag::LineBreak))
            .into(),
    }
}

fn spans_to_nodes(spans: &[Span]) -> Vec<Node> {
    spans.iter().map(span_to_node).collect()
}

fn span_to_node(span: &Span) -> Node {
    let (tag, inner) = match span {
        Span::Text(text) => return Node::text(text.clone()),
        Span::Bold(inner) => (Tag::Bold, inner),
        Span::Italic(inner) => (Tag::Italic, inner),
        Span::Underline(inner) => (Tag::Underline, inner),
    };
    Element::new(tag).with_children(spans_to_nodes(inner)).into()
}
