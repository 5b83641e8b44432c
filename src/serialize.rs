use crate::block::Block;
use crate::config::MarkupConfig;
use crate::render::blocks_to_tree;
use crate::tree::{BULLET_ITEM, CHECKBOX_ITEM, Element, NUMBERED_ITEM, Node, Tag};

const DEFAULT_BULLET_GLYPH: &str = "•";

/// One serialized block.
enum Part {
    Line(String),
    /// An intentional empty line.
    Blank,
}

/// Convert a canonical tree to note markup.
pub fn tree_to_markup(tree: &Node, config: &MarkupConfig) -> String {
    let mut writer = Writer {
        config,
        parts: Vec::new(),
    };
    match tree {
        Node::Element(_) => writer.write_children(tree.children()),
        Node::Text { .. } => {
            writer.write_inline_run(&[tree]);
        }
    }

    let lines: Vec<&str> = writer
        .parts
        .iter()
        .filter_map(|part| match part {
            Part::Line(line) if line.trim().is_empty() => None,
            Part::Line(line) => Some(line.as_str()),
            Part::Blank => Some(""),
        })
        .collect();

    log::debug!("serialized tree into {} lines", lines.len());
    lines.join("\n")
}

/// Convert blocks straight to note markup.
pub fn blocks_to_markup(blocks: &[Block], config: &MarkupConfig) -> String {
    tree_to_markup(&blocks_to_tree(blocks, config), config)
}

struct Writer<'a> {
    config: &'a MarkupConfig,
    parts: Vec<Part>,
}

impl Writer<'_> {
    /// Serialize siblings. Consecutive inline nodes form one line; block
    /// nodes each produce their own.
    fn write_children(&mut self, children: &[Node]) {
        let mut inline_run: Vec<&Node> = Vec::new();
        // Numbered items count among their written numbered siblings.
        let mut numbered = 0;

        for child in children {
            let Some(element) = child.as_element().filter(|_| is_block(child)) else {
                inline_run.push(child);
                continue;
            };

            if !inline_run.is_empty() {
                self.write_inline_run(&inline_run);
                inline_run.clear();
            }

            if element.has_class(NUMBERED_ITEM) {
                let text = inline_text(&element.children);
                if self.write_item(&format!("{}. ", numbered + 1), &text) {
                    numbered += 1;
                }
            } else {
                self.write_block(element);
            }
        }

        if !inline_run.is_empty() {
            self.write_inline_run(&inline_run);
        }
    }

    fn write_inline_run(&mut self, nodes: &[&Node]) {
        let mut text = String::new();
        for node in nodes {
            write_inline(node, &mut text);
        }
        let text = trim_breaks(&text);
        if !text.trim().is_empty() {
            self.parts.push(Part::Line(text.to_string()));
        }
    }

    fn write_block(&mut self, element: &Element) {
        if element.has_class(CHECKBOX_ITEM) {
            self.write_checkbox(element);
        } else if element.has_class(BULLET_ITEM) {
            let text = inline_text(&element.children);
            let text = self.strip_bullet_glyph(&text);
            self.write_item("- ", text);
        } else if let Tag::Heading(level) = element.tag {
            self.write_heading(element, level);
        } else if element.children.iter().any(is_block) {
            self.write_children(&element.children);
        } else {
            self.write_paragraph(element);
        }
    }

    /// List items without text are dropped like empty headings; a bare
    /// marker would not read back as the same item.
    fn write_item(&mut self, marker: &str, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.parts.push(Part::Line(format!("{marker}{text}")));
        true
    }

    fn write_heading(&mut self, element: &Element, level: u8) {
        let split = element
            .children
            .iter()
            .position(is_block)
            .unwrap_or(element.children.len());
        let (own, nested) = element.children.split_at(split);

        // Leading `#` in the text would merge into the marker on reload.
        // Empty placeholder headings are never persisted.
        let text = inline_text(own);
        let text = text.trim_start_matches(|c: char| c == '#' || c.is_whitespace());
        if !text.is_empty() {
            let marker = "#".repeat(usize::from(level.clamp(1, 3)));
            self.parts.push(Part::Line(format!("{marker} {text}")));
        }

        if !nested.is_empty() {
            self.write_children(nested);
        }
    }

    fn write_checkbox(&mut self, element: &Element) {
        let checked = find_checkbox(&element.children).unwrap_or(false);
        // Read the label, not the whole item, so the control itself is
        // never folded into the text.
        let text = match find_tag(&element.children, &Tag::Label) {
            Some(label) => inline_text(&label.children),
            None => inline_text(&element.children),
        };
        let marker = if checked { "- [x] " } else { "- [ ] " };
        self.write_item(marker, &text);
    }

    fn write_paragraph(&mut self, element: &Element) {
        let text = inline_text(&element.children);
        if !text.trim().is_empty() {
            self.parts.push(Part::Line(text));
        } else if contains_line_break(&element.children) {
            self.parts.push(Part::Blank);
        }
    }

    fn strip_bullet_glyph<'t>(&self, text: &'t str) -> &'t str {
        for glyph in [self.config.bullet_glyph.as_str(), DEFAULT_BULLET_GLYPH] {
            if glyph.is_empty() {
                continue;
            }
            if let Some(rest) = text.strip_prefix(glyph) {
                return rest.trim_start();
            }
        }
        text
    }
}

/// Block nodes serialize as their own line(s): structural elements, and any
/// element wrapping one.
fn is_block(node: &Node) -> bool {
    node.is_structural() || node.children().iter().any(is_block)
}

fn inline_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_inline(node, &mut out);
    }
    trim_breaks(&out).to_string()
}

fn write_inline(node: &Node, out: &mut String) {
    let element = match node {
        Node::Text { text } => {
            out.push_str(text);
            return;
        }
        Node::Element(element) => element,
    };

    let delimiter = match element.tag {
        Tag::Bold => "**",
        Tag::Italic => "*",
        Tag::Underline => "__",
        Tag::LineBreak => {
            out.push('\n');
            return;
        }
        Tag::Checkbox { .. } => return,
        _ => "",
    };

    let mut inner = String::new();
    for child in &element.children {
        write_inline(child, &mut inner);
    }
    if delimiter.is_empty() || inner.trim().is_empty() {
        out.push_str(&inner);
    } else {
        out.push_str(delimiter);
        out.push_str(&inner);
        out.push_str(delimiter);
    }
}

fn trim_breaks(text: &str) -> &str {
    text.trim_matches('\n')
}

fn find_checkbox(nodes: &[Node]) -> Option<bool> {
    nodes.iter().find_map(|node| match node.as_element()? {
        Element {
            tag: Tag::Checkbox { checked },
            ..
        } => Some(*checked),
        element => find_checkbox(&element.children),
    })
}

fn find_tag<'a>(nodes: &'a [Node], tag: &Tag) -> Option<&'a Element> {
    nodes.iter().find_map(|node| {
        let element = node.as_element()?;
        if &element.tag == tag {
            Some(element)
        } else {
            find_tag(&element.children, tag)
        }
    })
}

fn contains_line_break(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| match node.as_element() {
        Some(element) => element.tag == Tag::LineBreak || contains_line_break(&element.children),
        None => false,
    })
}
