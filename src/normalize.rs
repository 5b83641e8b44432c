//! Cleanup of trees coming back from interactive editing.
//!
//! The editing surface is the only producer of these trees. Apart from the
//! malformations handled here it is assumed to be well behaved, so unknown
//! elements pass through with their attributes stripped.

use crate::tree::{Element, HEADING_PLACEHOLDER, Node, STRUCTURAL_MARKERS, Tag};

const NBSP: char = '\u{a0}';

/// Bring an edited tree into canonical form.
pub fn normalize(tree: Node) -> Node {
    let mut nodes = normalize_node(tree);
    if nodes.len() == 1 {
        if let Some(node) = nodes.pop() {
            return node;
        }
    }
    // A heading at the root split into siblings; give them a root again.
    Element::new(Tag::Root).with_children(nodes).into()
}

/// Normalize one node. Children are done first; a heading may come back as
/// several siblings.
fn normalize_node(node: Node) -> Vec<Node> {
    match node {
        Node::Text { text } => vec![Node::Text {
            text: text.replace(NBSP, " "),
        }],
        Node::Element(mut element) => {
            element.children = std::mem::take(&mut element.children)
                .into_iter()
                .flat_map(normalize_node)
                .collect();
            element.attrs.clear();
            element
                .classes
                .retain(|class| STRUCTURAL_MARKERS.contains(&class.as_str()));

            if matches!(element.tag, Tag::Heading(_)) {
                denest_heading(element)
            } else {
                vec![element.into()]
            }
        }
    }
}

/// Pull structural children out of a heading. The heading keeps the inline
/// content in front of the first structural child; everything from there on
/// becomes its own sibling, with stray inline runs wrapped in a paragraph.
fn denest_heading(mut heading: Element) -> Vec<Node> {
    let Some(first) = heading.children.iter().position(Node::is_structural) else {
        return vec![mark_placeholder(heading).into()];
    };

    let rest = heading.children.split_off(first);
    log::debug!("moving {} nodes out of a heading", rest.len());

    let mut out = vec![mark_placeholder(heading).into()];
    let mut inline_run = Vec::new();
    for child in rest {
        if child.is_structural() {
            flush_inline_run(&mut inline_run, &mut out);
            out.push(child);
        } else {
            inline_run.push(child);
        }
    }
    flush_inline_run(&mut inline_run, &mut out);
    out
}

fn flush_inline_run(run: &mut Vec<Node>, out: &mut Vec<Node>) {
    if run.is_empty() {
        return;
    }
    let nodes = std::mem::take(run);
    let has_text = nodes.iter().any(|node| !node.text_content().trim().is_empty());
    if has_text {
        out.push(Element::new(Tag::Paragraph).with_children(nodes).into());
    }
}

/// Keep the placeholder marker in sync with whether the heading has text.
fn mark_placeholder(mut heading: Element) -> Element {
    heading.classes.retain(|class| class != HEADING_PLACEHOLDER);
    let empty = heading
        .children
        .iter()
        .all(|child| child.text_content().trim().is_empty());
    if empty {
        heading.classes.push(HEADING_PLACEHOLDER.to_string());
    }
    heading
}
