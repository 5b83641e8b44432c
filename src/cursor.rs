//! Cursor offsets over a tree's text content.
//!
//! A cursor is carried across a tree replacement as a character offset into
//! the concatenated text of all text leaves, then located again in the new
//! tree. Nothing here depends on parsing or serialization.

use serde::{Deserialize, Serialize};

use crate::tree::Node;

/// A point inside a tree: the child-index path of a node and a character
/// offset within that node's text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub path: Vec<usize>,
    pub offset: usize,
}

/// Global character offset of `local_offset` inside the node at `path`.
///
/// The local offset is clamped to the node's text length. Returns `None` if
/// the path does not lead to a node.
pub fn text_offset_of(tree: &Node, path: &[usize], local_offset: usize) -> Option<usize> {
    let target = tree.at_path(path)?;
    let local = local_offset.min(char_len(target));

    let mut before = 0;
    let mut node = tree;
    for &idx in path {
        let children = node.children();
        before += children[..idx].iter().map(char_len).sum::<usize>();
        node = children.get(idx)?;
    }
    Some(before + local)
}

/// Text position of a global character offset.
///
/// Offsets past the end of the content land at the end of the last text
/// leaf; a tree without text yields the root.
pub fn locate(tree: &Node, offset: usize) -> Position {
    let mut start = 0;
    for (path, len) in text_leaves(tree) {
        if offset <= start + len {
            return Position {
                path,
                offset: offset - start,
            };
        }
        start += len;
    }
    log::debug!("offset {} is past the end of the text, using end", offset);
    end_of(tree)
}

/// Position at the very end of the tree's text content.
pub fn end_of(tree: &Node) -> Position {
    match text_leaves(tree).pop() {
        Some((path, len)) => Position { path, offset: len },
        None => Position::default(),
    }
}

/// Paths and character lengths of all text leaves in document order.
fn text_leaves(tree: &Node) -> Vec<(Vec<usize>, usize)> {
    fn walk(node: &Node, path: &mut Vec<usize>, out: &mut Vec<(Vec<usize>, usize)>) {
        match node {
            Node::Text { text } => out.push((path.clone(), text.chars().count())),
            Node::Element(element) => {
                for (idx, child) in element.children.iter().enumerate() {
                    path.push(idx);
                    walk(child, path, out);
                    path.pop();
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(tree, &mut Vec::new(), &mut out);
    out
}

fn char_len(node: &Node) -> usize {
    node.text_content().chars().count()
}
