//! Property-based tests for the load/save cycle.

use std::mem::{Discriminant, discriminant};

use proptest::prelude::*;

use crate::block::{Block, Span};
use crate::tree::{BULLET_ITEM, Element, HEADING_PLACEHOLDER, NUMBERED_ITEM, Node, Tag};
use crate::{codec, normalize, parse, render, serialize};

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn words() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..4).prop_map(|words| words.join(" "))
}

fn wrap(kind: usize, inner: Vec<Span>) -> Span {
    match kind {
        0 => Span::Bold(inner),
        1 => Span::Italic(inner),
        _ => Span::Underline(inner),
    }
}

fn push_text(spans: &mut Vec<Span>, text: &str) {
    if let Some(Span::Text(last)) = spans.last_mut() {
        last.push_str(text);
    } else {
        spans.push(Span::Text(text.to_string()));
    }
}

/// Spans separated by single spaces, with adjacent text merged the way the
/// parser produces it.
fn spaced(spans: Vec<Span>) -> Vec<Span> {
    let mut out = Vec::new();
    for (i, span) in spans.into_iter().enumerate() {
        if i > 0 {
            push_text(&mut out, " ");
        }
        match span {
            Span::Text(text) => push_text(&mut out, &text),
            other => out.push(other),
        }
    }
    out
}

/// Nesting the markers express unambiguously: no kind inside itself, and no
/// italic wrapping nothing but a bold (`***x***` reads as bold around italic).
fn writable(span: &Span, ancestors: &[Discriminant<Span>]) -> bool {
    let inner = match span {
        Span::Text(_) => return true,
        Span::Bold(inner) | Span::Italic(inner) | Span::Underline(inner) => inner,
    };
    let kind = discriminant(span);
    if ancestors.contains(&kind) {
        return false;
    }
    if matches!(span, Span::Italic(_)) && matches!(inner.as_slice(), [Span::Bold(_)]) {
        return false;
    }
    let mut path = ancestors.to_vec();
    path.push(kind);
    inner.iter().all(|child| writable(child, &path))
}

/// Text and formatted spans nested up to two levels, mixing text and span
/// children.
fn span() -> impl Strategy<Value = Span> {
    let leaf = prop_oneof![
        words().prop_map(Span::Text),
        (0..3usize, word()).prop_map(|(kind, word)| wrap(kind, vec![Span::Text(word)])),
    ];
    leaf.prop_recursive(2, 16, 3, |inner| {
        (0..3usize, prop::collection::vec(inner, 1..4))
            .prop_map(|(kind, children)| wrap(kind, spaced(children)))
    })
    .prop_filter("nesting the markers cannot express", |span| {
        writable(span, &[])
    })
}

fn line_spans() -> impl Strategy<Value = Vec<Span>> {
    prop::collection::vec(span(), 1..4).prop_map(spaced)
}

fn block() -> impl Strategy<Value = Block> {
    prop_oneof![
        (1u8..=3, line_spans()).prop_map(|(level, content)| Block::Heading { level, content }),
        line_spans().prop_map(|content| Block::Paragraph { content }),
        words().prop_map(|text| Block::BulletItem { text }),
        (any::<bool>(), words()).prop_map(|(checked, text)| Block::CheckboxItem { checked, text }),
        (1u32..20, words()).prop_map(|(index, text)| Block::NumberedItem { index, text }),
        Just(Block::BlankLine),
    ]
}

fn document() -> impl Strategy<Value = Vec<Block>> {
    prop::collection::vec(block(), 1..12).prop_filter("needs a visible block", |blocks| {
        blocks.iter().any(|block| *block != Block::BlankLine)
    })
}

/// Numbered items interleaved with the siblings that write no text line.
fn numbered_run() -> impl Strategy<Value = Vec<Block>> {
    prop::collection::vec(
        prop_oneof![
            3 => (1u32..20, words()).prop_map(|(index, text)| Block::NumberedItem { index, text }),
            1 => Just(Block::BlankLine),
            1 => (1u8..=3).prop_map(|level| Block::heading(level, "")),
        ],
        1..10,
    )
}

fn tag() -> impl Strategy<Value = Tag> {
    prop_oneof![
        (1u8..=3).prop_map(Tag::Heading),
        Just(Tag::Paragraph),
        Just(Tag::Div),
        Just(Tag::Span),
        Just(Tag::Bold),
        Just(Tag::Italic),
        Just(Tag::Label),
        Just(Tag::Other("font".to_string())),
    ]
}

fn class() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(BULLET_ITEM.to_string()),
        Just(NUMBERED_ITEM.to_string()),
        Just(HEADING_PLACEHOLDER.to_string()),
        Just("highlight".to_string()),
    ]
}

/// Arbitrary trees as an editing surface might leave them.
fn messy_tree() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        "[a-z \u{a0}]{0,6}".prop_map(|text| Node::text(text)),
        Just(Node::from(Element::new(Tag::LineBreak))),
        any::<bool>().prop_map(|checked| Node::from(Element::new(Tag::Checkbox { checked }))),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        (
            tag(),
            prop::collection::vec(class(), 0..3),
            any::<bool>(),
            prop::collection::vec(inner, 0..5),
        )
            .prop_map(|(tag, classes, styled, children)| {
                let mut element = Element::new(tag).with_children(children);
                element.classes = classes;
                if styled {
                    element = element.with_attr("style", "color: red");
                }
                Node::from(element)
            })
    })
}

proptest! {
    #[test]
    fn canonical_tree_survives_round_trip(blocks in document()) {
        let canonical = normalize(render(&blocks));
        let markup = serialize(&canonical);
        let reparsed = normalize(render(&parse(&markup)));
        prop_assert_eq!(reparsed, canonical);
    }

    #[test]
    fn serializing_is_stable_across_cycles(blocks in document()) {
        let first = serialize(&normalize(render(&blocks)));
        let second = serialize(&normalize(render(&parse(&first))));
        prop_assert_eq!(second, first);
    }

    #[test]
    fn numbering_is_stable_around_blanks_and_placeholders(blocks in numbered_run()) {
        let first = serialize(&normalize(render(&blocks)));
        let second = serialize(&normalize(render(&parse(&first))));
        prop_assert_eq!(&second, &first);

        let numbers: Vec<&str> = first
            .lines()
            .filter_map(|line| line.split_once(". ").map(|(number, _)| number))
            .collect();
        let expected: Vec<String> = (1..=numbers.len()).map(|n| n.to_string()).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn normalize_is_idempotent(tree in messy_tree()) {
        let once = normalize(tree);
        prop_assert_eq!(normalize(once.clone()), once);
    }

    #[test]
    fn messy_trees_never_emit_bare_heading_markers(tree in messy_tree()) {
        let markup = serialize(&normalize(tree));
        prop_assert!(!markup.lines().any(|line| line.trim_end() == "#"
            || line.trim_end() == "##"
            || line.trim_end() == "###"));
    }

    #[test]
    fn combine_inverts_split(
        title in "([A-Za-z][A-Za-z ]{0,12})?",
        lines in prop::collection::vec(prop_oneof![words(), Just(String::new())], 0..6),
    ) {
        let persisted = codec::combine(&title, &lines.join("\n"));
        let parts = codec::split(&persisted);
        prop_assert_eq!(codec::combine(&parts.title, &parts.body), persisted);
    }

    #[test]
    fn placeholders_never_persist(
        blocks in document(),
        at in any::<prop::sample::Index>(),
        level in 1u8..=3,
    ) {
        let mut edited = blocks.clone();
        edited.insert(at.index(blocks.len() + 1), Block::heading(level, ""));
        let markup = serialize(&normalize(render(&edited)));
        let heading_lines = markup.lines().filter(|line| line.starts_with('#')).count();
        let headings = blocks
            .iter()
            .filter(|block| matches!(block, Block::Heading { .. }))
            .count();
        prop_assert_eq!(heading_lines, headings);
    }
}
