use std::borrow::Cow;

use crate::block::Block;
use crate::inline::parse_inline;

/// Marker-length pairs `(first, second)` of glued headings that get split,
/// longest first.
const GLUED_HEADING_PAIRS: [(usize, usize); 6] = [(3, 2), (2, 3), (2, 1), (1, 2), (1, 3), (3, 1)];

/// Parse note markup into a list of blocks, one per source line.
pub fn parse(markup: &str) -> Vec<Block> {
    if markup.is_empty() {
        return Vec::new();
    }

    let mut blocks = Vec::new();
    for raw in markup.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let line = unglue_headings(raw);
        for line in line.split('\n') {
            blocks.push(parse_line(line));
        }
    }

    log::debug!("parsed {} bytes into {} blocks", markup.len(), blocks.len());
    blocks
}

/// Classify a single line. Plain text is the catch-all, so every line yields
/// a block.
fn parse_line(line: &str) -> Block {
    if let Some((level, text)) = heading(line) {
        return Block::Heading {
            level,
            content: parse_inline(text),
        };
    }
    if let Some(text) = line
        .strip_prefix("- [x] ")
        .or_else(|| line.strip_prefix("- [X] "))
    {
        return Block::CheckboxItem {
            checked: true,
            text: text.to_string(),
        };
    }
    if let Some(text) = line.strip_prefix("- [ ] ") {
        return Block::CheckboxItem {
            checked: false,
            text: text.to_string(),
        };
    }
    if let Some(text) = line.strip_prefix("- ") {
        return Block::BulletItem {
            text: text.to_string(),
        };
    }
    if let Some((index, text)) = numbered(line) {
        return Block::NumberedItem {
            index,
            text: text.to_string(),
        };
    }
    if line.trim().is_empty() {
        return Block::BlankLine;
    }
    Block::Paragraph {
        content: parse_inline(line),
    }
}

/// `#`, `##` or `###`, optional whitespace, then text not starting with `#`.
/// A marker with nothing after it is not a heading.
fn heading(line: &str) -> Option<(u8, &str)> {
    let level = marker_len(line);
    if !(1..=3).contains(&level) {
        return None;
    }
    let text = line[level..].trim_start();
    if text.is_empty() || text.starts_with('#') {
        return None;
    }
    Some((level as u8, text))
}

fn numbered(line: &str) -> Option<(u32, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let text = line[digits..].strip_prefix(". ")?;
    let index = line[..digits].parse().ok()?;
    Some((index, text))
}

fn marker_len(s: &str) -> usize {
    s.bytes().take_while(|&b| b == b'#').count()
}

/// Split a line holding two glued heading markers, e.g. `###Sub##Main`, by
/// inserting a line break before the second marker. At most one split is
/// made per line.
fn unglue_headings(line: &str) -> Cow<'_, str> {
    let first = marker_len(line);
    if first == 0 {
        return Cow::Borrowed(line);
    }
    let Some(gap) = line[first..].find('#') else {
        return Cow::Borrowed(line);
    };
    if gap == 0 {
        return Cow::Borrowed(line);
    }

    let split_at = first + gap;
    let second = marker_len(&line[split_at..]);
    let tail = &line[split_at + second..];
    if tail.is_empty() || !GLUED_HEADING_PAIRS.contains(&(first, second)) {
        return Cow::Borrowed(line);
    }

    log::trace!("splitting glued headings in {:?}", line);
    Cow::Owned(format!("{}\n{}", &line[..split_at], &line[split_at..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Span;

    #[test]
    fn classifies_every_line_kind() {
        let blocks = parse("# Title\n## Sub\n### Small\n- [x] Done\n- [ ] Todo\n- item\n3. third\n\nplain");
        assert_eq!(
            blocks,
            vec![
                Block::heading(1, "Title"),
                Block::heading(2, "Sub"),
                Block::heading(3, "Small"),
                Block::CheckboxItem {
                    checked: true,
                    text: "Done".to_string()
                },
                Block::CheckboxItem {
                    checked: false,
                    text: "Todo".to_string()
                },
                Block::BulletItem {
                    text: "item".to_string()
                },
                Block::NumberedItem {
                    index: 3,
                    text: "third".to_string()
                },
                Block::BlankLine,
                Block::paragraph("plain"),
            ]
        );
    }

    #[test]
    fn empty_input_is_empty_document() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn blank_lines_are_kept() {
        assert_eq!(
            parse("a\n\n\nb\n"),
            vec![
                Block::paragraph("a"),
                Block::BlankLine,
                Block::BlankLine,
                Block::paragraph("b"),
                Block::BlankLine,
            ]
        );
        assert_eq!(parse("   "), vec![Block::BlankLine]);
    }

    #[test]
    fn glued_headings_are_split() {
        assert_eq!(
            parse("###Sub##Main"),
            vec![Block::heading(3, "Sub"), Block::heading(2, "Main")]
        );
        assert_eq!(
            parse("# Notes ## details"),
            vec![Block::heading(1, "Notes "), Block::heading(2, "details")]
        );
    }

    #[test]
    fn same_length_markers_are_not_split() {
        assert_eq!(parse("# C# basics"), vec![Block::heading(1, "C# basics")]);
        assert_eq!(parse("##a##b"), vec![Block::heading(2, "a##b")]);
    }

    #[test]
    fn glued_marker_without_text_is_not_split() {
        assert_eq!(parse("# Title ##"), vec![Block::heading(1, "Title ##")]);
    }

    #[test]
    fn only_one_split_per_line() {
        assert_eq!(
            parse("###A##B#C"),
            vec![Block::heading(3, "A"), Block::heading(2, "B#C")]
        );
    }

    #[test]
    fn malformed_markers_degrade_to_paragraphs() {
        assert_eq!(parse("#"), vec![Block::paragraph("#")]);
        assert_eq!(parse("#### deep"), vec![Block::paragraph("#### deep")]);
        assert_eq!(parse("-[x] tight"), vec![Block::paragraph("-[x] tight")]);
        assert_eq!(parse("3.no space"), vec![Block::paragraph("3.no space")]);
        assert_eq!(parse("-item"), vec![Block::paragraph("-item")]);
    }

    #[test]
    fn heading_text_cannot_start_with_a_marker() {
        assert_eq!(parse("# #x"), vec![Block::paragraph("# #x")]);
        assert_eq!(parse("## ## x"), vec![Block::paragraph("## ## x")]);
    }

    #[test]
    fn bracketed_bullet_without_space_stays_bullet() {
        assert_eq!(
            parse("- [x]done"),
            vec![Block::BulletItem {
                text: "[x]done".to_string()
            }]
        );
    }

    #[test]
    fn heading_and_paragraph_get_inline_spans() {
        assert_eq!(
            parse("## **Bold** title\nsome *soft* words"),
            vec![
                Block::Heading {
                    level: 2,
                    content: vec![Span::Bold(vec![Span::text("Bold")]), Span::text(" title")],
                },
                Block::Paragraph {
                    content: vec![
                        Span::text("some "),
                        Span::Italic(vec![Span::text("soft")]),
                        Span::text(" words"),
                    ],
                },
            ]
        );
    }

    #[test]
    fn list_text_is_kept_verbatim() {
        assert_eq!(
            parse("- **not** parsed"),
            vec![Block::BulletItem {
                text: "**not** parsed".to_string()
            }]
        );
    }

    #[test]
    fn checkbox_lines() {
        assert_eq!(
            parse("- [x] Done\n- [ ] Todo"),
            vec![
                Block::CheckboxItem {
                    checked: true,
                    text: "Done".to_string()
                },
                Block::CheckboxItem {
                    checked: false,
                    text: "Todo".to_string()
                },
            ]
        );
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(
            parse("- a\r\n- b"),
            vec![
                Block::BulletItem {
                    text: "a".to_string()
                },
                Block::BulletItem {
                    text: "b".to_string()
                },
            ]
        );
    }
}
