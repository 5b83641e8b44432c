//! Inline span rules of the dialect: `**bold**`, `*italic*`, `__underline__`.
//!
//! Spans nest by plain wrapping only. An opener without a matching closer, or
//! a pair with nothing between them, stays literal text.

use crate::block::Span;

/// Parse inline markers in a single line of text.
pub fn parse_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if let Some((span, consumed)) = match_span(rest) {
            if !literal.is_empty() {
                spans.push(Span::Text(std::mem::take(&mut literal)));
            }
            spans.push(span);
            rest = &rest[consumed..];
        } else {
            literal.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }

    if !literal.is_empty() {
        spans.push(Span::Text(literal));
    }
    spans
}

/// Write spans back as dialect markers.
pub fn spans_to_markup(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        let (delimiter, inner) = match span {
            Span::Text(text) => {
                out.push_str(text);
                continue;
            }
            Span::Bold(inner) => ("**", inner),
            Span::Italic(inner) => ("*", inner),
            Span::Underline(inner) => ("__", inner),
        };
        out.push_str(delimiter);
        out.push_str(&spans_to_markup(inner));
        out.push_str(delimiter);
    }
    out
}

/// Match a formatted span at the start of `s`, returning it and the number of
/// bytes it covers.
///
/// A `***` opener is bold around italic unless the first star run inside it
/// is `**`, which closes a bold nested in an italic (`***a** b*`).
fn match_span(s: &str) -> Option<(Span, usize)> {
    if let Some(after) = s.strip_prefix("***") {
        if first_star_run(after) == 2 {
            if let Some(found) = match_italic(s) {
                return Some(found);
            }
        }
    }
    match_bold(s)
        .or_else(|| match_underline(s))
        .or_else(|| match_italic(s))
}

fn match_bold(s: &str) -> Option<(Span, usize)> {
    let after = s.strip_prefix("**")?;
    let mut end = find_closing(after, "**")?;
    // `**a *b***`: the italic inside closes on the first star of the run.
    let run = star_run(&after[end..]);
    if run > 2 && has_open_italic(&after[..end]) {
        end += run - 2;
    }
    Some((Span::Bold(parse_inline(&after[..end])), end + 4))
}

fn match_underline(s: &str) -> Option<(Span, usize)> {
    let after = s.strip_prefix("__")?;
    let end = find_closing(after, "__")?;
    Some((Span::Underline(parse_inline(&after[..end])), end + 4))
}

fn match_italic(s: &str) -> Option<(Span, usize)> {
    let after = s.strip_prefix('*')?;
    let end = find_single_star(after)?;
    Some((Span::Italic(parse_inline(&after[..end])), end + 2))
}

fn star_run(s: &str) -> usize {
    s.bytes().take_while(|&b| b == b'*').count()
}

/// Length of the first run of `*` in `s`, or 0 if there is none.
fn first_star_run(s: &str) -> usize {
    s.find('*').map_or(0, |start| star_run(&s[start..]))
}

/// Whether `s` leaves a single-star italic open: an odd number of star runs
/// of odd length.
fn has_open_italic(s: &str) -> bool {
    let mut open = false;
    let mut rest = s;
    while let Some(start) = rest.find('*') {
        let run = star_run(&rest[start..]);
        if run % 2 == 1 {
            open = !open;
        }
        rest = &rest[start + run..];
    }
    open
}

/// First closing delimiter that leaves a non-empty inner text.
fn find_closing(after: &str, delimiter: &str) -> Option<usize> {
    after
        .match_indices(delimiter)
        .map(|(idx, _)| idx)
        .find(|&idx| idx > 0)
}

/// Closing `*` for an italic span, stepping over `**bold**` runs inside it.
fn find_single_star(after: &str) -> Option<usize> {
    let bytes = after.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'*' {
            if bytes.get(i + 1) == Some(&b'*') {
                if let Some(end) = find_closing(&after[i + 2..], "**") {
                    i += end + 4;
                    continue;
                }
            }
            return (i > 0).then_some(i);
        }
        i += 1;
    }
    None
}
