//! Title/body convention: a note's title is persisted as a level-1 heading on
//! the first line, followed by one blank line and the body.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleBody {
    pub title: String,
    pub body: String,
}

/// Split a persisted note into title and body.
///
/// Only a first line of the form `# <title>` is treated as a title. Anything
/// else leaves the title empty and the whole input as body.
pub fn split(persisted: &str) -> TitleBody {
    let (first, rest) = match persisted.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (persisted, ""),
    };
    let first = first.strip_suffix('\r').unwrap_or(first);

    match first.strip_prefix("# ") {
        Some(title) if !title.is_empty() => TitleBody {
            title: title.to_string(),
            body: strip_leading_blank_lines(rest).to_string(),
        },
        _ => TitleBody {
            title: String::new(),
            body: persisted.to_string(),
        },
    }
}

/// Combine a title and body into the canonical persisted form.
pub fn combine(title: &str, body: &str) -> String {
    let title = title.trim();
    let body = body.trim();

    match (title.is_empty(), body.is_empty()) {
        (true, true) => String::new(),
        (true, false) => body.to_string(),
        (false, true) => format!("# {title}"),
        (false, false) => format!("# {title}\n\n{body}"),
    }
}

fn strip_leading_blank_lines(text: &str) -> &str {
    let mut rest = text;
    while let Some((line, tail)) = rest.split_once('\n') {
        if !line.trim().is_empty() {
            break;
        }
        rest = tail;
    }
    if rest.trim().is_empty() { "" } else { rest }
}
