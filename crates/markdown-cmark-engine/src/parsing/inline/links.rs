//! Link component scanners shared by inline links and reference definitions.
//!
//! Each scanner starts at the cursor, advances past what it recognised and
//! leaves the cursor untouched when it fails.

use std::sync::LazyLock;

use regex::Regex;

use super::cursor::Cursor;
use super::kinds::entity::{is_escapable, unescape_string};

/// Longest label content, in characters.
pub const MAX_LABEL_LEN: usize = 999;

/// Deepest parenthesis nesting accepted in a bare destination. Bounds the
/// scan so unclosed `](` sequences cost constant work each.
pub const MAX_DESTINATION_PARENS: usize = 32;

static LINK_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?s:"(?:\\.|[^"\\\x00])*"|'(?:\\.|[^'\\\x00])*'|\((?:\\.|[^()\\\x00])*\))"#,
    )
    .expect("Invalid link title regex")
});

/// Scans a link label (`[...]`), returning it with its brackets.
pub fn scan_link_label<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    let rest = cur.rest();
    let bytes = rest.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let mut i = 1;
    let mut chars = 0;
    loop {
        match *bytes.get(i)? {
            b']' => break,
            b'[' => return None,
            b'\\' => {
                i += 1;
                chars += 1;
                if let Some(c) = rest.get(i..).and_then(|r| r.chars().next()) {
                    i += c.len_utf8();
                    chars += 1;
                }
            }
            _ => {
                let c = rest.get(i..)?.chars().next()?;
                i += c.len_utf8();
                chars += 1;
            }
        }
        if chars > MAX_LABEL_LEN {
            return None;
        }
    }
    let label = &rest[..=i];
    cur.bump_n(label.len());
    Some(label)
}

/// Scans a link destination, returning it with escapes and entities resolved.
/// An empty destination is only accepted in pointy brackets or right before
/// a closing paren.
pub fn scan_link_destination(cur: &mut Cursor<'_>) -> Option<String> {
    let rest = cur.rest();
    let bytes = rest.as_bytes();
    if bytes.first() == Some(&b'<') {
        let mut i = 1;
        loop {
            match *bytes.get(i)? {
                b'>' => break,
                b'<' | b'\n' => return None,
                b'\\' if bytes.get(i + 1).is_some_and(|&b| is_escapable(b)) => i += 2,
                _ => i += 1,
            }
        }
        cur.bump_n(i + 1);
        return Some(unescape_string(&rest[1..i]).into_owned());
    }

    let mut i = 0;
    let mut open_parens = 0usize;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'\\' if bytes.get(i + 1).is_some_and(|&b| is_escapable(b)) => i += 2,
            b'(' => {
                open_parens += 1;
                if open_parens > MAX_DESTINATION_PARENS {
                    return None;
                }
                i += 1;
            }
            b')' if open_parens == 0 => break,
            b')' => {
                open_parens -= 1;
                i += 1;
            }
            b if b.is_ascii_whitespace() || b.is_ascii_control() => break,
            _ => i += 1,
        }
    }
    if (i == 0 && bytes.first() != Some(&b')')) || open_parens != 0 {
        return None;
    }
    cur.bump_n(i);
    Some(unescape_string(&rest[..i]).into_owned())
}

/// Scans a quoted or parenthesized title, returning its unescaped content.
pub fn scan_link_title(cur: &mut Cursor<'_>) -> Option<String> {
    let m = LINK_TITLE.find(cur.rest())?;
    let inner = &m.as_str()[1..m.len() - 1];
    let title = unescape_string(inner).into_owned();
    cur.bump_n(m.end());
    Some(title)
}

/// Case-folds a label and collapses its internal whitespace so that
/// equivalent labels compare equal. Brackets are stripped when present.
pub fn normalize_label(label: &str) -> String {
    let inner = label
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .unwrap_or(label);
    let is_space = |c: char| matches!(c, ' ' | '\t' | '\r' | '\n');
    let collapsed = inner
        .split(is_space)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    collapsed.to_lowercase().to_uppercase()
}
