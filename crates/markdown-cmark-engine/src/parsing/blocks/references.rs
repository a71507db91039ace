use std::collections::HashMap;

use crate::parsing::inline::cursor::Cursor;
use crate::parsing::inline::links::{
    normalize_label, scan_link_destination, scan_link_label, scan_link_title,
};

/// Target of a link reference definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub url: String,
    pub title: String,
}

/// Link reference definitions collected while parsing a document, keyed by
/// normalized label. The first definition of a label wins.
#[derive(Debug, Default, Clone)]
pub struct RefMap {
    refs: HashMap<String, LinkRef>,
}

impl RefMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a raw label (brackets optional).
    pub fn get(&self, label: &str) -> Option<&LinkRef> {
        self.refs.get(&normalize_label(label))
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    fn insert(&mut self, label: String, link: LinkRef) {
        self.refs.entry(label).or_insert(link);
    }
}

/// Parses one reference definition at the start of `s` and records it.
/// Returns the bytes consumed, or 0 if `s` does not start with a definition.
pub fn parse_reference(s: &str, refmap: &mut RefMap) -> usize {
    let mut cur = Cursor::new(s);
    let Some(raw_label) = scan_link_label(&mut cur) else {
        return 0;
    };
    if cur.peek() != Some(b':') {
        return 0;
    }
    cur.bump();
    cur.spnl();

    let Some(url) = scan_link_destination(&mut cur) else {
        return 0;
    };

    let before_title = cur.pos();
    cur.spnl();
    let mut title = None;
    if cur.pos() != before_title {
        title = scan_link_title(&mut cur);
    }
    if title.is_none() {
        cur.i = before_title;
    }

    if !skip_line_end(&mut cur) {
        if title.is_none() {
            return 0;
        }
        // a title followed by junk is not a title; retry without it
        title = None;
        cur.i = before_title;
        if !skip_line_end(&mut cur) {
            return 0;
        }
    }

    let label = normalize_label(raw_label);
    if label.is_empty() {
        return 0;
    }
    refmap.insert(
        label,
        LinkRef {
            url,
            title: title.unwrap_or_default(),
        },
    );
    cur.pos()
}

/// Consumes trailing spaces and tabs plus a newline, if that is all that is
/// left of the line.
fn skip_line_end(cur: &mut Cursor<'_>) -> bool {
    let start = cur.pos();
    while matches!(cur.peek(), Some(b' ') | Some(b'\t')) {
        cur.bump();
    }
    match cur.peek() {
        None => true,
        Some(b'\n') => {
            cur.bump();
            true
        }
        _ => {
            cur.i = start;
            false
        }
    }
}
