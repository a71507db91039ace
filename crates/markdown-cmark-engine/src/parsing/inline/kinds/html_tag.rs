//! Raw HTML recognised inline and at the start of HTML blocks.

use std::sync::LazyLock;

use regex::Regex;

const TAG_NAME: &str = r"[A-Za-z][A-Za-z0-9-]*";
const ATTRIBUTE_NAME: &str = r"[a-zA-Z_:][a-zA-Z0-9:._-]*";
const ATTRIBUTE_VALUE: &str = r#"(?:[^"'=<>`\x00-\x20]+|'[^']*'|"[^"]*")"#;

pub(crate) fn open_tag() -> String {
    format!(r"<{TAG_NAME}(?:\s+{ATTRIBUTE_NAME}(?:\s*=\s*{ATTRIBUTE_VALUE})?)*\s*/?>")
}

pub(crate) fn close_tag() -> String {
    format!(r"</{TAG_NAME}\s*>")
}

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    let comment = r"<!-->|<!--->|<!--(?s:.)*?-->";
    let processing = r"<\?(?s:.)*?\?>";
    let declaration = r"<![A-Za-z]+[^>]*>";
    let cdata = r"<!\[CDATA\[(?s:.)*?\]\]>";
    Regex::new(&format!(
        "^(?:{}|{}|{comment}|{processing}|{declaration}|{cdata})",
        open_tag(),
        close_tag()
    ))
    .expect("Invalid HTML tag regex")
});

/// Inline raw HTML (`<tag>`, `</tag>`, comments, processing instructions,
/// declarations and CDATA sections).
pub struct HtmlTag;

impl HtmlTag {
    pub const OPEN: u8 = b'<';

    /// Length of the raw HTML construct at the start of `s`.
    pub fn scan(s: &str) -> Option<usize> {
        HTML_TAG.find(s).map(|m| m.end())
    }

    /// Constructs that run until a fixed terminator: CDATA, comments,
    /// processing instructions and declarations. Returns the kind and the
    /// length of the opening that precedes the terminator search.
    fn terminated_kind(s: &str) -> Option<(usize, usize)> {
        if s.starts_with("<![CDATA[") {
            Some((0, 9))
        } else if s.starts_with("<!--") {
            Some((1, 4))
        } else if s.starts_with("<?") {
            Some((2, 2))
        } else if s.starts_with("<!") && s.as_bytes().get(2).is_some_and(u8::is_ascii_alphabetic) {
            Some((3, 2))
        } else {
            None
        }
    }
}

/// [`HtmlTag::scan`] over one subject, remembering terminated constructs
/// whose terminator is missing from some offset on. Later openers of the
/// same kind past that offset fail without scanning to the end again.
#[derive(Debug, Default)]
pub struct HtmlScanner {
    unterminated_from: [Option<usize>; 4],
}

impl HtmlScanner {
    /// Scans `s`, which starts at byte `pos` of the subject.
    pub fn scan(&mut self, s: &str, pos: usize) -> Option<usize> {
        let kind = HtmlTag::terminated_kind(s);
        if let Some((kind, _)) = kind {
            if self.unterminated_from[kind].is_some_and(|from| from <= pos) {
                return None;
            }
        }
        let found = HtmlTag::scan(s);
        if let (None, Some((kind, opening))) = (found, kind) {
            self.unterminated_from[kind] = Some(pos + opening);
        }
        found
    }
}
