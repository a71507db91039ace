use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::entity_pairs;

const ENTITY: &str = r"&(?:#[xX][a-fA-F0-9]{1,6}|#[0-9]{1,7}|[a-zA-Z][a-zA-Z0-9]{1,31});";

static ENTITY_AT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{ENTITY}")).expect("Invalid entity regex"));

static ESCAPE_OR_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\\[!-/:-@\[-`{{-~]|{ENTITY}")).expect("Invalid unescape regex")
});

/// HTML entity and numeric character references.
pub struct Entity;

impl Entity {
    pub const OPEN: u8 = b'&';

    /// Scans an entity at the start of `s`. Returns the bytes consumed and
    /// the decoded text.
    pub fn scan(s: &str) -> Option<(usize, String)> {
        let m = ENTITY_AT_START.find(s)?;
        Some((m.end(), decode(m.as_str())))
    }
}

/// Decodes one complete entity (`&...;`). Unknown names are kept verbatim;
/// invalid or zero code points become U+FFFD.
pub fn decode(entity: &str) -> String {
    let body = &entity[1..entity.len() - 1];
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => num.parse::<u32>(),
        };
        let ch = code
            .ok()
            .filter(|&c| c != 0)
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return ch.to_string();
    }
    if let Some(pair) = entity_pairs::lookup(body) {
        return pair.to_string();
    }
    html_escape::decode_html_entities(entity).into_owned()
}

/// Whether `b` may be backslash-escaped.
pub fn is_escapable(b: u8) -> bool {
    b.is_ascii_punctuation()
}

/// Resolves backslash escapes and entities, as in link destinations,
/// titles and info strings.
pub fn unescape_string(s: &str) -> Cow<'_, str> {
    if !s.contains(['\\', '&']) {
        return Cow::Borrowed(s);
    }
    ESCAPE_OR_ENTITY.replace_all(s, |caps: &Captures| {
        let m = &caps[0];
        match m.strip_prefix('\\') {
            Some(escaped) => escaped.to_string(),
            None => decode(m),
        }
    })
}
