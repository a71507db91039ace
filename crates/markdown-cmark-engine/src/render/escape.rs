//! Escaping shared by the renderers.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left alone in link destinations, as `encodeURI` does.
const HREF_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b',')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Escapes `&`, `<`, `>` and `"` for HTML and XML text and attributes.
pub fn escape_html(s: &str, out: &mut String) {
    html_escape::encode_double_quoted_attribute_to_string(s, out);
}

/// Percent-encodes a link destination. Existing `%XX` escapes are kept;
/// any other `%` is encoded.
pub fn encode_href(url: &str) -> String {
    let bytes = url.as_bytes();
    let mut out = String::with_capacity(url.len());
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let is_escape = bytes[i] == b'%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
        if is_escape {
            out.extend(utf8_percent_encode(&url[start..i], HREF_SAFE));
            out.push_str(&url[i..i + 3]);
            i += 3;
            start = i;
        } else {
            i += 1;
        }
    }
    out.extend(utf8_percent_encode(&url[start..], HREF_SAFE));
    out
}

/// Escapes a destination for use inside an `href` or `src` attribute.
pub fn escape_href(url: &str, out: &mut String) {
    escape_html(&encode_href(url), out);
}
