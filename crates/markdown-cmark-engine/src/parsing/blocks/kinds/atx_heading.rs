/// ATX (`#`-prefixed) header.
pub struct AtxHeading;

impl AtxHeading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// Scans an opening sequence of 1-6 `#` followed by a space, tab or the
    /// end of the line. Returns `(level, bytes consumed)` where the consumed
    /// bytes include the trailing spaces and tabs.
    pub fn scan(rest: &str) -> Option<(u8, usize)> {
        let b = rest.as_bytes();
        let level = b.iter().take_while(|&&c| c == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let spaces = b[level..]
            .iter()
            .take_while(|&&c| c == b' ' || c == b'\t')
            .count();
        if spaces == 0 && level < b.len() {
            return None;
        }
        Some((level as u8, level + spaces))
    }

    /// Removes an optional closing sequence of `#`s from the header content.
    /// The closing sequence must be preceded by a space or tab, or make up
    /// the whole content.
    pub fn strip_closing(content: &str) -> &str {
        let trimmed = content.trim_end_matches([' ', '\t']);
        let without_hashes = trimmed.trim_end_matches(Self::MARKER as char);
        if without_hashes.len() == trimmed.len() {
            return trimmed;
        }
        if without_hashes.is_empty() {
            return "";
        }
        if without_hashes.ends_with([' ', '\t']) {
            without_hashes.trim_end_matches([' ', '\t'])
        } else {
            trimmed
        }
    }
}
