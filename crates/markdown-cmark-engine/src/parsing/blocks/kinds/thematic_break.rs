/// Thematic break (`***`, `---`, `___`).
pub struct ThematicBreak;

impl ThematicBreak {
    pub const MARKERS: [u8; 3] = [b'*', b'-', b'_'];

    /// Three or more matching markers, optionally separated by spaces or
    /// tabs, and nothing else.
    pub fn matches(rest: &str) -> bool {
        let b = rest.as_bytes();
        let Some(&ch) = b.first() else {
            return false;
        };
        if !Self::MARKERS.contains(&ch) {
            return false;
        }
        let mut count = 0;
        for &c in b {
            if c == ch {
                count += 1;
            } else if c != b' ' && c != b'\t' {
                return false;
            }
        }
        count >= 3
    }
}
