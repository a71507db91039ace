/// Fenced code block delimiters.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICK: u8 = b'`';
    pub const TILDE: u8 = b'~';
    pub const MIN_LEN: usize = 3;

    /// Scans an opening fence: at least three backticks or tildes. A
    /// backtick fence may not be followed by an info string containing a
    /// backtick. Returns `(fence char, fence length)`.
    pub fn scan_opening(rest: &str) -> Option<(u8, usize)> {
        let b = rest.as_bytes();
        let ch = *b.first()?;
        if ch != Self::BACKTICK && ch != Self::TILDE {
            return None;
        }
        let len = b.iter().take_while(|&&c| c == ch).count();
        if len < Self::MIN_LEN {
            return None;
        }
        if ch == Self::BACKTICK && b[len..].contains(&Self::BACKTICK) {
            return None;
        }
        Some((ch, len))
    }

    /// Scans a closing fence of `ch` at least `min_len` long, followed only
    /// by spaces or tabs. Returns the fence length.
    pub fn scan_closing(rest: &str, ch: u8, min_len: usize) -> Option<usize> {
        let b = rest.as_bytes();
        let len = b.iter().take_while(|&&c| c == ch).count();
        if len < min_len.max(Self::MIN_LEN) {
            return None;
        }
        b[len..]
            .iter()
            .all(|&c| c == b' ' || c == b'\t')
            .then_some(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_backtick_fence() {
        assert_eq!(CodeFence::scan_opening("```rust"), Some((b'`', 3)));
    }

    #[test]
    fn detect_tilde_fence() {
        assert_eq!(CodeFence::scan_opening("~~~~"), Some((b'~', 4)));
    }

    #[test]
    fn no_fence() {
        assert_eq!(CodeFence::scan_opening("hello"), None);
        assert_eq!(CodeFence::scan_opening("``"), None);
    }

    #[test]
    fn backtick_info_may_not_contain_backticks() {
        assert_eq!(CodeFence::scan_opening("``` aa `"), None);
        assert_eq!(CodeFence::scan_opening("~~~ aa ``` ~~~"), Some((b'~', 3)));
    }

    #[test]
    fn closes_matching_fence() {
        assert_eq!(CodeFence::scan_closing("```", b'`', 3), Some(3));
        assert_eq!(CodeFence::scan_closing("~~~~~  ", b'~', 4), Some(5));
    }

    #[test]
    fn does_not_close_mismatched_fence() {
        assert_eq!(CodeFence::scan_closing("~~~", b'`', 3), None);
        assert_eq!(CodeFence::scan_closing("```", b'`', 4), None);
        assert_eq!(CodeFence::scan_closing("``` x", b'`', 3), None);
    }
}
