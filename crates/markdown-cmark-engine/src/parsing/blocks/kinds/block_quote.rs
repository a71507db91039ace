/// Block quote container with its owned marker.
pub struct BlockQuote;

impl BlockQuote {
    /// The block quote marker character.
    pub const MARKER: u8 = b'>';

    /// Whether `rest` (a line remainder starting at the first non-space
    /// character) opens or continues a block quote.
    pub fn starts(rest: &str) -> bool {
        rest.as_bytes().first() == Some(&Self::MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_at_start() {
        assert!(BlockQuote::starts("> hello"));
        assert!(BlockQuote::starts(">"));
    }

    #[test]
    fn no_marker() {
        assert!(!BlockQuote::starts("hello > there"));
        assert!(!BlockQuote::starts(""));
    }
}
