/// Setext underline (`===` or `---`) below a paragraph.
pub struct SetextHeading;

impl SetextHeading {
    pub const LEVEL1: u8 = b'=';
    pub const LEVEL2: u8 = b'-';

    /// Header level produced by an underline line, if `rest` is one.
    pub fn level(rest: &str) -> Option<u8> {
        let b = rest.as_bytes();
        let ch = *b.first()?;
        let level = match ch {
            Self::LEVEL1 => 1,
            Self::LEVEL2 => 2,
            _ => return None,
        };
        let run = b.iter().take_while(|&&c| c == ch).count();
        b[run..]
            .iter()
            .all(|&c| c == b' ' || c == b'\t')
            .then_some(level)
    }
}
