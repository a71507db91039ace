/// A byte cursor over inline content.
///
/// Positions are byte offsets into `s`. Every syntax character the inline
/// grammar cares about is ASCII, so the cursor only ever stops on char
/// boundaries as long as multi-byte characters are consumed whole.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being parsed.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.s.as_bytes().get(self.i + n).copied()
    }

    /// The character starting at the cursor.
    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character ending just before the cursor.
    pub fn prev_char(&self) -> Option<char> {
        self.s.get(..self.i)?.chars().next_back()
    }

    pub fn rest(&self) -> &'a str {
        self.s.get(self.i..).unwrap_or_default()
    }

    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s
            .as_bytes()
            .get(self.i..)
            .is_some_and(|rest| rest.starts_with(pat))
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Advances past one whole character.
    pub fn bump_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Skips spaces (not tabs or newlines).
    pub fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.i += 1;
        }
    }

    /// Skips spaces and tabs, at most one newline, then spaces and tabs again.
    pub fn spnl(&mut self) {
        let space = |b| b == b' ' || b == b'\t';
        while self.peek().is_some_and(space) {
            self.i += 1;
        }
        if self.peek() == Some(b'\n') {
            self.i += 1;
            while self.peek().is_some_and(space) {
                self.i += 1;
            }
        }
    }
}
