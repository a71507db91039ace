use super::kinds::IndentedCode;

/// Position facts about the line currently being incorporated.
///
/// `offset` is a byte index into the line and `column` the matching visual
/// column with tabs expanded to multiples of 4. Container prefixes are
/// consumed by advancing the scanner; a tab can be consumed partially when
/// only some of its columns belong to a prefix.
#[derive(Debug, Default, Clone)]
pub struct LineScanner {
    pub line: String,
    pub offset: usize,
    pub column: usize,
    pub next_nonspace: usize,
    pub next_nonspace_column: usize,
    /// Columns between `column` and the first non-space character.
    pub indent: usize,
    pub indented: bool,
    /// Nothing but spaces and tabs left on the line.
    pub blank: bool,
    pub partially_consumed_tab: bool,
}

impl LineScanner {
    /// Starts scanning a new line (without its line ending).
    pub fn reset(&mut self, line: &str) {
        self.line.clear();
        if line.contains('\0') {
            self.line.push_str(&line.replace('\0', "\u{FFFD}"));
        } else {
            self.line.push_str(line);
        }
        self.offset = 0;
        self.column = 0;
        self.blank = false;
        self.partially_consumed_tab = false;
        self.find_next_nonspace();
    }

    pub fn byte_at(&self, idx: usize) -> Option<u8> {
        self.line.as_bytes().get(idx).copied()
    }

    /// The line from the first non-space character on.
    pub fn rest_from_nonspace(&self) -> &str {
        self.line.get(self.next_nonspace..).unwrap_or_default()
    }

    pub fn rest(&self) -> &str {
        self.line.get(self.offset..).unwrap_or_default()
    }

    pub fn find_next_nonspace(&mut self) {
        let bytes = self.line.as_bytes();
        let mut i = self.offset;
        let mut cols = self.column;
        while let Some(&c) = bytes.get(i) {
            match c {
                b' ' => {
                    i += 1;
                    cols += 1;
                }
                b'\t' => {
                    i += 1;
                    cols += 4 - (cols % 4);
                }
                _ => break,
            }
        }
        self.blank = i >= bytes.len();
        self.next_nonspace = i;
        self.next_nonspace_column = cols;
        self.indent = cols - self.column;
        self.indented = self.indent >= IndentedCode::INDENT;
    }

    /// Advances by `count` bytes, or by `count` columns when `columns` is
    /// set, in which case a tab may be left partially consumed.
    pub fn advance_offset(&mut self, mut count: usize, columns: bool) {
        while count > 0 {
            let Some(c) = self.byte_at(self.offset) else {
                break;
            };
            if c == b'\t' {
                let chars_to_tab = 4 - (self.column % 4);
                if columns {
                    self.partially_consumed_tab = chars_to_tab > count;
                    let advance = chars_to_tab.min(count);
                    self.column += advance;
                    if !self.partially_consumed_tab {
                        self.offset += 1;
                    }
                    count -= advance;
                } else {
                    self.partially_consumed_tab = false;
                    self.column += chars_to_tab;
                    self.offset += 1;
                    count -= 1;
                }
            } else {
                self.partially_consumed_tab = false;
                self.offset += 1;
                self.column += 1;
                count -= 1;
            }
        }
    }

    pub fn advance_next_nonspace(&mut self) {
        self.offset = self.next_nonspace;
        self.column = self.next_nonspace_column;
        self.partially_consumed_tab = false;
    }

    /// Moves past the rest of the line.
    pub fn advance_to_end(&mut self) {
        let remaining = self.line.len().saturating_sub(self.offset);
        self.advance_offset(remaining, false);
    }

    pub fn is_space_or_tab_at(&self, idx: usize) -> bool {
        matches!(self.byte_at(idx), Some(b' ') | Some(b'\t'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(line: &str) -> LineScanner {
        let mut s = LineScanner::default();
        s.reset(line);
        s
    }

    #[test]
    fn plain_line() {
        let s = scan("hello");
        assert_eq!(s.next_nonspace, 0);
        assert_eq!(s.indent, 0);
        assert!(!s.blank);
        assert!(!s.indented);
    }

    #[test]
    fn blank_line() {
        assert!(scan("").blank);
        assert!(scan("  \t ").blank);
    }

    #[test]
    fn tabs_expand_to_four_columns() {
        let s = scan(" \tfoo");
        assert_eq!(s.next_nonspace, 2);
        assert_eq!(s.next_nonspace_column, 4);
        assert!(s.indented);
    }

    #[test]
    fn partially_consumed_tab() {
        let mut s = scan("-\tfoo");
        s.advance_offset(1, true);
        assert_eq!((s.offset, s.column), (1, 1));
        // the tab spans columns 1..4; consuming one column leaves it partial
        s.advance_offset(1, true);
        assert!(s.partially_consumed_tab);
        assert_eq!((s.offset, s.column), (1, 2));
        s.advance_offset(2, true);
        assert!(!s.partially_consumed_tab);
        assert_eq!((s.offset, s.column), (2, 4));
    }

    #[test]
    fn nul_is_replaced() {
        assert_eq!(scan("a\0b").line, "a\u{FFFD}b");
    }

    #[test]
    fn advance_to_end_stops_at_line_end() {
        let mut s = scan("abc");
        s.advance_offset(1, false);
        s.advance_to_end();
        assert_eq!(s.offset, 3);
        assert_eq!(s.rest(), "");
    }
}
