/// Indented code block.
pub struct IndentedCode;

impl IndentedCode {
    /// Columns of indentation that turn a line into code.
    pub const INDENT: usize = 4;

    /// Drops trailing blank lines from accumulated content. Returns the
    /// literal (newline terminated) and the number of lines kept.
    pub fn literal(content: &str) -> (String, usize) {
        let mut lines: Vec<&str> = content.split('\n').collect();
        while lines
            .last()
            .is_some_and(|l| l.bytes().all(|c| c == b' ' || c == b'\t'))
        {
            lines.pop();
        }
        let kept = lines.len();
        let mut literal = lines.join("\n");
        literal.push('\n');
        (literal, kept)
    }
}
