/// Paragraph block type (marker struct).
///
/// Paragraphs have no delimiters. They are the default leaf block when no
/// other block opener matches, accept lazy continuation lines, and are the
/// only block that can be turned into a setext header or hold link
/// reference definitions at its start.
pub struct Paragraph;

impl Paragraph {
    /// A line that is blank after stripping container prefixes ends a paragraph.
    pub fn continues(blank: bool) -> bool {
        !blank
    }

    /// Whether content left after removing reference definitions is empty.
    pub fn is_empty_content(content: &str) -> bool {
        content
            .bytes()
            .all(|c| matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c))
    }
}
