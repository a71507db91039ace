use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::inline::kinds::html_tag::{close_tag, open_tag};

static START_CONDITIONS: LazyLock<[Regex; 7]> = LazyLock::new(|| {
    let block_tags = "address|article|aside|base|basefont|blockquote|body|caption|center|col\
|colgroup|dd|details|dialog|dir|div|dl|dt|fieldset|figcaption|figure|footer|form|frame\
|frameset|h[123456]|head|header|hr|html|iframe|legend|li|link|main|menu|menuitem|nav\
|noframes|ol|optgroup|option|p|param|search|section|summary|table|tbody|td|tfoot|th|thead\
|title|tr|track|ul";
    [
        r"(?i)^<(?:script|pre|textarea|style)(?:\s|>|$)".to_string(),
        r"^<!--".to_string(),
        r"^<\?".to_string(),
        r"^<![A-Za-z]".to_string(),
        r"^<!\[CDATA\[".to_string(),
        format!(r"(?i)^</?(?:{block_tags})(?:\s|/?>|$)"),
        format!(r"(?i)^(?:{}|{})\s*$", open_tag(), close_tag()),
    ]
    .map(|pattern| Regex::new(&pattern).expect("Invalid HTML block start regex"))
});

static END_CONDITIONS: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        r"(?i)</(?:script|pre|textarea|style)>",
        r"-->",
        r"\?>",
        r">",
        r"\]\]>",
    ]
    .map(|pattern| Regex::new(pattern).expect("Invalid HTML block end regex"))
});

/// HTML block with its seven start conditions.
pub struct HtmlBlock;

impl HtmlBlock {
    /// Condition 7 (any complete tag on its own line) cannot interrupt a paragraph.
    pub const NON_INTERRUPTING: u8 = 7;

    /// Start condition (1..=7) matched by `rest`, trying them in order.
    pub fn start_condition(rest: &str, interrupts_paragraph: bool) -> Option<u8> {
        if rest.as_bytes().first() != Some(&b'<') {
            return None;
        }
        START_CONDITIONS
            .iter()
            .zip(1u8..)
            .find(|(re, kind)| {
                (*kind < Self::NON_INTERRUPTING || !interrupts_paragraph)
                    && re.is_match(rest)
            })
            .map(|(_, kind)| kind)
    }

    /// Whether `line` satisfies the end condition of a block of `kind`.
    /// Kinds 6 and 7 end at a blank line instead.
    pub fn ends(kind: u8, line: &str) -> bool {
        match kind {
            1..=5 => END_CONDITIONS[usize::from(kind) - 1].is_match(line),
            _ => false,
        }
    }

    /// Whether a blank line closes a block of `kind`.
    pub fn ends_at_blank(kind: u8) -> bool {
        kind == 6 || kind == 7
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<script type=\"x\">", 1)]
    #[case("<PRE>", 1)]
    #[case("<!-- c", 2)]
    #[case("<?php", 3)]
    #[case("<!DOCTYPE html>", 4)]
    #[case("<![CDATA[", 5)]
    #[case("<div>", 6)]
    #[case("</TABLE>", 6)]
    #[case("<table", 6)]
    #[case("<a href=\"foo\">", 7)]
    #[case("</ins>  ", 7)]
    fn start_conditions(#[case] line: &str, #[case] kind: u8) {
        assert_eq!(HtmlBlock::start_condition(line, false), Some(kind));
    }

    #[test]
    fn condition_seven_needs_a_lone_tag() {
        assert_eq!(HtmlBlock::start_condition("<a href=\"foo\">bar", false), None);
        assert_eq!(HtmlBlock::start_condition("<a>", true), None);
        assert_eq!(HtmlBlock::start_condition("<div>", true), Some(6));
    }

    #[test]
    fn end_conditions() {
        assert!(HtmlBlock::ends(1, "x </script> y"));
        assert!(HtmlBlock::ends(2, "-->"));
        assert!(HtmlBlock::ends(3, "?>"));
        assert!(HtmlBlock::ends(4, ">"));
        assert!(HtmlBlock::ends(5, "]]>"));
        assert!(!HtmlBlock::ends(2, "->"));
        assert!(!HtmlBlock::ends(6, "</div>"));
        assert!(HtmlBlock::ends_at_blank(6) && HtmlBlock::ends_at_blank(7));
    }
}
