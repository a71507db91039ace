use crate::parsing::blocks::RefMap;
use crate::tree::{NodeId, NodeLink, NodeValue, Tree};

use super::{
    cursor::Cursor,
    delimiters::{Bracket, Delimiter, flanking},
    kinds::{Autolink, BacktickRuns, CodeSpan, Entity, HtmlScanner, entity::is_escapable},
    links::{scan_link_destination, scan_link_label, scan_link_title},
};

/// Parses the raw content of a paragraph or header into inline children of
/// `block`.
///
/// Content is trimmed first. Adjacent text produced along the way is merged
/// and empty text nodes are dropped before returning.
pub fn parse_inlines(tree: &mut Tree, block: NodeId, content: &str, refmap: &RefMap) {
    let subject = content.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let mut parser = InlineParser {
        tree: &mut *tree,
        block,
        cur: Cursor::new(subject),
        refmap,
        delimiters: Vec::new(),
        brackets: Vec::new(),
        link_floor: 0,
        backtick_runs: BacktickRuns::default(),
        html: HtmlScanner::default(),
    };
    while parser.parse_inline() {}
    parser.process_emphasis(0);

    if let Err(err) = tree.consolidate_text_nodes(block) {
        log::warn!("inline text consolidation failed: {err}");
    }
    tree.drop_empty_text(block);
}

/// Inline parsing state for one block.
pub struct InlineParser<'a> {
    pub(super) tree: &'a mut Tree,
    block: NodeId,
    cur: Cursor<'a>,
    refmap: &'a RefMap,
    pub(super) delimiters: Vec<Delimiter>,
    brackets: Vec<Bracket>,
    /// Link brackets below this stack height are inactive: links may not
    /// contain links.
    link_floor: usize,
    backtick_runs: BacktickRuns,
    html: HtmlScanner,
}

impl InlineParser<'_> {
    /// Parses one construct at the cursor. Returns false at the end of input.
    fn parse_inline(&mut self) -> bool {
        let Some(c) = self.cur.peek() else {
            return false;
        };
        let handled = match c {
            b'\n' => self.parse_newline(),
            b'\\' => self.parse_backslash(),
            CodeSpan::TICK => self.parse_backticks(),
            b'*' | b'_' => self.handle_delim(c),
            b'[' => self.parse_open_bracket(),
            b'!' => self.parse_bang(),
            b']' => self.parse_close_bracket(),
            b'<' => self.parse_autolink() || self.parse_html_tag(),
            Entity::OPEN => self.parse_entity(),
            _ => self.parse_string(),
        };
        if !handled {
            // a syntax character that did not start anything
            self.cur.bump();
            self.append_text(&char::from(c).to_string());
        }
        true
    }

    fn append(&mut self, value: NodeValue) -> NodeId {
        let id = self.tree.alloc(value, None);
        self.tree.attach(self.block, id);
        id
    }

    fn append_text(&mut self, s: &str) -> NodeId {
        self.append(NodeValue::Text(s.to_string()))
    }

    fn parse_string(&mut self) -> bool {
        let rest = self.cur.rest();
        let len = rest
            .find(['\n', '`', '[', ']', '\\', '!', '<', '&', '*', '_'])
            .unwrap_or(rest.len());
        if len == 0 {
            return false;
        }
        self.append_text(&rest[..len]);
        self.cur.bump_n(len);
        true
    }

    /// A line ending: hard break after two or more spaces, soft otherwise.
    /// Spaces around the line ending are dropped.
    fn parse_newline(&mut self) -> bool {
        self.cur.bump();
        let mut hard = false;
        if let Some(last) = self.tree.last_child(self.block) {
            if let Some(NodeValue::Text(literal)) = self.tree.get_mut(last).map(|n| &mut n.value) {
                if literal.ends_with(' ') {
                    hard = literal.ends_with("  ");
                    let keep = literal.trim_end_matches(' ').len();
                    literal.truncate(keep);
                }
            }
        }
        self.append(if hard {
            NodeValue::LineBreak
        } else {
            NodeValue::SoftBreak
        });
        self.cur.skip_spaces();
        true
    }

    fn parse_backslash(&mut self) -> bool {
        self.cur.bump();
        match self.cur.peek() {
            Some(b'\n') => {
                self.cur.bump();
                self.append(NodeValue::LineBreak);
            }
            Some(b) if is_escapable(b) => {
                self.cur.bump();
                self.append_text(&char::from(b).to_string());
            }
            _ => {
                self.append_text("\\");
            }
        }
        true
    }

    fn parse_backticks(&mut self) -> bool {
        let ticks = CodeSpan::run_length(self.cur.rest());
        self.cur.bump_n(ticks);
        let after_open = self.cur.rest();
        let closing = if self.backtick_runs.rules_out(ticks, self.cur.pos()) {
            None
        } else {
            CodeSpan::find_closing(after_open, ticks)
        };
        match closing {
            Some((content_end, end)) => {
                self.append(NodeValue::Code(CodeSpan::content(&after_open[..content_end])));
                self.cur.bump_n(end);
            }
            None => {
                // unmatched opener is literal backticks
                self.backtick_runs.index(self.cur.s);
                self.append_text(&"`".repeat(ticks));
            }
        }
        true
    }

    fn handle_delim(&mut self, ch: u8) -> bool {
        let start = self.cur.pos();
        let numdelims = self
            .cur
            .rest()
            .bytes()
            .take_while(|&b| b == ch)
            .count();
        let before = self.cur.prev_char().unwrap_or('\n');
        self.cur.bump_n(numdelims);
        let after = self.cur.peek_char().unwrap_or('\n');
        let run = flanking(ch, before, after);

        let subject = self.cur.s;
        let node = self.append_text(&subject[start..start + numdelims]);
        if run.can_open || run.can_close {
            self.delimiters.push(Delimiter {
                node,
                ch,
                numdelims,
                origdelims: numdelims,
                can_open: run.can_open,
                can_close: run.can_close,
            });
        }
        true
    }

    fn push_bracket(&mut self, node: NodeId, index: usize, image: bool) {
        if let Some(last) = self.brackets.last_mut() {
            last.bracket_after = true;
        }
        self.brackets.push(Bracket {
            node,
            index,
            image,
            bracket_after: false,
            previous_delimiter: self.delimiters.len(),
        });
    }

    fn parse_open_bracket(&mut self) -> bool {
        let index = self.cur.pos();
        self.cur.bump();
        let node = self.append_text("[");
        self.push_bracket(node, index, false);
        true
    }

    fn parse_bang(&mut self) -> bool {
        let start = self.cur.pos();
        self.cur.bump();
        if self.cur.peek() == Some(b'[') {
            self.cur.bump();
            let node = self.append_text("![");
            self.push_bracket(node, start + 1, true);
        } else {
            self.append_text("!");
        }
        true
    }

    /// Tries to close the innermost bracket as an inline link, a full or
    /// collapsed reference, or a shortcut reference, in that order.
    fn parse_close_bracket(&mut self) -> bool {
        let close = self.cur.pos();
        self.cur.bump();

        let Some(&opener) = self.brackets.last() else {
            self.append_text("]");
            return true;
        };
        if !opener.image && self.brackets.len() <= self.link_floor {
            self.append_text("]");
            self.pop_bracket();
            return true;
        }

        let after_close = self.cur.pos();
        let mut target = None;

        if self.cur.peek() == Some(b'(') {
            self.cur.bump();
            self.cur.spnl();
            if let Some(url) = scan_link_destination(&mut self.cur) {
                self.cur.spnl();
                let title = if self.cur.prev_char().is_some_and(|c| c.is_ascii_whitespace()) {
                    scan_link_title(&mut self.cur)
                } else {
                    None
                };
                self.cur.spnl();
                if self.cur.peek() == Some(b')') {
                    self.cur.bump();
                    target = Some((url, title.unwrap_or_default()));
                }
            }
            if target.is_none() {
                self.cur.i = after_close;
            }
        }

        if target.is_none() {
            let before_label = self.cur.pos();
            let label = scan_link_label(&mut self.cur);
            let label_len = label.map_or(0, str::len);
            let ref_label = if label_len > 2 {
                label
            } else if !opener.bracket_after {
                // collapsed `[]` or shortcut: the link text is the label
                self.cur.s.get(opener.index..=close)
            } else {
                None
            };
            if label_len == 0 {
                self.cur.i = before_label;
            }
            target = ref_label
                .and_then(|l| self.refmap.get(l))
                .map(|link| (link.url.clone(), link.title.clone()));
        }

        let Some((url, title)) = target else {
            self.pop_bracket();
            self.cur.i = after_close;
            self.append_text("]");
            return true;
        };

        let link = NodeLink { url, title };
        let value = if opener.image {
            NodeValue::Image(link)
        } else {
            NodeValue::Link(link)
        };
        let node = self.tree.alloc(value, None);
        let mut tmp = self.tree.next_sibling(opener.node);
        while let Some(id) = tmp {
            tmp = self.tree.next_sibling(id);
            self.tree.detach(id);
            self.tree.attach(node, id);
        }
        self.tree.attach(self.block, node);
        self.process_emphasis(opener.previous_delimiter);
        self.pop_bracket();
        self.tree.release(opener.node);

        if !opener.image {
            // no links inside links
            self.link_floor = self.brackets.len();
        }
        true
    }

    fn pop_bracket(&mut self) {
        self.brackets.pop();
        self.link_floor = self.link_floor.min(self.brackets.len());
    }

    fn parse_autolink(&mut self) -> bool {
        let Some(autolink) = Autolink::scan(self.cur.rest()) else {
            return false;
        };
        let node = self.append(NodeValue::Link(NodeLink {
            url: autolink.url,
            title: String::new(),
        }));
        let text = self.tree.alloc(NodeValue::Text(autolink.text.to_string()), None);
        self.tree.attach(node, text);
        self.cur.bump_n(autolink.len);
        true
    }

    fn parse_html_tag(&mut self) -> bool {
        let rest = self.cur.rest();
        let Some(len) = self.html.scan(rest, self.cur.pos()) else {
            return false;
        };
        self.append(NodeValue::InlineHtml(rest[..len].to_string()));
        self.cur.bump_n(len);
        true
    }

    fn parse_entity(&mut self) -> bool {
        let Some((len, decoded)) = Entity::scan(self.cur.rest()) else {
            return false;
        };
        self.append_text(&decoded);
        self.cur.bump_n(len);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::parse_reference;
    use pretty_assertions::assert_eq;

    /// Renders the inline children of a paragraph as an s-expression.
    fn sexp(tree: &Tree, id: NodeId) -> String {
        let children: Vec<String> = tree.children(id).map(|c| sexp(tree, c)).collect();
        let node = tree.get(id).unwrap();
        let head = match &node.value {
            NodeValue::Text(s) => return format!("{s:?}"),
            NodeValue::Code(s) => return format!("(code {s:?})"),
            NodeValue::InlineHtml(s) => return format!("(html {s:?})"),
            NodeValue::SoftBreak => return "soft".into(),
            NodeValue::LineBreak => return "hard".into(),
            NodeValue::Link(l) => format!("link {:?} {:?}", l.url, l.title),
            NodeValue::Image(l) => format!("image {:?} {:?}", l.url, l.title),
            other => other.node_type().as_str().to_string(),
        };
        if children.is_empty() {
            format!("({head})")
        } else {
            format!("({head} {})", children.join(" "))
        }
    }

    fn inline(src: &str, refs: &str) -> String {
        let mut refmap = RefMap::new();
        let mut rest = refs;
        loop {
            let n = parse_reference(rest, &mut refmap);
            if n == 0 {
                break;
            }
            rest = &rest[n..];
        }
        let mut tree = Tree::new();
        let para = tree.new_node(NodeValue::Paragraph).unwrap();
        tree.append_child(tree.root(), para).unwrap();
        parse_inlines(&mut tree, para, src, &refmap);
        let parts: Vec<String> = tree.children(para).map(|c| sexp(&tree, c)).collect();
        parts.join(" ")
    }

    #[test]
    fn plain_text_is_one_node() {
        assert_eq!(inline("  hello world  \n", ""), r#""hello world""#);
    }

    #[test]
    fn emphasis_and_strong() {
        assert_eq!(
            inline("*a* **b** ***c***", ""),
            r#"(emph "a") " " (strong "b") " " (emph (strong "c"))"#
        );
        assert_eq!(inline("foo*bar*", ""), r#""foo" (emph "bar")"#);
        assert_eq!(inline("foo_bar_", ""), r#""foo_bar_""#);
        assert_eq!(inline("**foo*", ""), r#""*" (emph "foo")"#);
    }

    #[test]
    fn rule_of_three() {
        assert_eq!(
            inline("*foo**bar**baz*", ""),
            r#"(emph "foo" (strong "bar") "baz")"#
        );
        assert_eq!(inline("*foo**bar*", ""), r#"(emph "foo**bar")"#);
    }

    #[test]
    fn nested_emphasis_pairs_inside_out() {
        assert_eq!(
            inline("*a **b *c* d** e*", ""),
            r#"(emph "a " (strong "b " (emph "c") " d") " e")"#
        );
    }

    #[test]
    fn breaks() {
        assert_eq!(inline("a  \nb", ""), r#""a" hard "b""#);
        assert_eq!(inline("a \n  b", ""), r#""a" soft "b""#);
        assert_eq!(inline("a\\\nb", ""), r#""a" hard "b""#);
    }

    #[test]
    fn escapes_and_entities() {
        assert_eq!(inline(r"\*not\* \q &amp; &#35;", ""), r#""*not* \\q & #""#);
    }

    #[test]
    fn code_spans() {
        assert_eq!(inline("`` a`b ``", ""), r#"(code "a`b")"#);
        assert_eq!(inline("```a``", ""), r#""```a``""#);
        assert_eq!(inline("`*x*`", ""), r#"(code "*x*")"#);
    }

    #[test]
    fn unmatched_backtick_runs_stay_text() {
        assert_eq!(inline("`` a ` b ``` c `", ""), r#""`` a " (code "b ``` c")"#);
        assert_eq!(inline("```a``b`", ""), r#""```a``b`""#);
    }

    #[test]
    fn inline_links() {
        assert_eq!(
            inline(r#"[a *b*](/u "t")"#, ""),
            r#"(link "/u" "t" "a " (emph "b"))"#
        );
        assert_eq!(inline("[a]()", ""), r#"(link "" "" "a")"#);
        assert_eq!(inline("[a](/u\"t\")", ""), r#"(link "/u\"t\"" "" "a")"#);
        assert_eq!(inline("![alt](/i.png)", ""), r#"(image "/i.png" "" "alt")"#);
    }

    #[test]
    fn unmatched_brackets_stay_text() {
        assert_eq!(inline("[a] b]", ""), r#""[a] b]""#);
        assert_eq!(inline("[a](/u", ""), r#""[a](/u""#);
    }

    #[test]
    fn reference_links() {
        let refs = "[foo]: /url \"title\"\n";
        let full = r#"(link "/url" "title" "x")"#;
        assert_eq!(inline("[x][FOO]", refs), full);
        assert_eq!(inline("[Foo][]", refs), r#"(link "/url" "title" "Foo")"#);
        assert_eq!(inline("[foo]", refs), r#"(link "/url" "title" "foo")"#);
        assert_eq!(inline("[bar]", refs), r#""[bar]""#);
    }

    #[test]
    fn no_links_inside_links() {
        assert_eq!(
            inline("[a [b](/inner) c](/outer)", ""),
            r#""[a " (link "/inner" "" "b") " c](/outer)""#
        );
    }

    #[test]
    fn links_after_a_closed_link_inside_brackets() {
        assert_eq!(
            inline("[a [b](/x) [c](/y)](/z)", ""),
            r#""[a " (link "/x" "" "b") " " (link "/y" "" "c") "](/z)""#
        );
        assert_eq!(
            inline("![a [b](/x)](/i)", ""),
            r#"(image "/i" "" "a " (link "/x" "" "b"))"#
        );
    }

    #[test]
    fn unclosed_title_falls_back_to_text() {
        let expected = r#""[a](b \"x) " (link "d" "y" "c")"#;
        assert_eq!(inline(r#"[a](b "x) [c](d 'y')"#, ""), expected);
        assert_eq!(inline(r#"[a](b "x) [c](d "y")"#, ""), expected);
        assert_eq!(
            inline(r#"[a](b "x) [c](d "y) [e](f)"#, ""),
            r#""[a](b \"x) [c](d \"y) " (link "f" "" "e")"#
        );
    }

    #[test]
    fn autolinks_and_html() {
        assert_eq!(
            inline("<http://a.b> <x@y.z> <span>", ""),
            r#"(link "http://a.b" "" "http://a.b") " " (link "mailto:x@y.z" "" "x@y.z") " " (html "<span>")"#
        );
        assert_eq!(inline("a < b", ""), r#""a < b""#);
    }
}
