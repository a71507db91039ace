//! groff man page body (no title header or footer).

use crate::options::Options;
use crate::tree::{ListType, NodeEdge, NodeId, NodeType, NodeValue, Tree};

const LINE_BREAK: &str = ".PD 0\n.P\n.PD";

/// Renders the subtree at `root` as groff man source.
pub fn render_man(tree: &Tree, root: NodeId, options: Options) -> String {
    let mut man = ManRenderer {
        tree,
        options,
        out: String::new(),
    };
    for edge in tree.traverse(root) {
        match edge {
            NodeEdge::Start(id) => man.enter(id),
            NodeEdge::End(id) => man.exit(id),
        }
    }
    if !man.out.is_empty() {
        man.cr();
    }
    man.out
}

struct ManRenderer<'t> {
    tree: &'t Tree,
    options: Options,
    out: String,
}

impl ManRenderer<'_> {
    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }

    fn cr(&mut self) {
        if !self.at_line_start() {
            self.out.push('\n');
        }
    }

    fn lit(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Writes text with groff escapes.
    fn text(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '.' | '\'' if self.at_line_start() => {
                    self.out.push_str("\\&");
                    self.out.push(c);
                }
                '\\' => self.out.push_str("\\e"),
                '-' => self.out.push_str("\\-"),
                '\u{2018}' => self.out.push_str("\\[oq]"),
                '\u{2019}' => self.out.push_str("\\[cq]"),
                '\u{201C}' => self.out.push_str("\\[lq]"),
                '\u{201D}' => self.out.push_str("\\[rq]"),
                '\u{2014}' => self.out.push_str("\\[em]"),
                '\u{2013}' => self.out.push_str("\\[en]"),
                _ => self.out.push(c),
            }
        }
    }

    fn enter(&mut self, id: NodeId) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        match &node.value {
            NodeValue::BlockQuote => {
                self.cr();
                self.lit(".RS");
                self.cr();
            }
            NodeValue::Item => {
                self.cr();
                self.lit(".IP ");
                self.item_marker(id);
                self.cr();
            }
            NodeValue::Header(level) => {
                self.cr();
                self.lit(if *level == 1 { ".SH" } else { ".SS" });
                self.cr();
            }
            NodeValue::CodeBlock(cb) => {
                self.cr();
                self.lit(".IP\n.nf\n\\f[C]\n");
                self.text(&cb.literal);
                self.cr();
                self.lit("\\fP\n.fi");
                self.cr();
            }
            NodeValue::ThematicBreak => {
                self.cr();
                self.lit(".PP\n  *  *  *  *  *");
                self.cr();
            }
            NodeValue::Paragraph => {
                // the first paragraph of an item sits on the .IP line
                let first_in_item = self.tree.previous_sibling(id).is_none()
                    && self
                        .tree
                        .parent(id)
                        .is_some_and(|p| self.tree.node_type(p) == NodeType::Item);
                if !first_in_item {
                    self.cr();
                    self.lit(".PP");
                    self.cr();
                }
            }
            NodeValue::Text(literal) => self.text(literal),
            NodeValue::LineBreak => {
                self.cr();
                self.lit(LINE_BREAK);
                self.cr();
            }
            NodeValue::SoftBreak => {
                if self.options.contains(Options::HARDBREAKS) {
                    self.cr();
                    self.lit(LINE_BREAK);
                }
                self.cr();
            }
            NodeValue::Code(literal) => {
                self.lit("\\f[C]");
                self.text(literal);
                self.lit("\\fP");
            }
            NodeValue::Emphasis => self.lit("\\fI"),
            NodeValue::Strong => self.lit("\\fB"),
            NodeValue::Image(_) => self.lit("[IMAGE: "),
            NodeValue::Document
            | NodeValue::List(_)
            | NodeValue::HtmlBlock(_)
            | NodeValue::InlineHtml(_)
            | NodeValue::Link(_) => {}
        }
    }

    fn exit(&mut self, id: NodeId) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        match &node.value {
            NodeValue::BlockQuote => {
                self.cr();
                self.lit(".RE");
                self.cr();
            }
            NodeValue::Item | NodeValue::Header(_) | NodeValue::Paragraph => self.cr(),
            NodeValue::Emphasis | NodeValue::Strong => self.lit("\\fP"),
            NodeValue::Link(link) => {
                self.lit(" (");
                self.text(&link.url);
                self.lit(")");
            }
            NodeValue::Image(_) => self.lit("]"),
            _ => {}
        }
    }

    fn item_marker(&mut self, item: NodeId) {
        let Some(list) = self.tree.parent(item) else {
            return;
        };
        if self.tree.list_type(list) == Some(ListType::Ordered) {
            let start = self.tree.list_start(list).unwrap_or(1);
            let index = self
                .tree
                .children(list)
                .take_while(|&sibling| sibling != item)
                .count();
            // numbering stops at usize::MAX rather than wrapping
            let number = start.saturating_add(index);
            self.lit(&format!("\"{number}.\" 4"));
        } else {
            self.lit("\\[bu] 2");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_document;
    use pretty_assertions::assert_eq;

    fn man(md: &str, options: Options) -> String {
        let tree = parse_document(md, Options::DEFAULT);
        render_man(&tree, tree.root(), options)
    }

    #[test]
    fn headers_and_paragraphs() {
        insta::assert_snapshot!(man("# Name\n\ntool - does *things* **well**\n\n## More\n\n.dot `x-y`\n", Options::DEFAULT), @r"
        .SH
        Name
        .PP
        tool \- does \fIthings\fP \fBwell\fP
        .SS
        More
        .PP
        \&.dot \f[C]x\-y\fP
        ");
    }

    #[test]
    fn lists_and_quotes() {
        insta::assert_snapshot!(man("- a\n- b\n\n3. c\n4. d\n\n> q\n", Options::DEFAULT), @r#"
        .IP \[bu] 2
        a
        .IP \[bu] 2
        b
        .IP "3." 4
        c
        .IP "4." 4
        d
        .RS
        .PP
        q
        .RE
        "#);
    }

    #[test]
    fn code_and_links() {
        insta::assert_snapshot!(man("[site](http://a.b) \\\\\n\n```\n.x\\y\n```\n", Options::DEFAULT), @r"
        .PP
        site (http://a.b) \e
        .IP
        .nf
        \f[C]
        \&.x\ey
        \fP
        .fi
        ");
    }

    #[test]
    fn soft_breaks() {
        assert_eq!(man("a\nb", Options::DEFAULT), ".PP\na\nb\n");
        assert_eq!(man("a\nb", Options::HARDBREAKS), ".PP\na\n.PD 0\n.P\n.PD\nb\n");
    }

    #[test]
    fn ordered_numbering_saturates_at_max_start() {
        let mut tree = Tree::new();
        let list = tree.new_node_of_type(NodeType::List).unwrap();
        tree.set_list_type(list, ListType::Ordered).unwrap();
        tree.set_list_start(list, usize::MAX - 1).unwrap();
        tree.append_child(tree.root(), list).unwrap();
        for _ in 0..3 {
            let item = tree.new_node(NodeValue::Item).unwrap();
            tree.append_child(list, item).unwrap();
        }

        let max = usize::MAX;
        let below = usize::MAX - 1;
        assert_eq!(
            render_man(&tree, tree.root(), Options::DEFAULT),
            format!(".IP \"{below}.\" 4\n.IP \"{max}.\" 4\n.IP \"{max}.\" 4\n")
        );
    }

    #[test]
    fn empty_document() {
        assert_eq!(man("", Options::DEFAULT), "");
    }
}
