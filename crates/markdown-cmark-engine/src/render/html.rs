//! HTML output in the shape of the reference CommonMark renderer.

use crate::options::Options;
use crate::tree::{ListType, NodeEdge, NodeId, NodeValue, Tree};

use super::escape::{escape_href, escape_html};

/// Renders the subtree at `root` as HTML.
pub fn render_html(tree: &Tree, root: NodeId, options: Options) -> String {
    let mut renderer = HtmlRenderer {
        tree,
        options,
        out: String::new(),
        in_image: 0,
    };
    for edge in tree.traverse(root) {
        match edge {
            NodeEdge::Start(id) => renderer.enter(id),
            NodeEdge::End(id) => renderer.exit(id),
        }
    }
    renderer.out
}

struct HtmlRenderer<'t> {
    tree: &'t Tree,
    options: Options,
    out: String,
    /// Image nesting depth; inside an image only the alt text is written.
    in_image: usize,
}

impl HtmlRenderer<'_> {
    fn cr(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn lit(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn esc(&mut self, s: &str) {
        escape_html(s, &mut self.out);
    }

    /// Writes a tag unless inside image alt text.
    fn tag(&mut self, name: &str, id: Option<NodeId>) {
        if self.in_image > 0 {
            return;
        }
        self.out.push('<');
        self.out.push_str(name);
        if let Some(id) = id {
            self.sourcepos(id);
        }
        self.out.push('>');
    }

    fn sourcepos(&mut self, id: NodeId) {
        if !self.options.contains(Options::SOURCEPOS) {
            return;
        }
        if let Some(pos) = self.tree.sourcepos(id) {
            self.out.push_str(&format!(" data-sourcepos=\"{pos}\""));
        }
    }

    /// Paragraphs directly inside items of a tight list are written bare.
    fn in_tight_list(&self, paragraph: NodeId) -> bool {
        self.tree
            .parent(paragraph)
            .and_then(|item| self.tree.parent(item))
            .and_then(|list| self.tree.list_tight(list))
            .unwrap_or(false)
    }

    fn enter(&mut self, id: NodeId) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        match &node.value {
            NodeValue::Document => {}
            NodeValue::BlockQuote => {
                self.cr();
                self.tag("blockquote", Some(id));
                self.cr();
            }
            NodeValue::List(list) => {
                self.cr();
                if list.list_type == ListType::Bullet {
                    self.tag("ul", Some(id));
                } else {
                    self.lit("<ol");
                    self.sourcepos(id);
                    if list.start != 1 {
                        self.out.push_str(&format!(" start=\"{}\"", list.start));
                    }
                    self.lit(">");
                }
                self.cr();
            }
            NodeValue::Item => {
                self.cr();
                self.tag("li", Some(id));
            }
            NodeValue::Header(level) => {
                debug_assert!((1..=6).contains(level), "header level {level}");
                self.cr();
                self.tag(&format!("h{level}"), Some(id));
            }
            NodeValue::CodeBlock(cb) => {
                self.cr();
                self.tag("pre", Some(id));
                match cb.info.split_whitespace().next() {
                    Some(lang) => {
                        self.lit("<code class=\"language-");
                        self.esc(lang);
                        self.lit("\">");
                    }
                    None => self.lit("<code>"),
                }
                self.esc(&cb.literal);
                self.lit("</code></pre>");
                self.cr();
            }
            NodeValue::HtmlBlock(literal) => {
                self.cr();
                self.lit(literal);
                self.cr();
            }
            NodeValue::Paragraph => {
                if !self.in_tight_list(id) {
                    self.cr();
                    self.tag("p", Some(id));
                }
            }
            NodeValue::ThematicBreak => {
                self.cr();
                self.lit("<hr");
                self.sourcepos(id);
                self.lit(" />");
                self.cr();
            }
            NodeValue::Text(literal) => self.esc(literal),
            NodeValue::SoftBreak => {
                if self.options.contains(Options::HARDBREAKS) && self.in_image == 0 {
                    self.lit("<br />\n");
                } else {
                    self.lit("\n");
                }
            }
            NodeValue::LineBreak => {
                if self.in_image == 0 {
                    self.lit("<br />");
                }
                self.lit("\n");
            }
            NodeValue::Code(literal) => {
                self.tag("code", None);
                self.esc(literal);
                self.tag("/code", None);
            }
            NodeValue::InlineHtml(literal) => {
                if self.in_image == 0 {
                    self.lit(literal);
                }
            }
            NodeValue::Emphasis => self.tag("em", None),
            NodeValue::Strong => self.tag("strong", None),
            NodeValue::Link(link) => {
                if self.in_image == 0 {
                    self.lit("<a href=\"");
                    escape_href(&link.url, &mut self.out);
                    if !link.title.is_empty() {
                        self.lit("\" title=\"");
                        self.esc(&link.title);
                    }
                    self.lit("\">");
                }
            }
            NodeValue::Image(link) => {
                if self.in_image == 0 {
                    self.lit("<img src=\"");
                    escape_href(&link.url, &mut self.out);
                    self.lit("\" alt=\"");
                }
                self.in_image += 1;
            }
        }
    }

    fn exit(&mut self, id: NodeId) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        match &node.value {
            NodeValue::BlockQuote => {
                self.cr();
                self.tag("/blockquote", None);
                self.cr();
            }
            NodeValue::List(list) => {
                self.cr();
                let close = if list.list_type == ListType::Bullet { "/ul" } else { "/ol" };
                self.tag(close, None);
                self.cr();
            }
            NodeValue::Item => {
                self.tag("/li", None);
                self.cr();
            }
            NodeValue::Header(level) => {
                debug_assert!((1..=6).contains(level), "header level {level}");
                self.tag(&format!("/h{level}"), None);
                self.cr();
            }
            NodeValue::Paragraph => {
                if !self.in_tight_list(id) {
                    self.tag("/p", None);
                    self.cr();
                }
            }
            NodeValue::Emphasis => self.tag("/em", None),
            NodeValue::Strong => self.tag("/strong", None),
            NodeValue::Link(_) => self.tag("/a", None),
            NodeValue::Image(link) => {
                self.in_image = self.in_image.saturating_sub(1);
                if self.in_image == 0 {
                    if !link.title.is_empty() {
                        self.lit("\" title=\"");
                        self.esc(&link.title);
                    }
                    self.lit("\" />");
                }
            }
            _ => {}
        }
    }
}
