use std::collections::HashMap;

use crate::options::Options;
use crate::parsing::inline;
use crate::tree::{NodeId, NodeType, NodeValue, Sourcepos, Tree};

use super::{
    classify::LineScanner,
    containers::continues,
    kinds::{HtmlBlock, IndentedCode, Paragraph},
    open::{may_start_block, try_open},
    references::{RefMap, parse_reference},
    types::{BlockScratch, BlockStart, Continuation},
};

/// Builds the block structure of a document one line at a time.
///
/// Open blocks form a chain from the document root down to `tip` along last
/// children. Each incoming line first re-matches that chain, then may open
/// new blocks, and finally lands its remaining text in a leaf.
pub struct BlockBuilder {
    pub(super) tree: Tree,
    pub(super) refmap: RefMap,
    pub(super) scan: LineScanner,
    pub(super) tip: NodeId,
    pub(super) all_closed: bool,
    pub(super) line_number: usize,
    pub(super) last_line_length: usize,
    scratch: HashMap<NodeId, BlockScratch>,
    oldtip: NodeId,
    last_matched_container: NodeId,
    options: Options,
}

impl BlockBuilder {
    pub fn new(options: Options) -> Self {
        let mut tree = Tree::new();
        let root = tree.root();
        if let Some(node) = tree.get_mut(root) {
            node.sourcepos = Some(Sourcepos {
                start_line: 1,
                start_column: 1,
                end_line: 0,
                end_column: 0,
            });
        }
        let mut scratch = HashMap::new();
        scratch.insert(root, BlockScratch::open());
        Self {
            tree,
            refmap: RefMap::new(),
            scan: LineScanner::default(),
            tip: root,
            all_closed: true,
            line_number: 0,
            last_line_length: 0,
            scratch,
            oldtip: root,
            last_matched_container: root,
            options,
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Incorporates one line, given without its line ending.
    pub fn push(&mut self, line: &str) {
        self.line_number += 1;
        self.scan.reset(line);
        let root = self.tree.root();
        let mut container = root;
        self.oldtip = self.tip;

        while let Some(last) = self.tree.last_child(container).filter(|&c| self.is_open(c)) {
            container = last;
            self.scan.find_next_nonspace();
            match continues(self, container) {
                Continuation::Matched => {}
                Continuation::NotMatched => {
                    container = self.tree.parent(container).unwrap_or(root);
                    break;
                }
                Continuation::LineConsumed => return,
            }
        }

        self.all_closed = container == self.oldtip;
        self.last_matched_container = container;

        let mut matched_leaf = self.tree.node_type(container) != NodeType::Paragraph
            && accepts_lines(self.tree.node_type(container));
        while !matched_leaf {
            self.scan.find_next_nonspace();
            if !self.scan.indented && !may_start_block(self.scan.rest_from_nonspace()) {
                self.scan.advance_next_nonspace();
                break;
            }
            match try_open(self, container) {
                BlockStart::Container => container = self.tip,
                BlockStart::Leaf => {
                    container = self.tip;
                    matched_leaf = true;
                }
                BlockStart::NoMatch => {
                    self.scan.advance_next_nonspace();
                    break;
                }
            }
        }

        if !self.all_closed
            && !self.scan.blank
            && self.tree.node_type(self.tip) == NodeType::Paragraph
        {
            // lazy paragraph continuation
            self.add_line();
        } else {
            self.close_unmatched_blocks();
            if self.scan.blank {
                if let Some(last) = self.tree.last_child(container) {
                    self.scratch(last).last_line_blank = true;
                }
            }

            let container_type = self.tree.node_type(container);
            let last_line_blank = self.scan.blank
                && !(container_type == NodeType::BlockQuote
                    || (container_type == NodeType::CodeBlock && self.is_fenced(container))
                    || (container_type == NodeType::Item
                        && self.tree.first_child(container).is_none()
                        && self.tree.start_line(container) == Some(self.line_number)));
            let mut cont = Some(container);
            while let Some(id) = cont {
                self.scratch(id).last_line_blank = last_line_blank;
                cont = self.tree.parent(id);
            }

            if accepts_lines(container_type) {
                self.add_line();
                if container_type == NodeType::HtmlBlock {
                    let kind = self.scratch(container).html_block_type;
                    if HtmlBlock::ends(kind, self.scan.rest()) {
                        self.last_line_length = self.scan.line.len();
                        self.finalize(container, self.line_number);
                    }
                }
            } else if self.scan.offset < self.scan.line.len() && !self.scan.blank {
                self.add_child(NodeValue::Paragraph, self.scan.offset);
                self.scan.advance_next_nonspace();
                self.add_line();
            }
        }
        self.last_line_length = self.scan.line.len();
    }

    /// Closes every open block, parses inline content and returns the tree.
    pub fn finish(mut self) -> Tree {
        let root = self.tree.root();
        loop {
            let tip = self.tip;
            self.finalize(tip, self.line_number);
            if tip == root {
                break;
            }
        }
        self.process_inlines();
        if self.options.contains(Options::NORMALIZE) {
            if let Err(err) = self.tree.consolidate_text_nodes(root) {
                log::warn!("text consolidation failed: {err}");
            }
        }
        log::trace!(
            "block parse finished after {} lines, {} reference definitions",
            self.line_number,
            self.refmap.len()
        );
        self.tree
    }

    pub(super) fn scratch(&mut self, id: NodeId) -> &mut BlockScratch {
        self.scratch.entry(id).or_default()
    }

    pub(super) fn is_open(&self, id: NodeId) -> bool {
        self.scratch.get(&id).is_some_and(|s| s.open)
    }

    pub(super) fn is_fenced(&self, id: NodeId) -> bool {
        self.scratch.get(&id).is_some_and(|s| s.fence.is_some())
    }

    /// Finalizes blocks left open by the previous line that this line did
    /// not match.
    pub(super) fn close_unmatched_blocks(&mut self) {
        if self.all_closed {
            return;
        }
        let root = self.tree.root();
        while self.oldtip != self.last_matched_container {
            let parent = self.tree.parent(self.oldtip).unwrap_or(root);
            self.finalize(self.oldtip, self.line_number.saturating_sub(1));
            self.oldtip = parent;
        }
        self.all_closed = true;
    }

    /// Opens a block of `value` starting at byte `offset` of the current
    /// line, closing open blocks until one can hold it.
    pub(super) fn add_child(&mut self, value: NodeValue, offset: usize) -> NodeId {
        let child_type = value.node_type();
        let root = self.tree.root();
        while !self.tree.node_type(self.tip).can_contain(child_type) && self.tip != root {
            let tip = self.tip;
            self.finalize(tip, self.line_number.saturating_sub(1));
        }
        let id = self.tree.alloc(
            value,
            Some(Sourcepos {
                start_line: self.line_number,
                start_column: offset + 1,
                end_line: 0,
                end_column: 0,
            }),
        );
        self.tree.attach(self.tip, id);
        self.scratch.insert(id, BlockScratch::open());
        log::trace!(
            "open {} at {}:{}",
            child_type,
            self.line_number,
            offset + 1
        );
        self.tip = id;
        id
    }

    /// Appends the rest of the current line to the tip's content.
    fn add_line(&mut self) {
        let tip = self.tip;
        let content = &mut self.scratch.entry(tip).or_default().content;
        if self.scan.partially_consumed_tab {
            self.scan.offset += 1;
            let chars_to_tab = 4 - (self.scan.column % 4);
            content.push_str(&" ".repeat(chars_to_tab));
        }
        content.push_str(self.scan.line.get(self.scan.offset..).unwrap_or_default());
        content.push('\n');
    }

    /// Closes `block` at `line_number` and moves the tip to its parent.
    pub(super) fn finalize(&mut self, block: NodeId, line_number: usize) {
        let root = self.tree.root();
        let above = self.tree.parent(block).unwrap_or(root);
        self.scratch(block).open = false;
        let end_column = self.last_line_length;
        if let Some(pos) = self.tree.get_mut(block).and_then(|n| n.sourcepos.as_mut()) {
            pos.end_line = line_number;
            pos.end_column = end_column;
        }
        log::trace!("close {} at line {}", self.tree.node_type(block), line_number);

        match self.tree.node_type(block) {
            NodeType::Paragraph => self.finalize_paragraph(block),
            NodeType::CodeBlock => self.finalize_code_block(block),
            NodeType::HtmlBlock => {
                let content = std::mem::take(&mut self.scratch(block).content);
                let literal = trim_trailing_blank_lines(&content).to_string();
                if let Some(node) = self.tree.get_mut(block) {
                    node.value = NodeValue::HtmlBlock(literal);
                }
            }
            NodeType::List => self.finalize_list(block),
            _ => {}
        }
        self.tip = above;
    }

    /// Strips leading reference definitions, recording them. Returns the
    /// remaining content.
    pub(super) fn extract_reference_defs(&mut self, mut content: &str) -> String {
        while content.starts_with('[') {
            let consumed = parse_reference(content, &mut self.refmap);
            if consumed == 0 {
                break;
            }
            content = &content[consumed..];
        }
        content.to_string()
    }

    fn finalize_paragraph(&mut self, block: NodeId) {
        let content = std::mem::take(&mut self.scratch(block).content);
        let remaining = self.extract_reference_defs(&content);
        if Paragraph::is_empty_content(&remaining) {
            self.tree.release(block);
            self.scratch.remove(&block);
        } else {
            self.scratch(block).content = remaining;
        }
    }

    fn finalize_code_block(&mut self, block: NodeId) {
        let content = std::mem::take(&mut self.scratch(block).content);
        let fenced = self.is_fenced(block);
        let (info, literal) = if fenced {
            let (first, rest) = content.split_once('\n').unwrap_or((&content, ""));
            (
                inline::unescape_string(first.trim()).into_owned(),
                rest.to_string(),
            )
        } else {
            let (literal, kept) = IndentedCode::literal(&content);
            let last_len = literal
                .trim_end_matches('\n')
                .rsplit('\n')
                .next()
                .map_or(0, str::len);
            if let Some(pos) = self.tree.get_mut(block).and_then(|n| n.sourcepos.as_mut()) {
                pos.end_line = pos.start_line + kept.saturating_sub(1);
                pos.end_column = (pos.start_column + last_len).saturating_sub(1);
            }
            (String::new(), literal)
        };
        if let Some(node) = self.tree.get_mut(block) {
            if let NodeValue::CodeBlock(cb) = &mut node.value {
                cb.info = info;
                cb.literal = literal;
            }
        }
    }

    /// A list is loose if any item is followed by a blank line, or if any
    /// block inside an item is followed by one.
    fn finalize_list(&mut self, block: NodeId) {
        let items: Vec<NodeId> = self.tree.children(block).collect();
        let mut tight = true;
        'items: for &item in &items {
            if self.ends_with_blank_line(item) && self.tree.next_sibling(item).is_some() {
                tight = false;
                break;
            }
            let subs: Vec<NodeId> = self.tree.children(item).collect();
            for sub in subs {
                if self.ends_with_blank_line(sub)
                    && (self.tree.next_sibling(item).is_some()
                        || self.tree.next_sibling(sub).is_some())
                {
                    tight = false;
                    break 'items;
                }
            }
        }
        if let Some(node) = self.tree.get_mut(block) {
            if let NodeValue::List(list) = &mut node.value {
                list.tight = tight;
            }
        }
    }

    fn ends_with_blank_line(&mut self, mut block: NodeId) -> bool {
        loop {
            let node_type = self.tree.node_type(block);
            let scratch = self.scratch(block);
            if scratch.last_line_blank {
                return true;
            }
            let checked = std::mem::replace(&mut scratch.last_line_checked, true);
            if checked || !matches!(node_type, NodeType::List | NodeType::Item) {
                return false;
            }
            match self.tree.last_child(block) {
                Some(child) => block = child,
                None => return false,
            }
        }
    }

    fn process_inlines(&mut self) {
        let root = self.tree.root();
        let blocks: Vec<NodeId> = self
            .tree
            .descendants(root)
            .filter(|&id| {
                matches!(
                    self.tree.node_type(id),
                    NodeType::Paragraph | NodeType::Header
                )
            })
            .collect();
        for block in blocks {
            let content = self
                .scratch
                .remove(&block)
                .map(|s| s.content)
                .unwrap_or_default();
            inline::parse_inlines(&mut self.tree, block, &content, &self.refmap);
        }
    }
}

/// Leaf blocks that take the rest of the line as content.
fn accepts_lines(node_type: NodeType) -> bool {
    matches!(
        node_type,
        NodeType::Paragraph | NodeType::CodeBlock | NodeType::HtmlBlock
    )
}

/// Drops trailing lines that hold nothing but spaces.
fn trim_trailing_blank_lines(mut s: &str) -> &str {
    loop {
        let trimmed = s.trim_end_matches(' ');
        match trimmed.strip_suffix('\n') {
            Some(shorter) => s = shorter,
            None => return s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn build(src: &str) -> Tree {
        let mut b = BlockBuilder::new(Options::DEFAULT);
        for line in src.lines() {
            b.push(line);
        }
        b.finish()
    }

    fn shape(tree: &Tree) -> Vec<String> {
        tree.descendants(tree.root())
            .filter(|&id| tree.node_type(id).is_block())
            .map(|id| {
                let mut depth = 0;
                let mut up = id;
                while let Some(parent) = tree.parent(up) {
                    depth += 1;
                    up = parent;
                }
                format!("{}{}", "  ".repeat(depth), tree.type_string(id))
            })
            .collect()
    }

    #[test]
    fn trailing_blank_lines_trimmed_from_html() {
        assert_eq!(trim_trailing_blank_lines("<div>\n  \n\n"), "<div>");
        assert_eq!(trim_trailing_blank_lines("<div>  \n"), "<div>  ");
    }

    #[test]
    fn nested_containers() {
        let tree = build("> - a\n>   b\n>\n> - c\n");
        assert_eq!(
            shape(&tree),
            vec![
                "document",
                "  block_quote",
                "    list",
                "      item",
                "        paragraph",
                "      item",
                "        paragraph",
            ]
        );
        let list = tree.descendants(tree.root()).nth(2).unwrap();
        assert_eq!(tree.list_tight(list), Some(false));
    }

    #[test]
    fn lazy_continuation_extends_quoted_paragraph() {
        let tree = build("> a\nb\n");
        assert_eq!(shape(&tree), vec!["document", "  block_quote", "    paragraph"]);
    }

    #[test]
    fn reference_only_paragraph_is_removed() {
        let mut b = BlockBuilder::new(Options::DEFAULT);
        b.push("[foo]: /url");
        assert_eq!(b.refmap.len(), 0);
        let tree = b.finish();
        assert_eq!(shape(&tree), vec!["document"]);
    }

    #[test]
    fn fenced_code_sourcepos_covers_fences() {
        let tree = build("```rust\nlet x;\n```\n");
        let code = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.fence_info(code), Some("rust"));
        assert_eq!(tree.literal(code), "let x;\n");
        assert_eq!(tree.sourcepos(code).unwrap().to_string(), "1:1-3:3");
    }

    #[test]
    fn indented_code_end_excludes_trailing_blanks() {
        let tree = build("    a\n    bb\n\n");
        let code = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.literal(code), "a\nbb\n");
        assert_eq!(tree.sourcepos(code).unwrap().to_string(), "1:5-2:6");
    }
}
