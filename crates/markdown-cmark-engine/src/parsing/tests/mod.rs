//! Integration tests for the parsing module.
//!
//! Documents are parsed in one go and in chunks, checked against the tree
//! invariants, and compared by structural snapshot.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::options::Options;
use crate::parsing::snapshot::{invariants, normalize};
use crate::parsing::{Parser, parse_document};
use crate::tree::{ListType, NodeId, NodeType, Tree};

/// One line per node, indented by depth.
fn outline(tree: &Tree) -> String {
    fn walk(tree: &Tree, id: NodeId, depth: usize, out: &mut Vec<String>) {
        out.push(format!("{}{}", "  ".repeat(depth), tree.type_string(id)));
        for child in tree.children(id) {
            walk(tree, child, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(tree, tree.root(), 0, &mut out);
    out.join("\n")
}

fn parse(source: &str) -> Tree {
    let _ = env_logger::builder().is_test(true).try_init();
    let tree = parse_document(source, Options::DEFAULT);
    invariants(&tree, tree.root());
    tree
}

fn nth_block(tree: &Tree, n: usize) -> NodeId {
    tree.children(tree.root()).nth(n).unwrap()
}

const MIXED: &str = "\
# Title

> quoted *text*
continued lazily

    code

- one
- two

```rust
fn main() {}
```
";

#[test]
fn mixed_document_structure() {
    let tree = parse(MIXED);
    insta::assert_snapshot!(outline(&tree), @r"
    document
      header
        text
      block_quote
        paragraph
          text
          emph
            text
          softbreak
          text
      code_block
      list
        item
          paragraph
            text
        item
          paragraph
            text
      code_block
    ");
}

#[test]
fn streaming_matches_one_shot() {
    let whole = parse(MIXED);
    for size in [1, 2, 3, 7, 64] {
        let mut parser = Parser::new(Options::SOURCEPOS);
        let bytes = MIXED.as_bytes();
        let mut start = 0;
        while start < bytes.len() {
            let mut end = (start + size).min(bytes.len());
            while !MIXED.is_char_boundary(end) {
                end += 1;
            }
            parser.feed(&MIXED[start..end]).unwrap();
            start = end;
        }
        let streamed = parser.finish().unwrap();
        invariants(&streamed, streamed.root());
        assert_eq!(
            normalize(&streamed, streamed.root(), true),
            normalize(&whole, whole.root(), true),
            "chunk size {size}"
        );
    }
}

#[test]
fn setext_heading() {
    let tree = parse("Boo\n===\n");
    let header = nth_block(&tree, 0);
    assert_eq!(tree.node_type(header), NodeType::Header);
    assert_eq!(tree.header_level(header), Some(1));
    assert_eq!(tree.literal(tree.first_child(header).unwrap()), "Boo");
}

#[rstest]
#[case("- a\n- b\n", true)]
#[case("- a\n\n- b\n", false)]
#[case("- a\n\n  b\n", false)]
#[case("- a\n  - b\n\n  c\n", false)]
fn list_tightness(#[case] source: &str, #[case] tight: bool) {
    let tree = parse(source);
    let list = nth_block(&tree, 0);
    assert_eq!(tree.list_tight(list), Some(tight));
}

#[test]
fn ordered_list_attributes() {
    let tree = parse("3) three\n4) four\n");
    let list = nth_block(&tree, 0);
    assert_eq!(tree.list_type(list), Some(ListType::Ordered));
    assert_eq!(tree.list_start(list), Some(3));
    assert_eq!(tree.children(list).count(), 2);
}

#[test]
fn changing_bullet_starts_a_new_list() {
    let tree = parse("- a\n+ b\n");
    assert_eq!(tree.children(tree.root()).count(), 2);
}

#[test]
fn block_sourcepos() {
    let tree = parse("hello\nworld\n\n> quote\n");
    let para = nth_block(&tree, 0);
    assert_eq!(tree.sourcepos(para).unwrap().to_string(), "1:1-2:5");
    let quote = nth_block(&tree, 1);
    assert_eq!(tree.start_line(quote), Some(4));
    assert_eq!(tree.start_column(quote), Some(1));
    assert_eq!(tree.sourcepos(tree.root()).map(|p| p.start_line), Some(1));
}

#[test]
fn reference_definitions_resolve_links() {
    let tree = parse("[foo]\n\n[foo]: /url \"title\"\n");
    assert_eq!(tree.children(tree.root()).count(), 1);
    let para = nth_block(&tree, 0);
    let link = tree.first_child(para).unwrap();
    assert_eq!(tree.node_type(link), NodeType::Link);
    assert_eq!(tree.url(link), Some("/url"));
    assert_eq!(tree.title(link), Some("title"));
}

#[test]
fn fenced_code_info_and_literal() {
    let tree = parse("~~~ py extra\nx = 1\n\n~~~~\nafter\n");
    let code = nth_block(&tree, 0);
    assert_eq!(tree.fence_info(code), Some("py extra"));
    assert_eq!(tree.literal(code), "x = 1\n\n");
    assert_eq!(tree.node_type(nth_block(&tree, 1)), NodeType::Paragraph);
}

#[test]
fn unclosed_fence_runs_to_end() {
    let tree = parse("```\na\n\n");
    let code = nth_block(&tree, 0);
    assert_eq!(tree.literal(code), "a\n\n");
}

#[test]
fn html_block_kept_verbatim() {
    let tree = parse("<div>\n*not emphasis*\n</div>\n\ntext\n");
    let html = nth_block(&tree, 0);
    assert_eq!(tree.node_type(html), NodeType::HtmlBlock);
    assert_eq!(tree.literal(html), "<div>\n*not emphasis*\n</div>");
}

#[test]
fn empty_and_blank_documents() {
    for source in ["", "\n\n", "   \n"] {
        let tree = parse(source);
        assert_eq!(tree.children(tree.root()).count(), 0, "{source:?}");
    }
}

#[test]
fn normalize_option_merges_text() {
    let tree = parse_document("a\\*b", Options::NORMALIZE);
    let para = nth_block(&tree, 0);
    assert_eq!(tree.children(para).count(), 1);
    assert_eq!(tree.literal(tree.first_child(para).unwrap()), "a*b");
}

#[test]
fn snapshot_records_attributes() {
    let tree = parse("## Two\n");
    let snap = normalize(&tree, nth_block(&tree, 0), false);
    assert_eq!(snap.kind, "header");
    assert_eq!(snap.attrs.get("level").map(String::as_str), Some("2"));
    assert_eq!(snap.sourcepos, None);
    assert_eq!(snap.children[0].literal.as_deref(), Some("Two"));
}
