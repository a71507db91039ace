//! Block starts, tried in precedence order against the current line.

use crate::tree::{NodeCodeBlock, NodeId, NodeList, NodeType, NodeValue};

use super::{
    builder::BlockBuilder,
    kinds::{
        AtxHeading, BlockQuote, CodeFence, HtmlBlock, IndentedCode, ListItem, Paragraph,
        SetextHeading, ThematicBreak,
    },
    types::{BlockStart, FenceData, ListData},
};

type StartFn = fn(&mut BlockBuilder, NodeId) -> BlockStart;

const BLOCK_STARTS: [StartFn; 8] = [
    block_quote,
    atx_heading,
    fenced_code,
    html_block,
    setext_heading,
    thematic_break,
    list_item,
    indented_code,
];

/// Whether a non-indented line starting with `rest` could open any block.
/// Lines that cannot skip the start checks entirely.
pub fn may_start_block(rest: &str) -> bool {
    matches!(
        rest.as_bytes().first(),
        Some(b'#' | b'`' | b'~' | b'*' | b'+' | b'_' | b'=' | b'<' | b'>' | b'-' | b'0'..=b'9')
    )
}

/// Tries every block start in order and reports the first that matches.
pub fn try_open(b: &mut BlockBuilder, container: NodeId) -> BlockStart {
    for start in BLOCK_STARTS {
        let result = start(b, container);
        if result != BlockStart::NoMatch {
            return result;
        }
    }
    BlockStart::NoMatch
}

fn block_quote(b: &mut BlockBuilder, _container: NodeId) -> BlockStart {
    if b.scan.indented || !BlockQuote::starts(b.scan.rest_from_nonspace()) {
        return BlockStart::NoMatch;
    }
    b.scan.advance_next_nonspace();
    b.scan.advance_offset(1, false);
    if b.scan.is_space_or_tab_at(b.scan.offset) {
        b.scan.advance_offset(1, true);
    }
    b.close_unmatched_blocks();
    let at = b.scan.next_nonspace;
    b.add_child(NodeValue::BlockQuote, at);
    BlockStart::Container
}

fn atx_heading(b: &mut BlockBuilder, _container: NodeId) -> BlockStart {
    if b.scan.indented {
        return BlockStart::NoMatch;
    }
    let Some((level, consumed)) = AtxHeading::scan(b.scan.rest_from_nonspace()) else {
        return BlockStart::NoMatch;
    };
    b.scan.advance_next_nonspace();
    b.scan.advance_offset(consumed, false);
    b.close_unmatched_blocks();
    let at = b.scan.next_nonspace;
    let header = b.add_child(NodeValue::Header(level), at);
    let content = AtxHeading::strip_closing(b.scan.rest()).to_string();
    b.scratch(header).content = content;
    b.scan.advance_to_end();
    BlockStart::Leaf
}

fn fenced_code(b: &mut BlockBuilder, _container: NodeId) -> BlockStart {
    if b.scan.indented {
        return BlockStart::NoMatch;
    }
    let Some((ch, length)) = CodeFence::scan_opening(b.scan.rest_from_nonspace()) else {
        return BlockStart::NoMatch;
    };
    b.close_unmatched_blocks();
    let at = b.scan.next_nonspace;
    let code = b.add_child(NodeValue::CodeBlock(NodeCodeBlock::default()), at);
    b.scratch(code).fence = Some(FenceData {
        ch,
        length,
        offset: b.scan.indent,
    });
    b.scan.advance_next_nonspace();
    b.scan.advance_offset(length, false);
    BlockStart::Leaf
}

fn html_block(b: &mut BlockBuilder, container: NodeId) -> BlockStart {
    if b.scan.indented {
        return BlockStart::NoMatch;
    }
    // condition 7 may not interrupt a paragraph, lazily continued or not
    let interrupts_paragraph = b.tree.node_type(container) == NodeType::Paragraph
        || (!b.all_closed
            && !b.scan.blank
            && b.tree.node_type(b.tip) == NodeType::Paragraph);
    let Some(kind) = HtmlBlock::start_condition(b.scan.rest_from_nonspace(), interrupts_paragraph)
    else {
        return BlockStart::NoMatch;
    };
    b.close_unmatched_blocks();
    let at = b.scan.offset;
    let html = b.add_child(NodeValue::HtmlBlock(String::new()), at);
    b.scratch(html).html_block_type = kind;
    // the leading spaces belong to the literal, so the offset stays put
    BlockStart::Leaf
}

fn setext_heading(b: &mut BlockBuilder, container: NodeId) -> BlockStart {
    if b.scan.indented || b.tree.node_type(container) != NodeType::Paragraph {
        return BlockStart::NoMatch;
    }
    let Some(level) = SetextHeading::level(b.scan.rest_from_nonspace()) else {
        return BlockStart::NoMatch;
    };
    b.close_unmatched_blocks();
    let content = std::mem::take(&mut b.scratch(container).content);
    let remaining = b.extract_reference_defs(&content);
    let empty = Paragraph::is_empty_content(&remaining);
    b.scratch(container).content = remaining;
    if empty {
        return BlockStart::NoMatch;
    }
    if let Some(node) = b.tree.get_mut(container) {
        node.value = NodeValue::Header(level);
    }
    b.scan.advance_to_end();
    BlockStart::Leaf
}

fn thematic_break(b: &mut BlockBuilder, _container: NodeId) -> BlockStart {
    if b.scan.indented || !ThematicBreak::matches(b.scan.rest_from_nonspace()) {
        return BlockStart::NoMatch;
    }
    b.close_unmatched_blocks();
    let at = b.scan.next_nonspace;
    b.add_child(NodeValue::ThematicBreak, at);
    b.scan.advance_to_end();
    BlockStart::Leaf
}

fn list_item(b: &mut BlockBuilder, container: NodeId) -> BlockStart {
    if b.scan.indented {
        return BlockStart::NoMatch;
    }
    let interrupts_paragraph = b.tree.node_type(container) == NodeType::Paragraph;
    let Some(marker) = ListItem::scan(b.scan.rest_from_nonspace(), interrupts_paragraph) else {
        return BlockStart::NoMatch;
    };
    let marker_offset = b.scan.indent;
    let at = b.scan.next_nonspace;

    b.scan.advance_next_nonspace();
    b.scan.advance_offset(marker.len, true);
    let spaces_start_column = b.scan.column;
    let spaces_start_offset = b.scan.offset;
    loop {
        b.scan.advance_offset(1, true);
        let more = b.scan.column - spaces_start_column < 5
            && b.scan.is_space_or_tab_at(b.scan.offset);
        if !more {
            break;
        }
    }
    let blank_item = b.scan.byte_at(b.scan.offset).is_none();
    let spaces_after_marker = b.scan.column - spaces_start_column;
    let padding = if !(1..5).contains(&spaces_after_marker) || blank_item {
        // content starts one space after the marker; the rest is indentation
        b.scan.column = spaces_start_column;
        b.scan.offset = spaces_start_offset;
        if b.scan.is_space_or_tab_at(b.scan.offset) {
            b.scan.advance_offset(1, true);
        }
        marker.len + 1
    } else {
        marker.len + spaces_after_marker
    };

    b.close_unmatched_blocks();
    let data = ListData {
        marker,
        marker_offset,
        padding,
    };
    let continues_list = b.tree.node_type(b.tip) == NodeType::List && {
        let tip = b.tip;
        b.scratch(tip)
            .list
            .is_some_and(|open| open.marker.same_list(&marker))
    };
    if !continues_list {
        let list = b.add_child(
            NodeValue::List(NodeList {
                list_type: marker.list_type,
                delimiter: marker.delimiter,
                start: marker.start,
                tight: true,
            }),
            at,
        );
        b.scratch(list).list = Some(data);
    }
    let item = b.add_child(NodeValue::Item, at);
    b.scratch(item).list = Some(data);
    BlockStart::Container
}

fn indented_code(b: &mut BlockBuilder, _container: NodeId) -> BlockStart {
    if !b.scan.indented || b.scan.blank || b.tree.node_type(b.tip) == NodeType::Paragraph {
        return BlockStart::NoMatch;
    }
    b.scan.advance_offset(IndentedCode::INDENT, true);
    b.close_unmatched_blocks();
    let at = b.scan.offset;
    b.add_child(NodeValue::CodeBlock(NodeCodeBlock::default()), at);
    BlockStart::Leaf
}
