//! Continuation rules: whether an open block carries on to the next line,
//! consuming its line prefix if it does.

use crate::tree::{NodeId, NodeType};

use super::{
    builder::BlockBuilder,
    kinds::{BlockQuote, CodeFence, HtmlBlock, IndentedCode, Paragraph},
    types::Continuation,
};

pub fn continues(b: &mut BlockBuilder, container: NodeId) -> Continuation {
    match b.tree.node_type(container) {
        NodeType::Document | NodeType::List => Continuation::Matched,
        NodeType::BlockQuote => block_quote(b),
        NodeType::Item => item(b, container),
        NodeType::CodeBlock => code_block(b, container),
        NodeType::HtmlBlock => {
            let kind = b.scratch(container).html_block_type;
            if b.scan.blank && HtmlBlock::ends_at_blank(kind) {
                Continuation::NotMatched
            } else {
                Continuation::Matched
            }
        }
        NodeType::Paragraph if Paragraph::continues(b.scan.blank) => Continuation::Matched,
        _ => Continuation::NotMatched,
    }
}

fn block_quote(b: &mut BlockBuilder) -> Continuation {
    if b.scan.indented || !BlockQuote::starts(b.scan.rest_from_nonspace()) {
        return Continuation::NotMatched;
    }
    b.scan.advance_next_nonspace();
    b.scan.advance_offset(1, false);
    if b.scan.is_space_or_tab_at(b.scan.offset) {
        b.scan.advance_offset(1, true);
    }
    Continuation::Matched
}

fn item(b: &mut BlockBuilder, container: NodeId) -> Continuation {
    if b.scan.blank {
        if b.tree.first_child(container).is_none() {
            // an empty item cannot take a blank line
            return Continuation::NotMatched;
        }
        b.scan.advance_next_nonspace();
        return Continuation::Matched;
    }
    let Some(data) = b.scratch(container).list else {
        return Continuation::NotMatched;
    };
    let width = data.marker_offset + data.padding;
    if b.scan.indent >= width {
        b.scan.advance_offset(width, true);
        Continuation::Matched
    } else {
        Continuation::NotMatched
    }
}

fn code_block(b: &mut BlockBuilder, container: NodeId) -> Continuation {
    let Some(fence) = b.scratch(container).fence else {
        if b.scan.indent >= IndentedCode::INDENT {
            b.scan.advance_offset(IndentedCode::INDENT, true);
            return Continuation::Matched;
        }
        if b.scan.blank {
            b.scan.advance_next_nonspace();
            return Continuation::Matched;
        }
        return Continuation::NotMatched;
    };

    let closing = (b.scan.indent <= 3)
        .then(|| CodeFence::scan_closing(b.scan.rest_from_nonspace(), fence.ch, fence.length))
        .flatten();
    if let Some(len) = closing {
        b.last_line_length = b.scan.offset + b.scan.indent + len;
        let line = b.line_number;
        b.finalize(container, line);
        return Continuation::LineConsumed;
    }

    // strip up to the fence's own indentation
    let mut remaining = fence.offset;
    while remaining > 0 && b.scan.is_space_or_tab_at(b.scan.offset) {
        b.scan.advance_offset(1, true);
        remaining -= 1;
    }
    Continuation::Matched
}
