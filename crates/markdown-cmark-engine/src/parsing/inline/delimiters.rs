//! Emphasis resolution over the delimiter stack.
//!
//! `*` and `_` runs are first emitted as plain text nodes and recorded here.
//! Once a bracket closes or the block ends, runs are paired from the
//! innermost closer outwards and the text between each pair is wrapped in an
//! `emph` or `strong` node.
//!
//! Each run is visited once as a potential closer. Openers still waiting
//! for a partner sit on a stack; a match truncates the stack to the opener,
//! so runs between a pair are never scanned again.

use unicode_categories::UnicodeCategories;

use crate::tree::{NodeId, NodeValue};

use super::parser::InlineParser;

/// A run of `*` or `_` that may open or close emphasis.
#[derive(Debug, Clone, Copy)]
pub struct Delimiter {
    pub node: NodeId,
    pub ch: u8,
    /// Characters still unmatched.
    pub numdelims: usize,
    /// Length of the run as written.
    pub origdelims: usize,
    pub can_open: bool,
    pub can_close: bool,
}

impl Delimiter {
    /// Index into the openers-bottom table: runs that differ in character,
    /// openability or length mod 3 search for openers independently.
    fn bottom_slot(&self) -> usize {
        let base = if self.ch == b'_' { 0 } else { 6 };
        base + if self.can_open { 3 } else { 0 } + self.origdelims % 3
    }

    /// Whether `self` as opener pairs with `closer`. A run that can both
    /// open and close only pairs when the combined length is not a
    /// multiple of 3 (rule of three).
    fn pairs_with(&self, closer: &Delimiter) -> bool {
        let odd_match = (closer.can_open || self.can_close)
            && closer.origdelims % 3 != 0
            && (self.origdelims + closer.origdelims) % 3 == 0;
        self.ch == closer.ch && self.can_open && !odd_match
    }
}

/// An open `[` or `![` awaiting its `]`.
#[derive(Debug, Clone, Copy)]
pub struct Bracket {
    pub node: NodeId,
    /// Byte index of the `[` in the subject.
    pub index: usize,
    pub image: bool,
    /// Another bracket was opened after this one.
    pub bracket_after: bool,
    /// Delimiter stack height when the bracket was opened.
    pub previous_delimiter: usize,
}

/// Flanking classification of a delimiter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunFlanking {
    pub can_open: bool,
    pub can_close: bool,
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || c.is_punctuation() || c.is_symbol()
}

/// Decides whether a run of `ch` between `before` and `after` can open or
/// close emphasis. Line boundaries count as whitespace.
pub fn flanking(ch: u8, before: char, after: char) -> RunFlanking {
    let before_ws = before.is_whitespace();
    let after_ws = after.is_whitespace();
    let before_punct = is_punctuation(before);
    let after_punct = is_punctuation(after);
    let left = !after_ws && (!after_punct || before_ws || before_punct);
    let right = !before_ws && (!before_punct || after_ws || after_punct);
    if ch == b'_' {
        RunFlanking {
            can_open: left && (!right || before_punct),
            can_close: right && (!left || after_punct),
        }
    } else {
        RunFlanking {
            can_open: left,
            can_close: right,
        }
    }
}

impl InlineParser<'_> {
    /// Pairs up every delimiter above `stack_bottom`, then drops them from
    /// the stack.
    pub(super) fn process_emphasis(&mut self, stack_bottom: usize) {
        // indices into `self.delimiters` of runs that may still open
        let mut openers: Vec<usize> = Vec::new();
        // per slot, the opener stack height below which a search already failed
        let mut openers_bottom = [0usize; 12];

        for ci in stack_bottom..self.delimiters.len() {
            loop {
                let c = self.delimiters[ci];
                if !c.can_close || c.numdelims == 0 {
                    break;
                }
                let slot = c.bottom_slot();
                let floor = openers_bottom[slot].min(openers.len());
                let found = (floor..openers.len())
                    .rev()
                    .find(|&k| self.delimiters[openers[k]].pairs_with(&c));

                let Some(k) = found else {
                    openers_bottom[slot] = openers.len();
                    break;
                };
                let oi = openers[k];
                self.wrap_emphasis(oi, ci);
                // runs between the pair can no longer match anything
                openers.truncate(k + 1);
                if self.delimiters[oi].numdelims == 0 {
                    self.tree.release(self.delimiters[oi].node);
                    openers.pop();
                }
                for bottom in &mut openers_bottom {
                    *bottom = (*bottom).min(openers.len());
                }
            }

            let c = self.delimiters[ci];
            if c.numdelims == 0 {
                self.tree.release(c.node);
            } else if c.can_open {
                openers.push(ci);
            }
        }
        self.delimiters.truncate(stack_bottom);
    }

    /// Wraps the nodes between opener `oi` and closer `ci` in emphasis,
    /// consuming one or two characters from each run.
    fn wrap_emphasis(&mut self, oi: usize, ci: usize) {
        let (o, c) = (self.delimiters[oi], self.delimiters[ci]);
        let use_delims = if c.numdelims >= 2 && o.numdelims >= 2 { 2 } else { 1 };
        self.delimiters[oi].numdelims -= use_delims;
        self.delimiters[ci].numdelims -= use_delims;
        self.shrink_text(o.node, use_delims);
        self.shrink_text(c.node, use_delims);

        let value = if use_delims == 1 {
            NodeValue::Emphasis
        } else {
            NodeValue::Strong
        };
        let emph = self.tree.alloc(value, None);
        let mut tmp = self.tree.next_sibling(o.node);
        while let Some(id) = tmp.filter(|&id| id != c.node) {
            tmp = self.tree.next_sibling(id);
            self.tree.detach(id);
            self.tree.attach(emph, id);
        }
        self.tree.attach_after(o.node, emph);
    }

    fn shrink_text(&mut self, id: NodeId, by: usize) {
        if let Some(NodeValue::Text(literal)) = self.tree.get_mut(id).map(|n| &mut n.value) {
            let keep = literal.len().saturating_sub(by);
            literal.truncate(keep);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b'*', ' ', 'a', true, false)]
    #[case(b'*', 'a', ' ', false, true)]
    #[case(b'*', 'a', 'b', true, true)]
    #[case(b'_', 'a', 'b', false, false)]
    #[case(b'_', '(', 'b', true, false)]
    #[case(b'*', 'a', '"', false, true)]
    #[case(b'*', ' ', ' ', false, false)]
    #[case(b'*', '\n', '\u{a3}', true, false)]
    fn flanking_rules(
        #[case] ch: u8,
        #[case] before: char,
        #[case] after: char,
        #[case] can_open: bool,
        #[case] can_close: bool,
    ) {
        assert_eq!(
            flanking(ch, before, after),
            RunFlanking {
                can_open,
                can_close
            }
        );
    }
}
