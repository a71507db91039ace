use crate::tree::{DelimType, ListType};

/// A recognised list item marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub list_type: ListType,
    /// `-`, `+` or `*` for bullet items, 0 for ordered items.
    pub bullet_char: u8,
    pub start: usize,
    pub delimiter: DelimType,
    /// Marker width in bytes.
    pub len: usize,
}

impl ListMarker {
    /// Items continue the open list only when the marker style agrees.
    pub fn same_list(&self, other: &ListMarker) -> bool {
        self.list_type == other.list_type
            && self.delimiter == other.delimiter
            && self.bullet_char == other.bullet_char
    }
}

/// List item markers (`-`, `+`, `*`, `1.`, `1)`).
pub struct ListItem;

impl ListItem {
    pub const BULLETS: [u8; 3] = [b'-', b'+', b'*'];
    pub const MAX_START_DIGITS: usize = 9;

    /// Scans a list marker at the start of `rest`. When the item would
    /// interrupt a paragraph, ordered lists must start at 1 and the item
    /// must not be empty.
    pub fn scan(rest: &str, interrupts_paragraph: bool) -> Option<ListMarker> {
        let b = rest.as_bytes();
        let first = *b.first()?;
        let marker = if Self::BULLETS.contains(&first) {
            ListMarker {
                list_type: ListType::Bullet,
                bullet_char: first,
                start: 1,
                delimiter: DelimType::None,
                len: 1,
            }
        } else {
            let digits = b.iter().take_while(|c| c.is_ascii_digit()).count();
            if digits == 0 || digits > Self::MAX_START_DIGITS {
                return None;
            }
            let delimiter = match b.get(digits) {
                Some(b'.') => DelimType::Period,
                Some(b')') => DelimType::Paren,
                _ => return None,
            };
            let start = rest[..digits].parse::<usize>().ok()?;
            if interrupts_paragraph && start != 1 {
                return None;
            }
            ListMarker {
                list_type: ListType::Ordered,
                bullet_char: 0,
                start,
                delimiter,
                len: digits + 1,
            }
        };

        let after = &b[marker.len..];
        match after.first() {
            None | Some(b' ') | Some(b'\t') => {}
            _ => return None,
        }
        if interrupts_paragraph && after.iter().all(|&c| c == b' ' || c == b'\t') {
            return None;
        }
        Some(marker)
    }
}
