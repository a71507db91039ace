use super::kinds::ListMarker;

/// Result of testing an open block against the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// The block continues; its prefix (if any) has been consumed.
    Matched,
    /// The block does not continue on this line.
    NotMatched,
    /// The block consumed the whole line (a closing fence).
    LineConsumed,
}

/// Result of trying one block start on the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStart {
    NoMatch,
    /// A container was opened; keep looking for further starts.
    Container,
    /// A leaf was opened; the rest of the line belongs to it.
    Leaf,
}

/// List marker geometry stored on `List` and `Item` blocks.
#[derive(Debug, Clone, Copy)]
pub struct ListData {
    pub marker: ListMarker,
    /// Columns of indentation before the marker.
    pub marker_offset: usize,
    /// Marker width plus the spaces that belong to it.
    pub padding: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct FenceData {
    pub ch: u8,
    pub length: usize,
    /// Indentation of the opening fence, stripped from content lines.
    pub offset: usize,
}

/// Parser-side state of a block that the tree does not keep.
#[derive(Debug, Default)]
pub struct BlockScratch {
    pub open: bool,
    /// Raw text accumulated for leaf blocks.
    pub content: String,
    pub last_line_blank: bool,
    pub last_line_checked: bool,
    pub list: Option<ListData>,
    pub fence: Option<FenceData>,
    pub html_block_type: u8,
}

impl BlockScratch {
    pub fn open() -> Self {
        BlockScratch {
            open: true,
            ..Default::default()
        }
    }
}
