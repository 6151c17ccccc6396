//! Edit box positioning.

/// Document-space offset of the clicked cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellOffset {
    pub left: i32,
    pub top: i32,
}

impl CellOffset {
    pub fn new(left: i32, top: i32) -> Self {
        Self { left, top }
    }
}

/// Where the edit box is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoxPlacement {
    pub left: i32,
    pub top: i32,
}

impl BoxPlacement {
    /// Align the box with the cell's left edge; if it would run past the
    /// document's right edge (less `margin`), shift it left by the overflow.
    pub fn compute(cell: CellOffset, box_width: i32, document_width: i32, margin: i32) -> Self {
        let overflow = document_width - cell.left - box_width - margin;
        let left = if overflow < 0 {
            cell.left + overflow
        } else {
            cell.left
        };
        Self {
            left,
            top: cell.top,
        }
    }
}
