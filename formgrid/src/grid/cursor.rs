use crate::event::Key;

/// Zero-based cell coordinates: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellPos {
    pub x: usize,
    pub y: usize,
}

impl CellPos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Cursor movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    /// Right, wrapping to the first column of the next row, and from the last
    /// cell back to the first.
    Tab,
}

impl Direction {
    /// Map a navigation key. Shift+Tab arrives as `BackTab` and walks the same
    /// forward order as Tab.
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Tab | Key::BackTab => Some(Direction::Tab),
            _ => None,
        }
    }
}

/// Inclusive navigable area of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl Bounds {
    /// Column 0 holds the row checkbox and is never navigable.
    pub const FIRST_COLUMN: usize = 1;

    /// Bounds for a grid of the given size, or `None` when there is nothing to
    /// navigate (no rows, or no column besides the reserved one).
    pub fn from_dimensions(columns: usize, rows: usize) -> Option<Self> {
        if rows == 0 || columns <= Self::FIRST_COLUMN {
            return None;
        }
        Some(Self {
            min_x: Self::FIRST_COLUMN,
            min_y: 0,
            max_x: columns - 1,
            max_y: rows - 1,
        })
    }

    pub fn origin(&self) -> CellPos {
        CellPos::new(self.min_x, self.min_y)
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        (self.min_x..=self.max_x).contains(&pos.x) && (self.min_y..=self.max_y).contains(&pos.y)
    }

    pub fn clamp(&self, pos: CellPos) -> CellPos {
        CellPos::new(
            pos.x.clamp(self.min_x, self.max_x),
            pos.y.clamp(self.min_y, self.max_y),
        )
    }

    /// Pure cursor transition. Arrows clamp at the edges, Tab wraps columns
    /// first and then rows.
    pub fn step(&self, pos: CellPos, direction: Direction) -> CellPos {
        let CellPos { mut x, mut y } = pos;
        match direction {
            Direction::Up => {
                if y > self.min_y {
                    y -= 1;
                }
            }
            Direction::Down => {
                if y < self.max_y {
                    y += 1;
                }
            }
            Direction::Left => {
                if x > self.min_x {
                    x -= 1;
                }
            }
            Direction::Right => {
                if x < self.max_x {
                    x += 1;
                }
            }
            Direction::Tab => {
                if x < self.max_x {
                    x += 1;
                } else {
                    x = self.min_x;
                    y = if y < self.max_y { y + 1 } else { self.min_y };
                }
            }
        }
        CellPos::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::from_dimensions(4, 2).unwrap()
    }

    #[test]
    fn test_from_dimensions() {
        assert_eq!(
            bounds(),
            Bounds {
                min_x: 1,
                min_y: 0,
                max_x: 3,
                max_y: 1
            }
        );
        assert_eq!(Bounds::from_dimensions(1, 5), None);
        assert_eq!(Bounds::from_dimensions(4, 0), None);
    }

    #[test]
    fn test_arrows_clamp_at_edges() {
        let b = bounds();
        assert_eq!(b.step(CellPos::new(1, 0), Direction::Left), CellPos::new(1, 0));
        assert_eq!(b.step(CellPos::new(1, 0), Direction::Up), CellPos::new(1, 0));
        assert_eq!(b.step(CellPos::new(3, 1), Direction::Right), CellPos::new(3, 1));
        assert_eq!(b.step(CellPos::new(3, 1), Direction::Down), CellPos::new(3, 1));
        assert_eq!(b.step(CellPos::new(2, 0), Direction::Down), CellPos::new(2, 1));
        assert_eq!(b.step(CellPos::new(2, 1), Direction::Left), CellPos::new(1, 1));
    }

    #[test]
    fn test_tab_advances_within_row() {
        assert_eq!(bounds().step(CellPos::new(1, 1), Direction::Tab), CellPos::new(2, 1));
    }

    #[test]
    fn test_tab_wraps_to_next_row() {
        assert_eq!(bounds().step(CellPos::new(3, 0), Direction::Tab), CellPos::new(1, 1));
    }

    #[test]
    fn test_tab_wraps_to_origin() {
        assert_eq!(bounds().step(CellPos::new(3, 1), Direction::Tab), CellPos::new(1, 0));
    }

    #[test]
    fn test_tab_cycles_whole_grid() {
        let b = bounds();
        let mut pos = b.origin();
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(pos);
            pos = b.step(pos, Direction::Tab);
        }
        assert_eq!(pos, b.origin());
        assert_eq!(seen.len(), 6);
        assert!(seen.iter().all(|p| b.contains(*p)));
    }

    #[test]
    fn test_direction_from_key() {
        assert_eq!(Direction::from_key(Key::Tab), Some(Direction::Tab));
        assert_eq!(Direction::from_key(Key::Up), Some(Direction::Up));
        assert_eq!(Direction::from_key(Key::Enter), None);
    }
}
