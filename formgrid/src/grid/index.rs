use std::collections::HashMap;

use crate::document::{InputId, Table};

use super::cursor::CellPos;

/// Input-to-cell lookup built once from the table structure.
///
/// Rows added to the table afterwards are not indexed.
#[derive(Debug, Clone, Default)]
pub struct GridIndex {
    positions: HashMap<InputId, CellPos>,
}

impl GridIndex {
    pub fn build(table: &Table) -> Self {
        let mut positions = HashMap::new();
        for (y, row) in table.rows.iter().enumerate() {
            for (x, cell) in row.cells.iter().enumerate() {
                for input in &cell.inputs {
                    if positions.insert(input.id.clone(), CellPos::new(x, y)).is_some() {
                        log::warn!("[grid_index] duplicate input id {}", input.id);
                    }
                }
            }
        }
        Self { positions }
    }

    pub fn position_of(&self, id: &InputId) -> Option<CellPos> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
