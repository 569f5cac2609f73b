use ndarray::Array3;
use serde::{Serialize, Deserialize};

use crate::error::{Result, WazeError};
use crate::maze::Grid;
use crate::types::{Action, Position};

/// One Q-table cell: a learned value, or a masked-out action.
///
/// Masked entries carry no number at all, so they can never win a
/// comparison or leak into a backup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum QEntry {
    Valid(f32),
    Invalid,
}

impl QEntry {
    pub fn value(self) -> Option<f32> {
        match self {
            QEntry::Valid(v) => Some(v),
            QEntry::Invalid => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, QEntry::Valid(_))
    }
}

/// Action-value table indexed by `(row, col, action)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    entries: Array3<QEntry>,
}

impl QTable {
    /// Build the table for a finished grid.
    ///
    /// An entry is invalid when its tile is not passable, or when the move
    /// leaves the grid or lands on a non-passable tile. Every other entry
    /// starts at `0.0`.
    pub fn new(grid: &Grid) -> Self {
        let mut entries = Array3::from_elem((grid.rows(), grid.cols(), Action::COUNT), QEntry::Invalid);

        for pos in grid.positions() {
            if !matches!(grid.get(pos), Ok(tile) if tile.is_passable()) {
                continue;
            }
            for action in grid.open_moves(pos) {
                entries[[pos.row, pos.col, action.index()]] = QEntry::Valid(0.0);
            }
        }

        QTable { entries }
    }

    pub fn rows(&self) -> usize {
        self.entries.shape()[0]
    }

    pub fn cols(&self) -> usize {
        self.entries.shape()[1]
    }

    fn check(&self, pos: Position) -> Result<()> {
        if pos.row < self.rows() && pos.col < self.cols() {
            Ok(())
        } else {
            Err(WazeError::OutOfBounds {
                position: pos,
                rows: self.rows(),
                cols: self.cols(),
            })
        }
    }

    pub fn get(&self, pos: Position, action: Action) -> Result<QEntry> {
        self.check(pos)?;
        Ok(self.entries[[pos.row, pos.col, action.index()]])
    }

    /// Overwrite a valid entry. Masked entries stay masked.
    pub fn set(&mut self, pos: Position, action: Action, value: f32) -> Result<()> {
        self.check(pos)?;
        match &mut self.entries[[pos.row, pos.col, action.index()]] {
            QEntry::Valid(v) => {
                *v = value;
                Ok(())
            }
            QEntry::Invalid => Err(WazeError::invalid_parameter(
                "action".to_string(),
                format!("{} is masked at {}", action, pos),
            )),
        }
    }

    /// Valid actions at `pos`, in table order
    pub fn valid_actions(&self, pos: Position) -> Result<Vec<Action>> {
        self.check(pos)?;
        Ok(Action::ALL
            .into_iter()
            .filter(|a| self.entries[[pos.row, pos.col, a.index()]].is_valid())
            .collect())
    }

    /// Highest-valued valid action, first in table order on ties.
    ///
    /// `None` when no action is valid at `pos`.
    pub fn best(&self, pos: Position) -> Result<Option<(Action, f32)>> {
        self.check(pos)?;
        let mut best: Option<(Action, f32)> = None;
        for action in Action::ALL {
            if let QEntry::Valid(v) = self.entries[[pos.row, pos.col, action.index()]] {
                match best {
                    Some((_, current)) if v <= current => {}
                    _ => best = Some((action, v)),
                }
            }
        }
        Ok(best)
    }

    /// Max over valid entries at `pos`
    pub fn max_value(&self, pos: Position) -> Result<Option<f32>> {
        Ok(self.best(pos)?.map(|(_, v)| v))
    }

    /// Number of valid entries in the whole table
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_valid()).count()
    }

    /// Iterate over `(position, action, entry)` triples
    pub fn iter(&self) -> impl Iterator<Item = (Position, Action, QEntry)> + '_ {
        self.entries.indexed_iter().filter_map(|((row, col, a), entry)| {
            Action::from_index(a).map(|action| (Position::new(row, col), action, *entry))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        Grid::from_ascii(
            "S..\n\
             ##.\n\
             E..",
        )
        .unwrap()
    }

    #[test]
    fn test_masking_follows_walls_and_edges() {
        let table = QTable::new(&corridor());
        let start = Position::new(0, 0);
        assert_eq!(table.valid_actions(start).unwrap(), vec![Action::Right]);
        assert_eq!(table.get(start, Action::Up).unwrap(), QEntry::Invalid);
        assert_eq!(table.get(start, Action::Down).unwrap(), QEntry::Invalid);
        assert_eq!(table.get(start, Action::Right).unwrap(), QEntry::Valid(0.0));

        // Wall tiles have no valid action at all
        let wall = Position::new(1, 0);
        assert!(table.valid_actions(wall).unwrap().is_empty());
        assert_eq!(table.best(wall).unwrap(), None);
    }

    #[test]
    fn test_best_breaks_ties_in_table_order() {
        let table = QTable::new(&corridor());
        // (0,2): Down and Left valid, both 0.0
        let (action, value) = table.best(Position::new(0, 2)).unwrap().unwrap();
        assert_eq!(action, Action::Down);
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_best_ignores_masked_entries() {
        let mut table = QTable::new(&corridor());
        let pos = Position::new(0, 1);
        table.set(pos, Action::Left, -5.0).unwrap();
        table.set(pos, Action::Right, -3.0).unwrap();
        // Up and Down are masked; a negative valid value still wins
        assert_eq!(table.best(pos).unwrap(), Some((Action::Right, -3.0)));
        assert_eq!(table.max_value(pos).unwrap(), Some(-3.0));
    }

    #[test]
    fn test_set_rejects_masked_entry() {
        let mut table = QTable::new(&corridor());
        assert!(table.set(Position::new(0, 0), Action::Up, 1.0).is_err());
        assert_eq!(table.get(Position::new(0, 0), Action::Up).unwrap(), QEntry::Invalid);
    }

    #[test]
    fn test_out_of_bounds() {
        let table = QTable::new(&corridor());
        assert!(matches!(
            table.get(Position::new(3, 0), Action::Up),
            Err(WazeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_valid_count() {
        let table = QTable::new(&corridor());
        // S-(0,1)-(0,2)-(1,2)-(2,2)-(2,1)-E: 6 edges, 2 entries each
        assert_eq!(table.valid_count(), 12);
    }
}
