// Test modules for all components
pub mod test_agent;

use crate::maze::{Grid, Tile};
use crate::types::{Action, Position};

/// Small maze with one dead end, solved in four moves
pub(crate) fn branch_grid() -> Grid {
    Grid::from_ascii(
        "S..\n\
         #.#\n\
         #.E",
    )
    .unwrap()
}

/// Number of adjacent trail pairs
pub(crate) fn trail_edges(grid: &Grid) -> usize {
    grid.positions()
        .filter(|&pos| grid.get(pos).unwrap() == Tile::Trail)
        .map(|pos| {
            [Action::Down, Action::Right]
                .into_iter()
                .filter_map(|a| grid.neighbor(pos, a))
                .filter(|&next| grid.get(next).unwrap() == Tile::Trail)
                .count()
        })
        .sum()
}

/// Trails form one connected tree containing `start`
pub(crate) fn is_trail_tree(grid: &Grid) -> bool {
    let trails: Vec<Position> = grid
        .positions()
        .filter(|&pos| grid.get(pos).unwrap() == Tile::Trail)
        .collect();
    let connected = trails
        .iter()
        .all(|&pos| grid.shortest_path(grid.start(), pos).is_some());
    connected && trail_edges(grid) + 1 == trails.len()
}
