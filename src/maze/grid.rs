use ndarray::Array2;
use serde::{Serialize, Deserialize};
use std::collections::VecDeque;
use std::fmt;

use crate::error::{Result, WazeError};
use crate::types::{Action, Position};

/// State of one maze cell.
///
/// `Undefined` only exists while carving; a finished maze holds nothing
/// but `Wall` and `Trail`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Undefined,
    Wall,
    Trail,
}

impl Tile {
    pub fn is_passable(self) -> bool {
        self == Tile::Trail
    }

    pub fn is_decided(self) -> bool {
        self != Tile::Undefined
    }
}

/// Rectangular tile matrix with designated start and end tiles.
///
/// # Text layout
///
/// `Display` and [`Grid::from_ascii`] share one format, one line per row:
/// `#` wall, `.` trail, `?` undefined, `S` start, `E` end.
///
/// ```
/// use waze::maze::{Grid, Tile};
/// use waze::types::Position;
///
/// let grid = Grid::from_ascii("S.#\n#.#\n#.E").unwrap();
/// assert_eq!(grid.start(), Position::new(0, 0));
/// assert_eq!(grid.get(Position::new(1, 1)).unwrap(), Tile::Trail);
/// assert_eq!(grid.to_string(), "S.#\n#.#\n#.E\n");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    tiles: Array2<Tile>,
    start: Position,
    end: Position,
}

impl Grid {
    /// Create an all-`Undefined` grid with `start` and `end` set to `Trail`.
    pub fn new(rows: usize, cols: usize, start: Position, end: Position) -> Result<Self> {
        if rows < 2 || cols < 2 {
            return Err(WazeError::invalid_parameter(
                "shape".to_string(),
                format!("grid must be at least 2x2, got {}x{}", rows, cols),
            ));
        }

        let mut tiles = Array2::from_elem((rows, cols), Tile::Undefined);
        Self::check_endpoints(rows, cols, start, end)?;
        tiles[[start.row, start.col]] = Tile::Trail;
        tiles[[end.row, end.col]] = Tile::Trail;

        Ok(Grid { tiles, start, end })
    }

    pub(crate) fn check_endpoints(rows: usize, cols: usize, start: Position, end: Position) -> Result<()> {
        let inside = |p: Position| p.row < rows && p.col < cols;
        if !inside(start) {
            return Err(WazeError::invalid_endpoints(start, end, "start is outside the grid"));
        }
        if !inside(end) {
            return Err(WazeError::invalid_endpoints(start, end, "end is outside the grid"));
        }
        if start == end {
            return Err(WazeError::invalid_endpoints(start, end, "start and end coincide"));
        }
        Ok(())
    }

    /// Parse the text layout produced by `Display`.
    ///
    /// Exactly one `S` and one `E` are required and all rows must have the
    /// same width. Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(layout: &str) -> Result<Self> {
        let lines: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let rows = lines.len();
        let cols = lines.first().map(|line| line.chars().count()).unwrap_or(0);
        if rows < 2 || cols < 2 {
            return Err(WazeError::invalid_parameter(
                "layout".to_string(),
                format!("grid must be at least 2x2, got {}x{}", rows, cols),
            ));
        }

        let mut tiles = Array2::from_elem((rows, cols), Tile::Undefined);
        let mut start = None;
        let mut end = None;

        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(WazeError::invalid_parameter(
                    "layout".to_string(),
                    format!("row {} has width {}, expected {}", row, line.chars().count(), cols),
                ));
            }
            for (col, ch) in line.chars().enumerate() {
                let pos = Position::new(row, col);
                tiles[[row, col]] = match ch {
                    '#' => Tile::Wall,
                    '.' => Tile::Trail,
                    '?' => Tile::Undefined,
                    'S' => {
                        if start.replace(pos).is_some() {
                            return Err(WazeError::invalid_parameter("layout", "more than one 'S'"));
                        }
                        Tile::Trail
                    }
                    'E' => {
                        if end.replace(pos).is_some() {
                            return Err(WazeError::invalid_parameter("layout", "more than one 'E'"));
                        }
                        Tile::Trail
                    }
                    other => {
                        return Err(WazeError::invalid_parameter(
                            "layout".to_string(),
                            format!("unknown tile character '{}' at {}", other, pos),
                        ))
                    }
                };
            }
        }

        let start = start.ok_or_else(|| WazeError::invalid_parameter("layout", "missing 'S'"))?;
        let end = end.ok_or_else(|| WazeError::invalid_parameter("layout", "missing 'E'"))?;

        Ok(Grid { tiles, start, end })
    }

    pub fn rows(&self) -> usize {
        self.tiles.nrows()
    }

    pub fn cols(&self) -> usize {
        self.tiles.ncols()
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows() && pos.col < self.cols()
    }

    pub fn get(&self, pos: Position) -> Result<Tile> {
        self.tiles
            .get([pos.row, pos.col])
            .copied()
            .ok_or_else(|| self.out_of_bounds(pos))
    }

    /// Overwrite a tile, returning what was there before.
    pub fn set(&mut self, pos: Position, tile: Tile) -> Result<Tile> {
        let err = self.out_of_bounds(pos);
        let slot = self.tiles.get_mut([pos.row, pos.col]).ok_or(err)?;
        Ok(std::mem::replace(slot, tile))
    }

    fn out_of_bounds(&self, pos: Position) -> WazeError {
        WazeError::OutOfBounds {
            position: pos,
            rows: self.rows(),
            cols: self.cols(),
        }
    }

    /// Destination of `action` from `pos`, if it stays inside the grid
    pub fn neighbor(&self, pos: Position, action: Action) -> Option<Position> {
        pos.step(action).filter(|next| self.is_in_bounds(*next))
    }

    /// In-bounds orthogonal neighbors, always in Up, Left, Right, Down order.
    pub fn neighbors4(&self, pos: Position) -> Vec<Position> {
        [Action::Up, Action::Left, Action::Right, Action::Down]
            .into_iter()
            .filter_map(|action| self.neighbor(pos, action))
            .collect()
    }

    /// Actions from `pos` that land on a passable tile
    pub fn open_moves(&self, pos: Position) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|&action| {
                self.neighbor(pos, action)
                    .map_or(false, |next| self.tiles[[next.row, next.col]].is_passable())
            })
            .collect()
    }

    /// Number of orthogonal neighbors that are `Trail`
    pub fn trail_neighbors(&self, pos: Position) -> usize {
        self.neighbors4(pos)
            .into_iter()
            .filter(|next| self.tiles[[next.row, next.col]].is_passable())
            .count()
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// True once no `Undefined` tile is left
    pub fn is_finished(&self) -> bool {
        self.tiles.iter().all(|t| t.is_decided())
    }

    /// Iterate over every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let cols = self.cols();
        (0..self.rows() * cols).map(move |i| Position::new(i / cols, i % cols))
    }

    /// Shortest trail path from `from` to `to`, both included.
    ///
    /// On a carved maze the trails form a tree, so this is the only path.
    pub fn shortest_path(&self, from: Position, to: Position) -> Option<Vec<Position>> {
        if !self.get(from).ok()?.is_passable() || !self.get(to).ok()?.is_passable() {
            return None;
        }

        let mut parent: Array2<Option<Position>> = Array2::from_elem(self.tiles.raw_dim(), None);
        let mut queue = VecDeque::from([from]);
        parent[[from.row, from.col]] = Some(from);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to];
                let mut cursor = to;
                while cursor != from {
                    cursor = parent[[cursor.row, cursor.col]]?;
                    path.push(cursor);
                }
                path.reverse();
                return Some(path);
            }
            for action in self.open_moves(current) {
                if let Some(next) = self.neighbor(current, action) {
                    if parent[[next.row, next.col]].is_none() {
                        parent[[next.row, next.col]] = Some(current);
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.tiles.outer_iter().enumerate() {
            for (col, tile) in line.iter().enumerate() {
                let pos = Position::new(row, col);
                let ch = if pos == self.start {
                    'S'
                } else if pos == self.end {
                    'E'
                } else {
                    match tile {
                        Tile::Undefined => '?',
                        Tile::Wall => '#',
                        Tile::Trail => '.',
                    }
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
