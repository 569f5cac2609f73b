//! Randomized depth-first trail carving with wall-break repair.
//!
//! The carver walks from `start`, turning one random `Undefined` neighbor
//! into `Trail` and every other `Undefined` neighbor into `Wall`. At a dead
//! end it pops the tile off the stack of mined tiles and tries to break
//! through a neighboring wall that touches exactly one trail, the popped
//! tile itself. Carving ends once only `start` is left and it has no
//! candidates. Every new trail tile is attached to exactly one existing
//! trail tile, so the carved trails form a tree and `start` and `end` are
//! joined by exactly one simple path.

use log::debug;
use serde::{Serialize, Deserialize};

use crate::error::{Result, WazeError};
use crate::maze::grid::{Grid, Tile};
use crate::rng::WazeRng;
use crate::types::Position;

/// One tile transition made while carving
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileChange {
    pub position: Position,
    pub from: Tile,
    pub to: Tile,
}

/// What happened during a carve
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CarveReport {
    /// Tiles turned into trail by regular carving
    pub carved: usize,
    /// Walls turned into trail by the repair rule
    pub wall_breaks: usize,
    /// Stack pops after dead ends
    pub backtracks: usize,
    /// Undefined tiles finalized as wall after the carve
    pub sealed_pockets: usize,
    /// Every tile transition, in order
    pub history: Vec<TileChange>,
}

/// Single-solution maze generator
#[derive(Clone, Copy, Debug, Default)]
pub struct TrailCarver;

struct CarveState<'g> {
    grid: &'g mut Grid,
    mined: Vec<Position>,
    end_connected: bool,
    report: CarveReport,
}

impl TrailCarver {
    pub fn new() -> Self {
        TrailCarver
    }

    /// Carve `grid` into a finished maze.
    ///
    /// The grid must be fresh: everything `Undefined` except `start` and
    /// `end`. Fails with `InvalidEndpoints` before touching the grid if the
    /// endpoints are unusable, and with `EndUnreachable` if the carve
    /// closed `end` off (the grid is then finished but unsolvable).
    pub fn carve(&self, grid: &mut Grid, rng: &mut WazeRng) -> Result<CarveReport> {
        let (start, end) = (grid.start(), grid.end());
        Grid::check_endpoints(grid.rows(), grid.cols(), start, end)?;
        if !grid.get(start)?.is_passable() || !grid.get(end)?.is_passable() {
            return Err(WazeError::invalid_endpoints(start, end, "endpoints must be trail tiles"));
        }

        let mut state = CarveState {
            grid,
            mined: vec![start],
            end_connected: false,
            report: CarveReport::default(),
        };

        while let Some(&current) = state.mined.last() {
            let mut candidates = state.candidates(current)?;

            if !candidates.is_empty() {
                rng.shuffle(&mut candidates);
                if let Some(chosen) = candidates.pop() {
                    state.decide(chosen, Tile::Trail)?;
                    for sibling in candidates {
                        state.decide(sibling, Tile::Wall)?;
                    }
                    state.report.carved += 1;
                    state.mined.push(chosen);
                }
                continue;
            }

            // Dead end: `start` alone on the stack means the carve is over.
            if state.mined.len() == 1 {
                break;
            }
            state.mined.pop();
            state.report.backtracks += 1;

            // The popped tile is scanned once, so it starts at most one repair.
            if let Some(wall) = state.breakable_wall(current)? {
                state.decide(wall, Tile::Trail)?;
                state.report.wall_breaks += 1;
                state.mined.push(wall);
            }
        }

        state.seal_pockets()?;

        let CarveState { end_connected, report, .. } = state;
        debug!(
            "carve finished: carved={} breaks={} backtracks={} pockets={} end_connected={}",
            report.carved, report.wall_breaks, report.backtracks, report.sealed_pockets, end_connected
        );

        if !end_connected {
            return Err(WazeError::EndUnreachable { attempts: 1 });
        }
        Ok(report)
    }
}

impl CarveState<'_> {
    /// Undefined neighbors of `current`. Touching `end` for the first time
    /// seals it so it can only ever be entered from `current`.
    fn candidates(&mut self, current: Position) -> Result<Vec<Position>> {
        let end = self.grid.end();
        let mut candidates = Vec::with_capacity(4);

        for next in self.grid.neighbors4(current) {
            if next == end {
                if !self.end_connected {
                    self.seal_end(current)?;
                }
                continue;
            }
            if self.grid.get(next)? == Tile::Undefined {
                candidates.push(next);
            }
        }
        Ok(candidates)
    }

    fn seal_end(&mut self, entry: Position) -> Result<()> {
        let end = self.grid.end();
        for next in self.grid.neighbors4(end) {
            if next != entry && self.grid.get(next)? == Tile::Undefined {
                self.decide(next, Tile::Wall)?;
            }
        }
        self.end_connected = true;
        Ok(())
    }

    fn breakable_wall(&self, current: Position) -> Result<Option<Position>> {
        for next in self.grid.neighbors4(current) {
            if is_breakable_wall(&*self.grid, next, self.end_connected)? {
                return Ok(Some(next));
            }
        }
        Ok(None)
    }

    fn decide(&mut self, pos: Position, tile: Tile) -> Result<()> {
        let from = self.grid.set(pos, tile)?;
        self.report.history.push(TileChange { position: pos, from, to: tile });
        Ok(())
    }

    fn seal_pockets(&mut self) -> Result<()> {
        let leftovers: Vec<Position> = self
            .grid
            .positions()
            .filter(|&pos| matches!(self.grid.get(pos), Ok(Tile::Undefined)))
            .collect();
        for pos in leftovers {
            self.decide(pos, Tile::Wall)?;
            self.report.sealed_pockets += 1;
        }
        Ok(())
    }
}

/// A wall can be broken when it touches exactly one trail tile.
///
/// While `end` is not yet attached to the carved tree it does not count as
/// a trail neighbor, which lets the repair rule attach it exactly once.
pub fn is_breakable_wall(grid: &Grid, pos: Position, end_connected: bool) -> Result<bool> {
    if grid.get(pos)? != Tile::Wall {
        return Ok(false);
    }
    let end = grid.end();
    let mut trails = 0;
    for next in grid.neighbors4(pos) {
        if next == end && !end_connected {
            continue;
        }
        if grid.get(next)?.is_passable() {
            trails += 1;
        }
    }
    Ok(trails == 1)
}
