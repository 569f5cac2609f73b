use log::{debug, warn};
use serde::{Serialize, Deserialize};

use crate::error::{Result, WazeError};
use crate::maze::carver::{CarveReport, TrailCarver};
use crate::maze::grid::Grid;
use crate::rng::WazeRng;
use crate::types::Position;

/// Maze generation settings.
///
/// Endpoints left as `None` are drawn at random: `start` on the first row,
/// `end` on the last row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    pub rows: usize,
    pub cols: usize,
    pub start: Option<Position>,
    pub end: Option<Position>,
    pub seed: Option<u64>,
    /// Carve attempts before giving up on an unreachable end
    pub max_attempts: usize,
}

impl MazeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rows < 2 || self.cols < 2 {
            return Err(WazeError::invalid_parameter(
                "shape".to_string(),
                format!("grid must be at least 2x2, got {}x{}", self.rows, self.cols),
            ));
        }
        if self.max_attempts == 0 {
            return Err(WazeError::invalid_parameter("max_attempts", "must be at least 1"));
        }
        Ok(())
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        MazeConfig {
            rows: 10,
            cols: 10,
            start: None,
            end: None,
            seed: None,
            max_attempts: 16,
        }
    }
}

/// A carved maze together with the report of the successful attempt
#[derive(Clone, Debug, PartialEq)]
pub struct Maze {
    pub grid: Grid,
    pub report: CarveReport,
    pub attempts: usize,
}

/// Builder pattern for carved mazes
///
/// ```
/// use waze::maze::MazeBuilder;
/// use waze::rng::WazeRng;
///
/// let mut rng = WazeRng::new(11);
/// let maze = MazeBuilder::new()
///     .size(8, 8)
///     .build_with(&mut rng)
///     .unwrap();
/// assert!(maze.grid.is_finished());
/// ```
#[derive(Clone, Debug, Default)]
pub struct MazeBuilder {
    config: MazeConfig,
}

impl MazeBuilder {
    pub fn new() -> Self {
        MazeBuilder { config: MazeConfig::default() }
    }

    pub fn from_config(config: MazeConfig) -> Self {
        MazeBuilder { config }
    }

    pub fn size(mut self, rows: usize, cols: usize) -> Self {
        self.config.rows = rows;
        self.config.cols = cols;
        self
    }

    pub fn start(mut self, start: Position) -> Self {
        self.config.start = Some(start);
        self
    }

    pub fn end(mut self, end: Position) -> Self {
        self.config.end = Some(end);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// Build with a fresh rng from the configured seed (or entropy).
    ///
    /// The rng is returned so the agent can continue the same stream.
    pub fn build(self) -> Result<(Maze, WazeRng)> {
        let mut rng = match self.config.seed {
            Some(seed) => WazeRng::new(seed),
            None => WazeRng::from_entropy(),
        };
        let maze = self.build_with(&mut rng)?;
        Ok((maze, rng))
    }

    /// Build drawing all randomness from `rng`.
    pub fn build_with(self, rng: &mut WazeRng) -> Result<Maze> {
        self.config.validate()?;
        let MazeConfig { rows, cols, start, end, max_attempts, .. } = self.config;

        let start = start.unwrap_or_else(|| Position::new(0, rng.gen_index(cols)));
        let end = end.unwrap_or_else(|| Position::new(rows - 1, rng.gen_index(cols)));

        let carver = TrailCarver::new();
        for attempt in 1..=max_attempts {
            let mut grid = Grid::new(rows, cols, start, end)?;
            match carver.carve(&mut grid, rng) {
                Ok(report) => {
                    debug!("maze {}x{} {} -> {} carved on attempt {}", rows, cols, start, end, attempt);
                    return Ok(Maze { grid, report, attempts: attempt });
                }
                Err(WazeError::EndUnreachable { .. }) => {
                    warn!("attempt {} closed off the end tile {}, retrying", attempt, end);
                }
                Err(err) => return Err(err),
            }
        }

        Err(WazeError::EndUnreachable { attempts: max_attempts })
    }
}
