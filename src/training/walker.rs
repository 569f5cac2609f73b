use log::{debug, warn};
use serde::{Serialize, Deserialize};

use crate::agent::TabularAgent;
use crate::error::{Result, WazeError};
use crate::maze::Grid;
use crate::types::Position;

/// Ordered positions visited by a greedy walk, `start` first and `end` last.
///
/// The walk is stored, so it can be iterated as many times as needed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walk {
    path: Vec<Position>,
}

impl Walk {
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// Number of moves made
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.path.iter()
    }

    pub fn into_inner(self) -> Vec<Position> {
        self.path
    }
}

impl<'a> IntoIterator for &'a Walk {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.path.iter()
    }
}

/// Replays an agent's greedy policy from start to end.
#[derive(Clone, Copy, Debug)]
pub struct Walker {
    max_steps: usize,
}

impl Walker {
    pub fn new(max_steps: usize) -> Self {
        Walker { max_steps }
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Follow `agent`'s greedy action from `grid.start()` until `grid.end()`.
    ///
    /// Fails with `PolicyDidNotConverge` once more than `max_steps` moves
    /// would be needed, which is how a cycling policy shows up.
    pub fn walk<A: TabularAgent + ?Sized>(&self, agent: &A, grid: &Grid) -> Result<Walk> {
        let mut position = grid.start();
        let mut path = vec![position];

        while position != grid.end() {
            if path.len() > self.max_steps {
                warn!("greedy walk exceeded {} steps", self.max_steps);
                return Err(WazeError::PolicyDidNotConverge { max_steps: self.max_steps });
            }
            let action = agent.greedy_action(position)?;
            position = grid.neighbor(position, action).ok_or(WazeError::OutOfBounds {
                position,
                rows: grid.rows(),
                cols: grid.cols(),
            })?;
            path.push(position);
        }

        debug!("greedy walk reached {} in {} steps", grid.end(), path.len() - 1);
        Ok(Walk { path })
    }
}
