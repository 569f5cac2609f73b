//! # Waze - Maze Generation and Tabular Q-Learning
//!
//! Waze carves rectangular mazes that have exactly one solution path and
//! trains a Q-learning agent to find that path without being told it.
//!
//! ## Key Features
//!
//! - **Single-solution mazes**: randomized depth-first carving with
//!   wall-break repair, so the trails always form a tree
//! - **Action masking**: moves off the grid or into walls are marked invalid
//!   in the Q-table and never selected or backed up
//! - **Reproducible**: one seedable random stream drives carving and
//!   exploration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use waze::maze::MazeBuilder;
//! use waze::agent::QLearningAgentBuilder;
//! use waze::training::Trainer;
//!
//! // Carve a 10x10 maze
//! let (maze, rng) = MazeBuilder::new().size(10, 10).seed(42).build().unwrap();
//! println!("{}", maze.grid);
//!
//! // Train an agent on it, continuing the same random stream
//! let agent = QLearningAgentBuilder::new()
//!     .grid(maze.grid)
//!     .rng(rng)
//!     .episodes(1000)
//!     .build()
//!     .unwrap();
//! let mut trainer = Trainer::new(agent);
//! trainer.train().unwrap();
//!
//! // Replay the greedy policy
//! for pos in &trainer.walk().unwrap() {
//!     println!("{}", pos);
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`] - Q-table and the epsilon-greedy Q-learning agent
//! - [`error`] - Error types and result handling
//! - [`maze`] - Grid, trail carver and maze builder
//! - [`metrics`] - Training metrics and tracking
//! - [`rng`] - The shared seedable random source
//! - [`training`] - Episode driver and greedy walker
//! - [`types`] - Positions and actions

pub mod agent;
pub mod error;
pub mod maze;
pub mod metrics;
pub mod rng;
pub mod training;
pub mod types;

pub use error::{Result, WazeError};

#[cfg(test)]
mod tests;
