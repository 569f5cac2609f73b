//! # Training Module
//!
//! Drives Q-learning episodes and replays the learned greedy policy.
//!
//! ```rust,no_run
//! use waze::agent::QLearningAgentBuilder;
//! use waze::maze::MazeBuilder;
//! use waze::training::Trainer;
//!
//! let (maze, rng) = MazeBuilder::new().size(5, 5).seed(21).build().unwrap();
//! let agent = QLearningAgentBuilder::new()
//!     .grid(maze.grid)
//!     .rng(rng)
//!     .episodes(500)
//!     .build()
//!     .unwrap();
//!
//! let mut trainer = Trainer::new(agent);
//! trainer.train().unwrap();
//! let walk = trainer.walk().unwrap();
//! assert_eq!(walk.path().last(), Some(&trainer.agent().grid().end()));
//! ```

pub mod trainer;
pub mod walker;

pub use trainer::Trainer;
pub use walker::{Walk, Walker};
