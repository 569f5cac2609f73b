//! # Reinforcement Learning Agents Module
//!
//! Tabular Q-learning over a carved maze.
//!
//! ## Core Concepts
//!
//! - **Q-table**: one entry per `(row, col, action)`, either a learned value
//!   or an explicit invalid marker for moves off the grid or into walls
//! - **Epsilon-greedy**: explore uniformly among valid actions with
//!   probability ε, otherwise take the best valid action
//! - **Decay**: ε is multiplied by a fixed factor after every episode
//!
//! ## Example Usage
//!
//! ```rust
//! use waze::agent::{QLearningAgentBuilder, TabularAgent};
//! use waze::maze::Grid;
//!
//! let grid = Grid::from_ascii("#S###\n#...#\n###.#\n#...#\n#E###").unwrap();
//!
//! let mut agent = QLearningAgentBuilder::new()
//!     .grid(grid)
//!     .seed(3)
//!     .build()
//!     .unwrap();
//!
//! agent.learn(300).unwrap();
//! let first = agent.greedy_action(agent.grid().start()).unwrap();
//! assert_eq!(first, waze::types::Action::Down);
//! ```

pub mod q_table;
pub mod traits;

mod qlearning;
pub use q_table::{QEntry, QTable};
pub use qlearning::{EpisodeStats, QLearningAgent, QLearningAgentBuilder, TrainingConfig, Transition};
pub use traits::TabularAgent;
