//! # Maze Module
//!
//! Grid representation and single-solution maze generation.
//!
//! - [`Grid`]: the tile matrix with its start and end tiles
//! - [`TrailCarver`]: randomized depth-first carving with wall-break repair
//! - [`MazeBuilder`]: configuration, random endpoints and retries
//!
//! ```rust
//! use waze::maze::{MazeBuilder, Tile};
//! use waze::types::Position;
//!
//! let (maze, _rng) = MazeBuilder::new()
//!     .size(6, 6)
//!     .start(Position::new(0, 2))
//!     .end(Position::new(5, 3))
//!     .seed(1)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(maze.grid.count(Tile::Undefined), 0);
//! assert!(maze.grid.shortest_path(maze.grid.start(), maze.grid.end()).is_some());
//! ```

pub mod builder;
pub mod carver;
pub mod grid;

pub use builder::{Maze, MazeBuilder, MazeConfig};
pub use carver::{is_breakable_wall, CarveReport, TileChange, TrailCarver};
pub use grid::{Grid, Tile};
