//! Carve a maze, train a Q-learning agent on it and print the learned route.
//!
//! Usage: cargo run --example maze_walk -- [rows] [cols] [seed] [episodes]
//!
//! Set RUST_LOG=info to see training progress.

use std::collections::HashSet;

use waze::agent::QLearningAgentBuilder;
use waze::maze::{Grid, MazeBuilder, Tile};
use waze::training::Trainer;
use waze::types::Position;

fn arg_or(index: usize, default: u64) -> u64 {
    std::env::args()
        .nth(index)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(default)
}

/// Grid text with the walked route drawn as `*`
fn render_route(grid: &Grid, route: &HashSet<Position>) -> String {
    let mut out = String::new();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let pos = Position::new(row, col);
            let ch = if pos == grid.start() {
                'S'
            } else if pos == grid.end() {
                'E'
            } else if route.contains(&pos) {
                '*'
            } else {
                match grid.get(pos) {
                    Ok(Tile::Trail) => '.',
                    Ok(Tile::Wall) => '#',
                    _ => '?',
                }
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let rows = arg_or(1, 10) as usize;
    let cols = arg_or(2, 10) as usize;
    let seed = arg_or(3, 42);
    let episodes = arg_or(4, 1000) as usize;

    println!("=== Carving a {}x{} maze (seed {}) ===", rows, cols, seed);
    let (maze, rng) = MazeBuilder::new().size(rows, cols).seed(seed).build()?;
    println!("{}", maze.grid);
    println!(
        "carved {} tiles, {} wall breaks, {} backtracks, {} attempt(s)",
        maze.report.carved, maze.report.wall_breaks, maze.report.backtracks, maze.attempts
    );

    println!("\n=== Training for {} episodes ===", episodes);
    let agent = QLearningAgentBuilder::new()
        .grid(maze.grid.clone())
        .rng(rng)
        .episodes(episodes)
        .build()?;
    let mut trainer = Trainer::new(agent);
    let history = trainer.train()?;

    if let (Some(first), Some(last)) = (history.first(), history.last()) {
        println!("first episode: {} steps, reward {:.1}", first.steps, first.total_reward);
        println!("last episode:  {} steps, reward {:.1}", last.steps, last.total_reward);
    }
    if let Some(avg) = trainer.metrics().avg_episode_length(100) {
        println!("mean length over the last 100 episodes: {:.1}", avg);
    }

    println!("\n=== Greedy walk ===");
    let walk = trainer.walk()?;
    let route: HashSet<Position> = walk.iter().copied().collect();
    println!("{}", render_route(&maze.grid, &route));
    for (step, pos) in walk.iter().enumerate() {
        println!("{:>3}: {}", step, pos);
    }
    println!("reached {} in {} steps", maze.grid.end(), walk.steps());

    Ok(())
}
