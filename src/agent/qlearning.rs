use log::debug;
use serde::{Serialize, Deserialize};

use crate::agent::q_table::QTable;
use crate::agent::traits::TabularAgent;
use crate::error::{Result, WazeError};
use crate::maze::Grid;
use crate::rng::WazeRng;
use crate::training::{Walk, Walker};
use crate::types::{Action, Position};

/// Hyperparameters for Q-learning and the greedy walk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Episodes run by `Trainer::train`
    pub episodes: usize,
    /// Learning rate α, in (0, 1]
    pub learning_rate: f32,
    /// Discount factor γ, in [0, 1]
    pub discount_factor: f32,
    /// Initial exploration rate ε, in [0, 1]
    pub epsilon: f32,
    /// Multiplicative ε decay per episode, in (0, 1]
    pub epsilon_decay: f32,
    /// Reward for every non-terminal move (negative)
    pub move_reward: f32,
    /// Reward for the move that reaches the end (positive)
    pub terminal_reward: f32,
    /// Step bound for the greedy walk
    pub max_walk_steps: usize,
    /// Log progress every this many episodes (0 disables)
    pub log_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            episodes: 500,
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon: 1.0,
            epsilon_decay: 0.99,
            move_reward: -1.0,
            terminal_reward: 10.0,
            max_walk_steps: 1000,
            log_interval: 100,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(WazeError::invalid_parameter("learning_rate", "must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(WazeError::invalid_parameter("discount_factor", "must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(WazeError::invalid_parameter("epsilon", "must be in [0, 1]"));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(WazeError::invalid_parameter("epsilon_decay", "must be in (0, 1]"));
        }
        if !(self.move_reward < 0.0) {
            return Err(WazeError::invalid_parameter("move_reward", "must be negative"));
        }
        if !(self.terminal_reward > 0.0) {
            return Err(WazeError::invalid_parameter("terminal_reward", "must be positive"));
        }
        if self.max_walk_steps == 0 {
            return Err(WazeError::invalid_parameter("max_walk_steps", "must be at least 1"));
        }
        Ok(())
    }
}

/// Outcome of a single move
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub next: Position,
    pub reward: f32,
    pub done: bool,
}

/// Summary of one finished training episode
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub steps: usize,
    pub total_reward: f32,
    /// ε used during the episode (before decay)
    pub epsilon: f32,
}

/// Tabular Q-learning agent over a finished maze.
///
/// The agent owns the grid (read-only), the Q-table and the random
/// stream used for exploration.
///
/// # Example
///
/// ```rust
/// use waze::agent::{QLearningAgent, TrainingConfig};
/// use waze::maze::Grid;
/// use waze::rng::WazeRng;
///
/// let grid = Grid::from_ascii("S.#\n#.#\n#.E").unwrap();
/// let mut agent = QLearningAgent::new(grid, TrainingConfig::default(), WazeRng::new(5)).unwrap();
///
/// agent.learn(50).unwrap();
/// assert!(agent.epsilon() < 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct QLearningAgent {
    grid: Grid,
    q_table: QTable,
    position: Position,
    config: TrainingConfig,
    epsilon: f32,
    episodes_trained: usize,
    rng: WazeRng,
}

impl QLearningAgent {
    pub fn new(grid: Grid, config: TrainingConfig, rng: WazeRng) -> Result<Self> {
        config.validate()?;
        if grid.shortest_path(grid.start(), grid.end()).is_none() {
            return Err(WazeError::invalid_parameter(
                "grid".to_string(),
                format!("end {} is not reachable from start {}", grid.end(), grid.start()),
            ));
        }

        let q_table = QTable::new(&grid);
        let position = grid.start();
        let epsilon = config.epsilon;

        Ok(QLearningAgent {
            grid,
            q_table,
            position,
            config,
            epsilon,
            episodes_trained: 0,
            rng,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn episodes_trained(&self) -> usize {
        self.episodes_trained
    }

    /// Epsilon-greedy choice among the valid actions at `state`.
    pub fn choose_action(&mut self, state: Position) -> Result<Action> {
        let valid = self.q_table.valid_actions(state)?;
        if valid.is_empty() {
            return Err(WazeError::NoValidAction { position: state });
        }

        if self.rng.gen_f32() < self.epsilon {
            self.rng
                .choose(&valid)
                .copied()
                .ok_or(WazeError::NoValidAction { position: state })
        } else {
            self.greedy_action(state)
        }
    }

    /// Best valid action at `state`; ties go to the first in table order.
    pub fn greedy_action(&self, state: Position) -> Result<Action> {
        self.q_table
            .best(state)?
            .map(|(action, _)| action)
            .ok_or(WazeError::NoValidAction { position: state })
    }

    /// Value of `state` under the greedy policy: the max over its valid
    /// entries, or `None` when nothing is valid there.
    pub fn state_value(&self, state: Position) -> Result<Option<f32>> {
        self.q_table.max_value(state)
    }

    /// Deterministic transition. Legality is the caller's job: only
    /// moves that leave the grid are rejected here.
    pub fn step(&self, state: Position, action: Action) -> Result<Transition> {
        let next = self
            .grid
            .neighbor(state, action)
            .ok_or(WazeError::OutOfBounds {
                position: state,
                rows: self.grid.rows(),
                cols: self.grid.cols(),
            })?;

        let done = next == self.grid.end();
        let reward = if done {
            self.config.terminal_reward
        } else {
            self.config.move_reward
        };
        Ok(Transition { next, reward, done })
    }

    /// Q(s,a) ← Q(s,a) + α · (r + γ · max Q(s',·) − Q(s,a))
    ///
    /// The bootstrap term is 0 for terminal transitions. Returns the TD
    /// error.
    pub fn update(&mut self, state: Position, action: Action, transition: &Transition) -> Result<f32> {
        let current = self
            .q_table
            .get(state, action)?
            .value()
            .ok_or(WazeError::NoValidAction { position: state })?;

        let future = if transition.done {
            0.0
        } else {
            self.q_table
                .max_value(transition.next)?
                .ok_or(WazeError::NoValidAction { position: transition.next })?
        };

        let target = transition.reward + self.config.discount_factor * future;
        let td_error = target - current;
        self.q_table
            .set(state, action, current + self.config.learning_rate * td_error)?;
        Ok(td_error)
    }

    /// Run one episode from `start` until the end tile is reached.
    ///
    /// ε is decayed once the episode completes.
    pub fn run_episode(&mut self) -> Result<EpisodeStats> {
        self.run_episode_with(|_, _| {})
    }

    /// Like [`run_episode`](Self::run_episode), calling `on_step` with each
    /// transition and its TD error.
    pub fn run_episode_with<F>(&mut self, mut on_step: F) -> Result<EpisodeStats>
    where
        F: FnMut(&Transition, f32),
    {
        self.position = self.grid.start();
        let epsilon = self.epsilon;
        let mut steps = 0;
        let mut total_reward = 0.0;

        loop {
            let state = self.position;
            let action = self.choose_action(state)?;
            let transition = self.step(state, action)?;
            let td_error = self.update(state, action, &transition)?;
            on_step(&transition, td_error);

            steps += 1;
            total_reward += transition.reward;
            self.position = transition.next;
            if transition.done {
                break;
            }
        }

        self.episodes_trained += 1;
        self.decay_epsilon();
        debug!("episode {} finished in {} steps", self.episodes_trained, steps);

        Ok(EpisodeStats { steps, total_reward, epsilon })
    }

    /// Run `episodes` episodes in order, resuming from the current ε.
    pub fn learn(&mut self, episodes: usize) -> Result<Vec<EpisodeStats>> {
        (0..episodes).map(|_| self.run_episode()).collect()
    }

    /// Replay the greedy policy (ε = 0) from `start`, bounded by
    /// `max_walk_steps`.
    pub fn walk(&self) -> Result<Walk> {
        Walker::new(self.config.max_walk_steps).walk(self, &self.grid)
    }

    /// ε ← ε · decay, with no floor
    pub fn decay_epsilon(&mut self) {
        self.epsilon *= self.config.epsilon_decay;
    }
}

impl TabularAgent for QLearningAgent {
    fn greedy_action(&self, state: Position) -> Result<Action> {
        QLearningAgent::greedy_action(self, state)
    }

    fn observe(&mut self, state: Position, action: Action, transition: &Transition) -> Result<f32> {
        self.update(state, action, transition)
    }

    fn exploration_rate(&self) -> f32 {
        self.epsilon
    }

    fn set_exploration_rate(&mut self, rate: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(WazeError::invalid_parameter("epsilon", "must be in [0, 1]"));
        }
        self.epsilon = rate;
        Ok(())
    }
}

/// Builder pattern for QLearningAgent
pub struct QLearningAgentBuilder {
    grid: Option<Grid>,
    config: TrainingConfig,
    rng: Option<WazeRng>,
}

impl QLearningAgentBuilder {
    pub fn new() -> Self {
        QLearningAgentBuilder {
            grid: None,
            config: TrainingConfig::default(),
            rng: None,
        }
    }

    pub fn grid(mut self, grid: Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn config(mut self, config: TrainingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn episodes(mut self, episodes: usize) -> Self {
        self.config.episodes = episodes;
        self
    }

    pub fn learning_rate(mut self, alpha: f32) -> Self {
        self.config.learning_rate = alpha;
        self
    }

    pub fn discount_factor(mut self, gamma: f32) -> Self {
        self.config.discount_factor = gamma;
        self
    }

    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    pub fn epsilon_decay(mut self, decay: f32) -> Self {
        self.config.epsilon_decay = decay;
        self
    }

    pub fn rewards(mut self, move_reward: f32, terminal_reward: f32) -> Self {
        self.config.move_reward = move_reward;
        self.config.terminal_reward = terminal_reward;
        self
    }

    pub fn max_walk_steps(mut self, steps: usize) -> Self {
        self.config.max_walk_steps = steps;
        self
    }

    pub fn rng(mut self, rng: WazeRng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(WazeRng::new(seed));
        self
    }

    pub fn build(self) -> Result<QLearningAgent> {
        let grid = self
            .grid
            .ok_or_else(|| WazeError::invalid_parameter("grid", "a carved grid must be provided"))?;
        let rng = self.rng.unwrap_or_else(WazeRng::from_entropy);
        QLearningAgent::new(grid, self.config, rng)
    }
}

impl Default for QLearningAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
