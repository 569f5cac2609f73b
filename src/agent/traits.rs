use crate::agent::qlearning::Transition;
use crate::error::Result;
use crate::types::{Action, Position};

/// Trait for tabular agents acting on maze positions
pub trait TabularAgent {
    /// Select the best known action, never exploring
    fn greedy_action(&self, state: Position) -> Result<Action>;

    /// Learn from one transition, returning the TD error
    fn observe(&mut self, state: Position, action: Action, transition: &Transition) -> Result<f32>;

    /// Get the current exploration rate
    fn exploration_rate(&self) -> f32;

    /// Set the exploration rate
    fn set_exploration_rate(&mut self, rate: f32) -> Result<()>;
}
