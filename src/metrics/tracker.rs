use std::collections::VecDeque;
use serde::{Serialize, Deserialize};

/// Stores training metrics over time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Total reward per episode
    pub episode_rewards: VecDeque<f32>,

    /// Steps per episode
    pub episode_lengths: VecDeque<usize>,

    /// Epsilon used in each episode
    pub epsilons: VecDeque<f32>,

    /// Mean absolute TD error per episode
    pub td_errors: VecDeque<f32>,

    /// Greedy walk lengths, when walks are recorded
    pub walk_lengths: VecDeque<usize>,
}

impl TrainingMetrics {
    pub fn new(history_size: usize) -> Self {
        TrainingMetrics {
            episode_rewards: VecDeque::with_capacity(history_size),
            episode_lengths: VecDeque::with_capacity(history_size),
            epsilons: VecDeque::with_capacity(history_size),
            td_errors: VecDeque::with_capacity(history_size),
            walk_lengths: VecDeque::with_capacity(history_size),
        }
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, value: T, capacity: usize) {
    if queue.len() >= capacity {
        queue.pop_front();
    }
    queue.push_back(value);
}

/// Tracks metrics during training
#[derive(Debug, Clone)]
pub struct MetricsTracker {
    metrics: TrainingMetrics,
    history_size: usize,

    // Episode tracking
    current_episode_reward: f32,
    current_episode_length: usize,
    current_td_error_sum: f32,
    episode_count: usize,

    // Step tracking
    total_steps: usize,
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        let history_size = history_size.max(1);
        MetricsTracker {
            metrics: TrainingMetrics::new(history_size),
            history_size,
            current_episode_reward: 0.0,
            current_episode_length: 0,
            current_td_error_sum: 0.0,
            episode_count: 0,
            total_steps: 0,
        }
    }

    /// Start a new episode
    pub fn start_episode(&mut self) {
        self.current_episode_reward = 0.0;
        self.current_episode_length = 0;
        self.current_td_error_sum = 0.0;
    }

    /// Record a step within an episode
    pub fn step(&mut self, reward: f32, td_error: f32) {
        self.current_episode_reward += reward;
        self.current_episode_length += 1;
        self.current_td_error_sum += td_error.abs();
        self.total_steps += 1;
    }

    /// End the current episode
    pub fn end_episode(&mut self, epsilon: f32) {
        let cap = self.history_size;
        push_bounded(&mut self.metrics.episode_rewards, self.current_episode_reward, cap);
        push_bounded(&mut self.metrics.episode_lengths, self.current_episode_length, cap);
        push_bounded(&mut self.metrics.epsilons, epsilon, cap);

        let mean_td = if self.current_episode_length > 0 {
            self.current_td_error_sum / self.current_episode_length as f32
        } else {
            0.0
        };
        push_bounded(&mut self.metrics.td_errors, mean_td, cap);

        self.episode_count += 1;
    }

    /// Record the length of a greedy walk
    pub fn record_walk(&mut self, length: usize) {
        push_bounded(&mut self.metrics.walk_lengths, length, self.history_size);
    }

    /// Get a reference to the metrics
    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    /// Get episode count
    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    /// Get total steps
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Get recent average episode reward
    pub fn avg_episode_reward(&self, window: usize) -> Option<f32> {
        if self.metrics.episode_rewards.is_empty() || window == 0 {
            return None;
        }

        let n = window.min(self.metrics.episode_rewards.len());
        let sum: f32 = self.metrics.episode_rewards.iter().rev().take(n).sum();
        Some(sum / n as f32)
    }

    /// Get recent average episode length
    pub fn avg_episode_length(&self, window: usize) -> Option<f32> {
        if self.metrics.episode_lengths.is_empty() || window == 0 {
            return None;
        }

        let n = window.min(self.metrics.episode_lengths.len());
        let sum: usize = self.metrics.episode_lengths.iter().rev().take(n).sum();
        Some(sum as f32 / n as f32)
    }

    /// Clear all metrics
    pub fn clear(&mut self) {
        *self = MetricsTracker::new(self.history_size);
    }

    /// Serialize the metrics as pretty JSON
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(&self.metrics)?)
    }

    /// Replace the metrics with ones parsed from JSON
    pub fn load_json(&mut self, data: &str) -> crate::error::Result<()> {
        self.metrics = serde_json::from_str(data)?;
        Ok(())
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}
