use log::info;

use crate::agent::{EpisodeStats, QLearningAgent};
use crate::error::Result;
use crate::metrics::MetricsTracker;
use crate::training::walker::{Walk, Walker};

/// Sequential episode driver with metrics and progress logging.
///
/// Episodes share the agent's single Q-table, so they always run one after
/// another in order.
pub struct Trainer {
    agent: QLearningAgent,
    tracker: MetricsTracker,
}

impl Trainer {
    pub fn new(agent: QLearningAgent) -> Self {
        Trainer {
            agent,
            tracker: MetricsTracker::default(),
        }
    }

    pub fn with_history(agent: QLearningAgent, history_size: usize) -> Self {
        Trainer {
            agent,
            tracker: MetricsTracker::new(history_size),
        }
    }

    pub fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut QLearningAgent {
        &mut self.agent
    }

    pub fn into_agent(self) -> QLearningAgent {
        self.agent
    }

    pub fn metrics(&self) -> &MetricsTracker {
        &self.tracker
    }

    /// Run the configured number of episodes
    pub fn train(&mut self) -> Result<Vec<EpisodeStats>> {
        let episodes = self.agent.config().episodes;
        self.learn(episodes)
    }

    /// Run `episodes` more episodes, resuming from the agent's current ε.
    pub fn learn(&mut self, episodes: usize) -> Result<Vec<EpisodeStats>> {
        let log_interval = self.agent.config().log_interval;
        let mut history = Vec::with_capacity(episodes);

        for _ in 0..episodes {
            let tracker = &mut self.tracker;
            tracker.start_episode();
            let stats = self
                .agent
                .run_episode_with(|transition, td_error| tracker.step(transition.reward, td_error))?;
            tracker.end_episode(stats.epsilon);

            let episode = tracker.episode_count();
            if log_interval > 0 && episode % log_interval == 0 {
                info!(
                    "Episode {}: steps = {}, reward = {:.2}, avg length = {:.1}, epsilon = {:.4}",
                    episode,
                    stats.steps,
                    stats.total_reward,
                    tracker.avg_episode_length(log_interval).unwrap_or(0.0),
                    self.agent.epsilon(),
                );
            }
            history.push(stats);
        }

        Ok(history)
    }

    /// Greedy walk with the configured step bound
    pub fn walk(&mut self) -> Result<Walk> {
        let walker = Walker::new(self.agent.config().max_walk_steps);
        let walk = walker.walk(&self.agent, self.agent.grid())?;
        self.tracker.record_walk(walk.steps());
        Ok(walk)
    }
}
