use crate::agent::{QEntry, QLearningAgent, QLearningAgentBuilder, TabularAgent, TrainingConfig, Transition};
use crate::error::WazeError;
use crate::maze::{Grid, Tile};
use crate::rng::WazeRng;
use crate::types::{Action, Position};
use super::branch_grid;

fn agent(seed: u64) -> QLearningAgent {
    QLearningAgent::new(branch_grid(), TrainingConfig::default(), WazeRng::new(seed)).unwrap()
}

#[test]
fn test_agent_starts_fresh() {
    let agent = agent(0);
    assert_eq!(agent.position(), agent.grid().start());
    assert_eq!(agent.epsilon(), 1.0);
    assert_eq!(agent.episodes_trained(), 0);
    assert!(agent
        .q_table()
        .iter()
        .all(|(_, _, entry)| entry == QEntry::Invalid || entry == QEntry::Valid(0.0)));
}

#[test]
fn test_builder() {
    let agent = QLearningAgentBuilder::new()
        .grid(branch_grid())
        .learning_rate(0.5)
        .discount_factor(0.8)
        .epsilon(0.3)
        .epsilon_decay(0.9)
        .rewards(-2.0, 20.0)
        .max_walk_steps(50)
        .episodes(7)
        .seed(1)
        .build()
        .unwrap();

    let config = agent.config();
    assert_eq!(config.learning_rate, 0.5);
    assert_eq!(config.discount_factor, 0.8);
    assert_eq!(config.epsilon_decay, 0.9);
    assert_eq!((config.move_reward, config.terminal_reward), (-2.0, 20.0));
    assert_eq!(config.max_walk_steps, 50);
    assert_eq!(config.episodes, 7);
    assert_eq!(agent.epsilon(), 0.3);
}

#[test]
fn test_builder_requires_grid() {
    let err = QLearningAgentBuilder::new().seed(0).build().unwrap_err();
    assert!(matches!(err, WazeError::InvalidParameter { ref name, .. } if name == "grid"));
}

#[test]
fn test_rejects_unsolvable_grid() {
    let grid = Grid::from_ascii("S#\n#E").unwrap();
    let err = QLearningAgent::new(grid, TrainingConfig::default(), WazeRng::new(0)).unwrap_err();
    assert!(matches!(err, WazeError::InvalidParameter { ref name, .. } if name == "grid"));
}

#[test]
fn test_config_validation() {
    let cases: Vec<(&str, TrainingConfig)> = vec![
        ("learning_rate", TrainingConfig { learning_rate: 0.0, ..Default::default() }),
        ("learning_rate", TrainingConfig { learning_rate: 1.5, ..Default::default() }),
        ("discount_factor", TrainingConfig { discount_factor: -0.1, ..Default::default() }),
        ("epsilon", TrainingConfig { epsilon: 1.2, ..Default::default() }),
        ("epsilon_decay", TrainingConfig { epsilon_decay: 0.0, ..Default::default() }),
        ("move_reward", TrainingConfig { move_reward: 0.0, ..Default::default() }),
        ("terminal_reward", TrainingConfig { terminal_reward: -1.0, ..Default::default() }),
        ("max_walk_steps", TrainingConfig { max_walk_steps: 0, ..Default::default() }),
    ];

    for (expected, config) in cases {
        match config.validate() {
            Err(WazeError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
            other => panic!("{}: expected InvalidParameter, got {:?}", expected, other),
        }
    }
    assert!(TrainingConfig::default().validate().is_ok());
}

#[test]
fn test_q_table_masks_walls_and_edges() {
    let agent = agent(0);
    let table = agent.q_table();

    // Start can only go right
    assert_eq!(table.valid_actions(Position::new(0, 0)).unwrap(), vec![Action::Right]);
    // Wall tiles have nothing valid
    assert!(table.valid_actions(Position::new(1, 0)).unwrap().is_empty());
    assert_eq!(table.get(Position::new(1, 0), Action::Up).unwrap(), QEntry::Invalid);

    for (pos, action, entry) in table.iter() {
        let legal = agent.grid().get(pos).unwrap() == Tile::Trail
            && agent
                .grid()
                .neighbor(pos, action)
                .map_or(false, |next| agent.grid().get(next).unwrap() == Tile::Trail);
        assert_eq!(entry.is_valid(), legal, "{} {}", pos, action);
    }
}

#[test]
fn test_exploration_never_picks_masked_action() {
    let mut agent = agent(5);
    let junction = Position::new(0, 1);
    let valid = agent.q_table().valid_actions(junction).unwrap();
    for _ in 0..500 {
        let action = agent.choose_action(junction).unwrap();
        assert!(valid.contains(&action));
    }
}

#[test]
fn test_no_valid_action_on_wall() {
    let mut agent = agent(0);
    let wall = Position::new(1, 0);
    assert_eq!(
        agent.choose_action(wall).unwrap_err(),
        WazeError::NoValidAction { position: wall }
    );
    assert!(matches!(agent.greedy_action(wall), Err(WazeError::NoValidAction { .. })));
}

#[test]
fn test_greedy_prefers_first_on_ties() {
    let agent = agent(0);
    // All zeros at the junction: Down comes first in table order
    assert_eq!(agent.greedy_action(Position::new(0, 1)).unwrap(), Action::Down);
}

#[test]
fn test_step_rewards() {
    let agent = agent(0);

    let t = agent.step(Position::new(0, 0), Action::Right).unwrap();
    assert_eq!(t, Transition { next: Position::new(0, 1), reward: -1.0, done: false });

    let t = agent.step(Position::new(2, 1), Action::Right).unwrap();
    assert_eq!(t, Transition { next: Position::new(2, 2), reward: 10.0, done: true });

    // Leaving the grid is the only thing step itself rejects
    assert!(matches!(
        agent.step(Position::new(0, 0), Action::Up),
        Err(WazeError::OutOfBounds { .. })
    ));
}

#[test]
fn test_update_rule() {
    let mut agent = agent(0);
    let start = Position::new(0, 0);

    let t = agent.step(start, Action::Right).unwrap();
    let td = agent.update(start, Action::Right, &t).unwrap();
    assert_eq!(td, -1.0);
    assert!((agent.q_table().get(start, Action::Right).unwrap().value().unwrap() + 0.1).abs() < 1e-6);

    // Terminal backups ignore the end tile's own values
    let last = Position::new(2, 1);
    let t = agent.step(last, Action::Right).unwrap();
    let td = agent.update(last, Action::Right, &t).unwrap();
    assert_eq!(td, 10.0);
    assert!((agent.q_table().get(last, Action::Right).unwrap().value().unwrap() - 1.0).abs() < 1e-6);

    // Bootstraps from the best valid value of the next tile
    let before = Position::new(1, 1);
    let t = agent.step(before, Action::Down).unwrap();
    let td = agent.update(before, Action::Down, &t).unwrap();
    assert!((td - (-1.0 + 0.9 * 1.0)).abs() < 1e-6);

    assert!((agent.state_value(last).unwrap().unwrap() - 1.0).abs() < 1e-6);
    assert_eq!(agent.state_value(Position::new(1, 0)).unwrap(), None);
}

#[test]
fn test_update_on_masked_entry_fails() {
    let mut agent = agent(0);
    let t = Transition { next: Position::new(1, 0), reward: -1.0, done: false };
    assert!(agent.update(Position::new(0, 0), Action::Down, &t).is_err());
    assert_eq!(agent.q_table().get(Position::new(0, 0), Action::Down).unwrap(), QEntry::Invalid);
}

#[test]
fn test_epsilon_decay() {
    let mut agent = agent(2);
    agent.learn(25).unwrap();

    let mut expected = 1.0f32;
    for _ in 0..25 {
        expected *= 0.99;
    }
    assert_eq!(agent.epsilon(), expected);
    assert_eq!(agent.episodes_trained(), 25);
}

#[test]
fn test_learn_resumes_epsilon() {
    let mut agent = agent(2);
    let first = agent.learn(3).unwrap();
    let second = agent.learn(2).unwrap();
    assert_eq!(first[0].epsilon, 1.0);
    assert_eq!(second[0].epsilon, first[2].epsilon * 0.99);
    assert_eq!(agent.episodes_trained(), 5);
}

#[test]
fn test_episode_stays_on_trails() {
    let mut agent = agent(8);
    let grid = agent.grid().clone();
    for _ in 0..20 {
        let mut steps = 0;
        let stats = agent
            .run_episode_with(|t, _| {
                steps += 1;
                assert_eq!(grid.get(t.next).unwrap(), Tile::Trail);
            })
            .unwrap();
        assert_eq!(stats.steps, steps);
        assert_eq!(agent.position(), grid.end());
        // Every move but the last costs 1
        assert_eq!(stats.total_reward, 10.0 - (stats.steps as f32 - 1.0));
    }
    // Masked entries stay masked
    assert_eq!(agent.q_table().valid_count(), crate::agent::QTable::new(&grid).valid_count());
}

#[test]
fn test_trained_agent_walks_solution() {
    let mut agent = agent(4);
    agent.learn(300).unwrap();
    let walk = agent.walk().unwrap();
    assert_eq!(walk.path(), agent.grid().shortest_path(agent.grid().start(), agent.grid().end()).unwrap());
    assert_eq!(walk.steps(), 4);
}

#[test]
fn test_cycling_policy_does_not_converge() {
    let mut agent = QLearningAgentBuilder::new()
        .grid(branch_grid())
        .learning_rate(1.0)
        .discount_factor(0.0)
        .max_walk_steps(20)
        .seed(0)
        .build()
        .unwrap();

    // Make the junction prefer going back to start
    let junction = Position::new(0, 1);
    let back = Transition { next: Position::new(0, 0), reward: 5.0, done: true };
    agent.observe(junction, Action::Left, &back).unwrap();
    assert_eq!(agent.greedy_action(junction).unwrap(), Action::Left);

    assert_eq!(agent.walk().unwrap_err(), WazeError::PolicyDidNotConverge { max_steps: 20 });
}

#[test]
fn test_exploration_rate_bounds() {
    let mut agent = agent(0);
    agent.set_exploration_rate(0.25).unwrap();
    assert_eq!(agent.exploration_rate(), 0.25);
    assert!(agent.set_exploration_rate(1.5).is_err());
    assert_eq!(agent.epsilon(), 0.25);
}
