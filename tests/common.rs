//! Common test utilities for the campusquest test suite.
//!
//! Small hand-built layouts whose optimal behaviour is obvious, plus helpers
//! for short training schedules.

#![allow(dead_code)]

use std::{collections::HashSet, time::Duration};

use campusquest::{
    app::SandboxConfig,
    gridworld::{GridLayout, Landmark},
    q_learning::TrainerConfig,
    types::Cell,
};

/// 2x2 grid: start bottom-left, target (reward 10) straight above it.
pub fn two_by_two() -> GridLayout {
    let mut layout = GridLayout::new(2, 2, "Home", (1, 0)).unwrap();
    layout
        .add_landmark("Goal", Landmark::new((0, 0), 10.0, "G").as_target())
        .unwrap();
    layout
}

/// 5x2 corridor: column 1 is solid wall, the agent walks up column 0 over
/// three +1 breadcrumbs to the target at the top.
///
/// Moving UP from any open cell always changes the position, so a greedy
/// agent never bumps into a wall.
pub fn breadcrumb_corridor() -> GridLayout {
    let mut layout = GridLayout::new(5, 2, "Home", (4, 0)).unwrap();
    for row in 0..5 {
        layout.add_wall((row, 1)).unwrap();
    }
    for row in 1..4 {
        layout
            .add_landmark(format!("Crumb {row}"), Landmark::new((row, 0), 1.0, "·"))
            .unwrap();
    }
    layout
        .add_landmark("Goal", Landmark::new((0, 0), 10.0, "G").as_target())
        .unwrap();
    layout
}

/// Open 5x5 room with the target in the far corner.
pub fn open_room() -> GridLayout {
    let mut layout = GridLayout::new(5, 5, "Home", (4, 0)).unwrap();
    layout
        .add_landmark("Goal", Landmark::new((0, 4), 50.0, "G").as_target())
        .unwrap();
    layout
}

/// Purely greedy schedule: no exploration at all.
pub fn greedy_trainer(episodes: usize) -> TrainerConfig {
    TrainerConfig::default()
        .with_episodes(episodes)
        .with_max_steps(50)
        .with_exploration(0.0, 0.995, 0.0)
}

/// Short but otherwise stock schedule.
pub fn quick_trainer(episodes: usize) -> TrainerConfig {
    TrainerConfig::default()
        .with_episodes(episodes)
        .with_max_steps(200)
}

/// Seeded sandbox config with instant replay.
pub fn sandbox_config(layout: GridLayout, trainer: TrainerConfig, seed: u64) -> SandboxConfig {
    SandboxConfig::new(layout)
        .with_trainer(trainer)
        .with_seed(seed)
        .with_replay_delay(Duration::ZERO)
}

pub fn assert_no_repeats(path: &[Cell]) {
    let unique: HashSet<Cell> = path.iter().copied().collect();
    assert_eq!(unique.len(), path.len(), "path revisits a cell: {path:?}");
}

/// Every consecutive pair of cells is one orthogonal step apart.
pub fn assert_adjacent_steps(path: &[Cell]) {
    for pair in path.windows(2) {
        let dr = pair[0].row.abs_diff(pair[1].row);
        let dc = pair[0].col.abs_diff(pair[1].col);
        assert_eq!(dr + dc, 1, "non-adjacent step {} -> {}", pair[0], pair[1]);
    }
}
