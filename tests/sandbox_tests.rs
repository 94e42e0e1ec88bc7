//! Sandbox behaviour: guards, reset, edits, manual play and replay

use std::{thread, time::Duration};

use campusquest::{
    Error,
    app::SandboxConfig,
    gridworld::{CellEdit, GridLayout, Landmark},
    q_learning::{Algorithm, Trainer},
    sandbox::{LogEntry, Sandbox},
    types::{Action, Cell},
};

mod common;

fn campus_sandbox(episodes: usize) -> Sandbox {
    Sandbox::new(common::sandbox_config(
        GridLayout::campus(),
        common::quick_trainer(episodes),
        42,
    ))
    .unwrap()
}

fn trained_room() -> Sandbox {
    let mut sandbox = Sandbox::new(common::sandbox_config(
        common::open_room(),
        common::quick_trainer(600),
        8,
    ))
    .unwrap();
    sandbox.train(Algorithm::QLearning).unwrap().unwrap();
    sandbox
}

#[test]
fn test_train_commits_models_and_path() {
    let mut sandbox = campus_sandbox(200);
    let before = sandbox.models().clone();

    let report = sandbox.train(Algorithm::QLearning).unwrap().unwrap();

    assert_eq!(report.algorithm, Algorithm::QLearning);
    assert_eq!(report.summary.episodes, 200);
    assert_eq!(sandbox.trained_algorithm(), Some(Algorithm::QLearning));
    assert_eq!(sandbox.learned_path(), report.path.as_slice());
    assert_ne!(sandbox.models().table, before.table);
    assert_eq!(sandbox.models().linear, before.linear);
    assert!(!sandbox.is_busy());
    assert!(matches!(
        sandbox.log().latest(),
        Some(LogEntry::TrainingComplete {
            algorithm: Algorithm::QLearning,
            ..
        })
    ));
}

#[test]
fn test_reset_clears_learning_and_keeps_layout() {
    let mut sandbox = campus_sandbox(100);
    let initial_models = sandbox.models().clone();
    let layout = sandbox.layout().clone();

    sandbox.train(Algorithm::Sarsa).unwrap();
    sandbox.move_agent(Action::Up);
    assert!(sandbox.reset());

    assert_eq!(sandbox.models(), &initial_models);
    assert!(sandbox.learned_path().is_empty());
    assert!(sandbox.trained_algorithm().is_none());
    assert!(sandbox.recorder().current().is_empty());
    assert_eq!(sandbox.agent(), Cell::new(6, 0));
    assert_eq!(sandbox.layout(), &layout);
    assert_eq!(sandbox.log().len(), 1);
    assert_eq!(sandbox.log().latest(), Some(&LogEntry::Reset));
}

#[test]
fn test_manual_step_onto_empty_cell_costs_step_penalty() {
    let mut sandbox = campus_sandbox(10);
    let event = sandbox.move_agent(Action::Up).unwrap();

    assert_eq!(event.transition.state, Cell::new(6, 0));
    assert_eq!(event.transition.next, Cell::new(5, 0));
    assert_eq!(event.reward(), -0.02);
    assert!(event.landmark.is_none());
    assert!(!event.victory);
    assert_eq!(sandbox.recorder().current().len(), 1);
    assert!(sandbox.log().is_empty());
}

#[test]
fn test_reset_is_idempotent() {
    let mut sandbox = campus_sandbox(50);
    sandbox.train(Algorithm::Linear).unwrap();

    sandbox.reset();
    let once = sandbox.models().clone();
    sandbox.reset();

    assert_eq!(sandbox.models(), &once);
    assert_eq!(sandbox.log().len(), 1);
}

#[test]
fn test_missing_target_is_reported_and_nothing_changes() {
    let mut sandbox = campus_sandbox(10);
    sandbox.set_editing(true);
    sandbox
        .edit(|layout| layout.toggle_target("AB10"))
        .unwrap()
        .unwrap();
    sandbox.set_editing(false);
    let before = sandbox.models().clone();

    let result = sandbox.train(Algorithm::QLearning);

    assert!(matches!(result, Err(Error::MissingTarget)));
    assert_eq!(sandbox.models(), &before);
    assert!(!sandbox.is_busy());
    assert!(sandbox.trained_algorithm().is_none());
    assert!(matches!(
        sandbox.log().latest(),
        Some(LogEntry::Warning { .. })
    ));
}

#[test]
fn test_editing_mode_blocks_training_and_moves() {
    let mut sandbox = campus_sandbox(10);
    assert!(sandbox.set_editing(true));

    assert!(sandbox.train(Algorithm::QLearning).unwrap().is_none());
    assert!(sandbox.move_agent(Action::Up).is_none());
    assert!(!sandbox.start_replay().unwrap());

    // Edits are still allowed while editing
    let edit = sandbox.edit(|layout| layout.toggle_cell((0, 0))).unwrap();
    assert_eq!(edit, Some(CellEdit::WallAdded));
    assert!(sandbox.layout().is_wall(Cell::new(0, 0)));

    assert!(sandbox.set_editing(false));
    assert!(sandbox.move_agent(Action::Up).is_some());
}

#[test]
fn test_edits_outside_edit_mode_are_ignored() {
    let mut sandbox = campus_sandbox(10);
    let layout = sandbox.layout().clone();
    sandbox.move_agent(Action::Up).unwrap();

    let edit = sandbox.edit(|layout| layout.add_wall((0, 0))).unwrap();

    assert!(edit.is_none());
    assert_eq!(sandbox.layout(), &layout);
    assert_eq!(sandbox.agent(), Cell::new(5, 0));
    assert_eq!(sandbox.recorder().current().len(), 1);
}

#[test]
fn test_start_landmark_cannot_be_made_target() {
    let mut sandbox = campus_sandbox(10);
    sandbox.set_editing(true);

    let err = sandbox
        .edit(|layout| layout.toggle_target("Ijokha Hostel"))
        .unwrap_err();

    assert!(matches!(err, Error::StartLandmarkLocked { .. }));
    assert_eq!(sandbox.layout().target().unwrap().0, "AB10");
    assert_eq!(sandbox.environment().target(), Some(Cell::new(0, 8)));
}

#[test]
fn test_rejected_edit_leaves_layout_untouched() {
    let mut sandbox = campus_sandbox(10);
    sandbox.set_editing(true);
    let layout = sandbox.layout().clone();

    let err = sandbox
        .edit(|layout| {
            layout.add_wall((0, 0))?;
            layout.add_wall((6, 0))
        })
        .unwrap_err();

    assert!(matches!(err, Error::CellOccupied { .. }));
    assert_eq!(sandbox.layout(), &layout);

    let err = sandbox
        .edit(|layout| layout.remove_landmark("Ijokha Hostel"))
        .unwrap_err();
    assert!(matches!(err, Error::StartLandmarkLocked { .. }));
}

#[test]
fn test_successful_edit_resets_learning() {
    let mut sandbox = campus_sandbox(100);
    sandbox.train(Algorithm::QLearning).unwrap();
    assert!(sandbox.set_editing(true));

    sandbox
        .edit(|layout| {
            layout.add_landmark("Canteen", Landmark::new((6, 8), 1.5, "🍛"))?;
            layout.move_landmark("Library", (2, 4))
        })
        .unwrap()
        .unwrap();

    assert!(sandbox.trained_algorithm().is_none());
    assert!(sandbox.learned_path().is_empty());
    assert_eq!(sandbox.log().latest(), Some(&LogEntry::Reset));
    assert_eq!(sandbox.layout().landmark("Library").unwrap().position, Cell::new(2, 4));
    assert_eq!(
        sandbox.environment().landmark_at(Cell::new(6, 8)).unwrap().0,
        "Canteen"
    );
}

#[test]
fn test_manual_moves_record_episode_until_victory() {
    let mut sandbox =
        Sandbox::new(SandboxConfig::new(common::breadcrumb_corridor()).with_seed(1)).unwrap();

    // Bump into the wall first: still on the start landmark, which pays 0
    let bump = sandbox.move_agent(Action::Right).unwrap();
    assert_eq!(bump.transition.next, Cell::new(4, 0));
    assert_eq!(bump.reward(), 0.0);
    assert_eq!(bump.landmark.as_ref().unwrap().name, "Home");

    let crumb = sandbox.move_agent(Action::Up).unwrap();
    assert_eq!(crumb.reward(), 1.0);
    assert_eq!(crumb.landmark.as_ref().unwrap().name, "Crumb 3");

    for _ in 0..2 {
        sandbox.move_agent(Action::Up).unwrap();
    }
    let last = sandbox.move_agent(Action::Up).unwrap();
    assert!(last.victory);
    assert!(sandbox.victory());

    let recorder = sandbox.recorder();
    assert!(recorder.current().is_empty());
    assert_eq!(recorder.completed().len(), 1);
    assert_eq!(recorder.completed()[0].len(), 5);
    assert!((recorder.completed()[0].total_reward() - 13.0).abs() < 1e-9);

    // Victory banner blocks input until acknowledged
    assert!(sandbox.move_agent(Action::Down).is_none());
    assert!(sandbox.acknowledge_victory());
    assert_eq!(sandbox.agent(), Cell::new(4, 0));
    assert!(sandbox.recorder().completed().is_empty());
}

#[test]
fn test_replay_requires_training() {
    let mut sandbox = campus_sandbox(10);
    let err = sandbox.play_learned_path(Duration::ZERO, |_, _| {}).unwrap_err();
    assert!(matches!(err, Error::NotTrained));
    assert!(matches!(
        sandbox.log().latest(),
        Some(LogEntry::Warning { .. })
    ));
    assert!(!sandbox.is_busy());
}

#[test]
fn test_replay_walks_path_to_victory() {
    let mut sandbox = trained_room();
    assert_eq!(sandbox.learned_path().last(), Some(&Cell::new(0, 4)));

    let mut frames = Vec::new();
    let played = sandbox
        .play_learned_path(Duration::ZERO, |sandbox, frame| {
            assert!(sandbox.is_busy() || frame.finished);
            assert_eq!(sandbox.agent(), frame.cell);
            frames.push(frame.clone());
        })
        .unwrap();

    assert!(played);
    assert_eq!(frames.len(), sandbox.learned_path().len());
    assert_eq!(frames[0].cell, Cell::new(4, 0));
    let last = frames.last().unwrap();
    assert!(last.victory && last.finished);
    assert!(sandbox.victory());
    assert!(!sandbox.is_busy());
    assert_eq!(sandbox.agent(), Cell::new(0, 4));
}

#[test]
fn test_replay_is_busy_between_frames() {
    let mut sandbox = trained_room();
    assert!(sandbox.start_replay().unwrap());
    assert!(sandbox.is_replaying());

    let first = sandbox.advance_replay().unwrap();
    assert_eq!(first.index, 0);
    assert!(sandbox.move_agent(Action::Up).is_none());
    assert!(sandbox.train(Algorithm::Sarsa).unwrap().is_none());
    assert!(!sandbox.reset());
    assert!(!sandbox.set_editing(true));
    assert!(sandbox.edit(|layout| layout.add_wall((2, 2))).unwrap().is_none());

    while sandbox.advance_replay().is_some() {}
    assert!(!sandbox.is_busy());
}

#[test]
fn test_boxed_in_start_has_no_path() {
    let mut layout = GridLayout::new(3, 3, "Home", (0, 0)).unwrap();
    layout.add_wall((0, 1)).unwrap();
    layout.add_wall((1, 0)).unwrap();
    layout
        .add_landmark("Goal", Landmark::new((2, 2), 5.0, "G").as_target())
        .unwrap();
    let mut sandbox =
        Sandbox::new(common::sandbox_config(layout, common::quick_trainer(5), 4)).unwrap();

    let report = sandbox.train(Algorithm::QLearning).unwrap().unwrap();
    assert_eq!(report.path, vec![Cell::new(0, 0)]);
    assert!(!report.reaches_target);

    let mut frames = 0;
    let err = sandbox
        .play_learned_path(Duration::ZERO, |_, _| frames += 1)
        .unwrap_err();
    assert!(matches!(err, Error::NoPath { .. }));
    assert_eq!(frames, 0);
    assert!(!sandbox.is_busy());
}

#[test]
fn test_training_job_runs_on_worker_thread() {
    let mut sandbox = campus_sandbox(100);
    let config = sandbox.trainer_mut().config().clone();

    let job = sandbox.begin_training(Algorithm::Linear).unwrap().unwrap();
    assert!(sandbox.is_busy());

    let handle = thread::spawn(move || job.run(&mut Trainer::new(config)));
    let trained = handle.join().unwrap().unwrap();

    let report = sandbox.complete_training(trained).unwrap();
    assert_eq!(report.algorithm, Algorithm::Linear);
    assert_eq!(sandbox.trained_algorithm(), Some(Algorithm::Linear));
    assert!(!sandbox.is_busy());
}
