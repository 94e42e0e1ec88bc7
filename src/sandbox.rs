//! Stateful controller a front end drives
//!
//! The [`Sandbox`] owns everything mutable: the editable layout, both value
//! models, the agent's cell, the learned path, the event log and the manual
//! episode recorder. Every entry point checks the busy/editing/victory
//! guards first and quietly does nothing when refused.
//!
//! Training is all-or-nothing. [`Sandbox::begin_training`] hands out a
//! [`TrainingJob`] holding its own snapshot of the environment and models;
//! it can run on another thread while the sandbox stays busy, and only
//! [`Sandbox::complete_training`] swaps the result in.

use std::{thread, time::Duration};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;

use crate::{
    Error, Result,
    app::SandboxConfig,
    gridworld::{Environment, GridLayout, StepCost},
    q_learning::{
        Algorithm, Trainer, TrainingSummary, ValueModels, extract_path, trainer::build_rng,
    },
    recorder::EpisodeRecorder,
    types::{Action, Cell, Transition},
};

pub mod event_log;

pub use event_log::{DEFAULT_LOG_CAPACITY, EventLog, LogEntry};

/// A landmark the agent just landed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandmarkHit {
    pub name: String,
    pub glyph: String,
    pub reward: f64,
}

/// Outcome of one manual move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveEvent {
    pub transition: Transition,
    pub landmark: Option<LandmarkHit>,
    /// The move reached the target
    pub victory: bool,
}

impl MoveEvent {
    pub fn reward(&self) -> f64 {
        self.transition.reward
    }
}

/// One animation step of a learned-path replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayFrame {
    /// Position in the learned path
    pub index: usize,
    pub cell: Cell,
    pub landmark: Option<LandmarkHit>,
    pub victory: bool,
    /// No further frames follow
    pub finished: bool,
}

/// What a committed training run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub algorithm: Algorithm,
    pub summary: TrainingSummary,
    pub path: Vec<Cell>,
    /// The extracted path ends on the target
    pub reaches_target: bool,
}

/// Evolved models waiting to be committed.
#[derive(Debug, Clone)]
pub struct TrainedModels {
    pub algorithm: Algorithm,
    pub models: ValueModels,
    pub summary: TrainingSummary,
    pub path: Vec<Cell>,
}

/// A detached training run over a private snapshot.
///
/// Owns everything it needs, so it can be sent to a worker thread.
#[derive(Debug)]
pub struct TrainingJob {
    algorithm: Algorithm,
    env: Environment,
    models: ValueModels,
    rng: StdRng,
    path_max_steps: usize,
}

impl TrainingJob {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Run the full episode budget, then extract the greedy path.
    pub fn run(mut self, trainer: &mut Trainer) -> Result<TrainedModels> {
        let run = trainer.train(self.algorithm, &self.env, self.models, &mut self.rng)?;
        let path = extract_path(
            &self.env,
            run.models.for_algorithm(self.algorithm),
            self.env.start(),
            self.path_max_steps,
            &mut self.rng,
        );
        Ok(TrainedModels {
            algorithm: self.algorithm,
            models: run.models,
            summary: run.summary,
            path,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activity {
    Idle,
    Training(Algorithm),
    /// Index of the next path cell to show
    Replaying(usize),
}

pub struct Sandbox {
    layout: GridLayout,
    env: Environment,
    models: ValueModels,
    trainer: Trainer,
    rng: StdRng,
    /// Seeds the linear model on every reset so resets are repeatable
    model_seed: u64,
    agent: Cell,
    path: Vec<Cell>,
    trained: Option<Algorithm>,
    activity: Activity,
    editing: bool,
    victory: bool,
    log: EventLog,
    recorder: EpisodeRecorder,
    replay_delay: Duration,
    path_max_steps: usize,
}

impl Sandbox {
    /// Build a sandbox with the agent on the start landmark and untrained
    /// models.
    ///
    /// # Errors
    ///
    /// Any layout or trainer configuration error.
    pub fn new(config: SandboxConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = build_rng(config.seed);
        let model_seed: u64 = rng.random();
        let env = Environment::from_layout(&config.layout);
        let models = initial_models(&env, model_seed);

        Ok(Self {
            agent: env.start(),
            layout: config.layout,
            env,
            models,
            trainer: Trainer::new(config.trainer),
            rng,
            model_seed,
            path: Vec::new(),
            trained: None,
            activity: Activity::Idle,
            editing: false,
            victory: false,
            log: EventLog::new(config.log_capacity),
            recorder: EpisodeRecorder::new(),
            replay_delay: config.replay_delay,
            path_max_steps: config.path_max_steps,
        })
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn models(&self) -> &ValueModels {
        &self.models
    }

    /// Register observers or change hyper-parameters for later runs.
    pub fn trainer_mut(&mut self) -> &mut Trainer {
        &mut self.trainer
    }

    pub fn agent(&self) -> Cell {
        self.agent
    }

    pub fn learned_path(&self) -> &[Cell] {
        &self.path
    }

    pub fn trained_algorithm(&self) -> Option<Algorithm> {
        self.trained
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn recorder(&self) -> &EpisodeRecorder {
        &self.recorder
    }

    /// Training or replay in progress.
    pub fn is_busy(&self) -> bool {
        self.activity != Activity::Idle
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_replaying(&self) -> bool {
        matches!(self.activity, Activity::Replaying(_))
    }

    /// Whether the victory banner is up.
    pub fn victory(&self) -> bool {
        self.victory
    }

    pub fn replay_delay(&self) -> Duration {
        self.replay_delay
    }

    /// Train `algorithm` to completion and commit the result.
    ///
    /// Returns `Ok(None)` without doing anything while busy or editing.
    ///
    /// # Errors
    ///
    /// [`Error::MissingTarget`] when the layout has no target; an observer
    /// failure aborts the run. Either way the stored models are untouched
    /// and the problem is logged.
    pub fn train(&mut self, algorithm: Algorithm) -> Result<Option<TrainingReport>> {
        let Some(job) = self.begin_training(algorithm)? else {
            return Ok(None);
        };
        match job.run(&mut self.trainer) {
            Ok(trained) => Ok(self.complete_training(trained)),
            Err(err) => {
                self.cancel_training();
                self.warn(&err);
                Err(err)
            }
        }
    }

    /// Mark the sandbox busy and hand out a snapshot to train on.
    ///
    /// `Ok(None)` when busy or editing.
    pub fn begin_training(&mut self, algorithm: Algorithm) -> Result<Option<TrainingJob>> {
        if self.is_busy() || self.editing {
            return Ok(None);
        }
        if self.env.target().is_none() {
            let err = Error::MissingTarget;
            self.warn(&err);
            return Err(err);
        }

        self.activity = Activity::Training(algorithm);
        self.log.push(LogEntry::TrainingStarted { algorithm });
        Ok(Some(TrainingJob {
            algorithm,
            env: self.env.clone(),
            models: self.models.clone(),
            rng: StdRng::from_rng(&mut self.rng),
            path_max_steps: self.path_max_steps,
        }))
    }

    /// Commit a finished job.
    ///
    /// Returns `None` (and commits nothing) unless a run of the same
    /// algorithm is in progress.
    pub fn complete_training(&mut self, trained: TrainedModels) -> Option<TrainingReport> {
        if self.activity != Activity::Training(trained.algorithm) {
            return None;
        }
        let reaches_target = trained
            .path
            .last()
            .is_some_and(|&cell| self.env.is_target(cell));

        self.activity = Activity::Idle;
        self.models = trained.models;
        self.path = trained.path;
        self.trained = Some(trained.algorithm);
        self.log.push(LogEntry::TrainingComplete {
            algorithm: trained.algorithm,
            path_len: self.path.len(),
        });

        Some(TrainingReport {
            algorithm: trained.algorithm,
            summary: trained.summary,
            path: self.path.clone(),
            reaches_target,
        })
    }

    /// Abandon an in-flight run; the stored models stay as they were.
    pub fn cancel_training(&mut self) -> bool {
        let Activity::Training(algorithm) = self.activity else {
            return false;
        };
        self.activity = Activity::Idle;
        self.log.push(LogEntry::TrainingCancelled { algorithm });
        true
    }

    /// Take one manual step.
    ///
    /// Refused (`None`) while busy, editing or while the victory banner is
    /// up. Empty cells cost the manual step cost.
    pub fn move_agent(&mut self, action: Action) -> Option<MoveEvent> {
        if self.is_busy() || self.editing || self.victory {
            return None;
        }

        let state = self.agent;
        let next = self.env.transition(state, action);
        let transition = Transition {
            state,
            action,
            next,
            reward: self.env.reward(next, StepCost::Manual),
        };
        self.recorder.record(transition);
        self.agent = next;

        let landmark = self.visit(next);
        let victory = self.env.is_target(next);
        if victory {
            self.recorder.seal();
        }
        Some(MoveEvent {
            transition,
            landmark,
            victory,
        })
    }

    /// Start animating the learned path of the last trained algorithm.
    ///
    /// The path is re-extracted from the stored model. `Ok(false)` when
    /// busy or editing.
    ///
    /// # Errors
    ///
    /// [`Error::NotTrained`] before any training, [`Error::NoPath`] when the
    /// greedy rollout cannot leave the start cell. Both are also logged.
    pub fn start_replay(&mut self) -> Result<bool> {
        if self.is_busy() || self.editing {
            return Ok(false);
        }
        let Some(algorithm) = self.trained else {
            let err = Error::NotTrained;
            self.warn(&err);
            return Err(err);
        };

        let start = self.env.start();
        let path = extract_path(
            &self.env,
            self.models.for_algorithm(algorithm),
            start,
            self.path_max_steps,
            &mut self.rng,
        );
        if path.len() <= 1 {
            let err = Error::NoPath { start };
            self.warn(&err);
            return Err(err);
        }

        self.path = path;
        self.activity = Activity::Replaying(0);
        self.log.push(LogEntry::ReplayStarted { algorithm });
        Ok(true)
    }

    /// Move the agent to the next path cell.
    ///
    /// `None` when no replay is running. Landing on the target raises the
    /// victory banner and ends the replay early.
    pub fn advance_replay(&mut self) -> Option<ReplayFrame> {
        let Activity::Replaying(index) = self.activity else {
            return None;
        };
        let cell = self.path[index];
        self.agent = cell;
        let landmark = self.visit(cell);
        let victory = self.env.is_target(cell);

        let finished = victory || index + 1 >= self.path.len();
        if finished {
            self.activity = Activity::Idle;
            if !victory {
                self.log.push(LogEntry::ReplayFinished);
            }
        } else {
            self.activity = Activity::Replaying(index + 1);
        }

        Some(ReplayFrame {
            index,
            cell,
            landmark,
            victory,
            finished,
        })
    }

    /// Replay the learned path, pausing `delay` after every frame except
    /// the last.
    ///
    /// `on_frame` sees the sandbox after each move. Returns `Ok(false)` if
    /// refused by the busy/editing guard.
    pub fn play_learned_path<F>(&mut self, delay: Duration, mut on_frame: F) -> Result<bool>
    where
        F: FnMut(&Sandbox, &ReplayFrame),
    {
        if !self.start_replay()? {
            return Ok(false);
        }
        while let Some(frame) = self.advance_replay() {
            on_frame(&*self, &frame);
            if frame.finished {
                break;
            }
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
        Ok(true)
    }

    /// Clear learned state while keeping the layout.
    ///
    /// Refused (`false`) while busy.
    pub fn reset(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.reset_state();
        true
    }

    /// Enter or leave edit mode. Entering resets; refused while busy.
    pub fn set_editing(&mut self, editing: bool) -> bool {
        if self.is_busy() {
            return false;
        }
        if editing && !self.editing {
            self.reset_state();
        }
        self.editing = editing;
        true
    }

    /// Apply a layout edit atomically, then reset.
    ///
    /// `edit` works on a copy; if it fails the layout is left exactly as it
    /// was. Returns `Ok(None)` unless in edit mode, or while busy.
    ///
    /// ```
    /// use campusquest::{app::SandboxConfig, sandbox::Sandbox};
    ///
    /// let mut sandbox = Sandbox::new(SandboxConfig::default().with_seed(1))?;
    /// sandbox.set_editing(true);
    /// sandbox.edit(|layout| layout.set_reward("Library", 5.0))?;
    /// assert_eq!(sandbox.layout().landmark("Library").unwrap().reward, 5.0);
    /// # Ok::<(), campusquest::Error>(())
    /// ```
    pub fn edit<T, F>(&mut self, edit: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut GridLayout) -> Result<T>,
    {
        if self.is_busy() || !self.editing {
            return Ok(None);
        }
        let mut layout = self.layout.clone();
        let outcome = edit(&mut layout)?;
        layout.validate()?;
        self.layout = layout;
        self.reset_state();
        Ok(Some(outcome))
    }

    /// Dismiss the victory banner ("play again"), which resets.
    pub fn acknowledge_victory(&mut self) -> bool {
        if !self.victory {
            return false;
        }
        self.victory = false;
        self.reset_state();
        true
    }

    fn reset_state(&mut self) {
        self.env = Environment::from_layout(&self.layout);
        self.models = initial_models(&self.env, self.model_seed);
        self.agent = self.env.start();
        self.path.clear();
        self.trained = None;
        self.activity = Activity::Idle;
        self.victory = false;
        self.recorder.clear();
        self.log.clear();
        self.log.push(LogEntry::Reset);
    }

    /// Log a landmark visit and raise victory on the target.
    fn visit(&mut self, cell: Cell) -> Option<LandmarkHit> {
        let (name, lm) = self.env.landmark_at(cell)?;
        let hit = LandmarkHit {
            name: name.to_string(),
            glyph: lm.glyph.clone(),
            reward: lm.reward,
        };
        self.log.push(LogEntry::Landmark {
            name: hit.name.clone(),
            glyph: hit.glyph.clone(),
            reward: hit.reward,
        });
        if lm.is_target {
            self.victory = true;
            self.log.push(LogEntry::Victory {
                name: hit.name.clone(),
            });
        }
        Some(hit)
    }

    fn warn(&mut self, err: &Error) {
        self.log.push(LogEntry::Warning {
            message: err.to_string(),
        });
    }
}

fn initial_models(env: &Environment, model_seed: u64) -> ValueModels {
    ValueModels::new(
        env.height(),
        env.width(),
        &mut StdRng::seed_from_u64(model_seed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::TrainerConfig;

    fn quick_sandbox() -> Sandbox {
        let config = SandboxConfig::default()
            .with_seed(11)
            .with_trainer(TrainerConfig::default().with_episodes(20).with_max_steps(50))
            .with_replay_delay(Duration::ZERO);
        Sandbox::new(config).unwrap()
    }

    #[test]
    fn test_starts_on_start_landmark() {
        let sandbox = quick_sandbox();
        assert_eq!(sandbox.agent(), Cell::new(6, 0));
        assert!(sandbox.log().is_empty());
        assert!(!sandbox.is_busy());
        assert!(sandbox.trained_algorithm().is_none());
    }

    #[test]
    fn test_begin_training_sets_busy_and_blocks_input() {
        let mut sandbox = quick_sandbox();
        let job = sandbox.begin_training(Algorithm::Sarsa).unwrap().unwrap();
        assert!(sandbox.is_busy());
        assert!(sandbox.move_agent(Action::Up).is_none());
        assert!(sandbox.begin_training(Algorithm::QLearning).unwrap().is_none());
        assert!(!sandbox.reset());
        assert!(sandbox.edit(|layout| layout.add_wall((0, 0))).unwrap().is_none());
        assert!(!sandbox.set_editing(true));
        drop(job);

        assert!(sandbox.cancel_training());
        assert!(!sandbox.is_busy());
        assert!(sandbox.trained_algorithm().is_none());
    }

    #[test]
    fn test_stale_job_is_not_committed() {
        let mut sandbox = quick_sandbox();
        let job = sandbox.begin_training(Algorithm::QLearning).unwrap().unwrap();
        let trained = job.run(&mut Trainer::new(TrainerConfig::default().with_episodes(5))).unwrap();
        sandbox.cancel_training();

        let before = sandbox.models().clone();
        assert!(sandbox.complete_training(trained).is_none());
        assert_eq!(sandbox.models(), &before);
    }

    #[test]
    fn test_victory_blocks_moves_until_acknowledged() {
        let mut layout = GridLayout::new(2, 2, "Home", (1, 0)).unwrap();
        layout
            .add_landmark(
                "Goal",
                crate::gridworld::Landmark::new((0, 0), 10.0, "*").as_target(),
            )
            .unwrap();
        let mut sandbox = Sandbox::new(SandboxConfig::new(layout).with_seed(3)).unwrap();

        let event = sandbox.move_agent(Action::Up).unwrap();
        assert!(event.victory);
        assert_eq!(event.reward(), 10.0);
        assert!(sandbox.victory());
        assert!(sandbox.move_agent(Action::Down).is_none());

        assert!(sandbox.acknowledge_victory());
        assert!(!sandbox.victory());
        assert_eq!(sandbox.agent(), Cell::new(1, 0));
        assert!(sandbox.move_agent(Action::Right).is_some());
    }
}
