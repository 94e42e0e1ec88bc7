//! Temporal difference learning over the grid world
//!
//! Three update rules share one [`Trainer`] loop and one ε-greedy
//! [`policy`]:
//!
//! | Algorithm | Model | Bootstrap target |
//! |-----------|-------|------------------|
//! | Q-learning | [`QTable`] | `max_a' Q(s', a')` (off-policy) |
//! | SARSA | [`QTable`] | `Q(s', a')` for the action actually taken next (on-policy) |
//! | Linear ("DQN") | [`LinearModel`] | `max_a' Q(s', a')` through a linear approximator |
//!
//! Both tabular rules write to the same table; the linear rule only touches
//! its weights. After training, [`extract_path`] rolls the greedy policy out
//! into a concrete route.
//!
//! ## Usage Example
//!
//! ```no_run
//! use campusquest::{
//!     gridworld::{Environment, GridLayout},
//!     q_learning::{Algorithm, Trainer, TrainerConfig, ValueModels, extract_path},
//! };
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let env = Environment::from_layout(&GridLayout::campus());
//! let mut rng = StdRng::seed_from_u64(7);
//! let models = ValueModels::new(env.height(), env.width(), &mut rng);
//!
//! let mut trainer = Trainer::new(TrainerConfig::default());
//! let run = trainer.train(Algorithm::QLearning, &env, models, &mut rng)?;
//!
//! let model = run.models.for_algorithm(Algorithm::QLearning);
//! let path = extract_path(&env, model, env.start(), 300, &mut rng);
//! println!("{} cells", path.len());
//! # Ok::<(), campusquest::Error>(())
//! ```

pub mod linear;
pub mod path;
pub mod policy;
pub mod q_table;
pub mod trainer;

pub use linear::{LinearModel, LinearWeights};
pub use path::{DEFAULT_MAX_PATH_STEPS, extract_path};
pub use policy::{ActionValues, greedy_action, max_value, select_action};
pub use q_table::QTable;
pub use trainer::{
    Algorithm, EpisodeSummary, TdParams, Trainer, TrainerConfig, TrainingRun, TrainingSummary,
    ValueModels,
};
