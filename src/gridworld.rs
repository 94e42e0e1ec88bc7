//! Grid world: editable layouts and the frozen environment trainers run on

pub mod environment;
pub mod landmark;
pub mod layout;

pub use environment::{Environment, MANUAL_STEP_COST, StepCost, TRAINING_STEP_COST};
pub use landmark::Landmark;
pub use layout::{CellEdit, GridLayout, MAX_GRID_SIDE, MIN_GRID_SIDE};
