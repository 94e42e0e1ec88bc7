//! Frozen environment snapshot used for transitions and rewards
//!
//! An [`Environment`] is compiled from a [`GridLayout`] into dense lookup
//! tables indexed by `row * width + col`. It is immutable: trainers and the
//! path extractor can hold their own copy while the layout stays editable.

use super::{landmark::Landmark, layout::GridLayout};
use crate::types::{Action, Cell};

/// Step cost applied to manual moves onto an empty cell.
pub const MANUAL_STEP_COST: f64 = -0.02;
/// Step cost applied during automated training onto an empty cell.
pub const TRAINING_STEP_COST: f64 = -0.05;

/// Which step cost applies when the agent lands on an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCost {
    Manual,
    Training,
}

impl StepCost {
    pub fn value(self) -> f64 {
        match self {
            StepCost::Manual => MANUAL_STEP_COST,
            StepCost::Training => TRAINING_STEP_COST,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Environment {
    height: usize,
    width: usize,
    walls: Vec<bool>,
    /// Index into `landmarks` for each cell
    occupant: Vec<Option<usize>>,
    landmarks: Vec<(String, Landmark)>,
    start: Cell,
    target: Option<Cell>,
}

impl Environment {
    pub fn from_layout(layout: &GridLayout) -> Self {
        let height = layout.height();
        let width = layout.width();
        let cells = height * width;

        let mut walls = vec![false; cells];
        for wall in layout.walls() {
            walls[wall.index(width)] = true;
        }

        let landmarks: Vec<(String, Landmark)> = layout
            .landmarks()
            .map(|(name, lm)| (name.to_string(), lm.clone()))
            .collect();
        let mut occupant = vec![None; cells];
        for (idx, (_, lm)) in landmarks.iter().enumerate() {
            occupant[lm.position.index(width)] = Some(idx);
        }

        Self {
            height,
            width,
            walls,
            occupant,
            landmarks,
            start: layout.start_cell(),
            target: layout.target().map(|(_, lm)| lm.position),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells in the grid.
    pub fn size(&self) -> usize {
        self.height * self.width
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn target(&self) -> Option<Cell> {
        self.target
    }

    pub fn is_target(&self, cell: Cell) -> bool {
        self.target == Some(cell)
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        cell.in_bounds(self.height, self.width) && self.walls[cell.index(self.width)]
    }

    /// Apply `action` from `pos`. Leaving the grid or walking into a wall
    /// leaves the agent where it was.
    pub fn transition(&self, pos: Cell, action: Action) -> Cell {
        match pos.step(action, self.height, self.width) {
            Some(next) if !self.walls[next.index(self.width)] => next,
            _ => pos,
        }
    }

    pub fn landmark_at(&self, cell: Cell) -> Option<(&str, &Landmark)> {
        if !cell.in_bounds(self.height, self.width) {
            return None;
        }
        self.occupant[cell.index(self.width)]
            .map(|idx| (self.landmarks[idx].0.as_str(), &self.landmarks[idx].1))
    }

    /// Reward for landing on `cell`: the landmark's reward if one is there,
    /// otherwise the step cost.
    pub fn reward(&self, cell: Cell, cost: StepCost) -> f64 {
        self.landmark_at(cell)
            .map_or(cost.value(), |(_, lm)| lm.reward)
    }
}
