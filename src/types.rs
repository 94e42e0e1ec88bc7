//! Core value types shared across the crate: grid cells and compass actions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A `(row, column)` coordinate on the grid.
///
/// Bounds are not enforced here; a cell is only meaningful relative to a
/// grid of known height and width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Packed index `row * width + col` used by the dense value stores.
    pub fn index(&self, width: usize) -> usize {
        self.row * width + self.col
    }

    /// Inverse of [`Cell::index`].
    pub fn from_index(index: usize, width: usize) -> Self {
        Self::new(index / width, index % width)
    }

    /// Whether the cell lies inside a `height x width` grid.
    pub fn in_bounds(&self, height: usize, width: usize) -> bool {
        self.row < height && self.col < width
    }

    /// The neighbouring cell in the direction of `action`, or `None` when the
    /// step would leave the grid.
    pub fn step(&self, action: Action, height: usize, width: usize) -> Option<Cell> {
        let next = match action {
            Action::Up => Cell::new(self.row.checked_sub(1)?, self.col),
            Action::Right => Cell::new(self.row, self.col + 1),
            Action::Down => Cell::new(self.row + 1, self.col),
            Action::Left => Cell::new(self.row, self.col.checked_sub(1)?),
        };
        next.in_bounds(height, width).then_some(next)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// One of the four compass moves.
///
/// The declaration order is significant: greedy selection breaks ties in
/// favour of the earliest action in [`Action::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    /// All actions in tie-break order.
    pub const ALL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Position of the action in [`Action::ALL`].
    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Right => 1,
            Action::Down => 2,
            Action::Left => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Up => "UP",
            Action::Right => "RIGHT",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Action {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "n" | "north" => Ok(Action::Up),
            "right" | "r" | "e" | "east" => Ok(Action::Right),
            "down" | "d" | "s" | "south" => Ok(Action::Down),
            "left" | "l" | "w" | "west" => Ok(Action::Left),
            other => Err(crate::Error::ParseAction {
                input: other.to_string(),
                expected: "up, right, down, left".to_string(),
            }),
        }
    }
}

/// A single observed move: where the agent was, what it did, where it ended
/// up and what that cost or paid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: Cell,
    pub action: Action,
    pub next: Cell,
    pub reward: f64,
}
