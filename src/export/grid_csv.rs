//! CSV export of learned values and manual trajectories
//!
//! Rows are written with the `csv` crate from serde records so the files load
//! straight into a dataframe.

use std::{fs::File, io::Write, path::Path};

use serde::Serialize;

use crate::{
    Error, Result,
    q_learning::{LinearModel, QTable, policy::ActionValues},
    recorder::Episode,
    types::{Action, Cell},
};

/// One row per grid cell with its four action-values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRecord {
    pub row: usize,
    pub col: usize,
    pub up: f64,
    pub right: f64,
    pub down: f64,
    pub left: f64,
    /// Greedy action at this cell
    pub best: Action,
}

impl ValueRecord {
    fn from_model<M: ActionValues + ?Sized>(model: &M, cell: Cell) -> Self {
        Self {
            row: cell.row,
            col: cell.col,
            up: model.value(cell, Action::Up),
            right: model.value(cell, Action::Right),
            down: model.value(cell, Action::Down),
            left: model.value(cell, Action::Left),
            best: crate::q_learning::greedy_action(model, cell),
        }
    }
}

/// One row per recorded manual transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionRecord {
    pub episode: usize,
    pub step: usize,
    pub state_row: usize,
    pub state_col: usize,
    pub action: Action,
    pub next_row: usize,
    pub next_col: usize,
    pub reward: f64,
}

/// Exporter for value tables and episodes
pub struct GridCsvExporter;

impl GridCsvExporter {
    /// Collect one record per cell of the tabular store, row-major.
    pub fn table_records(table: &QTable) -> Vec<ValueRecord> {
        table
            .iter()
            .map(|(cell, _)| ValueRecord::from_model(table, cell))
            .collect()
    }

    /// Evaluate the linear model on every cell of a `height`x`width` grid.
    pub fn linear_records(model: &LinearModel, height: usize, width: usize) -> Vec<ValueRecord> {
        (0..height)
            .flat_map(|row| (0..width).map(move |col| Cell::new(row, col)))
            .map(|cell| ValueRecord::from_model(model, cell))
            .collect()
    }

    /// Flatten episodes into transition rows (episodes and steps 0-based).
    pub fn episode_records(episodes: &[Episode]) -> Vec<TransitionRecord> {
        episodes
            .iter()
            .enumerate()
            .flat_map(|(episode, ep)| {
                ep.transitions
                    .iter()
                    .enumerate()
                    .map(move |(step, t)| TransitionRecord {
                        episode,
                        step,
                        state_row: t.state.row,
                        state_col: t.state.col,
                        action: t.action,
                        next_row: t.next.row,
                        next_col: t.next.col,
                        reward: t.reward,
                    })
            })
            .collect()
    }

    /// Write records with a header row to any writer.
    pub fn write<W: Write, R: Serialize>(writer: W, records: &[R]) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Export the tabular store to `path`.
    pub fn export_table<P: AsRef<Path>>(table: &QTable, path: P) -> Result<()> {
        Self::write(create(path.as_ref())?, &Self::table_records(table))
    }

    /// Export manual episodes to `path`.
    pub fn export_episodes<P: AsRef<Path>>(episodes: &[Episode], path: P) -> Result<()> {
        Self::write(create(path.as_ref())?, &Self::episode_records(episodes))
    }
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| Error::Io {
        operation: format!("create CSV file {}", path.display()),
        source,
    })
}
