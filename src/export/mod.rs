//! Export functionality for analysis
//!
//! CSV export of the tabular value store, the linear model evaluated on the
//! grid, and manually recorded episodes.

mod grid_csv;

pub use grid_csv::{GridCsvExporter, TransitionRecord, ValueRecord};
