//! Training observation pipeline
//!
//! Adapters for the [`Observer`] port:
//! - Progress display on the terminal
//! - Aggregate metrics and learning milestones
//! - JSON Lines export of every episode

pub mod observers;

// Re-export observer implementations (adapters)
pub use observers::{
    EpisodeObservation, JsonlObserver, MetricsObserver, MetricsSummary, MilestoneObserver,
    ProgressObserver,
};

pub use crate::ports::Observer;
