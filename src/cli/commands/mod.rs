//! Subcommand implementations

pub mod layout;
pub mod replay;
pub mod train;
pub mod walk;
