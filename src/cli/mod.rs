//! CLI infrastructure for the CampusQuest sandbox
//!
//! This module provides the command-line interface for training algorithms,
//! replaying learned paths, walking the grid by hand, and managing layouts.

pub mod commands;
pub mod config;
pub mod output;
