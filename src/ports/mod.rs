//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the learning core and whatever
//! drives or watches it. Following hexagonal architecture, these traits are
//! owned by the domain and implemented by adapters in [`crate::pipeline`].

pub mod observer;

pub use observer::Observer;
