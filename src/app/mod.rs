//! Application layer: sandbox configuration.
//!
//! ```
//! use campusquest::{app::SandboxConfig, sandbox::Sandbox};
//!
//! let sandbox = Sandbox::new(SandboxConfig::default().with_seed(42))?;
//! assert!(!sandbox.is_busy());
//! # Ok::<(), campusquest::Error>(())
//! ```

pub mod config;

pub use config::{DEFAULT_REPLAY_DELAY, SandboxConfig};
