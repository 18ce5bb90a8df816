//! Configuration loading
//!
//! Resolves connection settings from explicit values and the process
//! environment.

pub mod loader;

// Re-export commonly used items
pub use loader::{fill_from_env, EnvSource, ProcessEnv};
