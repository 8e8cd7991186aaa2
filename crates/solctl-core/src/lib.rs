//! Core logic for solctl
//!
//! This crate provides:
//! - Env file reconciliation (root env merged over a checkout's env)
//! - Repository structure detection (compose file vs Dockerfile)
//! - Best-effort cleanup of previous deployments
//! - Single-container and compose deployment strategies
//! - The installation sequence tying them together

mod cleanup;
pub mod deploy;
mod env;
mod error;
mod installer;
mod phase;
mod structure;

pub use cleanup::*;
pub use deploy::{select_strategy, ComposeTool, Deployer, DeploymentStrategy};
pub use env::*;
pub use error::*;
pub use installer::*;
pub use phase::*;
pub use structure::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
