//! Configuration parsing for solctl
//!
//! This crate handles:
//! - Global configuration (`~/.config/solctl/config.toml`)
//! - The solution registry (`[solutions.<type>]` tables)
//! - Deployment constants shared by every strategy

mod error;
mod global;
mod solution;

pub use error::*;
pub use global::*;
pub use solution::*;
