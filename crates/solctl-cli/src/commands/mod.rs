//! CLI command implementations

mod inspect;
mod install;

pub use inspect::*;
pub use install::*;
