//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the omni binary.

mod commands;
mod generate;
mod inspect;
mod serve;

pub use commands::{Cli, Commands};
pub use generate::{run_generate, run_mood};
pub use inspect::{list_types, print_layout};
pub use serve::run_serve;
