//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the skillpilot binary.

mod commands;
mod play;
mod projects;
mod validate;

pub use commands::{Cli, Commands, LogFormat, ValidationOutputFormat};
pub use play::handle_play_command;
pub use projects::handle_projects_command;
pub use validate::handle_validate_command;
