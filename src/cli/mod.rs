//! Command-line interface definitions and helpers.
//!
//! This module contains argument parsing, the one-shot subcommand handlers and
//! the interactive session.

mod args;
mod commands;
mod interactive;

pub use args::{Args, Command, ConfigAction};
pub use commands::{describe_with, handle_config_action, list_cameras};
pub use interactive::{parse_input, parse_source_choice, Session, SessionCommand};
