//! Command-line interface for tagfix.
//!
//! This module provides CLI commands for inspecting tags, classifying cover
//! and lyrics quality, and fetching missing assets across a library.

mod commands;

pub use commands::{Cli, Commands, run_command};
