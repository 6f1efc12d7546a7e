//! # avrosynth CLI
//!
//! Argument parsing, collaborators and subcommands behind the `avrosynth`
//! binary.

pub mod cli;
pub mod commands;
pub mod source;

pub use cli::{CheckArgs, Cli, Command, GenerateArgs};
pub use source::{CommandIdlCompiler, LocationSource};
