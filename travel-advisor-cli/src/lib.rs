//! Command-line launcher for the travel advisor.

pub mod cli;
pub mod commands;
pub mod console;

pub use cli::{Cli, Commands, RemoteCommand, RemoteTarget};
pub use commands::run;
