#![deny(warnings)]

pub mod cli;
pub mod render;
pub mod terminal;

pub use cli::{Cli, CliError, run};
