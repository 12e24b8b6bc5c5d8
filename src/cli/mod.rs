//! Command-line interface

pub mod args;
pub mod catalog;
pub mod commands;

pub use args::{Cli, Commands};
