//! Subcommand modules for the `tmstack` binary.

pub mod parse;
pub mod run;
