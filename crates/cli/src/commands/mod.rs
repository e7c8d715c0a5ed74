//! CLI subcommand implementations.

pub mod sync;
