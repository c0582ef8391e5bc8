//! Command implementations
//!
//! Each command is an `impl Repository` block in its own `porcelain` module, so the
//! binary only has to build a `Repository` and dispatch on the parsed subcommand.

pub mod porcelain;
