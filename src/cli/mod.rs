//! # CLI Module
//!
//! Command-line interface for the blocgen code generator.
//!
//! ## Commands
//!
//! ### `all`
//!
//! Generate the full unit set from a YAML config:
//!
//! ```bash
//! blocgen all --config user.yaml
//! ```
//!
//! Runs state, events and bloc generation in that fixed order, then writes
//! the umbrella library file once. An existing bloc file is updated
//! incrementally instead of being regenerated.
//!
//! ### `state` / `event` / `bloc`
//!
//! Generate a single unit:
//!
//! ```bash
//! blocgen state --config user.yaml
//! blocgen bloc --config user.yaml --force
//! ```
//!
//! The config file may either wrap the unit section under its key
//! (`state:`, `event:`, `bloc:`) or be the bare section itself.
//!
//! ## Options
//!
//! - `--config <FILE>` - Path to the YAML generator config (required)
//! - `--force` - Overwrite destination files even when the config disables it

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands};
