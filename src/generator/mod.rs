//! # Generator Module
//!
//! Turns a parsed [`GenConfig`](crate::config::GenConfig) into Dart source
//! for the three artifact kinds: the immutable value record (state class),
//! the closed event set and the dispatcher (bloc class).
//!
//! ## Architecture
//!
//! Each unit follows the same shape:
//!
//! ```text
//! YAML Config → Field Parsing → Template Rendering → Written Dart File
//! ```
//!
//! 1. **Field Parsing** - Descriptor lines go through the
//!    [`fieldspec`](crate::fieldspec) mini-language parser
//! 2. **Template Rendering** - Askama templates render the unit layout;
//!    field-level fragments are pre-joined strings
//! 3. **Writing** - [`templates::write_content`] honors the overwrite guard
//!    and creates parent directories
//!
//! The dispatcher is special: when its destination file already exists, the
//! [`merge`] engine splices missing events into the hand-edited file instead
//! of regenerating it. [`project::run_pipeline`] orchestrates a full run in
//! the fixed order state → event → bloc and finishes with the created-once
//! umbrella library file.

pub mod bloc;
pub mod events;
pub mod merge;
pub mod project;
pub mod state;
pub mod templates;
pub mod unit;

pub use bloc::{compose_bloc, load_bloc_unit, BlocUnit};
pub use events::{compose_events, ShortcutEntry, ShortcutRegistry};
pub use merge::merge;
pub use project::{generate_bloc, generate_events, generate_state, run_pipeline};
pub use state::compose_state;
pub use unit::UnitKind;

#[cfg(test)]
mod tests;
