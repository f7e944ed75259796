//! # Config Module
//!
//! YAML configuration model for the generator: one [`GenConfig`] document
//! with shared keys (`path`, `part`, `prefix`, `import`, `code`) plus one
//! section per unit kind (`state`, `event`, `bloc`).
//!
//! Loading is strict about YAML shape but lenient about content: required
//! fields (class names, props) are validated by the compositors, not here,
//! so a subcommand can run against a partial document.

mod load;
mod resolve;
mod types;

pub use load::*;
pub use resolve::*;
pub use types::*;
