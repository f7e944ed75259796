//! # blocgen
//!
//! **blocgen** is a declarative code generator for Dart bloc scaffolding: from a
//! compact YAML description it synthesizes the immutable state class, the closed
//! set of event classes and the dispatching bloc class, wired together through a
//! `part of` umbrella library.
//!
//! ## Overview
//!
//! Hand-writing bloc scaffolding is repetitive: every state field needs a
//! `final` declaration, a constructor parameter, a `copyWith` argument, an
//! equality key and (usually) JSON plumbing. blocgen generates all of it from
//! one field descriptor line per field, and keeps regenerating it as the config
//! evolves without clobbering the hand-written handler bodies in the bloc.
//!
//! ## Architecture
//!
//! The library is organized into a few key modules:
//!
//! - **[`config`]** - YAML config loading, shared-key inheritance and
//!   destination resolution
//! - **[`fieldspec`]** - The field descriptor mini-language
//!   (`int age=0 // comment (jk@ wire_key)`)
//! - **[`generator`]** - The unit compositors (state, events, bloc), the
//!   incremental merge engine and the pipeline orchestrator
//! - **[`cli`]** - The `blocgen` command-line interface
//! - **[`error`]** - The fatal error taxonomy
//!
//! ### Generation Flow
//!
//! ```text
//! YAML Config → config::load_config
//!             → generator::run_pipeline
//!                 → compose_state   → <part>.state.dart
//!                 → compose_events  → <part>.event.dart   (+ shortcut registry)
//!                 → compose_bloc    → <part>.bloc.dart    (or merge into it)
//!             → umbrella library    → <part>.dart         (created once)
//! ```
//!
//! The three units are generated in a fixed order because the bloc compositor
//! reads the freshly written state and event files to recover class names, and
//! consumes the shortcut registry populated while the event unit was composed.
//!
//! ### Incremental Updates
//!
//! The bloc file is the one unit users edit by hand (the handler bodies hold
//! business logic), so it is never regenerated once it exists. Instead the
//! merge engine scans it for registered and handled events and splices in only
//! what is missing: an `on<Event>(_onEvent)` registration, a handler stub, and
//! any shortcut methods, inside the sentinel-bounded block. Everything else in
//! the file is left byte-for-byte untouched.
//!
//! ## Quick Start
//!
//! A minimal config:
//!
//! ```yaml
//! path: lib/blocs/user
//! part: user.dart
//! prefix: User
//! state:
//!   dest: .state.dart
//!   props:
//!     - int age=0
//!     - String? nickname
//! event:
//!   dest: .event.dart
//!   events:
//!     - .Created#String name
//!     - .Removed~remove
//! bloc:
//!   dest: .bloc.dart
//! ```
//!
//! ```bash
//! blocgen all --config user.yaml
//! ```
//!
//! This writes `user.state.dart`, `user.event.dart`, `user.bloc.dart` and the
//! umbrella `user.dart` under `lib/blocs/user/`. Re-running after adding an
//! event updates the bloc in place.
//!
//! ## Field Descriptors
//!
//! One line per field: `[Type[?]] name[=default][ // comment [(jk@ key)]]`.
//!
//! - `int age=0` - non-null with a default, optional constructor parameter
//! - `String? nickname` - nullable, optional constructor parameter
//! - `Map<String,int> scores={}` - generics are fine
//! - `token // session token (jk@ session_token)` - type defaults to `String`,
//!   the comment is carried into the generated code, `jk@` overrides the JSON key
//!
//! ## Event Descriptors
//!
//! - `.Created` appends to the base name (`UserEvent` → `UserEventCreated`)
//! - `%Removed` prepends (`RemovedUserEvent`)
//! - `~method` generates a convenience method on the bloc that wraps `add(...)`
//! - `#` separates the event name from a field descriptor in the flat list form;
//!   a line starting with `#` adds a field to the most recent event

pub mod cli;
pub mod config;
pub mod error;
pub mod fieldspec;
pub mod generator;

pub use config::{load_config, load_section, BlocConfig, EventConfig, GenConfig, StateConfig};
pub use error::GenError;
pub use fieldspec::FieldSpec;
pub use generator::{run_pipeline, ShortcutRegistry, UnitKind};
