//! Incremental merge of a previously generated (and possibly hand-edited)
//! dispatcher file.
//!
//! The merge is a pure text transform over three recognized insertion
//! points: registration lines go right after the constructor opening,
//! handler stubs go before the file's final closing brace, and shortcut
//! methods go into the sentinel-bounded block (created on demand). Byte
//! ranges outside those points are never modified, so manual edits survive
//! re-generation. A file that matches none of the structural patterns is
//! returned untouched; this tool never regenerates over unrecognized
//! content.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::warn;

use crate::generator::bloc::{
    handler_stub, registration_line, shortcut_block, shortcut_methods, BlocUnit, SHORTCUTS_CLOSE,
};
use crate::generator::events::ShortcutRegistry;

// Events already bound in the constructor.
static REGISTERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"on<(\w+)>\(_on\w+\)").expect("valid merge regex"));

// Events with a handler declaration present. Line start or whitespace
// before `_on` keeps registration lines (`(_onFoo)`) from counting.
static HANDLED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(?:^|[ \t])_on(\w+)\(").expect("valid merge regex"));

// Constructor opening: the `super(...)` initializer followed by the body brace.
static CTOR_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"super[^\n]*?\{").expect("valid merge regex"));

/// Index of the brace closing the block opened at `open_brace`.
fn matching_brace(text: &str, open_brace: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, c) in text[open_brace..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open_brace + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Merge missing events into an existing dispatcher file.
///
/// Idempotent: merging a second time with the same unit returns the first
/// result unchanged. Structural mismatches degrade to a warned no-op.
pub fn merge(existing: &str, unit: &BlocUnit, registry: &ShortcutRegistry) -> String {
    let registered: HashSet<String> = REGISTERED
        .captures_iter(existing)
        .map(|c| c[1].to_string())
        .collect();
    let handled: HashSet<String> = HANDLED
        .captures_iter(existing)
        .map(|c| c[1].to_string())
        .collect();

    let missing: Vec<String> = unit
        .event_names
        .iter()
        .filter(|e| !(registered.contains(*e) && handled.contains(*e)))
        .cloned()
        .collect();
    if missing.is_empty() {
        return existing.to_string();
    }

    let Some(ctor) = CTOR_OPEN.find(existing) else {
        warn!(
            bloc = %unit.class_name,
            "existing file has no recognizable constructor; leaving it untouched"
        );
        return existing.to_string();
    };

    // All insertion offsets are computed against the original text and the
    // splices applied back-to-front, so earlier offsets stay valid.
    let mut inserts: Vec<(usize, String)> = Vec::new();

    let registrations: Vec<String> = missing.iter().map(|e| registration_line(e)).collect();
    inserts.push((ctor.end(), format!("\n{}", registrations.join("\n"))));

    let stubs: Vec<String> = missing
        .iter()
        .map(|e| handler_stub(e, &unit.state_class))
        .collect();
    match existing.rfind('}') {
        Some(last) => inserts.push((last, format!("\n{}", stubs.join("\n")))),
        None => {
            warn!(bloc = %unit.class_name, "existing file has no closing brace; leaving it untouched");
            return existing.to_string();
        }
    }

    let methods = shortcut_methods(&missing, registry);
    if !methods.is_empty() {
        if let Some(close) = existing.find(SHORTCUTS_CLOSE) {
            // Insert inside the existing sentinel block, just above its
            // closing marker line.
            let line_start = existing[..close].rfind('\n').map(|i| i + 1).unwrap_or(0);
            inserts.push((line_start, format!("{}\n", methods.join("\n"))));
        } else {
            match matching_brace(existing, ctor.end() - 1) {
                Some(ctor_close) => {
                    inserts.push((ctor_close + 1, format!("\n\n{}", shortcut_block(&methods))));
                }
                None => warn!(
                    bloc = %unit.class_name,
                    "constructor body never closes; skipping shortcut methods"
                ),
            }
        }
    }

    inserts.sort_by_key(|(pos, _)| std::cmp::Reverse(*pos));
    let mut out = existing.to_string();
    for (pos, text) in inserts {
        out.insert_str(pos, &text);
    }
    out
}
