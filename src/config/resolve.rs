use super::types::{BlocConfig, EventConfig, GenConfig, StateConfig};
use std::path::{Path, PathBuf};

/// Resolve a unit destination against the shared `path`/`part` keys.
///
/// A `dest` beginning with `.` is an extension suffix: it is appended to the
/// umbrella file's stem (`part: app.dart` + `dest: .state.dart` →
/// `app.state.dart`). Relative destinations then resolve against `path`.
pub fn resolve_dest(
    path: Option<&str>,
    part: Option<&str>,
    dest: Option<&str>,
) -> Option<PathBuf> {
    let dest = dest?;
    let mut resolved = dest.to_string();
    if resolved.starts_with('.') {
        if let Some(part) = part {
            let stem = Path::new(part)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            resolved = format!("{stem}{resolved}");
        }
    }
    match path {
        Some(base) => Some(Path::new(base).join(resolved)),
        None => Some(PathBuf::from(resolved)),
    }
}

fn prefixed(prefix: Option<&str>, name: Option<&str>, kind_default: &str) -> Option<String> {
    match (prefix, name) {
        (Some(p), Some(n)) => Some(format!("{p}{n}")),
        (Some(p), None) => Some(format!("{p}{kind_default}")),
        (None, n) => n.map(str::to_string),
    }
}

/// Fill a state section's blanks from the shared config keys.
pub fn apply_shared_state(shared: &GenConfig, mut unit: StateConfig) -> StateConfig {
    unit.part = unit.part.or_else(|| shared.part.clone());
    unit.path = unit.path.or_else(|| shared.path.clone());
    unit.name = prefixed(shared.prefix.as_deref(), unit.name.as_deref(), "State");
    unit
}

/// Fill an event section's blanks from the shared config keys.
pub fn apply_shared_event(shared: &GenConfig, mut unit: EventConfig) -> EventConfig {
    unit.part = unit.part.or_else(|| shared.part.clone());
    unit.path = unit.path.or_else(|| shared.path.clone());
    unit.name = prefixed(shared.prefix.as_deref(), unit.name.as_deref(), "Event");
    unit
}

/// Fill a bloc section's blanks from the shared config keys.
pub fn apply_shared_bloc(shared: &GenConfig, mut unit: BlocConfig) -> BlocConfig {
    unit.part = unit.part.or_else(|| shared.part.clone());
    unit.path = unit.path.or_else(|| shared.path.clone());
    unit.name = prefixed(shared.prefix.as_deref(), unit.name.as_deref(), "Bloc");
    unit
}
