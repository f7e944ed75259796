use askama::Template;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Generated-file warning banner naming the originating config file.
pub fn banner(config_label: &str) -> String {
    format!(
        "// GENERATED by blocgen from {config_label}; edit {config_label} and re-run blocgen instead of changing this file."
    )
}

/// Template data for the immutable value record (state class)
///
/// Field-level fragments (declarations, constructor parameters, `copyWith`
/// arguments) are pre-joined strings; the template only handles layout.
#[derive(Template)]
#[template(path = "state.dart.txt", escape = "none")]
pub struct StateTemplateData {
    pub notes: String,
    pub has_part: bool,
    pub part_of: String,
    pub use_json: bool,
    pub has_converter: bool,
    pub converter: String,
    pub class_name: String,
    /// ` extends Equatable`, ` extends <Parent>` or empty
    pub extends_clause: String,
    pub finals: String,
    /// Brace-wrapped named parameter list
    pub ctor_params: String,
    pub has_init: bool,
    pub copy_args: String,
    pub copy_body: String,
    pub has_props: bool,
    pub props: String,
}

/// Template data for the closed event set
#[derive(Template)]
#[template(path = "events.dart.txt", escape = "none")]
pub struct EventsTemplateData {
    pub notes: String,
    pub has_part: bool,
    pub part_of: String,
    pub base_name: String,
    /// One pre-rendered class block per event, in input order
    pub events: Vec<String>,
}

/// Template data for the dispatcher (bloc class)
#[derive(Template)]
#[template(path = "bloc.dart.txt", escape = "none")]
pub struct BlocTemplateData {
    pub notes: String,
    pub has_part: bool,
    pub part_of: String,
    pub class_name: String,
    pub event_base: String,
    pub state_class: String,
    /// ` with HydratedMixin` etc., or empty
    pub mixins: String,
    pub has_repo: bool,
    pub repo_class: String,
    pub repo_var: String,
    pub ctor_args: String,
    pub registrations: String,
    pub has_shortcuts: bool,
    pub shortcut_block: String,
    pub use_hydrate: bool,
    pub handlers: String,
}

/// Template data for the umbrella library file
#[derive(Template)]
#[template(path = "library.dart.txt", escape = "none")]
pub struct LibraryTemplateData {
    pub notes: String,
    pub has_extra_import: bool,
    pub extra_import: String,
    pub bloc_import: String,
    pub has_repo_import: bool,
    pub repo_import: String,
    pub stem: String,
    /// `part` directive targets relative to the umbrella file
    pub parts: Vec<String>,
    pub has_code: bool,
    pub code: String,
}

/// Write rendered content to its destination, honoring the overwrite guard.
///
/// When `overwrite` is disabled and the destination exists, the file is left
/// untouched and the write is skipped. Parent directories are created.
pub fn write_content(dest: &Path, content: &str, overwrite: bool) -> anyhow::Result<()> {
    if dest.exists() && !overwrite {
        warn!(dest = %dest.display(), "destination exists and overwrite is disabled; skipping");
        println!("⚠️  Skipping existing file: {dest:?}");
        return Ok(());
    }
    if let Some(dir) = dest.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    fs::write(dest, content)?;
    println!("✅ Generated {dest:?}");
    Ok(())
}
