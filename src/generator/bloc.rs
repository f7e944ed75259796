use askama::Template;

use crate::config::BlocConfig;
use crate::error::GenError;
use crate::generator::events::{ShortcutEntry, ShortcutRegistry};
use crate::generator::templates::BlocTemplateData;
use crate::generator::unit::{find_classes, first_class};

/// Sentinel pair bounding the generated shortcut-method block; the merge
/// engine locates the block by these exact markers.
pub const SHORTCUTS_OPEN: &str = "// <blocgen:shortcuts>";
pub const SHORTCUTS_CLOSE: &str = "// </blocgen:shortcuts>";

/// In-memory descriptor of a dispatcher unit
///
/// Built once per generator invocation from the referenced state and event
/// files, then rendered (or merged) exactly once.
#[derive(Debug, Clone)]
pub struct BlocUnit {
    pub class_name: String,
    pub state_class: String,
    pub event_base: String,
    /// Event class names from the referenced event set, in declaration order
    pub event_names: Vec<String>,
    /// Repository dependency class, when configured
    pub repo_class: Option<String>,
    pub use_hydrate: bool,
    pub use_replay: bool,
}

fn read_dependency(path: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        GenError::MissingDependency {
            path: path.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Build the dispatcher descriptor from its configured sibling files.
pub fn load_bloc_unit(cfg: &BlocConfig) -> anyhow::Result<BlocUnit> {
    let state_file = cfg
        .state_file
        .as_deref()
        .ok_or_else(|| GenError::MissingRequiredField {
            what: "state file reference (bloc.state_file)".to_string(),
        })?;
    let event_file = cfg
        .event_file
        .as_deref()
        .ok_or_else(|| GenError::MissingRequiredField {
            what: "event file reference (bloc.event_file)".to_string(),
        })?;

    let state_content = read_dependency(state_file)?;
    let state_class = first_class(&state_content).ok_or_else(|| GenError::MissingDependency {
        path: state_file.to_string(),
        reason: "no class declaration found".to_string(),
    })?;

    let event_content = read_dependency(event_file)?;
    let mut event_classes = find_classes(&event_content).into_iter();
    let event_base = event_classes.next().ok_or_else(|| GenError::MissingDependency {
        path: event_file.to_string(),
        reason: "no class declaration found".to_string(),
    })?;
    let event_names: Vec<String> = event_classes.collect();

    let repo_class = match cfg.repo_file.as_deref() {
        Some(repo_file) => {
            let repo_content = read_dependency(repo_file)?;
            Some(
                first_class(&repo_content).ok_or_else(|| GenError::MissingDependency {
                    path: repo_file.to_string(),
                    reason: "no class declaration found".to_string(),
                })?,
            )
        }
        None => None,
    };

    Ok(BlocUnit {
        class_name: cfg.name.clone().unwrap_or_else(|| "BaseBloc".to_string()),
        state_class,
        event_base,
        event_names,
        repo_class,
        use_hydrate: cfg.use_hydrate,
        use_replay: cfg.use_replay,
    })
}

/// Registration line binding one event type to its handler.
pub fn registration_line(event: &str) -> String {
    format!("    on<{event}>(_on{event});")
}

/// Stub handler for one event; no default logic.
pub fn handler_stub(event: &str, state_class: &str) -> String {
    format!(
        "  Future<void> _on{event}({event} event, Emitter<{state_class}> emit) async {{\n    // TODO: add your code here\n  }}\n"
    )
}

/// Public convenience method forwarding named arguments to `add(Event(...))`.
pub fn shortcut_method(entry: &ShortcutEntry) -> String {
    if entry.args.is_empty() {
        return format!("  void {}() => add({}());", entry.method, entry.event);
    }
    let mut params = Vec::new();
    let mut forwards = Vec::new();
    for field in &entry.args {
        if field.is_required() {
            params.push(format!("required {} {}", field.declared_type(), field.name));
        } else {
            params.push(format!(
                "{} {}{}",
                field.declared_type(),
                field.name,
                field.default_expr
            ));
        }
        forwards.push(format!("{name}: {name}", name = field.name));
    }
    format!(
        "  void {method}({{{params}}}) => add({event}({forwards}));",
        method = entry.method,
        event = entry.event,
        params = params.join(", "),
        forwards = forwards.join(", "),
    )
}

/// Wrap shortcut methods in the sentinel-bounded block.
pub fn shortcut_block(methods: &[String]) -> String {
    format!(
        "  {SHORTCUTS_OPEN}\n{}\n  {SHORTCUTS_CLOSE}",
        methods.join("\n")
    )
}

/// Shortcut methods for the given events, in event order.
pub fn shortcut_methods(events: &[String], registry: &ShortcutRegistry) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| registry.get(e))
        .map(shortcut_method)
        .collect()
}

fn mixins_clause(unit: &BlocUnit) -> String {
    let mut mixins = Vec::new();
    if unit.use_hydrate {
        mixins.push("HydratedMixin");
    }
    if unit.use_replay {
        mixins.push("ReplayBlocMixin");
    }
    if mixins.is_empty() {
        String::new()
    } else {
        format!(" with {}", mixins.join(", "))
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Compose a complete dispatcher from its descriptor and the run's
/// shortcut context.
pub fn compose_bloc(
    cfg: &BlocConfig,
    unit: &BlocUnit,
    registry: &ShortcutRegistry,
    notes: &str,
) -> anyhow::Result<String> {
    let registrations: Vec<String> = unit
        .event_names
        .iter()
        .map(|e| registration_line(e))
        .collect();
    let handlers: Vec<String> = unit
        .event_names
        .iter()
        .map(|e| handler_stub(e, &unit.state_class))
        .collect();
    let methods = shortcut_methods(&unit.event_names, registry);

    let (repo_class, repo_var, ctor_args) = match &unit.repo_class {
        Some(class) => {
            let var = lower_first(class);
            let args = format!("{{required this.{var}}}");
            (class.clone(), var, args)
        }
        None => (String::new(), String::new(), String::new()),
    };

    let rendered = BlocTemplateData {
        notes: notes.to_string(),
        has_part: cfg.part.is_some(),
        part_of: cfg.part.clone().unwrap_or_default(),
        class_name: unit.class_name.clone(),
        event_base: unit.event_base.clone(),
        state_class: unit.state_class.clone(),
        mixins: mixins_clause(unit),
        has_repo: unit.repo_class.is_some(),
        repo_class,
        repo_var,
        ctor_args,
        registrations: registrations.join("\n"),
        has_shortcuts: !methods.is_empty(),
        shortcut_block: shortcut_block(&methods),
        use_hydrate: unit.use_hydrate,
        handlers: handlers.join("\n"),
    }
    .render()?;
    Ok(rendered)
}
