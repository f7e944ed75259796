use anyhow::Context;
use askama::Template;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{
    apply_shared_bloc, apply_shared_event, apply_shared_state, resolve_dest, BlocConfig,
    EventConfig, GenConfig, StateConfig,
};
use crate::error::GenError;
use crate::generator::bloc::{compose_bloc, load_bloc_unit};
use crate::generator::events::{compose_events, ShortcutRegistry};
use crate::generator::merge::merge;
use crate::generator::state::compose_state;
use crate::generator::templates::{banner, write_content, LibraryTemplateData};
use crate::generator::unit::UnitKind;

fn unit_dest(path: Option<&str>, part: Option<&str>, dest: Option<&str>) -> Option<PathBuf> {
    resolve_dest(path, part, dest)
}

fn allow_overwrite(overwrite: Option<bool>, force: bool) -> bool {
    force || overwrite.unwrap_or(true)
}

/// Generate the state unit: compose, then write when a destination is set.
pub fn generate_state(cfg: &StateConfig, label: &str, force: bool) -> anyhow::Result<String> {
    debug!(name = ?cfg.name, "composing state unit");
    let text = compose_state(cfg, &banner(label))?;
    if let Some(dest) = unit_dest(cfg.path.as_deref(), cfg.part.as_deref(), cfg.dest.as_deref()) {
        write_content(&dest, &text, allow_overwrite(cfg.overwrite, force))?;
    }
    Ok(text)
}

/// Generate the event unit, returning the rendered text together with the
/// shortcut context for the rest of the run.
pub fn generate_events(
    cfg: &EventConfig,
    label: &str,
    force: bool,
) -> anyhow::Result<(String, ShortcutRegistry)> {
    debug!(name = ?cfg.name, "composing event unit");
    let (text, registry) = compose_events(cfg, &banner(label))?;
    if let Some(dest) = unit_dest(cfg.path.as_deref(), cfg.part.as_deref(), cfg.dest.as_deref()) {
        write_content(&dest, &text, allow_overwrite(cfg.overwrite, force))?;
    }
    Ok((text, registry))
}

/// Generate the bloc unit.
///
/// When the destination already holds generated content the incremental
/// merge engine splices in only the missing events; otherwise the full unit
/// is composed.
pub fn generate_bloc(
    cfg: &BlocConfig,
    registry: &ShortcutRegistry,
    label: &str,
    force: bool,
) -> anyhow::Result<String> {
    let unit = load_bloc_unit(cfg)?;
    debug!(bloc = %unit.class_name, events = unit.event_names.len(), "composing bloc unit");
    let dest = unit_dest(cfg.path.as_deref(), cfg.part.as_deref(), cfg.dest.as_deref());
    let existing = match &dest {
        Some(d) if d.exists() => {
            Some(std::fs::read_to_string(d).with_context(|| format!("Failed to read {d:?}"))?)
        }
        _ => None,
    };
    let text = match existing {
        Some(existing) if !existing.trim().is_empty() => merge(&existing, &unit, registry),
        _ => compose_bloc(cfg, &unit, registry, &banner(label))?,
    };
    if let Some(dest) = &dest {
        write_content(dest, &text, allow_overwrite(cfg.overwrite, force))?;
    }
    Ok(text)
}

/// Run the full pipeline: state, then events, then bloc, in that fixed
/// order (the bloc reads the other two destinations and consumes the run's
/// shortcut context), then the created-once umbrella file.
pub fn run_pipeline(
    cfg: &GenConfig,
    label: &str,
    force: bool,
) -> anyhow::Result<BTreeMap<UnitKind, String>> {
    let mut results = BTreeMap::new();

    let state_cfg = apply_shared_state(
        cfg,
        cfg.state
            .clone()
            .ok_or_else(|| GenError::MissingRequiredField {
                what: "state section".to_string(),
            })?,
    );
    let state_text = generate_state(&state_cfg, label, force)?;
    let state_dest = unit_dest(
        state_cfg.path.as_deref(),
        state_cfg.part.as_deref(),
        state_cfg.dest.as_deref(),
    );
    results.insert(UnitKind::Record, state_text);
    if cfg.state_only {
        write_umbrella(cfg, &[(UnitKind::Record, state_dest)], None, label)?;
        return Ok(results);
    }

    let event_cfg = apply_shared_event(
        cfg,
        cfg.event
            .clone()
            .ok_or_else(|| GenError::MissingRequiredField {
                what: "event section".to_string(),
            })?,
    );
    let (event_text, registry) = generate_events(&event_cfg, label, force)?;
    let event_dest = unit_dest(
        event_cfg.path.as_deref(),
        event_cfg.part.as_deref(),
        event_cfg.dest.as_deref(),
    );
    results.insert(UnitKind::EventSet, event_text);
    if cfg.event_only {
        write_umbrella(
            cfg,
            &[
                (UnitKind::Record, state_dest),
                (UnitKind::EventSet, event_dest),
            ],
            None,
            label,
        )?;
        return Ok(results);
    }

    let mut bloc_cfg = apply_shared_bloc(
        cfg,
        cfg.bloc
            .clone()
            .ok_or_else(|| GenError::MissingRequiredField {
                what: "bloc section".to_string(),
            })?,
    );
    // The bloc unit defaults to the files generated moments ago.
    if bloc_cfg.state_file.is_none() {
        bloc_cfg.state_file = state_dest
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());
    }
    if bloc_cfg.event_file.is_none() {
        bloc_cfg.event_file = event_dest
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());
    }
    let bloc_text = generate_bloc(&bloc_cfg, &registry, label, force)?;
    let bloc_dest = unit_dest(
        bloc_cfg.path.as_deref(),
        bloc_cfg.part.as_deref(),
        bloc_cfg.dest.as_deref(),
    );
    results.insert(UnitKind::Dispatcher, bloc_text);

    write_umbrella(
        cfg,
        &[
            (UnitKind::Record, state_dest),
            (UnitKind::EventSet, event_dest),
            (UnitKind::Dispatcher, bloc_dest),
        ],
        Some(&bloc_cfg),
        label,
    )?;
    Ok(results)
}

static CODE_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"%(\w+)").expect("valid code-key regex"));

/// Substitute `%state`/`%event`/`%bloc` placeholders in a user code block.
fn substitute_code(code: &str, vars: &BTreeMap<&str, String>) -> anyhow::Result<String> {
    let mut out = String::new();
    let mut last = 0;
    for caps in CODE_KEY.captures_iter(code) {
        if let Some(m) = caps.get(0) {
            let key = &caps[1];
            out.push_str(&code[last..m.start()]);
            match vars.get(key) {
                Some(value) => out.push_str(value),
                None => {
                    return Err(GenError::TooManyValues {
                        key: key.to_string(),
                    }
                    .into())
                }
            }
            last = m.end();
        }
    }
    out.push_str(&code[last..]);
    Ok(out)
}

/// Emit the umbrella library with the aggregate imports and `part`
/// directives. Created once: an existing umbrella is never rewritten, since
/// it routinely accumulates hand-written members.
fn write_umbrella(
    cfg: &GenConfig,
    units: &[(UnitKind, Option<PathBuf>)],
    bloc: Option<&BlocConfig>,
    label: &str,
) -> anyhow::Result<()> {
    let Some(part) = cfg.part.as_deref() else {
        return Ok(());
    };
    // The umbrella sits next to the generated units.
    let Some(anchor) = units.iter().rev().find_map(|(_, d)| d.clone()) else {
        return Ok(());
    };
    let dir = anchor
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .to_path_buf();
    let umbrella = dir.join(part);
    if umbrella.exists() {
        println!("ℹ️  Umbrella {umbrella:?} already exists; leaving it untouched");
        return Ok(());
    }

    let rel = |p: &Path| -> String {
        p.strip_prefix(&dir)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|_| p.to_string_lossy().into_owned())
    };

    let mut parts = Vec::new();
    let mut vars: BTreeMap<&str, String> = BTreeMap::new();
    for (kind, dest) in units {
        if let Some(dest) = dest {
            parts.push(rel(dest));
            vars.insert(kind.config_key(), rel(dest));
        }
    }

    let stem = umbrella
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let code = match cfg.code.as_deref() {
        Some(code) => substitute_code(code, &vars)?,
        None => String::new(),
    };
    let bloc_import = match bloc {
        Some(b) if b.use_hydrate => "hydrated_bloc/hydrated_bloc.dart",
        _ => "bloc/bloc.dart",
    };
    let repo_import = bloc
        .and_then(|b| b.repo_file.as_deref())
        .map(|p| rel(Path::new(p)));

    let rendered = LibraryTemplateData {
        notes: banner(label),
        has_extra_import: cfg.import.is_some(),
        extra_import: cfg.import.clone().unwrap_or_default(),
        bloc_import: bloc_import.to_string(),
        has_repo_import: repo_import.is_some(),
        repo_import: repo_import.unwrap_or_default(),
        stem,
        parts,
        has_code: !code.is_empty(),
        code,
    }
    .render()?;
    write_content(&umbrella, &rendered, true)?;
    Ok(())
}
