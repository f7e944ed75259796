use askama::Template;
use tracing::warn;

use crate::config::{EventConfig, EventsSpec};
use crate::error::GenError;
use crate::fieldspec::FieldSpec;
use crate::generator::templates::EventsTemplateData;

/// One generated convenience-method signature for a single event
#[derive(Debug, Clone)]
pub struct ShortcutEntry {
    /// Emitted event class name
    pub event: String,
    /// Convenience method name (text after `~` in the descriptor)
    pub method: String,
    /// The event's own field list, reused as the method's named arguments
    pub args: Vec<FieldSpec>,
}

/// Shortcut entries accumulated during event-set generation
///
/// An explicit context value: populated in event order by
/// [`compose_events`], passed into the dispatcher generator of the same run,
/// read-only from then on. Nothing is persisted across runs.
#[derive(Debug, Clone, Default)]
pub struct ShortcutRegistry {
    entries: Vec<ShortcutEntry>,
}

impl ShortcutRegistry {
    pub fn register(&mut self, entry: ShortcutEntry) {
        self.entries.push(entry);
    }

    pub fn get(&self, event: &str) -> Option<&ShortcutEntry> {
        self.entries.iter().find(|e| e.event == event)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShortcutEntry> {
        self.entries.iter()
    }
}

/// One event variant: emitted class name, field list, optional shortcut
#[derive(Debug, Clone)]
pub struct EventDef {
    pub class_name: String,
    pub fields: Vec<FieldSpec>,
    pub shortcut: Option<String>,
}

/// Apply the event-name conventions to one raw descriptor.
///
/// A leading `.` appends the name after the base (`.Created` →
/// `UserEventCreated`), a leading `%` prepends it (`%Removed` →
/// `RemovedUserEvent`), and an embedded `~shortcut` names a convenience
/// method and is stripped from the class name.
pub fn parse_event_name(raw: &str, base: &str) -> (String, Option<String>) {
    let (name_part, shortcut) = match raw.split_once('~') {
        Some((n, s)) => (n, Some(s.to_string())),
        None => (raw, None),
    };
    let class_name = if let Some(rest) = name_part.strip_prefix('.') {
        format!("{base}{rest}")
    } else if let Some(rest) = name_part.strip_prefix('%') {
        format!("{rest}{base}")
    } else {
        name_part.to_string()
    };
    (class_name, shortcut)
}

/// Collect event definitions from either config form.
///
/// In the flat form a `#` splits an event-name prefix from a field
/// descriptor; an entry with an empty prefix adds a field to the most
/// recently declared event.
fn collect_events(spec: &EventsSpec, base: &str) -> Vec<EventDef> {
    let mut events: Vec<EventDef> = Vec::new();
    match spec {
        EventsSpec::Flat(items) => {
            for item in items {
                match item.split_once('#') {
                    Some(("", field)) => match events.last_mut() {
                        Some(event) => event.fields.push(FieldSpec::parse(field)),
                        None => warn!(line = %item, "field line before any event declaration; ignored"),
                    },
                    Some((name, field)) => {
                        let (class_name, shortcut) = parse_event_name(name, base);
                        if let Some(event) = events.iter_mut().find(|e| e.class_name == class_name)
                        {
                            if !field.is_empty() {
                                event.fields.push(FieldSpec::parse(field));
                            }
                        } else {
                            let mut fields = Vec::new();
                            if !field.is_empty() {
                                fields.push(FieldSpec::parse(field));
                            }
                            events.push(EventDef {
                                class_name,
                                fields,
                                shortcut,
                            });
                        }
                    }
                    None => {
                        let (class_name, shortcut) = parse_event_name(item, base);
                        events.push(EventDef {
                            class_name,
                            fields: Vec::new(),
                            shortcut,
                        });
                    }
                }
            }
        }
        EventsSpec::Grouped(mapping) => {
            for (key, value) in mapping {
                let Some(raw) = key.as_str() else { continue };
                let (class_name, shortcut) = parse_event_name(raw, base);
                let fields = match value.as_sequence() {
                    Some(seq) => seq
                        .iter()
                        .filter_map(|v| v.as_str())
                        .map(FieldSpec::parse)
                        .collect(),
                    None => Vec::new(),
                };
                events.push(EventDef {
                    class_name,
                    fields,
                    shortcut,
                });
            }
        }
    }
    events
}

/// Render one event subclass block.
fn event_class(event: &EventDef, base: &str) -> String {
    if event.fields.is_empty() {
        return format!("class {} extends {base} {{}}", event.class_name);
    }
    let mut finals = Vec::new();
    let mut ctor = Vec::new();
    for field in &event.fields {
        let mut lines = Vec::new();
        if !field.trailing_comment.is_empty() {
            lines.push(field.trailing_comment.clone());
        }
        lines.push(format!("final {} {}", field.declared_type(), field.name));
        finals.push(lines.join("\n  "));
        if field.is_required() {
            ctor.push(format!("required this.{}", field.name));
        } else {
            ctor.push(format!("this.{}{}", field.name, field.default_expr));
        }
    }
    format!(
        "class {name} extends {base} {{\n  {finals};\n  {name}({{{ctor}}});\n}}",
        name = event.class_name,
        finals = finals.join(";\n  "),
        ctor = ctor.join(", "),
    )
}

/// Compose the closed event set and the shortcut context for this run.
pub fn compose_events(
    cfg: &EventConfig,
    notes: &str,
) -> anyhow::Result<(String, ShortcutRegistry)> {
    let base_name = cfg.name.clone().unwrap_or_else(|| "BaseEvent".to_string());
    let spec = cfg
        .events
        .as_ref()
        .ok_or_else(|| GenError::MissingRequiredField {
            what: "event declarations (event.events)".to_string(),
        })?;
    let events = collect_events(spec, &base_name);
    if events.is_empty() {
        return Err(GenError::MissingRequiredField {
            what: "event declarations (event.events)".to_string(),
        }
        .into());
    }

    let mut registry = ShortcutRegistry::default();
    for event in &events {
        if let Some(method) = &event.shortcut {
            registry.register(ShortcutEntry {
                event: event.class_name.clone(),
                method: method.clone(),
                args: event.fields.clone(),
            });
        }
    }

    let blocks = events.iter().map(|e| event_class(e, &base_name)).collect();
    let rendered = EventsTemplateData {
        notes: notes.to_string(),
        has_part: cfg.part.is_some(),
        part_of: cfg.part.clone().unwrap_or_default(),
        base_name,
        events: blocks,
    }
    .render()?;
    Ok((rendered, registry))
}
