#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::config::{BlocConfig, EventConfig, EventsSpec, StateConfig};
use crate::fieldspec::FieldSpec;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("gen_test_{}_{}", std::process::id(), nanos));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn state_cfg(props: &[&str]) -> StateConfig {
    StateConfig {
        name: Some("DemoState".to_string()),
        props: props.iter().map(|p| p.to_string()).collect(),
        ..StateConfig::default()
    }
}

fn event_cfg(events: &[&str]) -> EventConfig {
    EventConfig {
        name: Some("DemoEvent".to_string()),
        events: Some(EventsSpec::Flat(
            events.iter().map(|e| e.to_string()).collect(),
        )),
        ..EventConfig::default()
    }
}

fn demo_unit(events: &[&str]) -> bloc::BlocUnit {
    bloc::BlocUnit {
        class_name: "DemoBloc".to_string(),
        state_class: "DemoState".to_string(),
        event_base: "DemoEvent".to_string(),
        event_names: events.iter().map(|e| e.to_string()).collect(),
        repo_class: None,
        use_hydrate: false,
        use_replay: false,
    }
}

#[test]
fn test_compose_state_fields_and_props() {
    let cfg = state_cfg(&["int age=0", "String? nickname"]);
    let text = compose_state(&cfg, "// banner").unwrap();
    assert!(text.contains("class DemoState extends Equatable {"));
    assert!(text.contains("final int age;"));
    assert!(text.contains("final String? nickname;"));
    assert!(text.contains("const DemoState({this.age=0, this.nickname});"));
    assert!(text.contains("int? age"));
    assert!(text.contains("age: age ?? this.age"));
    // Both fields are equality keys.
    assert!(text.contains("age,\n    nickname"));
}

#[test]
fn test_compose_state_required_and_optional_params() {
    let cfg = state_cfg(&["int age", "String? nickname"]);
    let text = compose_state(&cfg, "// banner").unwrap();
    assert!(text.contains("const DemoState({required this.age, this.nickname});"));
}

#[test]
fn test_compose_state_is_deterministic() {
    let cfg = state_cfg(&["int age=0", "String name // display name"]);
    let first = compose_state(&cfg, "// banner").unwrap();
    let second = compose_state(&cfg, "// banner").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_compose_state_exclude_filter() {
    let cfg = StateConfig {
        exclude: Some("^nickname$".to_string()),
        ..state_cfg(&["int age=0", "String? nickname"])
    };
    let text = compose_state(&cfg, "// banner").unwrap();
    // Excluded fields keep their declaration but drop out of `props`.
    assert!(text.contains("final String? nickname;"));
    let props = text.split("get props").nth(1).unwrap();
    assert!(props.contains("age"));
    assert!(!props.contains("nickname"));
}

#[test]
fn test_compose_state_include_filter_with_lookahead() {
    let cfg = StateConfig {
        include: Some("^(?!nickname).*$".to_string()),
        ..state_cfg(&["int age", "String? nickname"])
    };
    let text = compose_state(&cfg, "// banner").unwrap();
    let props = text.split("get props").nth(1).unwrap();
    assert!(props.contains("age"));
    assert!(!props.contains("nickname"));
}

#[test]
fn test_compose_state_exclude_wins_over_include() {
    let cfg = StateConfig {
        include: Some("^n".to_string()),
        exclude: Some("^nickname$".to_string()),
        ..state_cfg(&["int age", "String? nickname", "String notes"])
    };
    let text = compose_state(&cfg, "// banner").unwrap();
    // `include` admits nickname and notes; `exclude` then drops nickname.
    let props = text.split("get props").nth(1).unwrap();
    assert!(props.contains("notes"));
    assert!(!props.contains("nickname"));
    assert!(!props.contains("age"));
}

#[test]
fn test_compose_state_requires_name_and_props() {
    let cfg = StateConfig {
        name: None,
        ..state_cfg(&["int age"])
    };
    assert!(compose_state(&cfg, "//").is_err());

    let cfg = state_cfg(&[]);
    assert!(compose_state(&cfg, "//").is_err());
}

#[test]
fn test_compose_state_parent_inheritance() {
    let dir = temp_dir();
    let parent = dir.join("base_state.dart");
    fs::write(
        &parent,
        "class BaseState extends Equatable {\n  final String id;\n}\n",
    )
    .unwrap();

    let cfg = StateConfig {
        parent: Some(parent.to_string_lossy().into_owned()),
        ..state_cfg(&["int age=0"])
    };
    let text = compose_state(&cfg, "// banner").unwrap();
    assert!(text.contains("class DemoState extends BaseState {"));
    assert!(text.contains("required super.id"));
    assert!(text.contains("String? id"));
    assert!(text.contains("...super.props"));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_parse_event_name_conventions() {
    assert_eq!(
        events::parse_event_name(".Created", "UserEvent"),
        ("UserEventCreated".to_string(), None)
    );
    assert_eq!(
        events::parse_event_name("%Removed", "UserEvent"),
        ("RemovedUserEvent".to_string(), None)
    );
    assert_eq!(
        events::parse_event_name(".Created~create", "UserEvent"),
        ("UserEventCreated".to_string(), Some("create".to_string()))
    );
    assert_eq!(
        events::parse_event_name("Standalone", "UserEvent"),
        ("Standalone".to_string(), None)
    );
}

#[test]
fn test_compose_events_flat_with_fields() {
    let cfg = event_cfg(&[".Created#String name", "#int age=0", ".Removed"]);
    let (text, registry) = compose_events(&cfg, "// banner").unwrap();
    assert!(text.contains("abstract class DemoEvent {}"));
    assert!(text.contains("class DemoEventCreated extends DemoEvent {"));
    assert!(text.contains("final String name;"));
    assert!(text.contains("final int age;"));
    assert!(text.contains("DemoEventCreated({required this.name, this.age=0});"));
    assert!(text.contains("class DemoEventRemoved extends DemoEvent {}"));
    assert!(registry.is_empty());
}

#[test]
fn test_compose_events_registers_shortcuts() {
    let cfg = event_cfg(&[".Created~create#String name", ".Removed"]);
    let (_, registry) = compose_events(&cfg, "//").unwrap();
    let entry = registry.get("DemoEventCreated").unwrap();
    assert_eq!(entry.method, "create");
    assert_eq!(entry.args.len(), 1);
    assert_eq!(entry.args[0].name, "name");
    assert!(registry.get("DemoEventRemoved").is_none());
}

#[test]
fn test_compose_events_grouped_mapping_form() {
    let cfg: EventConfig = serde_yaml::from_str(
        "name: DemoEvent\nevents:\n  .Created~create:\n    - String name\n    - int age=0\n  '%Removed':\n",
    )
    .unwrap();
    let (text, registry) = compose_events(&cfg, "// banner").unwrap();
    assert!(text.contains("class DemoEventCreated extends DemoEvent {"));
    assert!(text.contains("final String name;"));
    assert!(text.contains("final int age;"));
    assert!(text.contains("class RemovedDemoEvent extends DemoEvent {}"));
    let entry = registry.get("DemoEventCreated").unwrap();
    assert_eq!(entry.method, "create");
    assert_eq!(entry.args.len(), 2);
}

#[test]
fn test_compose_events_requires_declarations() {
    let cfg = event_cfg(&[]);
    assert!(compose_events(&cfg, "//").is_err());

    let cfg = EventConfig {
        events: None,
        ..event_cfg(&[])
    };
    assert!(compose_events(&cfg, "//").is_err());
}

#[test]
fn test_compose_bloc_shortcut_calls_add() {
    let unit = demo_unit(&["DemoEventA", "DemoEventB"]);
    let mut registry = ShortcutRegistry::default();
    registry.register(ShortcutEntry {
        event: "DemoEventB".to_string(),
        method: "goA".to_string(),
        args: vec![FieldSpec::parse("String name")],
    });
    let cfg = BlocConfig::default();
    let text = compose_bloc(&cfg, &unit, &registry, "// banner").unwrap();
    assert!(text.contains("on<DemoEventA>(_onDemoEventA);"));
    assert!(text.contains("on<DemoEventB>(_onDemoEventB);"));
    assert!(text.contains("Future<void> _onDemoEventA(DemoEventA event, Emitter<DemoState> emit)"));
    assert!(text.contains("void goA({required String name}) => add(DemoEventB(name: name));"));
    assert!(text.contains(bloc::SHORTCUTS_OPEN));
    assert!(text.contains(bloc::SHORTCUTS_CLOSE));
}

#[test]
fn test_compose_bloc_hydrate_overrides() {
    let mut unit = demo_unit(&["DemoEventA"]);
    unit.use_hydrate = true;
    let registry = ShortcutRegistry::default();
    let text = compose_bloc(&BlocConfig::default(), &unit, &registry, "//").unwrap();
    assert!(text.contains("with HydratedMixin"));
    assert!(text.contains("DemoState? fromJson(Map<String, dynamic> json)"));
    assert!(text.contains("Map<String, dynamic>? toJson(DemoState state)"));
}

#[test]
fn test_merge_adds_only_missing_event() {
    let registry = ShortcutRegistry::default();
    let existing = compose_bloc(
        &BlocConfig::default(),
        &demo_unit(&["DemoEventA"]),
        &registry,
        "// banner",
    )
    .unwrap();

    let merged = merge(&existing, &demo_unit(&["DemoEventA", "DemoEventB"]), &registry);
    assert_eq!(merged.matches("on<DemoEventA>(_onDemoEventA);").count(), 1);
    assert_eq!(merged.matches("on<DemoEventB>(_onDemoEventB);").count(), 1);
    assert_eq!(merged.matches("Future<void> _onDemoEventB(").count(), 1);
    // The hand-editable handler of A stays single.
    assert_eq!(merged.matches("Future<void> _onDemoEventA(").count(), 1);
}

#[test]
fn test_merge_is_idempotent() {
    let registry = ShortcutRegistry::default();
    let existing = compose_bloc(
        &BlocConfig::default(),
        &demo_unit(&["DemoEventA"]),
        &registry,
        "// banner",
    )
    .unwrap();
    let unit = demo_unit(&["DemoEventA", "DemoEventB"]);
    let once = merge(&existing, &unit, &registry);
    let twice = merge(&once, &unit, &registry);
    assert_eq!(once, twice);
}

#[test]
fn test_merge_preserves_hand_edits() {
    let registry = ShortcutRegistry::default();
    let mut existing = compose_bloc(
        &BlocConfig::default(),
        &demo_unit(&["DemoEventA"]),
        &registry,
        "// banner",
    )
    .unwrap();
    existing = existing.replace(
        "// TODO: add your code here",
        "emit(state.copyWith(age: event.age));",
    );

    let merged = merge(&existing, &demo_unit(&["DemoEventA", "DemoEventB"]), &registry);
    assert!(merged.contains("emit(state.copyWith(age: event.age));"));
}

#[test]
fn test_merge_recognizes_handler_at_line_start() {
    let registry = ShortcutRegistry::default();
    // A hand-wrapped declaration puts `_on` at column 0.
    let existing = "\
class DemoBloc extends Bloc<DemoEvent, DemoState> {
  DemoBloc() : super(const DemoState()) {
    on<DemoEventA>(_onDemoEventA);
  }

  Future<void>
_onDemoEventA(DemoEventA event, Emitter<DemoState> emit) async {
  }
}
";
    let merged = merge(existing, &demo_unit(&["DemoEventA"]), &registry);
    assert_eq!(merged, existing);
}

#[test]
fn test_merge_without_constructor_is_a_noop() {
    let registry = ShortcutRegistry::default();
    let existing = "class DemoBloc {\n  // not generated by this tool\n}\n";
    let merged = merge(existing, &demo_unit(&["DemoEventA"]), &registry);
    assert_eq!(merged, existing);
}

#[test]
fn test_merge_adds_shortcut_into_existing_block() {
    let mut registry = ShortcutRegistry::default();
    registry.register(ShortcutEntry {
        event: "DemoEventA".to_string(),
        method: "goA".to_string(),
        args: Vec::new(),
    });
    registry.register(ShortcutEntry {
        event: "DemoEventB".to_string(),
        method: "goB".to_string(),
        args: Vec::new(),
    });
    let existing = compose_bloc(
        &BlocConfig::default(),
        &demo_unit(&["DemoEventA"]),
        &registry,
        "// banner",
    )
    .unwrap();
    assert_eq!(existing.matches(bloc::SHORTCUTS_OPEN).count(), 1);

    let merged = merge(&existing, &demo_unit(&["DemoEventA", "DemoEventB"]), &registry);
    // Reuses the sentinel block instead of opening a second one.
    assert_eq!(merged.matches(bloc::SHORTCUTS_OPEN).count(), 1);
    assert!(merged.contains("void goB() => add(DemoEventB());"));
    let open = merged.find(bloc::SHORTCUTS_OPEN).unwrap();
    let close = merged.find(bloc::SHORTCUTS_CLOSE).unwrap();
    let block = &merged[open..close];
    assert!(block.contains("goA"));
    assert!(block.contains("goB"));
}

#[test]
fn test_load_bloc_unit_from_generated_files() {
    let dir = temp_dir();
    let state_file = dir.join("demo.state.dart");
    let event_file = dir.join("demo.event.dart");
    fs::write(&state_file, "class DemoState extends Equatable {}\n").unwrap();
    fs::write(
        &event_file,
        "abstract class DemoEvent {}\n\nclass DemoEventCreated extends DemoEvent {}\n\nclass DemoEventRemoved extends DemoEvent {}\n",
    )
    .unwrap();

    let cfg = BlocConfig {
        name: Some("DemoBloc".to_string()),
        state_file: Some(state_file.to_string_lossy().into_owned()),
        event_file: Some(event_file.to_string_lossy().into_owned()),
        ..BlocConfig::default()
    };
    let unit = load_bloc_unit(&cfg).unwrap();
    assert_eq!(unit.class_name, "DemoBloc");
    assert_eq!(unit.state_class, "DemoState");
    assert_eq!(unit.event_base, "DemoEvent");
    assert_eq!(
        unit.event_names,
        vec!["DemoEventCreated", "DemoEventRemoved"]
    );
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_bloc_unit_missing_file() {
    let cfg = BlocConfig {
        state_file: Some("/nonexistent/demo.state.dart".to_string()),
        event_file: Some("/nonexistent/demo.event.dart".to_string()),
        ..BlocConfig::default()
    };
    let err = load_bloc_unit(&cfg).unwrap_err();
    assert!(err.to_string().contains("Missing dependency"));
}
