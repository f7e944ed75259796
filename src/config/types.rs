use serde::Deserialize;

/// Top-level generator configuration
///
/// Keyed by unit kind (`state`, `event`, `bloc`) plus shared keys inherited
/// by every unit section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenConfig {
    /// Base directory that relative `dest` paths resolve against
    pub path: Option<String>,
    /// Umbrella library file every generated unit becomes `part of`
    pub part: Option<String>,
    /// Prefix prepended to every generated class name
    pub prefix: Option<String>,
    /// Extra import lines for the umbrella file
    pub import: Option<String>,
    /// User code block appended to the umbrella file
    #[serde(alias = "partcode")]
    pub code: Option<String>,
    /// Stop after the state unit
    pub state_only: bool,
    /// Stop after the event unit
    pub event_only: bool,
    pub state: Option<StateConfig>,
    pub event: Option<EventConfig>,
    pub bloc: Option<BlocConfig>,
}

/// Configuration for the immutable value record (state class)
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateConfig {
    pub name: Option<String>,
    pub dest: Option<String>,
    pub part: Option<String>,
    pub path: Option<String>,
    /// Ordered field descriptor lines (the mini-language of `fieldspec`)
    pub props: Vec<String>,
    /// Extend `Equatable` and emit the `props` equality-key list
    pub equal: bool,
    /// Emit an `init()` convenience method
    pub init: bool,
    /// Emit `@JsonSerializable` plus the `fromJson`/`toJson` pair
    pub use_json: bool,
    /// Extra converter annotation, e.g. `DurationConverter`
    pub json_converter: Option<String>,
    /// Path to an already-generated parent state file this record extends
    pub parent: Option<String>,
    /// Equality keys must match this regex to be included
    pub include: Option<String>,
    /// Equality keys matching this regex are dropped (wins over `include`)
    pub exclude: Option<String>,
    pub overwrite: Option<bool>,
}

impl Default for StateConfig {
    fn default() -> Self {
        StateConfig {
            name: None,
            dest: None,
            part: None,
            path: None,
            props: Vec::new(),
            equal: true,
            init: false,
            use_json: true,
            json_converter: None,
            parent: None,
            include: None,
            exclude: None,
            overwrite: None,
        }
    }
}

/// Configuration for the closed event set
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventConfig {
    pub name: Option<String>,
    pub dest: Option<String>,
    pub part: Option<String>,
    pub path: Option<String>,
    pub events: Option<EventsSpec>,
    pub overwrite: Option<bool>,
}

/// Event declarations: a flat ordered list or a mapping of event name to
/// its field descriptor lines
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EventsSpec {
    Flat(Vec<String>),
    Grouped(serde_yaml::Mapping),
}

/// Configuration for the dispatcher (bloc class)
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlocConfig {
    pub name: Option<String>,
    pub dest: Option<String>,
    pub part: Option<String>,
    pub path: Option<String>,
    /// Generated state file; defaults to the state unit's `dest` in a pipeline run
    #[serde(alias = "state_file")]
    pub state_file: Option<String>,
    /// Generated event file; defaults to the event unit's `dest` in a pipeline run
    #[serde(alias = "event_file")]
    pub event_file: Option<String>,
    /// Optional repository class file injected as a constructor dependency
    #[serde(alias = "repo_file")]
    pub repo_file: Option<String>,
    /// Mix in `HydratedMixin` with `fromJson`/`toJson` overrides
    pub use_hydrate: bool,
    /// Mix in `ReplayBlocMixin`
    pub use_replay: bool,
    pub overwrite: Option<bool>,
}

impl Default for BlocConfig {
    fn default() -> Self {
        BlocConfig {
            name: None,
            dest: None,
            part: None,
            path: None,
            state_file: None,
            event_file: None,
            repo_file: None,
            use_hydrate: true,
            use_replay: false,
            overwrite: None,
        }
    }
}
