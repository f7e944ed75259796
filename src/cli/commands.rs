use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{
    apply_shared_bloc, apply_shared_event, apply_shared_state, load_config, load_section,
    BlocConfig, EventConfig, StateConfig,
};
use crate::generator::{
    generate_bloc, generate_events, generate_state, run_pipeline, ShortcutRegistry,
};

/// Command-line interface for blocgen
#[derive(Parser)]
#[command(name = "blocgen")]
#[command(about = "Generate Dart bloc state, event and dispatcher files from YAML", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for blocgen
#[derive(Subcommand)]
pub enum Commands {
    /// Generate the full unit set: state, events, bloc and the umbrella file
    All {
        /// Path to the YAML generator config
        #[arg(short, long)]
        config: PathBuf,

        /// Overwrite destination files even when the config disables it
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// Generate only the state class
    State {
        /// Path to the YAML generator config (whole file or its `state` key)
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// Generate only the event classes
    Event {
        /// Path to the YAML generator config (whole file or its `event` key)
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// Generate or incrementally update only the bloc class
    Bloc {
        /// Path to the YAML generator config (whole file or its `bloc` key)
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
}

/// Banner label for generated files: the config file's name.
fn config_label(config: &Path) -> String {
    config
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.display().to_string())
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - The config file cannot be read or parsed
/// - A required config field is missing
/// - A referenced sibling file (state, event, repository) is unusable
/// - A destination file cannot be written
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::All { config, force } => {
            let cfg = load_config(config)?;
            run_pipeline(&cfg, &config_label(config), *force)?;
            Ok(())
        }
        Commands::State { config, force } => {
            let shared = load_config(config)?;
            let unit: StateConfig = load_section(config, "state")?;
            let unit = apply_shared_state(&shared, unit);
            generate_state(&unit, &config_label(config), *force)?;
            Ok(())
        }
        Commands::Event { config, force } => {
            let shared = load_config(config)?;
            let unit: EventConfig = load_section(config, "event")?;
            let unit = apply_shared_event(&shared, unit);
            generate_events(&unit, &config_label(config), *force)?;
            Ok(())
        }
        Commands::Bloc { config, force } => {
            let shared = load_config(config)?;
            let unit: BlocConfig = load_section(config, "bloc")?;
            let unit = apply_shared_bloc(&shared, unit);
            // Shortcut methods only exist within a full pipeline run, where
            // the event unit populates the registry; a standalone bloc run
            // starts from an empty one.
            generate_bloc(&unit, &ShortcutRegistry::default(), &config_label(config), *force)?;
            Ok(())
        }
    }
}
