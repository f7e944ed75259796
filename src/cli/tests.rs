//! Unit tests for CLI commands

use crate::cli::{Cli, Commands};
use clap::Parser;

#[test]
fn test_all_command_parses() {
    let cli = Cli::try_parse_from(["blocgen", "all", "--config", "demo.yaml"]).unwrap();

    match cli.command {
        Commands::All { config, force } => {
            assert_eq!(config.to_string_lossy(), "demo.yaml");
            assert!(!force);
        }
        _ => panic!("Expected All command"),
    }
}

#[test]
fn test_force_flag() {
    let cli = Cli::try_parse_from(["blocgen", "bloc", "--config", "demo.yaml", "--force"]).unwrap();

    match cli.command {
        Commands::Bloc { force, .. } => assert!(force),
        _ => panic!("Expected Bloc command"),
    }
}

#[test]
fn test_all_commands_parse() {
    // Verify all subcommands can be parsed
    let commands = vec![
        vec!["blocgen", "all", "--config", "demo.yaml"],
        vec!["blocgen", "state", "--config", "demo.yaml"],
        vec!["blocgen", "event", "--config", "demo.yaml"],
        vec!["blocgen", "bloc", "--config", "demo.yaml"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}

#[test]
fn test_config_is_required() {
    assert!(Cli::try_parse_from(["blocgen", "all"]).is_err());
}
