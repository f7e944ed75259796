use std::fs;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir() -> std::path::PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("cli_test_{}_{}", std::process::id(), nanos));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let yaml = format!(
        "path: {path}\npart: user.dart\nprefix: User\nstate:\n  dest: .state.dart\n  props:\n    - int age=0\nevent:\n  dest: .event.dart\n  events:\n    - .Created\nbloc:\n  dest: .bloc.dart\n",
        path = dir.join("lib").display(),
    );
    let cfg = dir.join("user.yaml");
    fs::write(&cfg, yaml).unwrap();
    cfg
}

#[test]
fn test_cli_all_generates_units() {
    let dir = temp_dir();
    let cfg = write_config(&dir);

    let exe = env!("CARGO_BIN_EXE_blocgen");
    let status = Command::new(exe)
        .current_dir(&dir)
        .arg("all")
        .arg("--config")
        .arg(cfg.to_str().unwrap())
        .status()
        .expect("run cli");
    assert!(status.success());

    let lib = dir.join("lib");
    assert!(lib.join("user.state.dart").exists());
    assert!(lib.join("user.event.dart").exists());
    assert!(lib.join("user.bloc.dart").exists());
    assert!(lib.join("user.dart").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_cli_state_generates_only_state() {
    let dir = temp_dir();
    let cfg = write_config(&dir);

    let exe = env!("CARGO_BIN_EXE_blocgen");
    let status = Command::new(exe)
        .current_dir(&dir)
        .arg("state")
        .arg("--config")
        .arg(cfg.to_str().unwrap())
        .status()
        .expect("run cli");
    assert!(status.success());

    let lib = dir.join("lib");
    assert!(lib.join("user.state.dart").exists());
    assert!(!lib.join("user.event.dart").exists());
    assert!(!lib.join("user.bloc.dart").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_cli_fails_on_missing_config() {
    let exe = env!("CARGO_BIN_EXE_blocgen");
    let status = Command::new(exe)
        .arg("all")
        .arg("--config")
        .arg("/nonexistent/user.yaml")
        .status()
        .expect("run cli");
    assert!(!status.success());
}
