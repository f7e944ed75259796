use super::types::GenConfig;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load the full generator configuration from a YAML file.
pub fn load_config(path: &Path) -> anyhow::Result<GenConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {path:?}"))?;
    let cfg: GenConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {path:?}"))?;
    Ok(cfg)
}

/// Load one unit section from a YAML file.
///
/// Mirrors the subcommand convention: if the document has a mapping under
/// `key`, that sub-mapping is the section; otherwise the whole document is
/// parsed as the section, so a single-unit config file needs no wrapper key.
pub fn load_section<T: DeserializeOwned>(path: &Path, key: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {path:?}"))?;
    let value: serde_yaml::Value = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {path:?}"))?;
    let section = match value.get(key) {
        Some(sub) => sub.clone(),
        None => value,
    };
    serde_yaml::from_value(section)
        .with_context(|| format!("Invalid '{key}' section in {path:?}"))
}
