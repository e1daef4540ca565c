use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Name of the per-list data directory
pub const DATA_DIR_NAME: &str = ".tick";

/// Error type for config and data-directory discovery
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("not a tick directory: no .tick/ found (run `tick init`)")]
    NotInitialized,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("invalid config key: {0}")]
    InvalidKey(String),
}

/// Walk up from `start` looking for `.tick/config.toml`.
/// Returns the `.tick` directory itself.
pub fn discover_data_dir(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();
    loop {
        let data_dir = current.join(DATA_DIR_NAME);
        if data_dir.is_dir() && data_dir.join("config.toml").exists() {
            return Ok(data_dir);
        }
        if !current.pop() {
            return Err(ConfigError::NotInitialized);
        }
    }
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing.
pub fn read_config(data_dir: &Path) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let config_path = data_dir.join("config.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: Config = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Parsed config only
pub fn load_config(data_dir: &Path) -> Result<Config, ConfigError> {
    read_config(data_dir).map(|(config, _)| config)
}

/// Write the config document back to disk, preserving formatting.
/// Refuses documents that no longer parse as a `Config`.
pub fn write_config(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let text = doc.to_string();
    toml::from_str::<Config>(&text)?;
    let config_path = data_dir.join("config.toml");
    fs::write(&config_path, text).map_err(|e| ConfigError::ReadError {
        path: config_path,
        source: e,
    })
}

fn split_key(key: &str) -> Result<(&str, &str), ConfigError> {
    match key.split_once('.') {
        Some((table, field)) if !table.is_empty() && !field.is_empty() => Ok((table, field)),
        _ => Err(ConfigError::InvalidKey(key.to_string())),
    }
}

/// Look up a dotted key such as `notice.duration_secs`
pub fn get_value(doc: &toml_edit::DocumentMut, key: &str) -> Result<Option<String>, ConfigError> {
    let (table, field) = split_key(key)?;
    let item = doc
        .get(table)
        .and_then(|t| t.as_table_like())
        .and_then(|t| t.get(field));
    Ok(item.and_then(|i| i.as_value()).map(|v| match v {
        toml_edit::Value::String(s) => s.value().clone(),
        toml_edit::Value::Integer(n) => n.value().to_string(),
        toml_edit::Value::Float(f) => f.value().to_string(),
        toml_edit::Value::Boolean(b) => b.value().to_string(),
        other => {
            let mut bare = other.clone();
            bare.decor_mut().clear();
            bare.to_string()
        }
    }))
}

/// Set a dotted key. Integers and booleans are stored typed, anything else
/// as a string.
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, raw: &str) -> Result<(), ConfigError> {
    let (table, field) = split_key(key)?;
    match doc.get(table).map(|item| item.is_table_like()) {
        None => doc[table] = toml_edit::Item::Table(toml_edit::Table::new()),
        Some(false) => return Err(ConfigError::InvalidKey(key.to_string())),
        Some(true) => {}
    }
    let value = if let Ok(n) = raw.parse::<i64>() {
        toml_edit::value(n)
    } else if let Ok(b) = raw.parse::<bool>() {
        toml_edit::value(b)
    } else {
        toml_edit::value(raw)
    };
    doc[table][field] = value;
    Ok(())
}
