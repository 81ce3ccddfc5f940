//! TOML-based application configuration.
//!
//! Stores the settings that sit outside the reducer state:
//! - Remote sync policy (enabled, mirror directory, debounce, retry cap)
//! - Local persistence quiet period
//! - Defaults used to seed the Pomodoro settings of a fresh store
//!
//! Configuration is stored at `~/.config/studyroom/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::model::{PomodoroSettings, PomodoroTask};

use super::data_dir;

/// Remote sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Mirror directory for the JSON document store. Defaults to
    /// `<data dir>/remote` when unset.
    #[serde(default)]
    pub remote_dir: Option<String>,
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Local persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default = "default_quiet_secs")]
    pub quiet_secs: u64,
}

/// Seed values for a fresh store's Pomodoro settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_focus_secs")]
    pub focus_secs: u64,
    #[serde(default = "default_short_break_secs")]
    pub short_break_secs: u64,
    #[serde(default = "default_long_break_secs")]
    pub long_break_secs: u64,
    #[serde(default = "default_cycles")]
    pub cycles_until_long_break: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyroom/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
}

fn default_true() -> bool {
    true
}
fn default_debounce_secs() -> u64 {
    1
}
fn default_max_attempts() -> u32 {
    5
}
fn default_quiet_secs() -> u64 {
    1
}
fn default_focus_secs() -> u64 {
    25 * 60
}
fn default_short_break_secs() -> u64 {
    5 * 60
}
fn default_long_break_secs() -> u64 {
    15 * 60
}
fn default_cycles() -> u32 {
    4
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remote_dir: None,
            debounce_secs: default_debounce_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            quiet_secs: default_quiet_secs(),
        }
    }
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            focus_secs: default_focus_secs(),
            short_break_secs: default_short_break_secs(),
            long_break_secs: default_long_break_secs(),
            cycles_until_long_break: default_cycles(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as a string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// as the key's type, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.into(),
            message: e.to_string(),
        })?;
        set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.into(),
            message: e.to_string(),
        })?;
        self.save()
    }

    /// Pomodoro settings seeded from this config, used for a fresh store.
    pub fn default_pomodoro_settings(&self) -> PomodoroSettings {
        PomodoroSettings {
            tasks: vec![PomodoroTask::new("Focus", self.pomodoro.focus_secs)],
            short_break_secs: self.pomodoro.short_break_secs,
            long_break_secs: self.pomodoro.long_break_secs,
            cycles_until_long_break: self.pomodoro.cycles_until_long_break,
        }
    }
}

fn get_json_value_by_path<'a>(
    root: &'a serde_json::Value,
    key: &str,
) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_json_value_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(unknown());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Value::Number(n.into())
                }
                serde_json::Value::Null => match value.parse::<u64>() {
                    Ok(n) => serde_json::Value::Number(n.into()),
                    Err(_) => serde_json::Value::String(value.into()),
                },
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current.get_mut(part).ok_or_else(unknown)?;
    }

    Err(unknown())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.sync.enabled);
        assert_eq!(parsed.persistence.quiet_secs, 1);
        assert_eq!(parsed.pomodoro.cycles_until_long_break, 4);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("sync.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("pomodoro.focus_secs").as_deref(), Some("1500"));
        assert!(cfg.get("sync.missing_key").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_values() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        set_json_value_by_path(&mut json, "sync.enabled", "false").unwrap();
        set_json_value_by_path(&mut json, "persistence.quiet_secs", "3").unwrap();
        assert_eq!(
            get_json_value_by_path(&json, "sync.enabled").unwrap(),
            &serde_json::Value::Bool(false)
        );
        assert_eq!(
            get_json_value_by_path(&json, "persistence.quiet_secs").unwrap(),
            &serde_json::Value::Number(3.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        assert!(matches!(
            set_json_value_by_path(&mut json, "sync.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        assert!(matches!(
            set_json_value_by_path(&mut json, "sync.enabled", "not_a_bool"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn seeded_settings_mirror_pomodoro_section() {
        let mut cfg = Config::default();
        cfg.pomodoro.focus_secs = 1800;
        cfg.pomodoro.cycles_until_long_break = 2;
        let settings = cfg.default_pomodoro_settings();
        assert_eq!(settings.tasks[0].duration_secs, 1800);
        assert_eq!(settings.cycles_until_long_break, 2);
    }
}
