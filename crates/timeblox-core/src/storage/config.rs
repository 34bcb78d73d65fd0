//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Calendar indicator toggles
//! - Long-press delay and default zoom
//! - The activity category registry a new planner starts with
//! - Master template slot names and colors
//!
//! Configuration is stored at `~/.config/timeblox/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::block::ActivityCategory;
use crate::error::ConfigError;
use crate::interaction::{Zoom, MIN_PIXELS_PER_MINUTE};
use crate::long_press::DEFAULT_LONG_PRESS_MS;
use crate::master::{MasterDay, MasterRegistry};
use crate::planner::PlannerState;

/// Calendar display toggles. Read by front ends only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_copy_indicators: bool,
    #[serde(default = "default_true")]
    pub show_today_indicator: bool,
}

/// Gesture tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
    #[serde(default = "default_pixels_per_minute")]
    pub pixels_per_minute: f64,
}

/// Name and color of one master template slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterSlotConfig {
    pub id: u8,
    pub name: String,
    pub color: String,
    pub color_name: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timeblox/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default = "ActivityCategory::defaults")]
    pub categories: Vec<ActivityCategory>,
    #[serde(default = "default_masters")]
    pub masters: Vec<MasterSlotConfig>,
}

fn default_true() -> bool {
    true
}
fn default_long_press_ms() -> u64 {
    DEFAULT_LONG_PRESS_MS
}
fn default_pixels_per_minute() -> f64 {
    MIN_PIXELS_PER_MINUTE
}
fn default_masters() -> Vec<MasterSlotConfig> {
    MasterRegistry::default()
        .slots()
        .iter()
        .map(|s| MasterSlotConfig {
            id: s.id,
            name: s.name.clone(),
            color: s.color.clone(),
            color_name: s.color_name.clone(),
        })
        .collect()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_copy_indicators: true,
            show_today_indicator: true,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            long_press_ms: default_long_press_ms(),
            pixels_per_minute: default_pixels_per_minute(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            interaction: InteractionConfig::default(),
            categories: ActivityCategory::defaults(),
            masters: default_masters(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = match current {
                serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                other => other.get(part)?,
            };
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
        if parts.peek().is_none() || key.is_empty() {
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
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = match current {
                serde_json::Value::Array(items) => part
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| items.get_mut(i))
                    .ok_or_else(unknown)?,
                other => other.get_mut(part).ok_or_else(unknown)?,
            };
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    ///
    /// List entries are addressed by position, e.g. `categories.0.color`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The caller saves.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Zoom level clamped to the supported range.
    pub fn zoom(&self) -> Zoom {
        Zoom::new(self.interaction.pixels_per_minute)
    }

    /// Master slots described by this config, all unassigned.
    pub fn master_registry(&self) -> MasterRegistry {
        if self.masters.is_empty() {
            return MasterRegistry::default();
        }
        MasterRegistry::from_slots(
            self.masters
                .iter()
                .map(|m| MasterDay {
                    id: m.id,
                    date: None,
                    color: m.color.clone(),
                    name: m.name.clone(),
                    color_name: m.color_name.clone(),
                })
                .collect(),
        )
    }

    /// An empty planner seeded with this config's categories and slots.
    pub fn new_planner(&self) -> PlannerState {
        PlannerState::new(self.categories.clone(), self.master_registry())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.display.show_copy_indicators);
        assert_eq!(parsed.interaction.long_press_ms, 700);
        assert_eq!(parsed.categories.len(), 8);
        assert_eq!(parsed.masters.len(), 5);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("[display]\nshow_today_indicator = false\n").unwrap();
        assert!(!parsed.display.show_today_indicator);
        assert!(parsed.display.show_copy_indicators);
        assert_eq!(parsed.interaction.pixels_per_minute, 1.8);
        assert_eq!(parsed.categories[0].name, "Work");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("display.show_copy_indicators").as_deref(), Some("true"));
        assert_eq!(cfg.get("interaction.long_press_ms").as_deref(), Some("700"));
        assert_eq!(cfg.get("categories.1.name").as_deref(), Some("Rest"));
        assert_eq!(cfg.get("masters.4.color").as_deref(), Some("bg-red-500"));
        assert!(cfg.get("display.missing_key").is_none());
        assert!(cfg.get("categories.99.name").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("display.show_today_indicator", "false").unwrap();
        cfg.set("interaction.pixels_per_minute", "3.5").unwrap();
        cfg.set("interaction.long_press_ms", "900").unwrap();
        cfg.set("masters.0.name", "Weekday").unwrap();
        assert!(!cfg.display.show_today_indicator);
        assert_eq!(cfg.interaction.pixels_per_minute, 3.5);
        assert_eq!(cfg.interaction.long_press_ms, 900);
        assert_eq!(cfg.masters[0].name, "Weekday");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("display.nonexistent_key", "value"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "value"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("display.show_copy_indicators", "not_a_bool"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("interaction.long_press_ms", "-5").is_err());
        assert_eq!(cfg.interaction.long_press_ms, 700);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cfg = Config::default();
        cfg.interaction.pixels_per_minute = 50.0;
        assert_eq!(cfg.zoom().pixels_per_minute(), 7.2);
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.masters[1].color_name, "Yellow");

        let mut cfg = cfg;
        cfg.set("categories.0.color", "bg-rose-500").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().categories[0].color, "bg-rose-500");
    }

    #[test]
    fn load_from_reports_parse_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "display = 3").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn new_planner_uses_configured_slots() {
        let mut cfg = Config::default();
        cfg.masters.truncate(2);
        cfg.masters[1].name = "Weekend".into();
        let planner = cfg.new_planner();
        assert_eq!(planner.masters().slots().len(), 2);
        assert_eq!(planner.masters().slot(2).unwrap().name, "Weekend");
    }
}
