//! TOML-based engine configuration.
//!
//! Stores the evaluation settings that are user preferences rather than
//! habit data:
//! - First day of the week for weekly quotas
//! - Fallback timezone for logs recorded without one
//! - Streak grace policy and lookback cap
//!
//! Configuration is stored at `~/.config/ritualist/engine.toml`.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::calendar::parse_timezone;
use crate::error::ConfigError;
use crate::habit::weekday::weekday_from_habit;
use crate::streak::{GracePolicy, StreakConfig, DEFAULT_MAX_LOOKBACK_DAYS};

/// Streak-specific configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSettings {
    #[serde(default)]
    pub grace_policy: GracePolicy,
    #[serde(default = "default_max_lookback_days")]
    pub max_lookback_days: u32,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/ritualist/engine.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// First day of the week, Monday=1..Sunday=7.
    #[serde(default = "default_first_weekday")]
    pub first_weekday: u8,
    /// IANA timezone for logs that carry none.
    #[serde(default = "default_fallback_timezone")]
    pub fallback_timezone: String,
    #[serde(default)]
    pub streak: StreakSettings,
}

// Default functions
fn default_first_weekday() -> u8 {
    1
}
fn default_fallback_timezone() -> String {
    "UTC".into()
}
fn default_max_lookback_days() -> u32 {
    DEFAULT_MAX_LOOKBACK_DAYS
}

impl Default for StreakSettings {
    fn default() -> Self {
        Self {
            grace_policy: GracePolicy::default(),
            max_lookback_days: default_max_lookback_days(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            first_weekday: default_first_weekday(),
            fallback_timezone: default_fallback_timezone(),
            streak: StreakSettings::default(),
        }
    }
}

impl EngineConfig {
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) => {
                        return Err(invalid("cannot replace a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Default location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("engine.toml"))
    }

    /// Load from the default location, or return defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// holds invalid values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, or return defaults if no file exists there.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// holds invalid values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let cfg: EngineConfig = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. The change is validated but
    /// not persisted; call [`EngineConfig::save`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid. The
    /// config is left unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: EngineConfig =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if weekday_from_habit(self.first_weekday).is_none() {
            return Err(ConfigError::InvalidValue {
                key: "first_weekday".into(),
                message: format!("{} is not a weekday number (1..=7)", self.first_weekday),
            });
        }
        if parse_timezone(&self.fallback_timezone).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "fallback_timezone".into(),
                message: format!("unknown timezone '{}'", self.fallback_timezone),
            });
        }
        if self.streak.max_lookback_days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "streak.max_lookback_days".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn first_weekday(&self) -> Weekday {
        weekday_from_habit(self.first_weekday).unwrap_or(Weekday::Mon)
    }

    pub fn fallback_timezone(&self) -> Tz {
        parse_timezone(&self.fallback_timezone).unwrap_or(Tz::UTC)
    }

    pub fn streak_config(&self) -> StreakConfig {
        StreakConfig {
            grace_policy: self.streak.grace_policy,
            max_lookback_days: self.streak.max_lookback_days,
            first_weekday: self.first_weekday(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = EngineConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert!(toml_str.contains("today_never_breaks"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: EngineConfig = toml::from_str(
            r#"
            fallback_timezone = "Europe/Berlin"

            [streak]
            grace_policy = "strict"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.first_weekday, 1);
        assert_eq!(parsed.fallback_timezone(), chrono_tz::Europe::Berlin);
        assert_eq!(parsed.streak.grace_policy, GracePolicy::Strict);
        assert_eq!(parsed.streak.max_lookback_days, DEFAULT_MAX_LOOKBACK_DAYS);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.get("first_weekday").as_deref(), Some("1"));
        assert_eq!(cfg.get("fallback_timezone").as_deref(), Some("UTC"));
        assert_eq!(
            cfg.get("streak.grace_policy").as_deref(),
            Some("today_never_breaks")
        );
        assert!(cfg.get("streak.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = EngineConfig::default();
        cfg.set("streak.grace_policy", "strict").unwrap();
        cfg.set("streak.max_lookback_days", "90").unwrap();
        cfg.set("first_weekday", "7").unwrap();
        assert_eq!(cfg.streak.grace_policy, GracePolicy::Strict);
        assert_eq!(cfg.streak.max_lookback_days, 90);
        assert_eq!(cfg.first_weekday(), Weekday::Sun);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = EngineConfig::default();
        assert!(matches!(
            cfg.set("streak.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("nonexistent.nested", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_rejects_invalid_values_and_keeps_state() {
        let mut cfg = EngineConfig::default();
        assert!(cfg.set("first_weekday", "8").is_err());
        assert!(cfg.set("first_weekday", "monday").is_err());
        assert!(cfg.set("fallback_timezone", "Mars/Olympus").is_err());
        assert!(cfg.set("streak.grace_policy", "sometimes").is_err());
        assert!(cfg.set("streak", "strict").is_err());
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn streak_config_reflects_settings() {
        let mut cfg = EngineConfig::default();
        cfg.set("first_weekday", "7").unwrap();
        cfg.set("streak.max_lookback_days", "30").unwrap();
        let streak = cfg.streak_config();
        assert_eq!(streak.first_weekday, Weekday::Sun);
        assert_eq!(streak.max_lookback_days, 30);
        assert_eq!(streak.grace_policy, GracePolicy::TodayNeverBreaks);
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("engine.toml");

        assert_eq!(EngineConfig::load_from(&path).unwrap(), EngineConfig::default());

        let mut cfg = EngineConfig::default();
        cfg.set("fallback_timezone", "Asia/Tokyo").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = EngineConfig::load_from(&path).unwrap();
        assert_eq!(loaded.fallback_timezone(), chrono_tz::Asia::Tokyo);
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "first_weekday = 9\n").unwrap();
        assert!(matches!(
            EngineConfig::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));

        std::fs::write(&path, "first_weekday = [not toml").unwrap();
        assert!(matches!(
            EngineConfig::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
