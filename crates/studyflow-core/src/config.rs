//! TOML-based scheduler configuration.
//!
//! Stores the scheduling defaults:
//! - User UTC offset and working-window hours
//! - Blackout windows (meals)
//! - Session length, homework lead and fallback radius
//! - Exam prep shape (sessions, span)
//! - Busy-fetch covering window
//!
//! Configuration is stored at `~/.config/studyflow/config.toml`.

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::slot::BlackoutWindow;

/// Scheduler configuration.
///
/// Serialized to/from TOML at `~/.config/studyflow/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// User zone as a UTC offset string, e.g. "-05:00"
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    /// First hour of the working window (local)
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,
    /// Hour the working window closes (local); sessions must end by it
    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u32,
    /// Daily windows no session may overlap
    #[serde(default = "default_blackouts")]
    pub blackouts: Vec<BlackoutWindow>,
    /// Session length in hours when a request does not carry one
    #[serde(default = "default_session_hours")]
    pub session_hours: f64,
    /// Days before the due date the homework session is anchored
    #[serde(default = "default_homework_lead_days")]
    pub homework_lead_days: i64,
    /// Fallback radius around the anchor day, in days
    #[serde(default = "default_search_radius_days")]
    pub search_radius_days: i64,
    /// Prep sessions per exam when a request does not carry a count
    #[serde(default = "default_prep_sessions")]
    pub prep_sessions: u32,
    /// Days before an exam its prep spreads over, by default
    #[serde(default = "default_prep_span_days")]
    pub prep_span_days: i64,
    /// Minutes a candidate advances on a blackout collision
    #[serde(default = "default_scan_step_minutes")]
    pub scan_step_minutes: i64,
    /// Busy-fetch window start: days before the earliest due date
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    /// Busy-fetch window end: days after the latest due date
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: i64,
}

// Default functions
fn default_utc_offset() -> String {
    "-05:00".into()
}
fn default_day_start_hour() -> u32 {
    9
}
fn default_day_end_hour() -> u32 {
    22
}
fn default_blackouts() -> Vec<BlackoutWindow> {
    BlackoutWindow::default_meals()
}
fn default_session_hours() -> f64 {
    2.0
}
fn default_homework_lead_days() -> i64 {
    2
}
fn default_search_radius_days() -> i64 {
    7
}
fn default_prep_sessions() -> u32 {
    3
}
fn default_prep_span_days() -> i64 {
    7
}
fn default_scan_step_minutes() -> i64 {
    30
}
fn default_lookback_days() -> i64 {
    14
}
fn default_lookahead_days() -> i64 {
    1
}

/// Upper bound on every day-count setting (ten years). These values feed
/// straight into date arithmetic, which only covers a finite range.
const MAX_DAY_COUNT: i64 = 3650;

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
            blackouts: default_blackouts(),
            session_hours: default_session_hours(),
            homework_lead_days: default_homework_lead_days(),
            search_radius_days: default_search_radius_days(),
            prep_sessions: default_prep_sessions(),
            prep_span_days: default_prep_span_days(),
            scan_step_minutes: default_scan_step_minutes(),
            lookback_days: default_lookback_days(),
            lookahead_days: default_lookahead_days(),
        }
    }
}

/// Returns `~/.config/studyflow[-dev]/` based on STUDYFLOW_ENV.
///
/// Set STUDYFLOW_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("studyflow-dev")
    } else {
        base_dir.join("studyflow")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: format!("cannot create config directory: {e}"),
    })?;
    Ok(dir)
}

impl SchedulerConfig {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// does not validate, or if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&path, &content),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let cfg: SchedulerConfig = toml::from_str(content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// The configured user offset.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset
            .parse::<FixedOffset>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "utc_offset".to_string(),
                message: format!("'{}' is not a UTC offset: {e}", self.utc_offset),
            })
    }

    /// Check every field the scheduler depends on. Errors name the field
    /// that failed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.offset()?;

        if self.day_end_hour > 23 {
            return Err(ConfigError::InvalidValue {
                key: "day_end_hour".to_string(),
                message: format!("hour {} is past the end of the day", self.day_end_hour),
            });
        }

        if self.day_start_hour >= self.day_end_hour {
            return Err(ConfigError::InvalidValue {
                key: "day_start_hour".to_string(),
                message: format!(
                    "working window {}..{} must satisfy start < end",
                    self.day_start_hour, self.day_end_hour
                ),
            });
        }

        for blackout in &self.blackouts {
            if blackout.start_hour >= blackout.end_hour || blackout.end_hour > 23 {
                return Err(ConfigError::InvalidValue {
                    key: "blackouts".to_string(),
                    message: format!(
                        "blackout {}..{} must satisfy start < end <= 23",
                        blackout.start_hour, blackout.end_hour
                    ),
                });
            }
        }

        if !(1..=24 * 60).contains(&self.scan_step_minutes) {
            return Err(ConfigError::InvalidValue {
                key: "scan_step_minutes".to_string(),
                message: "must be between 1 and 1440 minutes".to_string(),
            });
        }

        if !self.session_hours.is_finite() || self.session_hours <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "session_hours".to_string(),
                message: "must be a positive number of hours".to_string(),
            });
        }

        for (key, days) in [
            ("homework_lead_days", self.homework_lead_days),
            ("search_radius_days", self.search_radius_days),
            ("prep_span_days", self.prep_span_days),
            ("lookback_days", self.lookback_days),
            ("lookahead_days", self.lookahead_days),
        ] {
            if !(0..=MAX_DAY_COUNT).contains(&days) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be between 0 and {MAX_DAY_COUNT} days"),
                });
            }
        }

        Ok(())
    }

    /// Get a config value as string by key. Nested values use dot paths
    /// (e.g. `blackouts.0.start_hour`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let pointer = Self::pointer_for(key)?;
        match json.pointer(&pointer)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// as the existing type, the updated config does not validate, or the
    /// config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()?;
        Ok(())
    }

    /// Set a config value by key without persisting.
    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;

        let pointer =
            Self::pointer_for(key).ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
        let slot = json
            .pointer_mut(&pointer)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;

        let new_value = match &*slot {
            serde_json::Value::Bool(_) => {
                serde_json::Value::Bool(value.parse::<bool>().map_err(|_| {
                    ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("cannot parse '{value}' as bool"),
                    }
                })?)
            }
            serde_json::Value::Number(_) => {
                if let Ok(n) = value.parse::<i64>() {
                    serde_json::Value::Number(n.into())
                } else if let Some(n) =
                    value.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
                {
                    serde_json::Value::Number(n)
                } else {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("cannot parse '{value}' as number"),
                    });
                }
            }
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                serde_json::from_str(value).map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                })?
            }
            _ => serde_json::Value::String(value.to_string()),
        };
        *slot = new_value;

        let updated: SchedulerConfig =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn pointer_for(key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        Some(format!("/{}", key.replace('.', "/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = SchedulerConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SchedulerConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.day_start_hour, 9);
        assert_eq!(parsed.day_end_hour, 22);
        assert_eq!(parsed.blackouts, BlackoutWindow::default_meals());
        assert_eq!(parsed.session_hours, 2.0);
    }

    #[test]
    fn empty_toml_fills_every_default() {
        let cfg: SchedulerConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.utc_offset, "-05:00");
        assert_eq!(cfg.homework_lead_days, 2);
        assert_eq!(cfg.search_radius_days, 7);
        assert_eq!(cfg.prep_sessions, 3);
        assert_eq!(cfg.prep_span_days, 7);
        assert_eq!(cfg.scan_step_minutes, 30);
        assert_eq!(cfg.lookback_days, 14);
        assert_eq!(cfg.lookahead_days, 1);
    }

    #[test]
    fn offset_parses_both_signs() {
        let mut cfg = SchedulerConfig::default();
        assert_eq!(
            cfg.offset().unwrap(),
            FixedOffset::west_opt(5 * 3600).unwrap()
        );

        cfg.utc_offset = "+09:00".to_string();
        assert_eq!(
            cfg.offset().unwrap(),
            FixedOffset::east_opt(9 * 3600).unwrap()
        );

        cfg.utc_offset = "eastern".to_string();
        assert!(cfg.offset().is_err());
    }

    #[test]
    fn validate_rejects_inverted_working_window() {
        let mut cfg = SchedulerConfig::default();
        cfg.day_start_hour = 22;
        cfg.day_end_hour = 9;
        assert!(cfg.validate().is_err());

        cfg.day_start_hour = 9;
        cfg.day_end_hour = 24;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_names_the_failing_window_edge() {
        let mut cfg = SchedulerConfig::default();
        cfg.day_end_hour = 25;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("'day_end_hour'"), "{err}");

        let mut cfg = SchedulerConfig::default();
        cfg.day_start_hour = 12;
        cfg.day_end_hour = 10;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("'day_start_hour'"), "{err}");
    }

    #[test]
    fn validate_bounds_day_counts() {
        let mut cfg = SchedulerConfig::default();
        cfg.prep_span_days = 100_000_000;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("'prep_span_days'"), "{err}");

        let mut cfg = SchedulerConfig::default();
        cfg.lookback_days = -1;
        assert!(cfg.validate().is_err());

        let mut cfg = SchedulerConfig::default();
        cfg.homework_lead_days = 3651;
        assert!(cfg.validate().is_err());

        let mut cfg = SchedulerConfig::default();
        cfg.lookahead_days = 3650;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_blackout() {
        let mut cfg = SchedulerConfig::default();
        cfg.blackouts = vec![BlackoutWindow::new(13, 12)];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = SchedulerConfig::default();
        assert_eq!(cfg.get("day_start_hour").as_deref(), Some("9"));
        assert_eq!(cfg.get("utc_offset").as_deref(), Some("-05:00"));
        assert_eq!(cfg.get("blackouts.0.start_hour").as_deref(), Some("12"));
        assert!(cfg.get("missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_numbers_and_strings() {
        let mut cfg = SchedulerConfig::default();
        cfg.apply("search_radius_days", "10").unwrap();
        assert_eq!(cfg.search_radius_days, 10);

        cfg.apply("session_hours", "1.5").unwrap();
        assert_eq!(cfg.session_hours, 1.5);

        cfg.apply("utc_offset", "+01:00").unwrap();
        assert_eq!(cfg.utc_offset, "+01:00");
    }

    #[test]
    fn apply_rejects_unknown_key_and_bad_values() {
        let mut cfg = SchedulerConfig::default();
        assert!(cfg.apply("nonexistent", "1").is_err());
        assert!(cfg.apply("day_start_hour", "later").is_err());
        // Parse as numbers but fail validation
        assert!(cfg.apply("scan_step_minutes", "0").is_err());
        assert!(cfg.apply("prep_span_days", "100000000").is_err());
        // Parses as a string but fails validation
        assert!(cfg.apply("utc_offset", "eastern").is_err());
    }

    #[test]
    fn save_to_and_load_from_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = SchedulerConfig::default();
        cfg.session_hours = 1.0;
        cfg.utc_offset = "+02:00".to_string();
        cfg.save_to(&path).unwrap();

        let loaded = SchedulerConfig::load_from(&path).unwrap();
        assert_eq!(loaded.session_hours, 1.0);
        assert_eq!(loaded.utc_offset, "+02:00");
    }

    #[test]
    fn load_from_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "day_start_hour = 22\nday_end_hour = 9\n").unwrap();
        assert!(SchedulerConfig::load_from(&path).is_err());
    }
}
