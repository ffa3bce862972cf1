//! System configuration loading
//!
//! Configuration is TOML-based with compiled defaults for every field. A
//! malformed or missing file never prevents startup: `SystemConfig::load`
//! logs the problem and falls back to defaults, while `load_strict` (used
//! by `aos check-config`) surfaces it.

use anyhow::{Context, Result};
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::task::DEFAULT_MAX_RETRIES;

/// Top-level system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Worker pool slot count
    pub max_workers: usize,
    /// Retry budget applied to submissions that do not specify their own
    pub default_max_retries: u32,
    /// How long the dispatch loop sleeps when the queue is empty, in
    /// milliseconds; bounds both dispatch latency and shutdown latency
    pub idle_wait_ms: u64,
    pub routines: RoutineConfig,
}

/// Wall-clock triggers for the periodic routine generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutineConfig {
    pub enabled: bool,
    /// Daily morning routine time, "HH:MM"
    pub morning: String,
    /// Daily evening routine time, "HH:MM"
    pub evening: String,
    /// Minute of each hour the hourly checks fire
    pub hourly_minute: u32,
    /// Weekday of the weekly planning routine
    pub planning_day: String,
    pub planning_time: String,
    /// Weekday of the weekly review routine
    pub review_day: String,
    pub review_time: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            max_workers: 10,
            default_max_retries: DEFAULT_MAX_RETRIES,
            idle_wait_ms: 100,
            routines: RoutineConfig::default(),
        }
    }
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            morning: "08:00".to_string(),
            evening: "17:00".to_string(),
            hourly_minute: 0,
            planning_day: "mon".to_string(),
            planning_time: "09:00".to_string(),
            review_day: "fri".to_string(),
            review_time: "16:00".to_string(),
        }
    }
}

impl SystemConfig {
    /// Load configuration, falling back to defaults on any error
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_strict(path.as_ref()) {
            Ok(config) => {
                info!("Configuration loaded from {}", path.as_ref().display());
                config
            }
            Err(e) => {
                warn!(
                    "Failed to load configuration from {}: {:#}, using defaults",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Load configuration, propagating parse and IO errors
    pub fn load_strict<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: SystemConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.routines.validate()?;
        Ok(config)
    }
}

impl RoutineConfig {
    /// Parse all trigger fields, rejecting the first invalid one
    pub fn validate(&self) -> Result<()> {
        self.morning_time()?;
        self.evening_time()?;
        self.planning()?;
        self.review()?;
        anyhow::ensure!(
            self.hourly_minute < 60,
            "hourly_minute must be 0-59, got {}",
            self.hourly_minute
        );
        Ok(())
    }

    pub fn morning_time(&self) -> Result<NaiveTime> {
        parse_time(&self.morning).context("routines.morning")
    }

    pub fn evening_time(&self) -> Result<NaiveTime> {
        parse_time(&self.evening).context("routines.evening")
    }

    pub fn planning(&self) -> Result<(Weekday, NaiveTime)> {
        let day = parse_weekday(&self.planning_day).context("routines.planning_day")?;
        let time = parse_time(&self.planning_time).context("routines.planning_time")?;
        Ok((day, time))
    }

    pub fn review(&self) -> Result<(Weekday, NaiveTime)> {
        let day = parse_weekday(&self.review_day).context("routines.review_day")?;
        let time = parse_time(&self.review_time).context("routines.review_time")?;
        Ok((day, time))
    }
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .with_context(|| format!("expected HH:MM, got '{}'", value))
}

fn parse_weekday(value: &str) -> Result<Weekday> {
    Weekday::from_str(value).map_err(|_| anyhow::anyhow!("unknown weekday '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SystemConfig::default();

        assert_eq!(config.max_workers, 10);
        assert_eq!(config.default_max_retries, 3);
        assert!(config.routines.enabled);
        assert_eq!(config.routines.morning, "08:00");
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let config = SystemConfig::load("/nonexistent/aos.toml");
        assert_eq!(config.max_workers, SystemConfig::default().max_workers);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults_for_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_workers = 4").unwrap();

        let config = SystemConfig::load_strict(file.path()).unwrap();
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.default_max_retries, 3);
        assert_eq!(config.routines.evening, "17:00");
    }

    #[test]
    fn test_load_strict_rejects_bad_trigger() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[routines]\nmorning = \"25:99\"").unwrap();

        assert!(SystemConfig::load_strict(file.path()).is_err());
    }

    #[test]
    fn test_weekday_and_time_parsing() {
        let routines = RoutineConfig::default();

        let (day, time) = routines.planning().unwrap();
        assert_eq!(day, Weekday::Mon);
        assert_eq!(time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());

        let (day, _) = routines.review().unwrap();
        assert_eq!(day, Weekday::Fri);
    }
}
