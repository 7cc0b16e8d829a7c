/// Configuration for a generation run: which courses, which rules, which buffers
use crate::catalog::TermWindow;
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

use super::error::ConfigError;

/// Formats accepted for time-of-day strings, tried in order.
const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M%p", "%I:%M %p"];

/// Longest accepted layover, in minutes.
pub const MAX_LAYOVER: u32 = 24 * 60;

/// Global rules applied to every catalog course
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rules {
    /// Days that must stay free of classes
    pub no_class_on: Option<Vec<Weekday>>,
    #[serde(deserialize_with = "deserialize_opt_time")]
    pub no_class_before: Option<NaiveTime>,
    #[serde(deserialize_with = "deserialize_opt_time")]
    pub no_class_after: Option<NaiveTime>,
    /// `Some(false)` removes online sections; absent means no filtering
    pub allow_online: Option<bool>,
    /// Minutes required between consecutive meetings
    pub layover: Option<u32>,
}

impl Rules {
    /// Returns true when no rule is set.
    pub fn is_empty(&self) -> bool {
        self.no_class_on.is_none()
            && self.no_class_before.is_none()
            && self.no_class_after.is_none()
            && self.allow_online.is_none()
            && self.layover.is_none()
    }
}

/// A named block of time that must stay free
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    pub name: String,
    #[serde(deserialize_with = "deserialize_time")]
    pub start_time: NaiveTime,
    #[serde(deserialize_with = "deserialize_time")]
    pub end_time: NaiveTime,
    pub days: Vec<Weekday>,
}

/// What to do with a course that has no sections left after filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyCoursePolicy {
    /// Leave the course out and schedule the rest
    Drop,
    /// Stop the run
    #[default]
    Abort,
}

/// Top-level configuration for one generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    /// Course codes to schedule; empty means every course in the catalog
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub term: Option<TermWindow>,
    #[serde(flatten)]
    pub rules: Rules,
    #[serde(default)]
    pub buffers: Vec<Buffer>,
    #[serde(default)]
    pub on_empty_course: EmptyCoursePolicy,
    #[serde(default)]
    pub verbose: bool,
}

impl ScheduleConfig {
    /// Loads a configuration from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ScheduleConfig)` - The validated configuration
    /// * `Err` - If the file can't be read, parsed, or fails validation
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: ScheduleConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the values that serde can't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let (Some(before), Some(after)) = (self.rules.no_class_before, self.rules.no_class_after)
        {
            if before > after {
                return Err(ConfigError::EmptyDay {
                    before: before.format("%H:%M").to_string(),
                    after: after.format("%H:%M").to_string(),
                });
            }
        }

        if let Some(minutes) = self.rules.layover {
            if minutes > MAX_LAYOVER {
                return Err(ConfigError::InvalidLayover {
                    minutes,
                    max: MAX_LAYOVER,
                });
            }
        }

        for buffer in &self.buffers {
            if buffer.start_time > buffer.end_time {
                return Err(ConfigError::InvalidBuffer {
                    name: buffer.name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Parses a time of day such as "13:30", "13:30:00", "1:30pm" or "1:30 PM".
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ConfigError> {
    let normalized = value.trim().to_uppercase();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&normalized, fmt).ok())
        .ok_or_else(|| ConfigError::InvalidTime {
            value: value.to_string(),
        })
}

fn deserialize_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_time_of_day(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_opt_time<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|s| parse_time_of_day(&s).map_err(serde::de::Error::custom))
        .transpose()
}
