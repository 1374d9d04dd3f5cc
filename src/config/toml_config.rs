use crate::adapters::trello::TrelloBoard;
use crate::core::schedule::Schedule;
use crate::utils::error::{BoardError, Result};
use crate::utils::validation::{
    parse_time_of_day, validate_non_empty_string, validate_range, validate_substituted,
    validate_url, Validate,
};
use chrono::{FixedOffset, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_API_BASE: &str = "https://api.trello.com/1/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub board: BoardSection,
    #[serde(default)]
    pub schedule: ScheduleSection,
    #[serde(default)]
    pub timers: TimerSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSection {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub board_id: String,
    pub key: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSection {
    pub utc_offset_hours: i32,
    pub day_start: String,
    pub night_start: String,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            utc_offset_hours: -7,
            day_start: "03:00".to_string(),
            night_start: "19:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSection {
    pub enabled: bool,
    pub merge_night_at: String,
    pub transition_at: String,
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            enabled: false,
            merge_night_at: "19:05".to_string(),
            transition_at: "03:30".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl BoardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BoardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}` from the environment. Unset variables are left as-is
    /// so validation can name them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BoardError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("board.api_base", &self.board.api_base)?;
        for (field, value) in [
            ("board.board_id", &self.board.board_id),
            ("board.key", &self.board.key),
            ("board.token", &self.board.token),
        ] {
            validate_non_empty_string(field, value)?;
            validate_substituted(field, value)?;
        }

        validate_range("schedule.utc_offset_hours", self.schedule.utc_offset_hours, -12, 14)?;
        let day_start = parse_time_of_day("schedule.day_start", &self.schedule.day_start)?;
        let night_start = parse_time_of_day("schedule.night_start", &self.schedule.night_start)?;
        if day_start >= night_start {
            return Err(BoardError::ConfigValidationError {
                field: "schedule.night_start".to_string(),
                message: "Night must start after the day starts".to_string(),
            });
        }

        self.merge_night_at()?;
        self.transition_at()?;
        Ok(())
    }

    pub fn schedule(&self) -> Result<Schedule> {
        let offset = FixedOffset::east_opt(self.schedule.utc_offset_hours * 3600).ok_or_else(|| {
            BoardError::InvalidConfigValueError {
                field: "schedule.utc_offset_hours".to_string(),
                value: self.schedule.utc_offset_hours.to_string(),
                reason: "Offset is out of range".to_string(),
            }
        })?;
        Ok(Schedule::new(
            offset,
            parse_time_of_day("schedule.day_start", &self.schedule.day_start)?,
            parse_time_of_day("schedule.night_start", &self.schedule.night_start)?,
        ))
    }

    pub fn merge_night_at(&self) -> Result<NaiveTime> {
        parse_time_of_day("timers.merge_night_at", &self.timers.merge_night_at)
    }

    pub fn transition_at(&self) -> Result<NaiveTime> {
        parse_time_of_day("timers.transition_at", &self.timers.transition_at)
    }

    pub fn timers_enabled(&self) -> bool {
        self.timers.enabled
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging.format
    }

    /// Builds the HTTP board client from the `[board]` section.
    pub fn connect(&self) -> Result<TrelloBoard> {
        TrelloBoard::new(
            &self.board.api_base,
            &self.board.board_id,
            &self.board.key,
            &self.board.token,
        )
    }
}

impl Validate for BoardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
