//! Configuration types, read from the environment.

use chrono::{FixedOffset, NaiveTime, Timelike};
use secrecy::SecretString;

use crate::error::ConfigError;

/// Default daily publish time.
const DEFAULT_PUBLISH_TIME: &str = "18:30";

/// Default offset for the publish time (Moscow).
const DEFAULT_UTC_OFFSET: &str = "+03:00";

/// Which transport the bot runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Telegram,
    /// stdin/stdout, for trying the bot locally.
    Cli,
}

/// When the daily summary goes out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub publish_time: NaiveTime,
    pub utc_offset: FixedOffset,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            publish_time: NaiveTime::from_hms_opt(18, 30, 0).expect("18:30 is a valid time"),
            utc_offset: FixedOffset::east_opt(3 * 3600).expect("+03:00 is a valid offset"),
        }
    }
}

impl ScheduleConfig {
    /// Cron expression (seconds first) firing once a day at the publish time.
    pub fn cron_expression(&self) -> String {
        format!(
            "0 {} {} * * *",
            self.publish_time.minute(),
            self.publish_time.hour()
        )
    }

    /// `HH:MM`, as shown to users.
    pub fn display_time(&self) -> String {
        self.publish_time.format("%H:%M").to_string()
    }
}

/// Bot configuration.
#[derive(Debug)]
pub struct BotConfig {
    pub bot_token: SecretString,
    /// Chat that receives the daily summary.
    pub group_chat_id: String,
    pub schedule: ScheduleConfig,
    /// Drop Telegram updates that queued while the bot was offline.
    pub skip_pending_updates: bool,
    pub channel: ChannelKind,
}

impl BotConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let channel = match var("REPORT_CHANNEL").as_deref() {
            None | Some("telegram") => ChannelKind::Telegram,
            Some("cli") => ChannelKind::Cli,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "REPORT_CHANNEL".into(),
                    message: format!("expected 'telegram' or 'cli', got '{other}'"),
                });
            }
        };

        let bot_token = match var("REPORT_BOT_TOKEN").or_else(|| var("TELEGRAM_BOT_TOKEN")) {
            Some(token) => SecretString::from(token),
            None if channel == ChannelKind::Cli => SecretString::from(""),
            None => return Err(ConfigError::MissingEnvVar("REPORT_BOT_TOKEN".into())),
        };

        let group_chat_id = match var("REPORT_GROUP_CHAT_ID") {
            Some(id) => id,
            None if channel == ChannelKind::Cli => "cli-group".to_string(),
            None => return Err(ConfigError::MissingEnvVar("REPORT_GROUP_CHAT_ID".into())),
        };

        let publish_time = parse_time(
            "REPORT_PUBLISH_TIME",
            var("REPORT_PUBLISH_TIME").as_deref().unwrap_or(DEFAULT_PUBLISH_TIME),
        )?;
        let utc_offset = parse_offset(
            "REPORT_UTC_OFFSET",
            var("REPORT_UTC_OFFSET").as_deref().unwrap_or(DEFAULT_UTC_OFFSET),
        )?;

        let skip_pending_updates = match var("REPORT_SKIP_PENDING").as_deref() {
            None | Some("true" | "1" | "yes") => true,
            Some("false" | "0" | "no") => false,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "REPORT_SKIP_PENDING".into(),
                    message: format!("expected a boolean, got '{other}'"),
                });
            }
        };

        Ok(Self {
            bot_token,
            group_chat_id,
            schedule: ScheduleConfig {
                publish_time,
                utc_offset,
            },
            skip_pending_updates,
            channel,
        })
    }
}

fn parse_time(key: &str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| ConfigError::InvalidValue {
        key: key.into(),
        message: format!("expected HH:MM, got '{value}': {e}"),
    })
}

/// Parse `+HH:MM`, `-HH:MM` or `+HH`.
fn parse_offset(key: &str, value: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: key.into(),
        message: format!("expected +HH:MM, got '{value}'"),
    };

    let (sign, rest) = match value.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };

    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
