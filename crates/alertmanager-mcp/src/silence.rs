//! Silence duration parsing and creation payloads.

use chrono::{DateTime, Duration, Utc};

use crate::errors::DurationError;
use crate::models::{Matcher, PostableSilence};

/// Longest silence the server will create.
pub const MAX_SILENCE_DURATION: Duration = Duration::days(30);

pub const DEFAULT_SILENCE_DURATION: &str = "2h";
pub const DEFAULT_SILENCE_COMMENT: &str = "Silenced via MCP";
pub const DEFAULT_SILENCE_CREATOR: &str = "alertmanager-mcp";

/// Parse `<integer><unit>` where unit is `m`, `h` or `d`.
///
/// Does not apply [`MAX_SILENCE_DURATION`]; see [`validate_duration`].
///
/// # Errors
///
/// - [`DurationError::TooShort`] when fewer than two characters are given
/// - [`DurationError::UnknownUnit`] for a unit outside `m`, `h`, `d`
/// - [`DurationError::InvalidValue`] when the amount is not an integer
/// - [`DurationError::NonPositive`] when the amount is zero or negative
pub fn parse_duration(token: &str) -> Result<Duration, DurationError> {
    let token = token.trim();
    let mut chars = token.chars();
    let (Some(unit), true) = (chars.next_back(), token.chars().count() >= 2) else {
        return Err(DurationError::TooShort(token.to_string()));
    };
    let amount = chars.as_str();

    let per_unit: fn(i64) -> Option<Duration> = match unit {
        'm' => Duration::try_minutes,
        'h' => Duration::try_hours,
        'd' => Duration::try_days,
        // a trailing digit means the unit is missing altogether
        _ if unit.is_ascii_digit() => return Err(DurationError::TooShort(token.to_string())),
        other => return Err(DurationError::UnknownUnit(other)),
    };

    let value: i64 = amount
        .parse()
        .map_err(|_| DurationError::InvalidValue(token.to_string()))?;
    if value <= 0 {
        return Err(DurationError::NonPositive(token.to_string()));
    }

    per_unit(value).ok_or_else(|| DurationError::InvalidValue(token.to_string()))
}

/// Reject durations longer than [`MAX_SILENCE_DURATION`].
///
/// # Errors
///
/// Returns [`DurationError::ExceedsMaximum`] when over the limit.
pub fn validate_duration(duration: Duration) -> Result<Duration, DurationError> {
    if duration > MAX_SILENCE_DURATION {
        return Err(DurationError::ExceedsMaximum {
            max_days: MAX_SILENCE_DURATION.num_days(),
        });
    }
    Ok(duration)
}

/// Caller input for a new silence on one alert name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilenceRequest {
    pub alert_name: String,
    pub duration: Duration,
    pub comment: String,
    pub created_by: String,
}

impl SilenceRequest {
    /// Request with default duration, comment and creator.
    #[must_use]
    pub fn new(alert_name: impl Into<String>) -> Self {
        Self {
            alert_name: alert_name.into(),
            duration: Duration::hours(2),
            comment: DEFAULT_SILENCE_COMMENT.to_string(),
            created_by: DEFAULT_SILENCE_CREATOR.to_string(),
        }
    }

    /// Payload starting at `now`. The only matcher is an exact match on `alertname`.
    #[must_use]
    pub fn build(&self, now: DateTime<Utc>) -> PostableSilence {
        PostableSilence {
            id: None,
            comment: self.comment.clone(),
            created_by: self.created_by.clone(),
            starts_at: now,
            ends_at: now + self.duration,
            matchers: vec![Matcher::equal("alertname", self.alert_name.clone())],
        }
    }
}
