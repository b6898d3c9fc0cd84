//! Duration inputs for `ttl` and `max_ttl`.
//!
//! Numbers are seconds. Strings may be bare seconds (`"30"`), whole days
//! (`"2d"`), or anything `jiff` parses as a duration (`"1m"`, `"5h"`,
//! `"1h30m"`, `"PT30S"`).

use std::time::Duration;

use jiff::SignedDuration;
use serde::{Deserialize, Deserializer, Serializer};

use crate::roles::ValidationError;

const SECONDS_PER_DAY: u64 = 86_400;

/// A duration as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    /// Numeric seconds.
    Seconds(f64),

    /// Textual duration.
    Text(String),
}

impl DurationInput {
    /// Resolve to a non-negative duration.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDuration`] for negative, non-finite,
    /// or unparsable input.
    pub fn resolve(&self, field: &'static str) -> Result<Duration, ValidationError> {
        match self {
            Self::Seconds(seconds) => Duration::try_from_secs_f64(*seconds)
                .ok()
                .ok_or_else(|| invalid(field, &seconds.to_string())),
            Self::Text(text) => parse_text(text).ok_or_else(|| invalid(field, text)),
        }
    }
}

impl From<&str> for DurationInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

fn invalid(field: &'static str, value: &str) -> ValidationError {
    ValidationError::InvalidDuration {
        field,
        value: value.to_string(),
    }
}

fn parse_text(text: &str) -> Option<Duration> {
    let text = text.trim();

    if text.is_empty() {
        return Some(Duration::ZERO);
    }

    if text.bytes().all(|byte| byte.is_ascii_digit()) {
        return text.parse().ok().map(Duration::from_secs);
    }

    let days = text
        .strip_suffix('d')
        .filter(|days| !days.is_empty() && days.bytes().all(|byte| byte.is_ascii_digit()));

    if let Some(days) = days {
        let days: u64 = days.parse().ok()?;

        return days.checked_mul(SECONDS_PER_DAY).map(Duration::from_secs);
    }

    let signed: SignedDuration = text.parse().ok()?;

    Duration::try_from(signed).ok()
}

/// Serde adapter storing a [`Duration`] as whole seconds.
pub mod seconds {
    use super::{Deserialize, Deserializer, Duration, Serializer};

    /// Serialize as an integer number of seconds.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    /// Deserialize from an integer number of seconds.
    ///
    /// # Errors
    ///
    /// Propagates deserializer errors.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
