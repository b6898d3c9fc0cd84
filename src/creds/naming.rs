//! Robot account naming.
//!
//! Names have the form `vault.<role>.<display name>.<unix nanos>`, with the
//! display name segment dropped when the requester has none.

use std::sync::atomic::{AtomicU64, Ordering};

use jiff::Timestamp;

/// Leading segment of every generated robot account name.
pub const NAME_PREFIX: &str = "vault";

/// Replace every character outside `[A-Za-z0-9._-]` with `-`.
#[must_use]
pub fn sanitize_display_name(display_name: &str) -> String {
    display_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Build the robot account name for one issuance.
#[must_use]
pub fn robot_account_name(role: &str, display_name: Option<&str>, nanos: u64) -> String {
    match display_name.filter(|name| !name.is_empty()) {
        Some(display_name) => format!(
            "{NAME_PREFIX}.{role}.{}.{nanos}",
            sanitize_display_name(display_name)
        ),
        None => format!("{NAME_PREFIX}.{role}.{nanos}"),
    }
}

/// Strictly increasing Unix nanosecond timestamps.
///
/// Each reading is the wall clock, or one past the previous reading when
/// the clock has not advanced, so two names from the same source never
/// share a timestamp.
pub struct MonotonicNanos {
    last: AtomicU64,
    source: fn() -> u64,
}

impl std::fmt::Debug for MonotonicNanos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonotonicNanos")
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

impl Default for MonotonicNanos {
    fn default() -> Self {
        Self::with_source(wall_clock_nanos)
    }
}

impl MonotonicNanos {
    /// Source reading the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source reading `source` instead of the system clock.
    #[must_use]
    pub fn with_source(source: fn() -> u64) -> Self {
        Self {
            last: AtomicU64::new(0),
            source,
        }
    }

    /// Next timestamp, strictly greater than any previously returned.
    pub fn next_nanos(&self) -> u64 {
        let now = (self.source)();
        let advance = |last: u64| now.max(last.saturating_add(1));

        let (Ok(previous) | Err(previous)) =
            self.last
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(advance(last)));

        advance(previous)
    }
}

fn wall_clock_nanos() -> u64 {
    u64::try_from(Timestamp::now().as_nanosecond()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc, thread};

    use super::*;

    #[test]
    fn sanitize_replaces_disallowed_characters() {
        assert_eq!(sanitize_display_name("token-ci.bot_1"), "token-ci.bot_1");
        assert_eq!(sanitize_display_name("oidc user@example.com"), "oidc-user-example.com");
        assert_eq!(sanitize_display_name("ldap/ü$x"), "ldap---x");
    }

    #[test]
    fn name_includes_sanitized_display_name() {
        assert_eq!(
            robot_account_name("r1", Some("token ci"), 17),
            "vault.r1.token-ci.17"
        );
    }

    #[test]
    fn name_omits_missing_or_empty_display_name() {
        assert_eq!(robot_account_name("r1", None, 17), "vault.r1.17");
        assert_eq!(robot_account_name("r1", Some(""), 17), "vault.r1.17");
    }

    #[test]
    fn wall_clock_is_after_2020() {
        assert!(wall_clock_nanos() > 1_577_836_800_000_000_000);
    }

    #[test]
    fn stalled_clock_still_yields_distinct_values() {
        let clock = MonotonicNanos::with_source(|| 1_000);

        assert_eq!(clock.next_nanos(), 1_000);
        assert_eq!(clock.next_nanos(), 1_001);
        assert_eq!(clock.next_nanos(), 1_002);
    }

    #[test]
    fn concurrent_readers_never_collide() -> testresult::TestResult {
        let clock = Arc::new(MonotonicNanos::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = Arc::clone(&clock);
                thread::spawn(move || (0..1_000).map(|_| clock.next_nanos()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();

        for handle in handles {
            let values = handle
                .join()
                .map_err(|panic| format!("reader thread panicked: {panic:?}"))?;

            for value in values {
                assert!(seen.insert(value), "duplicate timestamp {value}");
            }
        }

        assert_eq!(seen.len(), 8_000);

        Ok(())
    }
}
