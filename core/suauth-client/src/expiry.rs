//! License expiration timestamps.
//!
//! Servers send `expires_at` as ISO-8601. Values carrying `Z` or a numeric
//! offset are compared against UTC; offset-less values are compared against
//! local wall-clock time, so both sides of a comparison always agree on
//! timezone awareness.

use crate::error::{ClientError, ClientResult};
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const AWARE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];

/// A parsed `expires_at` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiresAt {
    /// Timestamp with an explicit offset.
    Aware(DateTime<FixedOffset>),
    /// Timestamp in local wall-clock time.
    Naive(NaiveDateTime),
}

impl ExpiresAt {
    /// Parses an ISO-8601 timestamp. A trailing `Z` means UTC.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidTimestamp`] if no supported format matches.
    pub fn parse(value: &str) -> ClientResult<Self> {
        let trimmed = value.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::Aware(dt));
        }

        // Accept a lowercase `z` and a space separator like RFC 3339 readers usually do.
        let with_offset = match trimmed.strip_suffix(['Z', 'z']) {
            Some(rest) => format!("{rest}+00:00"),
            None => trimmed.to_string(),
        };
        for format in AWARE_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&with_offset, format) {
                return Ok(Self::Aware(dt));
            }
        }

        for format in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self::Naive(dt));
            }
        }

        if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(Self::Naive(midnight));
        }

        Err(ClientError::InvalidTimestamp {
            value: value.to_string(),
            reason: "expected an ISO-8601 date or date-time".to_string(),
        })
    }

    /// Returns true if `now` is strictly later than the expiration.
    #[must_use]
    pub fn has_passed_at(&self, now: DateTime<Utc>) -> bool {
        self.remaining_at(now) < Duration::zero()
    }

    /// Time left until expiration; negative once passed.
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        match self {
            Self::Aware(expires) => expires.signed_duration_since(now),
            Self::Naive(expires) => {
                expires.signed_duration_since(now.with_timezone(&Local).naive_local())
            }
        }
    }

    /// The expiration as wall-clock time in its own zone.
    #[must_use]
    pub fn wall_clock(&self) -> NaiveDateTime {
        match self {
            Self::Aware(expires) => expires.naive_local(),
            Self::Naive(expires) => *expires,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn parses_zulu_with_millis() {
        let parsed = ExpiresAt::parse("2025-03-01T12:00:00.000Z").unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(parsed, ExpiresAt::Aware(expected.fixed_offset()));
    }

    #[test]
    fn parses_numeric_offset_and_space_separator() {
        let parsed = ExpiresAt::parse("2025-03-01 14:00:00+02:00").unwrap();
        assert!(matches!(parsed, ExpiresAt::Aware(_)));
        assert_eq!(parsed.remaining_at(at("2025-03-01T12:00:00Z")), Duration::zero());
    }

    #[test]
    fn parses_offsetless_as_naive() {
        assert!(matches!(
            ExpiresAt::parse("2025-03-01T12:00:00").unwrap(),
            ExpiresAt::Naive(_)
        ));
        assert!(matches!(
            ExpiresAt::parse("2025-03-01").unwrap(),
            ExpiresAt::Naive(_)
        ));
    }

    #[test]
    fn rejects_garbage() {
        let err = ExpiresAt::parse("next tuesday").unwrap_err();
        assert!(err.to_string().contains("next tuesday"));
    }

    #[test]
    fn comparison_is_strict() {
        let expires = ExpiresAt::parse("2025-03-01T12:00:00Z").unwrap();
        assert!(!expires.has_passed_at(at("2025-03-01T12:00:00Z")));
        assert!(expires.has_passed_at(at("2025-03-01T12:00:01Z")));
        assert!(!expires.has_passed_at(at("2025-03-01T11:59:59Z")));
    }

    #[test]
    fn naive_compares_against_local_time() {
        let now = Utc::now();
        let past = (now.with_timezone(&Local) - Duration::hours(1)).naive_local();
        let future = (now.with_timezone(&Local) + Duration::hours(1)).naive_local();
        assert!(ExpiresAt::Naive(past).has_passed_at(now));
        assert!(!ExpiresAt::Naive(future).has_passed_at(now));
    }
}
