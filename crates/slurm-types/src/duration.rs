//! Slurm time-limit formatting and parsing.

use std::time::Duration;

use crate::error::{TypesError, TypesResult};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Format a duration as `HH:MM:SS`.
///
/// Hours are not wrapped at 24: 25h30m15s renders as `25:30:15`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Format a whole number of minutes (the unit Slurm uses for time limits).
#[must_use]
pub fn format_minutes(minutes: u32) -> String {
    format_duration(Duration::from_secs(u64::from(minutes) * SECS_PER_MINUTE))
}

/// Parse a Slurm time specification.
///
/// Accepted forms: `MM`, `MM:SS`, `HH:MM:SS`, `D-HH`, `D-HH:MM`, `D-HH:MM:SS`.
pub fn parse_duration(input: &str) -> TypesResult<Duration> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid(input, "empty"));
    }

    let (days, rest) = match trimmed.split_once('-') {
        Some((days, rest)) => (Some(parse_field(input, days)?), rest),
        None => (None, trimmed),
    };

    let fields = rest
        .split(':')
        .map(|field| parse_field(input, field))
        .collect::<TypesResult<Vec<u64>>>()?;

    let parts: Vec<(u64, u64)> = match (days, fields.as_slice()) {
        (None, [minutes]) => vec![(*minutes, SECS_PER_MINUTE)],
        (None, [minutes, seconds]) => vec![(*minutes, SECS_PER_MINUTE), (*seconds, 1)],
        (None, [hours, minutes, seconds]) => vec![
            (*hours, SECS_PER_HOUR),
            (*minutes, SECS_PER_MINUTE),
            (*seconds, 1),
        ],
        (Some(days), [hours]) => vec![(days, SECS_PER_DAY), (*hours, SECS_PER_HOUR)],
        (Some(days), [hours, minutes]) => vec![
            (days, SECS_PER_DAY),
            (*hours, SECS_PER_HOUR),
            (*minutes, SECS_PER_MINUTE),
        ],
        (Some(days), [hours, minutes, seconds]) => vec![
            (days, SECS_PER_DAY),
            (*hours, SECS_PER_HOUR),
            (*minutes, SECS_PER_MINUTE),
            (*seconds, 1),
        ],
        _ => return Err(invalid(input, "too many fields")),
    };

    let secs = parts
        .into_iter()
        .try_fold(0u64, |total, (value, unit)| {
            value.checked_mul(unit)?.checked_add(total)
        })
        .ok_or_else(|| invalid(input, "duration out of range"))?;

    Ok(Duration::from_secs(secs))
}

fn parse_field(input: &str, field: &str) -> TypesResult<u64> {
    field
        .trim()
        .parse::<u64>()
        .map_err(|_| invalid(input, format!("'{field}' is not a whole number")))
}

fn invalid(input: &str, reason: impl Into<String>) -> TypesError {
    TypesError::InvalidDuration {
        input: input.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(0, "00:00:00" ; "zero")]
    #[test_case(45, "00:00:45" ; "seconds only")]
    #[test_case(330, "00:05:30" ; "minutes and seconds")]
    #[test_case(25 * 3600 + 30 * 60 + 15, "25:30:15" ; "hours past a day")]
    #[test_case(100 * 3600, "100:00:00" ; "three digit hours")]
    fn test_format_duration(secs: u64, expected: &str) {
        assert_eq!(format_duration(Duration::from_secs(secs)), expected);
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(90), "01:30:00");
    }

    #[test_case("30", 30 * 60 ; "minutes")]
    #[test_case("30:15", 30 * 60 + 15 ; "minutes seconds")]
    #[test_case("02:30:00", 2 * 3600 + 30 * 60 ; "hours minutes seconds")]
    #[test_case("1-12", 36 * 3600 ; "days hours")]
    #[test_case("1-00:30", 24 * 3600 + 30 * 60 ; "days hours minutes")]
    #[test_case("2-01:02:03", 2 * 86_400 + 3600 + 2 * 60 + 3 ; "days full")]
    fn test_parse_duration(input: &str, expected_secs: u64) {
        assert_eq!(parse_duration(input), Ok(Duration::from_secs(expected_secs)));
    }

    #[test_case("" ; "empty string")]
    #[test_case("abc" ; "not a number")]
    #[test_case("1:2:3:4" ; "too many fields")]
    #[test_case("1-2:3:4:5" ; "too many fields after days")]
    #[test_case("-5" ; "missing days")]
    fn test_parse_duration_rejects(input: &str) {
        assert!(parse_duration(input).is_err());
    }

    #[test_case("999999999999999999-0" ; "days overflow")]
    #[test_case("9999999999999999999:00:00" ; "hours overflow")]
    #[test_case("18446744073709551615:59" ; "minutes overflow")]
    #[test_case("1-0:0:18446744073709551615" ; "sum overflow")]
    fn test_parse_duration_out_of_range(input: &str) {
        let err = parse_duration(input).unwrap_err();
        assert!(err.to_string().contains("duration out of range"), "{err}");
    }

    proptest! {
        #[test]
        fn prop_format_then_parse_round_trips(secs in 0u64..10_000_000) {
            let rendered = format_duration(Duration::from_secs(secs));
            prop_assert_eq!(parse_duration(&rendered), Ok(Duration::from_secs(secs)));
        }
    }
}
