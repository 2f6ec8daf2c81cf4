/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # Calendar normalization
//!
//! Pure conversions between textual calendar values and the physical integers stored by
//! date and timestamp column vectors. Everything is evaluated in UTC; nothing here looks
//! at the process time zone or locale.
//!
//! - Dates are stored as days since 1970-01-01 (negative before the epoch).
//! - Timestamps are stored as microseconds since 1970-01-01 00:00:00.

use crate::Error;
use crate::Result;
use chrono::DateTime;
use chrono::Datelike;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::Utc;

/// `NaiveDate::num_days_from_ce` of 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const MICROS_PER_SECOND: i64 = 1_000_000;

const DATE_PATTERN: &[u8] = b"dddd-dd-dd";
const TIMESTAMP_PATTERN: &[u8] = b"dddd-dd-dd dd:dd:dd";

/// Days since the epoch of a proleptic Gregorian calendar date
pub fn days_from_civil(year: i32, month: u32, day: u32) -> Option<i32> {
    NaiveDate::from_ymd_opt(year, month, day).map(date_to_days)
}

/// Microseconds since the epoch of a calendar date and time of day in UTC
pub fn micros_from_civil(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    micros: u32,
) -> Option<i64> {
    if micros >= MICROS_PER_SECOND as u32 {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    let seconds = date.and_time(time).and_utc().timestamp();
    seconds
        .checked_mul(MICROS_PER_SECOND)?
        .checked_add(i64::from(micros))
}

pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn datetime_to_micros(datetime: &DateTime<Utc>) -> i64 {
    datetime.timestamp_micros()
}

/// Parse a strict `YYYY-MM-DD` date into days since the epoch
pub fn parse_date(input: &str) -> Result<i32> {
    let bytes = input.as_bytes();
    if !matches_pattern(bytes, DATE_PATTERN) {
        return Err(Error::Format {
            kind: "date",
            input: input.to_string(),
            expected: "YYYY-MM-DD",
        });
    }

    let year = parse_digits(&bytes[0..4]) as i32;
    let month = parse_digits(&bytes[5..7]);
    let day = parse_digits(&bytes[8..10]);

    days_from_civil(year, month, day).ok_or_else(|| Error::Conversion {
        input: input.to_string(),
        reason: "no such calendar date",
    })
}

/// Parse `YYYY-MM-DD HH:MM:SS[.ffffff]` into microseconds since the epoch.
///
/// The fraction may have any number of digits; it is right-padded with zeros or
/// truncated to six.
pub fn parse_timestamp(input: &str) -> Result<i64> {
    let format_error = || Error::Format {
        kind: "timestamp",
        input: input.to_string(),
        expected: "YYYY-MM-DD HH:MM:SS[.ffffff]",
    };

    let bytes = input.as_bytes();
    if bytes.len() < TIMESTAMP_PATTERN.len()
        || !matches_pattern(&bytes[..TIMESTAMP_PATTERN.len()], TIMESTAMP_PATTERN)
    {
        return Err(format_error());
    }

    let fraction = &bytes[TIMESTAMP_PATTERN.len()..];
    let micros = match fraction.split_first() {
        None => 0,
        Some((b'.', digits)) if !digits.is_empty() && digits.iter().all(u8::is_ascii_digit) => {
            let kept = &digits[..digits.len().min(6)];
            parse_digits(kept) * 10u32.pow(6 - kept.len() as u32)
        }
        Some(_) => return Err(format_error()),
    };

    micros_from_civil(
        parse_digits(&bytes[0..4]) as i32,
        parse_digits(&bytes[5..7]),
        parse_digits(&bytes[8..10]),
        parse_digits(&bytes[11..13]),
        parse_digits(&bytes[14..16]),
        parse_digits(&bytes[17..19]),
        micros,
    )
    .ok_or_else(|| Error::Conversion {
        input: input.to_string(),
        reason: "no such calendar date and time",
    })
}

/// Render days since the epoch as `YYYY-MM-DD`
pub fn format_date(days: i32) -> Option<String> {
    let date = NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Render microseconds since the epoch as `YYYY-MM-DD HH:MM:SS.ffffff`
pub fn format_timestamp(micros: i64) -> Option<String> {
    let datetime = DateTime::from_timestamp_micros(micros)?;
    Some(datetime.format("%Y-%m-%d %H:%M:%S%.6f").to_string())
}

/// `d` in the pattern stands for an ASCII digit, every other byte must match verbatim
fn matches_pattern(bytes: &[u8], pattern: &[u8]) -> bool {
    bytes.len() == pattern.len()
        && bytes.iter().zip(pattern).all(|(&b, &p)| match p {
            b'd' => b.is_ascii_digit(),
            _ => b == p,
        })
}

fn parse_digits(digits: &[u8]) -> u32 {
    digits
        .iter()
        .fold(0u32, |acc, &d| acc * 10 + u32::from(d - b'0'))
}
