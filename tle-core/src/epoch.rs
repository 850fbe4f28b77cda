//! Conversion between the TLE epoch (2-digit year + fractional day of year)
//! and an absolute UTC instant.
//!
//! Two-digit years pivot at 70: `70..=99` are 1970-1999, `00..=69` are
//! 2000-2069. Day 1.0 is January 1st 00:00:00 UTC. The calendar is proleptic
//! Gregorian UTC without leap seconds.

use chrono::{DateTime, Datelike, TimeDelta, TimeZone, Utc};

use crate::types::{Result, TleError};

/// Two-digit years at or above this value belong to the 1900s.
pub const CENTURY_PIVOT: u8 = 70;

/// First and last calendar years expressible with the pivot rule.
pub const FIRST_YEAR: u16 = 1970;
pub const LAST_YEAR: u16 = 2069;

const MICROS_PER_DAY: f64 = 86_400_000_000.0;
const NANOS_PER_DAY: f64 = 86_400_000_000_000.0;

/// Resolve a 2-digit epoch year to a calendar year.
pub fn resolve_year(two_digit_year: u8) -> u16 {
    let yy = (two_digit_year % 100) as u16;
    if two_digit_year % 100 >= CENTURY_PIVOT {
        1900 + yy
    } else {
        2000 + yy
    }
}

/// Inverse of [`resolve_year`]. Fails for years outside 1970-2069.
pub fn two_digit_year(year: u16) -> Result<u8> {
    if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
        return Err(TleError::out_of_range("epoch year", year));
    }
    Ok((year % 100) as u8)
}

/// Instant of a TLE epoch.
///
/// The sub-day part is kept at microsecond granularity, well below the
/// ~0.9 ms resolution of the 8-digit day fraction.
pub fn to_absolute_time(two_digit_year: u8, day_of_year: f64) -> Result<DateTime<Utc>> {
    if two_digit_year > 99 {
        return Err(TleError::out_of_range("epoch year", two_digit_year));
    }
    if !day_of_year.is_finite() || !(0.0..=366.0).contains(&day_of_year) {
        return Err(TleError::out_of_range("epoch day", day_of_year));
    }

    let year = resolve_year(two_digit_year) as i32;
    let jan1 = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| TleError::out_of_range("epoch year", year))?;

    let micros = ((day_of_year - 1.0) * MICROS_PER_DAY).round() as i64;
    Ok(jan1 + TimeDelta::microseconds(micros))
}

/// Decompose an instant into a 2-digit year and a 1-based fractional day of year.
pub fn from_absolute_time(instant: DateTime<Utc>) -> Result<(u8, f64)> {
    let year = u16::try_from(instant.year())
        .map_err(|_| TleError::out_of_range("epoch year", instant.year()))?;
    let yy = two_digit_year(year)?;

    let midnight = instant
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| TleError::out_of_range("epoch", instant))?
        .and_utc();
    let elapsed = (instant - midnight)
        .num_nanoseconds()
        .ok_or_else(|| TleError::out_of_range("epoch", instant))?;

    Ok((yy, instant.ordinal() as f64 + elapsed as f64 / NANOS_PER_DAY))
}

/// Calendar year and fractional day of an instant, as stored in a record.
pub(crate) fn year_and_day(instant: DateTime<Utc>) -> Result<(u16, f64)> {
    let (yy, day) = from_absolute_time(instant)?;
    Ok((resolve_year(yy), day))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
