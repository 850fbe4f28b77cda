//! Complete TLE records: optional title plus the two element lines.
//!
//! A [`Tle`] is immutable once constructed. It keeps the exact line texts it
//! was parsed from next to their typed contents, so a record read from a
//! catalogue prints back byte-for-byte, stale checksums included.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::checksum;
use crate::config::{ChecksumPolicy, Config};
use crate::epoch;
use crate::line::{parse_line1, parse_line2, Line1, Line2};
use crate::types::{InternationalDesignator, Result, TleError, CONTENT_LENGTH};

/// A parsed Two-Line Element set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tle {
    title: Option<String>,
    line1: Line1,
    line2: Line2,
    line1_text: String,
    line2_text: String,
    epoch: DateTime<Utc>,
    line1_checksum_valid: bool,
    line2_checksum_valid: bool,
}

impl Tle {
    /// Parse an untitled record with the default configuration.
    pub fn parse(line1: &str, line2: &str) -> Result<Tle> {
        Tle::parse_with_config(None, line1, line2, &Config::default())
    }

    /// Parse a titled record with the default configuration.
    pub fn parse_with_title(title: &str, line1: &str, line2: &str) -> Result<Tle> {
        Tle::parse_with_config(Some(title), line1, line2, &Config::default())
    }

    /// Parse a record.
    ///
    /// The title is trimmed; an empty title means no title. Satellite numbers
    /// must agree across the lines. Checksum digits are checked per line and
    /// handled according to `config.checksum`; the two digits are never
    /// compared with each other.
    pub fn parse_with_config(
        title: Option<&str>,
        line1: &str,
        line2: &str,
        config: &Config,
    ) -> Result<Tle> {
        let title = validate_title(title, config.title_max_len)?;
        let parsed1 = parse_line1(line1)?;
        let parsed2 = parse_line2(line2)?;

        if parsed1.satellite_number != parsed2.satellite_number {
            debug!(
                line1 = parsed1.satellite_number,
                line2 = parsed2.satellite_number,
                "rejected TLE record: satellite numbers differ"
            );
            return Err(TleError::InconsistentRecord {
                line1: parsed1.satellite_number,
                line2: parsed2.satellite_number,
            });
        }

        let line1_checksum_valid = check_checksum(1, line1, parsed1.checksum, config.checksum)?;
        let line2_checksum_valid = check_checksum(2, line2, parsed2.checksum, config.checksum)?;

        let yy = epoch::two_digit_year(parsed1.epoch_year)?;
        let epoch = epoch::to_absolute_time(yy, parsed1.epoch_day)?;

        Ok(Tle {
            title,
            line1: parsed1,
            line2: parsed2,
            line1_text: line1.to_string(),
            line2_text: line2.to_string(),
            epoch,
            line1_checksum_valid,
            line2_checksum_valid,
        })
    }

    // -- Record level --

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Line 1 exactly as parsed or rendered.
    pub fn line1_text(&self) -> &str {
        &self.line1_text
    }

    /// Line 2 exactly as parsed or rendered.
    pub fn line2_text(&self) -> &str {
        &self.line2_text
    }

    pub fn line1(&self) -> &Line1 {
        &self.line1
    }

    pub fn line2(&self) -> &Line2 {
        &self.line2
    }

    pub fn line1_checksum_valid(&self) -> bool {
        self.line1_checksum_valid
    }

    pub fn line2_checksum_valid(&self) -> bool {
        self.line2_checksum_valid
    }

    /// True if both lines carry a correct checksum digit.
    pub fn checksums_valid(&self) -> bool {
        self.line1_checksum_valid && self.line2_checksum_valid
    }

    // -- Line 1 fields --

    pub fn satellite_number(&self) -> u32 {
        self.line1.satellite_number
    }

    pub fn classification(&self) -> char {
        self.line1.classification
    }

    pub fn international_designator(&self) -> &InternationalDesignator {
        &self.line1.international_designator
    }

    /// Four-digit epoch year.
    pub fn epoch_year(&self) -> u16 {
        self.line1.epoch_year
    }

    pub fn epoch_day(&self) -> f64 {
        self.line1.epoch_day
    }

    /// Epoch as a UTC instant.
    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    pub fn mean_motion_dot(&self) -> f64 {
        self.line1.mean_motion_dot
    }

    pub fn mean_motion_ddot(&self) -> f64 {
        self.line1.mean_motion_ddot
    }

    /// BSTAR drag term.
    pub fn drag_term(&self) -> f64 {
        self.line1.drag_term
    }

    pub fn ephemeris_type(&self) -> u8 {
        self.line1.ephemeris_type
    }

    pub fn element_set_number(&self) -> u16 {
        self.line1.element_set_number
    }

    /// Checksum digit printed on line 1.
    pub fn line1_checksum(&self) -> u8 {
        self.line1.checksum
    }

    // -- Line 2 fields --

    pub fn inclination(&self) -> f64 {
        self.line2.inclination
    }

    pub fn right_ascension(&self) -> f64 {
        self.line2.right_ascension
    }

    pub fn eccentricity(&self) -> f64 {
        self.line2.eccentricity
    }

    pub fn argument_of_perigee(&self) -> f64 {
        self.line2.argument_of_perigee
    }

    pub fn mean_anomaly(&self) -> f64 {
        self.line2.mean_anomaly
    }

    /// Revolutions per day.
    pub fn mean_motion(&self) -> f64 {
        self.line2.mean_motion
    }

    pub fn revolutions(&self) -> u32 {
        self.line2.revolutions
    }

    /// Checksum digit printed on line 2.
    pub fn line2_checksum(&self) -> u8 {
        self.line2.checksum
    }
}

/// Title line (if any) followed by the two element lines.
impl fmt::Display for Tle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "{title}")?;
        }
        writeln!(f, "{}", self.line1_text)?;
        write!(f, "{}", self.line2_text)
    }
}

/// Parse a 2- or 3-line block. Lines may be separated by LF, CRLF or CR;
/// blank lines are ignored.
impl FromStr for Tle {
    type Err = TleError;

    fn from_str(text: &str) -> Result<Tle> {
        let lines = split_lines(text);
        match lines.as_slice() {
            [line1, line2] => Tle::parse(line1, line2),
            [title, line1, line2] => Tle::parse_with_title(title, line1, line2),
            other => Err(TleError::InvalidLength {
                what: "record",
                expected: if other.len() < 2 { 2 } else { 3 },
                actual: other.len(),
            }),
        }
    }
}

/// Parse a catalogue of concatenated 2- and 3-line records.
///
/// A line starting with `1` that is not followed by another line-1 is the
/// start of an untitled record; anything else is a title. Every line must
/// belong to a record: the first record that fails aborts the whole parse.
pub fn parse_catalog(text: &str, config: &Config) -> Result<Vec<Tle>> {
    let lines = split_lines(text);
    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let untitled = starts_with(lines[i], b'1')
            && !lines.get(i + 1).is_some_and(|next| starts_with(next, b'1'));
        let take = if untitled { 2 } else { 3 };

        let remaining = lines.len() - i;
        if remaining < take {
            debug!(record = records.len(), remaining, "rejected catalogue: truncated record");
            return Err(TleError::InvalidLength {
                what: "record",
                expected: take,
                actual: remaining,
            });
        }

        let record = if untitled {
            Tle::parse_with_config(None, lines[i], lines[i + 1], config)
        } else {
            Tle::parse_with_config(Some(lines[i]), lines[i + 1], lines[i + 2], config)
        };
        match record {
            Ok(tle) => records.push(tle),
            Err(e) => {
                debug!(record = records.len(), error = %e, "rejected catalogue record");
                return Err(e);
            }
        }
        i += take;
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn split_lines(text: &str) -> Vec<&str> {
    text.split(['\n', '\r'])
        .filter(|line| !line.trim().is_empty())
        .collect()
}

fn starts_with(line: &str, digit: u8) -> bool {
    line.as_bytes().first() == Some(&digit)
}

fn validate_title(title: Option<&str>, max_len: usize) -> Result<Option<String>> {
    let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let len = title.chars().count();
    if len > max_len {
        debug!(len, max_len, "rejected TLE title");
        return Err(TleError::InvalidLength {
            what: "title",
            expected: max_len,
            actual: len,
        });
    }
    Ok(Some(title.to_string()))
}

/// True if the printed digit is correct. Under `Enforce` a wrong digit is an error.
fn check_checksum(number: u8, line: &str, printed: u8, policy: ChecksumPolicy) -> Result<bool> {
    let computed = checksum::compute(&line[..CONTENT_LENGTH])?;
    if computed == printed {
        return Ok(true);
    }

    debug!(line = number, printed, computed, ?policy, "TLE checksum mismatch");
    match policy {
        ChecksumPolicy::Report => Ok(false),
        ChecksumPolicy::Enforce => Err(TleError::ChecksumMismatch {
            line: number,
            expected: printed,
            computed,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
