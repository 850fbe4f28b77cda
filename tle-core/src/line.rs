//! Parse and render the two 69-column TLE lines.
//!
//! Responsibilities:
//! - Check line length and the leading line-number literal
//! - Slice fixed column ranges and hand them to the field codecs
//! - Wrap the first failing field in `TleError::MalformedLine`
//! - Render typed values back to columns with a fresh checksum
//!
//! Checksums are never enforced here. The printed digit is stored as-is and
//! [`checksum::verify`] answers whether it is correct.

use std::fmt;
use std::ops::Range;

use serde::Serialize;
use tracing::{debug, trace};

use crate::checksum;
use crate::exponent::{self, ExponentKind};
use crate::field::{self, AngleField};
use crate::types::{InternationalDesignator, Result, TleError, LINE_LENGTH};

// Line 1 columns (0-based, half-open)
const L1_SATELLITE: Range<usize> = 2..7;
const L1_CLASSIFICATION: Range<usize> = 7..8;
const L1_DESIGNATOR: Range<usize> = 9..17;
const L1_EPOCH_YEAR: Range<usize> = 18..20;
const L1_EPOCH_DAY: Range<usize> = 20..32;
const L1_MEAN_MOTION_DOT: Range<usize> = 33..43;
const L1_MEAN_MOTION_DDOT: Range<usize> = 44..52;
const L1_DRAG_TERM: Range<usize> = 53..61;
const L1_EPHEMERIS_TYPE: Range<usize> = 62..63;
const L1_ELEMENT_SET: Range<usize> = 64..68;

// Line 2 columns
const L2_SATELLITE: Range<usize> = 2..7;
const L2_INCLINATION: Range<usize> = 8..16;
const L2_RIGHT_ASCENSION: Range<usize> = 17..25;
const L2_ECCENTRICITY: Range<usize> = 26..33;
const L2_ARGUMENT_OF_PERIGEE: Range<usize> = 34..42;
const L2_MEAN_ANOMALY: Range<usize> = 43..51;
const L2_MEAN_MOTION: Range<usize> = 52..63;
const L2_REVOLUTIONS: Range<usize> = 63..68;

// ---------------------------------------------------------------------------
// Line 1
// ---------------------------------------------------------------------------

/// Typed contents of TLE line 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line1 {
    /// NORAD catalog number (1-99999)
    pub satellite_number: u32,
    /// Security classification, conventionally `U`, `C` or `S`
    pub classification: char,
    pub international_designator: InternationalDesignator,
    /// Calendar year, resolved from the 2-digit field
    pub epoch_year: u16,
    /// Fractional day of year, 1.0 = January 1st 00:00 UTC
    pub epoch_day: f64,
    /// First derivative of mean motion divided by two (rev/day²)
    pub mean_motion_dot: f64,
    /// Second derivative of mean motion divided by six (rev/day³)
    pub mean_motion_ddot: f64,
    /// BSTAR drag term (1/earth radii)
    pub drag_term: f64,
    pub ephemeris_type: u8,
    pub element_set_number: u16,
    /// Checksum digit as printed, not necessarily correct
    pub checksum: u8,
}

impl Line1 {
    /// The values exactly as they will be printed, i.e. after rounding every
    /// field to its column precision. The checksum is recomputed.
    pub fn normalized(&self) -> Result<Line1> {
        parse_line1(&format_line1(self)?)
    }
}

impl fmt::Display for Line1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match format_line1(self) {
            Ok(line) => f.write_str(&line),
            Err(e) => write!(f, "<unrenderable line 1: {e}>"),
        }
    }
}

/// Parse a 69-character line 1.
pub fn parse_line1(line: &str) -> Result<Line1> {
    check_line(1, line)?;
    parse_line1_fields(line).map_err(|source| reject(1, source))
}

fn parse_line1_fields(line: &str) -> Result<Line1> {
    check_line_number(line, b'1')?;
    Ok(Line1 {
        satellite_number: field::parse_satellite_number(&line[L1_SATELLITE])?,
        classification: field::parse_classification(&line[L1_CLASSIFICATION])?,
        international_designator: field::parse_international_designator(&line[L1_DESIGNATOR])?,
        epoch_year: field::parse_epoch_year(&line[L1_EPOCH_YEAR])?,
        epoch_day: field::parse_epoch_day(&line[L1_EPOCH_DAY])?,
        mean_motion_dot: field::parse_mean_motion_dot(&line[L1_MEAN_MOTION_DOT])?,
        mean_motion_ddot: exponent::decode_named(
            ExponentKind::MeanMotionDdot.field_name(),
            &line[L1_MEAN_MOTION_DDOT],
        )?,
        drag_term: exponent::decode_named(
            ExponentKind::DragTerm.field_name(),
            &line[L1_DRAG_TERM],
        )?,
        ephemeris_type: field::parse_ephemeris_type(&line[L1_EPHEMERIS_TYPE])?,
        element_set_number: field::parse_element_set_number(&line[L1_ELEMENT_SET])?,
        checksum: checksum::extract(line)?,
    })
}

/// Render line 1 with a freshly computed checksum. The stored checksum digit
/// is ignored.
pub fn format_line1(line: &Line1) -> Result<String> {
    let content = format!(
        "1 {}{} {} {}{} {} {} {} {} {}",
        field::format_satellite_number(line.satellite_number)?,
        field::format_classification(line.classification)?,
        field::format_international_designator(&line.international_designator),
        field::format_epoch_year(line.epoch_year)?,
        field::format_epoch_day(line.epoch_day)?,
        field::format_mean_motion_dot(line.mean_motion_dot)?,
        exponent::encode(line.mean_motion_ddot, ExponentKind::MeanMotionDdot)?,
        exponent::encode(line.drag_term, ExponentKind::DragTerm)?,
        field::format_ephemeris_type(line.ephemeris_type)?,
        field::format_element_set_number(line.element_set_number)?,
    );
    let rendered = checksum::append(&content)?;
    trace!(satellite = line.satellite_number, line = %rendered, "rendered line 1");
    Ok(rendered)
}

// ---------------------------------------------------------------------------
// Line 2
// ---------------------------------------------------------------------------

/// Typed contents of TLE line 2. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line2 {
    pub satellite_number: u32,
    pub inclination: f64,
    /// Right ascension of the ascending node
    pub right_ascension: f64,
    pub eccentricity: f64,
    pub argument_of_perigee: f64,
    pub mean_anomaly: f64,
    /// Revolutions per day
    pub mean_motion: f64,
    /// Revolution number at epoch
    pub revolutions: u32,
    pub checksum: u8,
}

impl Line2 {
    /// See [`Line1::normalized`].
    pub fn normalized(&self) -> Result<Line2> {
        parse_line2(&format_line2(self)?)
    }
}

impl fmt::Display for Line2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match format_line2(self) {
            Ok(line) => f.write_str(&line),
            Err(e) => write!(f, "<unrenderable line 2: {e}>"),
        }
    }
}

/// Parse a 69-character line 2.
pub fn parse_line2(line: &str) -> Result<Line2> {
    check_line(2, line)?;
    parse_line2_fields(line).map_err(|source| reject(2, source))
}

fn parse_line2_fields(line: &str) -> Result<Line2> {
    check_line_number(line, b'2')?;
    Ok(Line2 {
        satellite_number: field::parse_satellite_number(&line[L2_SATELLITE])?,
        inclination: field::parse_angle(AngleField::Inclination, &line[L2_INCLINATION])?,
        right_ascension: field::parse_angle(
            AngleField::RightAscension,
            &line[L2_RIGHT_ASCENSION],
        )?,
        eccentricity: field::parse_eccentricity(&line[L2_ECCENTRICITY])?,
        argument_of_perigee: field::parse_angle(
            AngleField::ArgumentOfPerigee,
            &line[L2_ARGUMENT_OF_PERIGEE],
        )?,
        mean_anomaly: field::parse_angle(AngleField::MeanAnomaly, &line[L2_MEAN_ANOMALY])?,
        mean_motion: field::parse_mean_motion(&line[L2_MEAN_MOTION])?,
        revolutions: field::parse_revolutions(&line[L2_REVOLUTIONS])?,
        checksum: checksum::extract(line)?,
    })
}

/// Render line 2 with a freshly computed checksum.
pub fn format_line2(line: &Line2) -> Result<String> {
    let content = format!(
        "2 {} {} {} {} {} {} {}{}",
        field::format_satellite_number(line.satellite_number)?,
        field::format_angle(AngleField::Inclination, line.inclination)?,
        field::format_angle(AngleField::RightAscension, line.right_ascension)?,
        field::format_eccentricity(line.eccentricity)?,
        field::format_angle(AngleField::ArgumentOfPerigee, line.argument_of_perigee)?,
        field::format_angle(AngleField::MeanAnomaly, line.mean_anomaly)?,
        field::format_mean_motion(line.mean_motion)?,
        field::format_revolutions(line.revolutions)?,
    );
    let rendered = checksum::append(&content)?;
    trace!(satellite = line.satellite_number, line = %rendered, "rendered line 2");
    Ok(rendered)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Length and character set. Everything after this may slice by byte index.
fn check_line(number: u8, line: &str) -> Result<()> {
    if line.len() != LINE_LENGTH {
        debug!(line = number, length = line.len(), "rejected TLE line: wrong length");
        return Err(TleError::InvalidLength {
            what: "line",
            expected: LINE_LENGTH,
            actual: line.len(),
        });
    }
    if !line.is_ascii() {
        return Err(reject(number, TleError::malformed("line", line)));
    }
    Ok(())
}

fn check_line_number(line: &str, expected: u8) -> Result<()> {
    if line.as_bytes()[0] != expected {
        return Err(TleError::malformed("line number", &line[..1]));
    }
    Ok(())
}

fn reject(number: u8, source: TleError) -> TleError {
    debug!(line = number, field = ?source.field(), error = %source, "rejected TLE line");
    TleError::MalformedLine {
        line: number,
        source: Box::new(source),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
