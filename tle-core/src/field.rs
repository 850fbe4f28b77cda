//! Column-exact parse/format routines for the individual TLE fields.
//!
//! Each `parse_*` takes the exact fixed-width substring of its columns and
//! each `format_*` renders a value back to that width. Parsing never repairs
//! input: anything that is not the documented shape is a
//! [`TleError::MalformedField`]. Formatting never clamps: values that do not
//! fit the field are a [`TleError::ValueOutOfRange`].
//!
//! Line-level code in [`crate::line`] is the normal entry point; these are
//! public for tooling that needs to handle an isolated field.

use serde::Serialize;

use crate::epoch;
use crate::types::{InternationalDesignator, Result, TleError};

// ---------------------------------------------------------------------------
// Field widths
// ---------------------------------------------------------------------------

pub const SATELLITE_NUMBER_WIDTH: usize = 5;
pub const DESIGNATOR_WIDTH: usize = 8;
pub const EPOCH_YEAR_WIDTH: usize = 2;
pub const EPOCH_DAY_WIDTH: usize = 12;
pub const MEAN_MOTION_DOT_WIDTH: usize = 10;
pub const ELEMENT_SET_WIDTH: usize = 4;
pub const ANGLE_WIDTH: usize = 8;
pub const ECCENTRICITY_WIDTH: usize = 7;
pub const MEAN_MOTION_WIDTH: usize = 11;
pub const REVOLUTIONS_WIDTH: usize = 5;

const ECCENTRICITY_SCALE: f64 = 1.0e7;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn expect_width(field: &'static str, raw: &str, width: usize) -> Result<()> {
    if raw.len() != width {
        return Err(TleError::InvalidLength {
            what: field,
            expected: width,
            actual: raw.len(),
        });
    }
    Ok(())
}

/// Right-justified unsigned integer: leading spaces, then at least one digit.
fn parse_padded_int(field: &'static str, raw: &str) -> Result<u32> {
    let digits = raw.trim_start_matches(' ');
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TleError::malformed(field, raw));
    }
    digits
        .parse::<u32>()
        .map_err(|_| TleError::malformed(field, raw))
}

/// Plain decimal without exponent: leading spaces, optional sign when
/// `signed`, digits with at most one decimal point. `.5` and `5.` are accepted.
fn parse_decimal(field: &'static str, raw: &str, signed: bool) -> Result<f64> {
    let malformed = || TleError::malformed(field, raw);
    let text = raw.trim_start_matches(' ');

    let (sign, body) = match text.as_bytes().first() {
        Some(b'-') if signed => ("-", &text[1..]),
        Some(b'+') if signed => ("", &text[1..]),
        _ => ("", text),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(malformed());
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(malformed());
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let frac_part = if frac_part.is_empty() { "0" } else { frac_part };
    format!("{sign}{int_part}.{frac_part}")
        .parse::<f64>()
        .map_err(|_| malformed())
}

/// Reject non-finite values and values outside `min..=max`. Folds `-0.0`
/// into `0.0` so it never prints with a sign.
fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if !value.is_finite() || value < min || value > max {
        return Err(TleError::out_of_range(field, value));
    }
    Ok(value + 0.0)
}

// ---------------------------------------------------------------------------
// Line 1 fields
// ---------------------------------------------------------------------------

/// Columns 3-7 (both lines): NORAD catalog number, 1-99999.
pub fn parse_satellite_number(raw: &str) -> Result<u32> {
    const FIELD: &str = "satellite number";
    expect_width(FIELD, raw, SATELLITE_NUMBER_WIDTH)?;
    let number = parse_padded_int(FIELD, raw)?;
    if number == 0 {
        return Err(TleError::malformed(FIELD, raw));
    }
    Ok(number)
}

pub fn format_satellite_number(number: u32) -> Result<String> {
    if !(1..=99_999).contains(&number) {
        return Err(TleError::out_of_range("satellite number", number));
    }
    Ok(format!("{number:>5}"))
}

/// Column 8: classification. Any printable non-space ASCII character.
pub fn parse_classification(raw: &str) -> Result<char> {
    const FIELD: &str = "classification";
    expect_width(FIELD, raw, 1)?;
    match raw.as_bytes()[0] {
        b if b.is_ascii_graphic() => Ok(b as char),
        _ => Err(TleError::malformed(FIELD, raw)),
    }
}

pub fn format_classification(classification: char) -> Result<String> {
    if !classification.is_ascii_graphic() {
        return Err(TleError::out_of_range(
            "classification",
            format!("{classification:?}"),
        ));
    }
    Ok(classification.to_string())
}

/// Columns 10-17: launch year (2), launch number (3), piece (3, left-justified).
pub fn parse_international_designator(raw: &str) -> Result<InternationalDesignator> {
    const FIELD: &str = "international designator";
    expect_width(FIELD, raw, DESIGNATOR_WIDTH)?;
    if !raw.is_ascii() {
        return Err(TleError::malformed(FIELD, raw));
    }

    let (year, rest) = raw.split_at(2);
    let (number, piece) = rest.split_at(3);
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(year) || !all_digits(number) {
        return Err(TleError::malformed(FIELD, raw));
    }

    let piece = piece.trim_end_matches(' ');
    let launch_year = year
        .parse::<u8>()
        .map_err(|_| TleError::malformed(FIELD, raw))?;
    let launch_number = number
        .parse::<u16>()
        .map_err(|_| TleError::malformed(FIELD, raw))?;
    InternationalDesignator::new(launch_year, launch_number, piece)
        .map_err(|_| TleError::malformed(FIELD, raw))
}

pub fn format_international_designator(designator: &InternationalDesignator) -> String {
    format!(
        "{:02}{:03}{:<3}",
        designator.launch_year(),
        designator.launch_number(),
        designator.piece()
    )
}

/// Columns 19-20: 2-digit epoch year, resolved to a calendar year.
pub fn parse_epoch_year(raw: &str) -> Result<u16> {
    const FIELD: &str = "epoch year";
    expect_width(FIELD, raw, EPOCH_YEAR_WIDTH)?;
    let yy = parse_padded_int(FIELD, raw)?;
    Ok(epoch::resolve_year(yy as u8))
}

pub fn format_epoch_year(year: u16) -> Result<String> {
    Ok(format!("{:02}", epoch::two_digit_year(year)?))
}

/// Columns 21-32: fractional day of year, 0-366.
pub fn parse_epoch_day(raw: &str) -> Result<f64> {
    const FIELD: &str = "epoch day";
    expect_width(FIELD, raw, EPOCH_DAY_WIDTH)?;
    let day = parse_decimal(FIELD, raw, false)?;
    if day > 366.0 {
        return Err(TleError::malformed(FIELD, raw));
    }
    Ok(day)
}

pub fn format_epoch_day(day: f64) -> Result<String> {
    let day = check_range("epoch day", day, 0.0, 366.0)?;
    Ok(format!("{day:012.8}"))
}

/// Columns 34-43: first derivative of mean motion divided by two.
pub fn parse_mean_motion_dot(raw: &str) -> Result<f64> {
    const FIELD: &str = "mean motion first derivative";
    expect_width(FIELD, raw, MEAN_MOTION_DOT_WIDTH)?;
    let value = parse_decimal(FIELD, raw, true)?;
    if value.abs() >= 1.0 {
        return Err(TleError::malformed(FIELD, raw));
    }
    Ok(value)
}

/// Rendered as a sign column (space or `-`) followed by `.DDDDDDDD`.
pub fn format_mean_motion_dot(value: f64) -> Result<String> {
    const FIELD: &str = "mean motion first derivative";
    if !value.is_finite() {
        return Err(TleError::out_of_range(FIELD, value));
    }
    let digits = format!("{:.8}", value.abs());
    let Some(fraction) = digits.strip_prefix('0') else {
        return Err(TleError::out_of_range(FIELD, value));
    };
    let sign = if value < 0.0 && digits != "0.00000000" {
        '-'
    } else {
        ' '
    };
    Ok(format!("{sign}{fraction}"))
}

/// Column 63: ephemeris type, a single digit.
pub fn parse_ephemeris_type(raw: &str) -> Result<u8> {
    const FIELD: &str = "ephemeris type";
    expect_width(FIELD, raw, 1)?;
    match raw.as_bytes()[0] {
        b @ b'0'..=b'9' => Ok(b - b'0'),
        _ => Err(TleError::malformed(FIELD, raw)),
    }
}

pub fn format_ephemeris_type(ephemeris_type: u8) -> Result<String> {
    if ephemeris_type > 9 {
        return Err(TleError::out_of_range("ephemeris type", ephemeris_type));
    }
    Ok(ephemeris_type.to_string())
}

/// Columns 65-68: element set number, 0-9999.
pub fn parse_element_set_number(raw: &str) -> Result<u16> {
    const FIELD: &str = "element set number";
    expect_width(FIELD, raw, ELEMENT_SET_WIDTH)?;
    Ok(parse_padded_int(FIELD, raw)? as u16)
}

pub fn format_element_set_number(number: u16) -> Result<String> {
    if number > 9999 {
        return Err(TleError::out_of_range("element set number", number));
    }
    Ok(format!("{number:>4}"))
}

// ---------------------------------------------------------------------------
// Line 2 fields
// ---------------------------------------------------------------------------

/// The four 8-column angle fields of line 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AngleField {
    Inclination,
    RightAscension,
    ArgumentOfPerigee,
    MeanAnomaly,
}

impl AngleField {
    pub fn name(self) -> &'static str {
        match self {
            AngleField::Inclination => "inclination",
            AngleField::RightAscension => "right ascension of ascending node",
            AngleField::ArgumentOfPerigee => "argument of perigee",
            AngleField::MeanAnomaly => "mean anomaly",
        }
    }

    /// Largest legal value in degrees.
    pub fn max_degrees(self) -> f64 {
        match self {
            AngleField::Inclination => 180.0,
            _ => 360.0,
        }
    }
}

/// Unsigned angle in degrees, `DDD.DDDD`.
pub fn parse_angle(angle: AngleField, raw: &str) -> Result<f64> {
    expect_width(angle.name(), raw, ANGLE_WIDTH)?;
    let degrees = parse_decimal(angle.name(), raw, false)?;
    if degrees > angle.max_degrees() {
        return Err(TleError::malformed(angle.name(), raw));
    }
    Ok(degrees)
}

/// The integer part is space-padded, as distributed by NORAD (`" 75.0338"`).
pub fn format_angle(angle: AngleField, degrees: f64) -> Result<String> {
    let degrees = check_range(angle.name(), degrees, 0.0, angle.max_degrees())?;
    Ok(format!("{degrees:8.4}"))
}

/// Columns 27-33: eccentricity as seven digits with an implied leading `0.`.
pub fn parse_eccentricity(raw: &str) -> Result<f64> {
    const FIELD: &str = "eccentricity";
    expect_width(FIELD, raw, ECCENTRICITY_WIDTH)?;
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TleError::malformed(FIELD, raw));
    }
    let scaled = raw
        .parse::<u32>()
        .map_err(|_| TleError::malformed(FIELD, raw))?;
    Ok(scaled as f64 / ECCENTRICITY_SCALE)
}

pub fn format_eccentricity(eccentricity: f64) -> Result<String> {
    const FIELD: &str = "eccentricity";
    let eccentricity = check_range(FIELD, eccentricity, 0.0, 1.0)?;
    let scaled = (eccentricity * ECCENTRICITY_SCALE).round();
    if scaled >= ECCENTRICITY_SCALE {
        return Err(TleError::out_of_range(FIELD, eccentricity));
    }
    Ok(format!("{:07}", scaled as u32))
}

/// Columns 53-63: mean motion in revolutions per day, below 100.
pub fn parse_mean_motion(raw: &str) -> Result<f64> {
    const FIELD: &str = "mean motion";
    expect_width(FIELD, raw, MEAN_MOTION_WIDTH)?;
    let revs = parse_decimal(FIELD, raw, false)?;
    if revs >= 100.0 {
        return Err(TleError::malformed(FIELD, raw));
    }
    Ok(revs)
}

/// `DD.DDDDDDDD`, with a leading zero shown as a space (`" 1.29841762"`).
pub fn format_mean_motion(revs_per_day: f64) -> Result<String> {
    const FIELD: &str = "mean motion";
    let revs = check_range(FIELD, revs_per_day, 0.0, 100.0)?;
    let text = format!("{revs:011.8}");
    if text.len() != MEAN_MOTION_WIDTH {
        return Err(TleError::out_of_range(FIELD, revs_per_day));
    }
    match text.strip_prefix('0') {
        Some(rest) => Ok(format!(" {rest}")),
        None => Ok(text),
    }
}

/// Columns 64-68: revolution number at epoch, 0-99999.
pub fn parse_revolutions(raw: &str) -> Result<u32> {
    const FIELD: &str = "revolution number";
    expect_width(FIELD, raw, REVOLUTIONS_WIDTH)?;
    parse_padded_int(FIELD, raw)
}

pub fn format_revolutions(revolutions: u32) -> Result<String> {
    if revolutions > 99_999 {
        return Err(TleError::out_of_range("revolution number", revolutions));
    }
    Ok(format!("{revolutions:>5}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn is_malformed<T: std::fmt::Debug>(result: Result<T>) -> bool {
        matches!(result, Err(TleError::MalformedField { .. }))
    }

    fn is_out_of_range<T: std::fmt::Debug>(result: Result<T>) -> bool {
        matches!(result, Err(TleError::ValueOutOfRange { .. }))
    }

    #[test]
    fn test_satellite_number() {
        assert_eq!(parse_satellite_number("19822").unwrap(), 19822);
        assert_eq!(parse_satellite_number(" 2359").unwrap(), 2359);
        assert_eq!(parse_satellite_number("02359").unwrap(), 2359);
        assert_eq!(format_satellite_number(2359).unwrap(), " 2359");
        assert_eq!(format_satellite_number(99_999).unwrap(), "99999");
    }

    #[test]
    fn test_satellite_number_rejects() {
        assert!(is_malformed(parse_satellite_number("00000")));
        assert!(is_malformed(parse_satellite_number("     ")));
        assert!(is_malformed(parse_satellite_number("2359 ")));
        assert!(is_malformed(parse_satellite_number("A2359")));
        assert!(matches!(
            parse_satellite_number("2359"),
            Err(TleError::InvalidLength { expected: 5, actual: 4, .. })
        ));
        assert!(is_out_of_range(format_satellite_number(100_000)));
        assert!(is_out_of_range(format_satellite_number(0)));
    }

    #[test]
    fn test_classification() {
        assert_eq!(parse_classification("C").unwrap(), 'C');
        assert_eq!(parse_classification("X").unwrap(), 'X');
        assert!(is_malformed(parse_classification(" ")));
        assert_eq!(format_classification('S').unwrap(), "S");
        assert!(is_out_of_range(format_classification(' ')));
        assert!(is_out_of_range(format_classification('é')));
    }

    #[test]
    fn test_international_designator() {
        let d = parse_international_designator("89016A  ").unwrap();
        assert_eq!(d.to_string(), "89016A");
        assert_eq!(format_international_designator(&d), "89016A  ");

        let d = parse_international_designator("98067ABC").unwrap();
        assert_eq!(format_international_designator(&d), "98067ABC");
    }

    #[test]
    fn test_international_designator_rejects() {
        assert!(is_malformed(parse_international_designator("        ")));
        assert!(is_malformed(parse_international_designator("89016   ")));
        assert!(is_malformed(parse_international_designator("89 16A  ")));
        assert!(is_malformed(parse_international_designator("89016 A ")));
        assert!(is_malformed(parse_international_designator("89016A-B")));
    }

    #[test]
    fn test_epoch_year() {
        assert_eq!(parse_epoch_year("16").unwrap(), 2016);
        assert_eq!(parse_epoch_year("70").unwrap(), 1970);
        assert_eq!(parse_epoch_year("69").unwrap(), 2069);
        assert!(is_malformed(parse_epoch_year("1x")));
        assert_eq!(format_epoch_year(2005).unwrap(), "05");
        assert_eq!(format_epoch_year(1989).unwrap(), "89");
        assert!(is_out_of_range(format_epoch_year(2070)));
    }

    #[test]
    fn test_epoch_day() {
        assert_relative_eq!(parse_epoch_day("330.54185827").unwrap(), 330.54185827);
        assert_relative_eq!(parse_epoch_day("001.50000000").unwrap(), 1.5);
        assert_relative_eq!(parse_epoch_day("  1.50000000").unwrap(), 1.5);
        assert_eq!(format_epoch_day(330.54185827).unwrap(), "330.54185827");
        assert_eq!(format_epoch_day(1.5).unwrap(), "001.50000000");
        assert_eq!(format_epoch_day(-0.0).unwrap(), "000.00000000");
    }

    #[test]
    fn test_epoch_day_rejects() {
        assert!(is_malformed(parse_epoch_day("367.00000000")));
        assert!(is_malformed(parse_epoch_day("330.5418582X")));
        assert!(is_malformed(parse_epoch_day("-30.54185827")));
        assert!(is_malformed(parse_epoch_day("3.30541e+002")));
        assert!(is_out_of_range(format_epoch_day(366.5)));
        assert!(is_out_of_range(format_epoch_day(f64::NAN)));
    }

    #[test]
    fn test_mean_motion_dot() {
        assert_relative_eq!(parse_mean_motion_dot(" .00020730").unwrap(), 0.0002073);
        assert_relative_eq!(parse_mean_motion_dot("-.00000380").unwrap(), -0.0000038);
        assert_relative_eq!(parse_mean_motion_dot("+.00000380").unwrap(), 0.0000038);
        assert_eq!(format_mean_motion_dot(0.0002073).unwrap(), " .00020730");
        assert_eq!(format_mean_motion_dot(-0.0000038).unwrap(), "-.00000380");
        assert_eq!(format_mean_motion_dot(0.0).unwrap(), " .00000000");
    }

    #[test]
    fn test_mean_motion_dot_rejects() {
        assert!(is_malformed(parse_mean_motion_dot(" 1.0000000")));
        assert!(is_malformed(parse_mean_motion_dot(" .0002-073")));
        assert!(is_malformed(parse_mean_motion_dot("          ")));
        assert!(is_out_of_range(format_mean_motion_dot(1.0)));
        assert!(is_out_of_range(format_mean_motion_dot(-0.999999999)));
        // Rounds to zero: no stray minus sign
        assert_eq!(format_mean_motion_dot(-1.0e-12).unwrap(), " .00000000");
    }

    #[test]
    fn test_ephemeris_type() {
        assert_eq!(parse_ephemeris_type("0").unwrap(), 0);
        assert_eq!(parse_ephemeris_type("4").unwrap(), 4);
        assert!(is_malformed(parse_ephemeris_type(" ")));
        assert_eq!(format_ephemeris_type(2).unwrap(), "2");
        assert!(is_out_of_range(format_ephemeris_type(10)));
    }

    #[test]
    fn test_element_set_number() {
        assert_eq!(parse_element_set_number(" 999").unwrap(), 999);
        assert_eq!(parse_element_set_number("9999").unwrap(), 9999);
        assert_eq!(format_element_set_number(999).unwrap(), " 999");
        assert_eq!(format_element_set_number(0).unwrap(), "   0");
        assert!(is_out_of_range(format_element_set_number(10_000)));
    }

    #[test]
    fn test_angles() {
        assert_relative_eq!(
            parse_angle(AngleField::Inclination, " 75.0338").unwrap(),
            75.0338
        );
        assert_relative_eq!(
            parse_angle(AngleField::Inclination, "087.1923").unwrap(),
            87.1923
        );
        assert_relative_eq!(
            parse_angle(AngleField::MeanAnomaly, "  2.5535").unwrap(),
            2.5535
        );
        assert_eq!(
            format_angle(AngleField::Inclination, 75.0338).unwrap(),
            " 75.0338"
        );
        assert_eq!(
            format_angle(AngleField::MeanAnomaly, 2.5535).unwrap(),
            "  2.5535"
        );
        assert_eq!(
            format_angle(AngleField::RightAscension, 360.0).unwrap(),
            "360.0000"
        );
    }

    #[test]
    fn test_angle_ranges() {
        assert!(is_malformed(parse_angle(AngleField::Inclination, "180.0001")));
        assert_relative_eq!(
            parse_angle(AngleField::RightAscension, "180.0001").unwrap(),
            180.0001
        );
        assert!(is_malformed(parse_angle(
            AngleField::ArgumentOfPerigee,
            "360.0001"
        )));
        assert!(is_out_of_range(format_angle(AngleField::Inclination, 180.5)));
        assert!(is_out_of_range(format_angle(AngleField::MeanAnomaly, -1.0)));
        assert_eq!(
            format_angle(AngleField::MeanAnomaly, -0.0).unwrap(),
            "  0.0000"
        );
    }

    #[test]
    fn test_eccentricity() {
        assert_relative_eq!(parse_eccentricity("1946869").unwrap(), 0.1946869);
        assert_relative_eq!(parse_eccentricity("0002921").unwrap(), 0.0002921);
        assert_eq!(format_eccentricity(0.1946869).unwrap(), "1946869");
        assert_eq!(format_eccentricity(0.0002921).unwrap(), "0002921");
        assert_eq!(format_eccentricity(0.0).unwrap(), "0000000");
    }

    #[test]
    fn test_eccentricity_rejects() {
        assert!(is_malformed(parse_eccentricity(" 002921")));
        assert!(is_malformed(parse_eccentricity(".002921")));
        assert!(is_out_of_range(format_eccentricity(1.0)));
        assert!(is_out_of_range(format_eccentricity(0.99999999)));
        assert!(is_out_of_range(format_eccentricity(-0.1)));
    }

    #[test]
    fn test_mean_motion() {
        assert_relative_eq!(parse_mean_motion("11.60242208").unwrap(), 11.60242208);
        assert_relative_eq!(parse_mean_motion(" 1.29841762").unwrap(), 1.29841762);
        assert_relative_eq!(parse_mean_motion("08.68874989").unwrap(), 8.68874989);
        assert_eq!(format_mean_motion(11.60242208).unwrap(), "11.60242208");
        assert_eq!(format_mean_motion(1.29841762).unwrap(), " 1.29841762");
    }

    #[test]
    fn test_mean_motion_rejects() {
        assert!(is_malformed(parse_mean_motion("100.0000000")));
        assert!(is_malformed(parse_mean_motion("11.6024220 ")));
        assert!(is_out_of_range(format_mean_motion(100.0)));
        assert!(is_out_of_range(format_mean_motion(99.999999999)));
        assert!(is_out_of_range(format_mean_motion(-1.0)));
    }

    #[test]
    fn test_revolutions() {
        assert_eq!(parse_revolutions("88555").unwrap(), 88555);
        assert_eq!(parse_revolutions(" 9952").unwrap(), 9952);
        assert_eq!(format_revolutions(9952).unwrap(), " 9952");
        assert_eq!(format_revolutions(0).unwrap(), "    0");
        assert!(is_out_of_range(format_revolutions(100_000)));
    }
}
