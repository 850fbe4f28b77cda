//! Compressed scientific notation used by the drag term and the second
//! derivative of mean motion.
//!
//! Layout (8 columns): `[sign][5-digit mantissa][exponent sign][exponent digit]`
//! with an implied decimal point in front of the mantissa:
//!
//! - `" 21821-4"` → +0.21821 × 10⁻⁴
//! - `"-11606-4"` → −0.11606 × 10⁻⁴
//! - `"-33763+0"` → −0.33763
//!
//! Both signs are significant. A zero mantissa always decodes to `0.0`.

use serde::Serialize;

use crate::types::{Result, TleError};

/// Width of an exponential field.
pub const EXPONENT_WIDTH: usize = 8;

/// Which line 1 field an exponential value belongs to. The two fields use
/// different canonical spellings of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExponentKind {
    /// Second derivative of mean motion divided by six (columns 45-52).
    MeanMotionDdot,
    /// BSTAR drag term (columns 54-61).
    DragTerm,
}

impl ExponentKind {
    /// Field name used in error messages.
    pub fn field_name(self) -> &'static str {
        match self {
            ExponentKind::MeanMotionDdot => "mean motion second derivative",
            ExponentKind::DragTerm => "drag term",
        }
    }

    /// Canonical rendering of `0.0` for this field.
    pub fn zero(self) -> &'static str {
        match self {
            ExponentKind::MeanMotionDdot => " 00000-0",
            ExponentKind::DragTerm => " 00000+0",
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode an 8-character exponential field.
pub fn decode(field: &str) -> Result<f64> {
    decode_named("exponential value", field)
}

pub(crate) fn decode_named(name: &'static str, field: &str) -> Result<f64> {
    if field.len() != EXPONENT_WIDTH {
        return Err(TleError::InvalidLength {
            what: name,
            expected: EXPONENT_WIDTH,
            actual: field.len(),
        });
    }
    let malformed = || TleError::malformed(name, field);
    if !field.is_ascii() {
        return Err(malformed());
    }

    let bytes = field.as_bytes();
    let negative = match bytes[0] {
        b' ' | b'+' => false,
        b'-' => true,
        _ => return Err(malformed()),
    };
    let mantissa = &field[1..6];
    if !mantissa.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let exponent_sign = match bytes[6] {
        b'+' => "",
        b'-' => "-",
        _ => return Err(malformed()),
    };
    let exponent = bytes[7];
    if !exponent.is_ascii_digit() {
        return Err(malformed());
    }

    if mantissa == "00000" {
        return Ok(0.0);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}0.{mantissa}e{exponent_sign}{}", exponent as char)
        .parse::<f64>()
        .map_err(|_| malformed())
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a value into the 8-character exponential field of `kind`.
///
/// The mantissa is rounded to five significant digits. Values whose exponent
/// does not fit a single digit fail with [`TleError::MantissaOverflow`].
pub fn encode(value: f64, kind: ExponentKind) -> Result<String> {
    if !value.is_finite() {
        return Err(TleError::out_of_range(kind.field_name(), value));
    }
    if value == 0.0 {
        return Ok(kind.zero().to_string());
    }

    // `{:.4e}` rounds to five significant digits and carries into the exponent,
    // e.g. 9.99996e-5 -> "1.0000e-4".
    let scientific = format!("{:.4e}", value.abs());
    let (digits, exponent) = scientific
        .split_once('e')
        .ok_or(TleError::MantissaOverflow(value))?;
    let exponent: i32 = exponent
        .parse()
        .map_err(|_| TleError::MantissaOverflow(value))?;

    // d.dddd × 10^e == 0.ddddd × 10^(e+1)
    let power = exponent + 1;
    if !(-9..=9).contains(&power) {
        return Err(TleError::MantissaOverflow(value));
    }

    let mantissa: String = digits.chars().filter(|c| *c != '.').collect();
    let sign = if value < 0.0 { '-' } else { ' ' };
    let exponent_sign = if power < 0 { '-' } else { '+' };
    Ok(format!("{sign}{mantissa}{exponent_sign}{}", power.abs()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
