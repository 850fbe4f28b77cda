//! Shared types, error enum, and line layout constants for tle-core.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// All errors produced by tle-core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TleError {
    #[error("invalid {what} length: expected {expected}, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("malformed {field} field: {raw:?}")]
    MalformedField { field: &'static str, raw: String },
    #[error("{field} value out of range: {value}")]
    ValueOutOfRange { field: &'static str, value: String },
    #[error("cannot represent {0:e} with a 5-digit mantissa and 1-digit exponent")]
    MantissaOverflow(f64),
    #[error("satellite numbers do not match across lines: line 1={line1}, line 2={line2}")]
    InconsistentRecord { line1: u32, line2: u32 },
    #[error("checksum mismatch on line {line}: expected {expected}, computed {computed}")]
    ChecksumMismatch { line: u8, expected: u8, computed: u8 },
    #[error("malformed line {line}: {source}")]
    MalformedLine {
        line: u8,
        #[source]
        source: Box<TleError>,
    },
    #[error("config error: {0}")]
    Config(String),
}

impl TleError {
    pub(crate) fn malformed(field: &'static str, raw: &str) -> Self {
        TleError::MalformedField {
            field,
            raw: raw.to_string(),
        }
    }

    pub(crate) fn out_of_range(field: &'static str, value: impl fmt::Display) -> Self {
        TleError::ValueOutOfRange {
            field,
            value: value.to_string(),
        }
    }

    /// Name of the field that caused the error, looking through `MalformedLine`.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            TleError::MalformedField { field, .. } | TleError::ValueOutOfRange { field, .. } => {
                Some(*field)
            }
            TleError::MalformedLine { source, .. } => source.field(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TleError>;

// ---------------------------------------------------------------------------
// Line layout
// ---------------------------------------------------------------------------

/// Full length of line 1 and line 2, checksum digit included.
pub const LINE_LENGTH: usize = 69;

/// Number of characters covered by the checksum.
pub const CONTENT_LENGTH: usize = 68;

/// Index of the checksum digit.
pub const CHECKSUM_INDEX: usize = 68;

/// Longest title line accepted by default.
pub const TITLE_MAX_LEN: usize = 24;

// ---------------------------------------------------------------------------
// International designator
// ---------------------------------------------------------------------------

/// COSPAR international designator: launch year, launch number of the year,
/// and piece of the launch (e.g. `89016A`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InternationalDesignator {
    launch_year: u8,
    launch_number: u16,
    piece: String,
}

impl InternationalDesignator {
    /// Build a designator, rejecting values that do not fit the 8-column field.
    pub fn new(launch_year: u8, launch_number: u16, piece: &str) -> Result<Self> {
        if launch_year > 99 {
            return Err(TleError::out_of_range("launch year", launch_year));
        }
        if launch_number > 999 {
            return Err(TleError::out_of_range("launch number", launch_number));
        }
        if piece.is_empty() || piece.len() > 3 || !piece.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(TleError::out_of_range("launch piece", format!("{piece:?}")));
        }
        Ok(InternationalDesignator {
            launch_year,
            launch_number,
            piece: piece.to_string(),
        })
    }

    /// Last two digits of the launch year.
    pub fn launch_year(&self) -> u8 {
        self.launch_year
    }

    /// Launch number of the year.
    pub fn launch_number(&self) -> u16 {
        self.launch_number
    }

    /// Piece of the launch (`A`, `B`, ..., `ZZZ`).
    pub fn piece(&self) -> &str {
        &self.piece
    }
}

impl fmt::Display for InternationalDesignator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}{:03}{}",
            self.launch_year, self.launch_number, self.piece
        )
    }
}

/// Parses the compact form (`89016A`) as well as the space-padded column form
/// (`89016A  `). Up to two spaces may separate the launch number and the piece.
impl FromStr for InternationalDesignator {
    type Err = TleError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let malformed = || TleError::malformed("international designator", s);

        if s.len() < 6 || !s.is_ascii() {
            return Err(malformed());
        }
        let (digits, piece) = s.split_at(5);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let piece = piece.trim_start();
        if s.len() - 5 - piece.len() > 2 {
            return Err(malformed());
        }

        let launch_year = digits[..2].parse::<u8>().map_err(|_| malformed())?;
        let launch_number = digits[2..].parse::<u16>().map_err(|_| malformed())?;
        InternationalDesignator::new(launch_year, launch_number, piece).map_err(|_| malformed())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_designator_roundtrip() {
        let d: InternationalDesignator = "89016A".parse().unwrap();
        assert_eq!(d.launch_year(), 89);
        assert_eq!(d.launch_number(), 16);
        assert_eq!(d.piece(), "A");
        assert_eq!(d.to_string(), "89016A");
    }

    #[test]
    fn test_designator_padded_column_form() {
        let d: InternationalDesignator = "98067ABC".parse().unwrap();
        assert_eq!(d.piece(), "ABC");
        let d: InternationalDesignator = "00041B  ".parse().unwrap();
        assert_eq!(d.launch_year(), 0);
        assert_eq!(d.to_string(), "00041B");
    }

    #[test]
    fn test_designator_space_before_piece() {
        let d: InternationalDesignator = "63014 J".parse().unwrap();
        assert_eq!(d.piece(), "J");
        assert!("63014   J".parse::<InternationalDesignator>().is_err());
    }

    #[test]
    fn test_designator_rejects_garbage() {
        assert!("".parse::<InternationalDesignator>().is_err());
        assert!("89016".parse::<InternationalDesignator>().is_err());
        assert!("8901XA".parse::<InternationalDesignator>().is_err());
        assert!("89016ABCD".parse::<InternationalDesignator>().is_err());
        assert!("89016A-".parse::<InternationalDesignator>().is_err());
    }

    #[test]
    fn test_designator_new_range() {
        assert!(InternationalDesignator::new(100, 1, "A").is_err());
        assert!(InternationalDesignator::new(99, 1000, "A").is_err());
        assert!(InternationalDesignator::new(99, 999, "").is_err());
        assert!(InternationalDesignator::new(99, 999, "ZZZ").is_ok());
    }

    #[test]
    fn test_error_field_through_line() {
        let err = TleError::MalformedLine {
            line: 2,
            source: Box::new(TleError::malformed("eccentricity", "12 4567")),
        };
        assert_eq!(err.field(), Some("eccentricity"));
        assert_eq!(TleError::MantissaOverflow(1e-12).field(), None);
    }

    #[test]
    fn test_error_display() {
        let err = TleError::InvalidLength {
            what: "line",
            expected: 69,
            actual: 68,
        };
        assert_eq!(err.to_string(), "invalid line length: expected 69, got 68");
    }
}
