//! tle-core: NORAD Two-Line Element set codec.
//!
//! Parses 69-column TLE lines into typed orbital elements, renders typed values
//! back to byte-exact lines, and computes the modulo-10 line checksum. No I/O,
//! no propagation: just the format.
//!
//! ```text
//! AKEBONO (EXOS-D)
//! 1 19822C 89016A   16330.54185827  .00020730 -54173-7  42980-3 0  9995
//! 2 19822  75.0338 162.9721 1946869 124.1907 255.9297 11.60242208885551
//! ```

pub mod builder;
pub mod checksum;
pub mod config;
pub mod epoch;
pub mod exponent;
pub mod field;
pub mod line;
pub mod record;
pub mod types;

// Re-export commonly used types at crate root
pub use builder::{OrbitalElements, TleBuilder};
pub use config::{ChecksumPolicy, Config};
pub use exponent::ExponentKind;
pub use line::{format_line1, format_line2, parse_line1, parse_line2, Line1, Line2};
pub use record::{parse_catalog, Tle};
pub use types::*;
