//! Modulo-10 line checksum.
//!
//! Every TLE line ends with a single digit: the sum of all digits in the first
//! 68 characters, with each minus sign counted as 1, modulo 10. Letters,
//! spaces, plus signs and decimal points contribute nothing.

use crate::types::{Result, TleError, CHECKSUM_INDEX, CONTENT_LENGTH, LINE_LENGTH};

// ---------------------------------------------------------------------------
// Character weight table (compile-time)
// ---------------------------------------------------------------------------

const fn build_weight_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut digit = 0;
    while digit < 10 {
        table[b'0' as usize + digit] = digit as u8;
        digit += 1;
    }
    table[b'-' as usize] = 1;
    table
}

static WEIGHTS: [u8; 256] = build_weight_table();

fn sum_weights(content: &[u8]) -> u8 {
    let sum: u32 = content.iter().map(|&b| WEIGHTS[b as usize] as u32).sum();
    (sum % 10) as u8
}

fn check_length(line: &str, expected: usize) -> Result<()> {
    if line.len() != expected {
        return Err(TleError::InvalidLength {
            what: "checksum input",
            expected,
            actual: line.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the checksum of the first 68 characters of a line.
pub fn compute(line68: &str) -> Result<u8> {
    check_length(line68, CONTENT_LENGTH)?;
    Ok(sum_weights(line68.as_bytes()))
}

/// True if the digit at index 68 matches the checksum of the preceding content.
///
/// A non-digit in the checksum column never verifies.
pub fn verify(line69: &str) -> Result<bool> {
    check_length(line69, LINE_LENGTH)?;
    let bytes = line69.as_bytes();
    let printed = bytes[CHECKSUM_INDEX];
    if !printed.is_ascii_digit() {
        return Ok(false);
    }
    Ok(sum_weights(&bytes[..CHECKSUM_INDEX]) == printed - b'0')
}

/// The checksum digit printed at index 68, without recomputing anything.
pub fn extract(line69: &str) -> Result<u8> {
    check_length(line69, LINE_LENGTH)?;
    let printed = line69.as_bytes()[CHECKSUM_INDEX];
    if !printed.is_ascii_digit() {
        return Err(TleError::malformed(
            "checksum",
            line69.get(CHECKSUM_INDEX..).unwrap_or_default(),
        ));
    }
    Ok(printed - b'0')
}

/// Append the computed checksum digit to 68 characters of line content.
pub fn append(line68: &str) -> Result<String> {
    let digit = compute(line68)?;
    let mut line = String::with_capacity(LINE_LENGTH);
    line.push_str(line68);
    line.push((b'0' + digit) as char);
    Ok(line)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
