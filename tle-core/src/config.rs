//! Parsing policy for TLE records.
//!
//! The library never reads files or the environment. Callers either build a
//! [`Config`] in code, embed it in their own serde configuration, or parse the
//! YAML-like text form:
//!
//! ```text
//! # tle-core configuration
//! checksum: enforce
//! title_max_len: 24
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{TleError, TITLE_MAX_LEN};

/// What to do when a line's printed checksum does not match its content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumPolicy {
    /// Accept the record and expose the result through the checksum getters.
    #[default]
    Report,
    /// Reject the record with `TleError::ChecksumMismatch`.
    Enforce,
}

impl ChecksumPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ChecksumPolicy::Report => "report",
            ChecksumPolicy::Enforce => "enforce",
        }
    }
}

impl FromStr for ChecksumPolicy {
    type Err = TleError;

    fn from_str(s: &str) -> Result<Self, TleError> {
        match s {
            "report" => Ok(ChecksumPolicy::Report),
            "enforce" => Ok(ChecksumPolicy::Enforce),
            other => Err(TleError::Config(format!(
                "unknown checksum policy {other:?} (expected report or enforce)"
            ))),
        }
    }
}

/// Record parsing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub checksum: ChecksumPolicy,
    /// Longest accepted title, in characters, after trimming.
    pub title_max_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            checksum: ChecksumPolicy::Report,
            title_max_len: TITLE_MAX_LEN,
        }
    }
}

impl Config {
    /// Default configuration with checksum enforcement turned on.
    pub fn strict() -> Self {
        Config {
            checksum: ChecksumPolicy::Enforce,
            ..Config::default()
        }
    }
}

/// Parse the `key: value` text form. Keys not present keep their defaults.
impl FromStr for Config {
    type Err = TleError;

    fn from_str(text: &str) -> Result<Self, TleError> {
        let mut config = Config::default();

        for (number, line) in text.lines().enumerate() {
            let stripped = line.trim();
            if stripped.is_empty() || stripped.starts_with('#') {
                continue;
            }

            let (key, val) = stripped.split_once(':').ok_or_else(|| {
                TleError::Config(format!("line {}: expected `key: value`", number + 1))
            })?;
            let val = strip_quotes(val.trim());

            match key.trim() {
                "checksum" => config.checksum = val.parse()?,
                "title_max_len" => {
                    config.title_max_len = val.parse().map_err(|_| {
                        TleError::Config(format!(
                            "line {}: title_max_len must be a non-negative integer, got {val:?}",
                            number + 1
                        ))
                    })?;
                }
                other => {
                    return Err(TleError::Config(format!(
                        "line {}: unknown key {other:?}",
                        number + 1
                    )))
                }
            }
        }

        Ok(config)
    }
}

fn strip_quotes(val: &str) -> &str {
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        return &val[1..val.len() - 1];
    }
    val
}

/// Render the text form accepted by `FromStr`.
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# tle-core configuration")?;
        writeln!(f)?;
        writeln!(f, "checksum: {}", self.checksum.as_str())?;
        writeln!(f, "title_max_len: {}", self.title_max_len)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.checksum, ChecksumPolicy::Report);
        assert_eq!(config.title_max_len, 24);
        assert_eq!(Config::strict().checksum, ChecksumPolicy::Enforce);
    }

    #[test]
    fn test_parse_config() {
        let text = r#"
# strict catalogue ingest
checksum: "enforce"

title_max_len: 30
"#;
        let config: Config = text.parse().unwrap();
        assert_eq!(config.checksum, ChecksumPolicy::Enforce);
        assert_eq!(config.title_max_len, 30);
    }

    #[test]
    fn test_parse_config_partial() {
        let config: Config = "checksum: report\n".parse().unwrap();
        assert_eq!(config, Config::default());
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_config_errors() {
        for text in [
            "checksum: maybe",
            "title_max_len: -1",
            "title_max_len: lots",
            "webhook: null",
            "checksum enforce",
        ] {
            assert!(
                matches!(text.parse::<Config>(), Err(TleError::Config(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_roundtrip() {
        let config = Config {
            checksum: ChecksumPolicy::Enforce,
            title_max_len: 40,
        };
        let text = config.to_string();
        assert!(text.contains("checksum: enforce"));
        let parsed: Config = text.parse().unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_serde_form() {
        let json = serde_json::to_string(&Config::strict()).unwrap();
        assert_eq!(json, r#"{"checksum":"enforce","title_max_len":24}"#);

        let parsed: Config = serde_json::from_str(r#"{"checksum":"report"}"#).unwrap();
        assert_eq!(parsed, Config::default());
        assert!(serde_json::from_str::<Config>(r#"{"checksum":"sometimes"}"#).is_err());
    }
}
