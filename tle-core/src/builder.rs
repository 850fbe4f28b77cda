//! Staged construction of a [`Tle`] from typed values.
//!
//! Required fields are entered in a fixed order, each step returning a builder
//! of the next stage type, so skipping or reordering a step does not compile:
//!
//! ```text
//! TleBuilder::new()                  NeedsSatellite
//!     .satellite_number(..)          NeedsDesignator
//!     .international_designator(..)  NeedsEpoch
//!     .epoch(..) / .epoch_at(..)     NeedsElements
//!     .orbital_elements(..)          NeedsRevolutions
//!     .revolutions(..)               Ready
//!     .build()
//! ```
//!
//! Optional fields (classification, derivatives of mean motion, drag term,
//! ephemeris type, element set number) can be set at any stage. Values are
//! validated in `build()`, which renders both lines and parses them back so
//! the record holds exactly what is printed.

use chrono::{DateTime, Utc};

use crate::config::{ChecksumPolicy, Config};
use crate::epoch;
use crate::line::{format_line1, format_line2, Line1, Line2};
use crate::record::Tle;
use crate::types::{InternationalDesignator, Result};

/// Line 2 orbital elements. Angles in degrees, mean motion in revolutions per day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub inclination: f64,
    pub right_ascension: f64,
    pub eccentricity: f64,
    pub argument_of_perigee: f64,
    pub mean_anomaly: f64,
    pub mean_motion: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EpochInput {
    YearDay(u16, f64),
    Instant(DateTime<Utc>),
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NeedsSatellite;

#[derive(Debug, Clone)]
pub struct NeedsDesignator {
    satellite_number: u32,
}

#[derive(Debug, Clone)]
pub struct NeedsEpoch {
    prev: NeedsDesignator,
    designator: InternationalDesignator,
}

#[derive(Debug, Clone)]
pub struct NeedsElements {
    prev: NeedsEpoch,
    epoch: EpochInput,
}

#[derive(Debug, Clone)]
pub struct NeedsRevolutions {
    prev: NeedsElements,
    elements: OrbitalElements,
}

#[derive(Debug, Clone)]
pub struct Ready {
    prev: NeedsRevolutions,
    revolutions: u32,
}

/// Fields with defaults.
#[derive(Debug, Clone)]
struct Optional {
    title: Option<String>,
    classification: char,
    mean_motion_dot: f64,
    mean_motion_ddot: f64,
    drag_term: f64,
    ephemeris_type: u8,
    element_set_number: u16,
}

impl Default for Optional {
    fn default() -> Self {
        Optional {
            title: None,
            classification: 'U',
            mean_motion_dot: 0.0,
            mean_motion_ddot: 0.0,
            drag_term: 0.0,
            ephemeris_type: 0,
            element_set_number: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Typestate builder for [`Tle`].
#[derive(Debug, Clone)]
pub struct TleBuilder<S> {
    optional: Optional,
    stage: S,
}

impl TleBuilder<NeedsSatellite> {
    /// Start an untitled record.
    pub fn new() -> Self {
        TleBuilder {
            optional: Optional::default(),
            stage: NeedsSatellite,
        }
    }

    /// Start a titled record. The title is trimmed and checked in `build()`.
    pub fn with_title(title: impl Into<String>) -> Self {
        let mut builder = TleBuilder::new();
        builder.optional.title = Some(title.into());
        builder
    }

    pub fn satellite_number(self, satellite_number: u32) -> TleBuilder<NeedsDesignator> {
        self.advance(|_| NeedsDesignator { satellite_number })
    }
}

impl Default for TleBuilder<NeedsSatellite> {
    fn default() -> Self {
        Self::new()
    }
}

impl TleBuilder<NeedsDesignator> {
    pub fn international_designator(
        self,
        designator: InternationalDesignator,
    ) -> TleBuilder<NeedsEpoch> {
        self.advance(|prev| NeedsEpoch { prev, designator })
    }
}

impl TleBuilder<NeedsEpoch> {
    /// Epoch as a calendar year (1970-2069) and fractional day of year.
    pub fn epoch(self, year: u16, day_of_year: f64) -> TleBuilder<NeedsElements> {
        self.with_epoch(EpochInput::YearDay(year, day_of_year))
    }

    /// Epoch as a UTC instant.
    pub fn epoch_at(self, instant: DateTime<Utc>) -> TleBuilder<NeedsElements> {
        self.with_epoch(EpochInput::Instant(instant))
    }

    fn with_epoch(self, epoch: EpochInput) -> TleBuilder<NeedsElements> {
        self.advance(|prev| NeedsElements { prev, epoch })
    }
}

impl TleBuilder<NeedsElements> {
    pub fn orbital_elements(self, elements: OrbitalElements) -> TleBuilder<NeedsRevolutions> {
        self.advance(|prev| NeedsRevolutions { prev, elements })
    }
}

impl TleBuilder<NeedsRevolutions> {
    /// Revolution number at epoch.
    pub fn revolutions(self, revolutions: u32) -> TleBuilder<Ready> {
        self.advance(|prev| Ready { prev, revolutions })
    }
}

impl<S> TleBuilder<S> {
    fn advance<T>(self, next: impl FnOnce(S) -> T) -> TleBuilder<T> {
        TleBuilder {
            optional: self.optional,
            stage: next(self.stage),
        }
    }

    /// Default `U`.
    pub fn classification(mut self, classification: char) -> Self {
        self.optional.classification = classification;
        self
    }

    pub fn mean_motion_dot(mut self, value: f64) -> Self {
        self.optional.mean_motion_dot = value;
        self
    }

    pub fn mean_motion_ddot(mut self, value: f64) -> Self {
        self.optional.mean_motion_ddot = value;
        self
    }

    /// BSTAR drag term.
    pub fn drag_term(mut self, value: f64) -> Self {
        self.optional.drag_term = value;
        self
    }

    pub fn ephemeris_type(mut self, ephemeris_type: u8) -> Self {
        self.optional.ephemeris_type = ephemeris_type;
        self
    }

    pub fn element_set_number(mut self, element_set_number: u16) -> Self {
        self.optional.element_set_number = element_set_number;
        self
    }
}

impl TleBuilder<Ready> {
    /// Render both lines with fresh checksums and produce the record.
    ///
    /// Fails with `ValueOutOfRange` or `MantissaOverflow` when a value does not
    /// fit its columns, and with `InvalidLength` for an over-long title.
    pub fn build(self) -> Result<Tle> {
        let Ready {
            prev:
                NeedsRevolutions {
                    prev:
                        NeedsElements {
                            prev:
                                NeedsEpoch {
                                    prev: NeedsDesignator { satellite_number },
                                    designator,
                                },
                            epoch,
                        },
                    elements,
                },
            revolutions,
        } = self.stage;
        let optional = self.optional;

        let (epoch_year, epoch_day) = match epoch {
            EpochInput::YearDay(year, day) => (year, day),
            EpochInput::Instant(instant) => epoch::year_and_day(instant)?,
        };

        let line1 = Line1 {
            satellite_number,
            classification: optional.classification,
            international_designator: designator,
            epoch_year,
            epoch_day,
            mean_motion_dot: optional.mean_motion_dot,
            mean_motion_ddot: optional.mean_motion_ddot,
            drag_term: optional.drag_term,
            ephemeris_type: optional.ephemeris_type,
            element_set_number: optional.element_set_number,
            checksum: 0,
        };
        let line2 = Line2 {
            satellite_number,
            inclination: elements.inclination,
            right_ascension: elements.right_ascension,
            eccentricity: elements.eccentricity,
            argument_of_perigee: elements.argument_of_perigee,
            mean_anomaly: elements.mean_anomaly,
            mean_motion: elements.mean_motion,
            revolutions,
            checksum: 0,
        };

        let text1 = format_line1(&line1)?;
        let text2 = format_line2(&line2)?;
        let config = Config {
            checksum: ChecksumPolicy::Enforce,
            ..Config::default()
        };
        Tle::parse_with_config(optional.title.as_deref(), &text1, &text2, &config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
