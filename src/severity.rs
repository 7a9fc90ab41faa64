//! Severity levels and the CVSS classifier.
//!
//! A CVSS score maps onto one of five [`Level`]s through a set of ascending
//! cut points ([`Thresholds`]). The `-1.0` sentinel (no CVSS assigned) and any
//! other negative score in range classify as [`Level::None`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lowest score the classifier accepts (the "no CVSS" sentinel).
pub const CVSS_MIN: f64 = -1.0;
/// Highest score the classifier accepts.
pub const CVSS_MAX: f64 = 10.0;
/// Score stored on findings that carry no CVSS.
pub const NO_CVSS: f64 = -1.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeverityError {
    #[error("CVSS score {0} is outside the range [-1.0, 10.0]")]
    OutOfRange(f64),

    #[error("Invalid severity thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Unknown severity level: {0}")]
    UnknownLevel(String),
}

/// Discrete severity level derived from a CVSS score.
///
/// Variants are declared from least to most severe so the derived `Ord`
/// matches severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Level {
    /// All levels in report order, most severe first.
    pub const ALL: [Level; 5] = [
        Level::Critical,
        Level::High,
        Level::Medium,
        Level::Low,
        Level::None,
    ];

    /// Number of levels.
    pub const COUNT: usize = 5;

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Critical => "critical",
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
            Level::None => "none",
        }
    }

    /// Position in a `[_; Level::COUNT]` array, least severe at 0.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Capitalized label used in table headers ("Critical", "None", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Level::Critical => "Critical",
            Level::High => "High",
            Level::Medium => "Medium",
            Level::Low => "Low",
            Level::None => "None",
        }
    }

    /// Terminal color for the level, as accepted by `colored`.
    pub fn color_name(&self) -> &'static str {
        match self {
            Level::Critical => "magenta",
            Level::High => "red",
            Level::Medium => "yellow",
            Level::Low => "green",
            Level::None => "blue",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Level {
    type Err = SeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" | "c" => Ok(Level::Critical),
            "high" | "h" => Ok(Level::High),
            "medium" | "m" => Ok(Level::Medium),
            "low" | "l" => Ok(Level::Low),
            "none" | "n" | "log" => Ok(Level::None),
            _ => Err(SeverityError::UnknownLevel(s.to_string())),
        }
    }
}

/// Ascending CVSS cut points separating `none/low/medium/high/critical`.
///
/// A score belongs to the highest level whose cut point is `<=` the score.
/// Defaults follow the CVSS v3 qualitative rating scale.
///
/// ```yaml
/// thresholds:
///   low: 0.1
///   medium: 4.0
///   high: 7.0
///   critical: 9.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: 0.1,
            medium: 4.0,
            high: 7.0,
            critical: 9.0,
        }
    }
}

impl Thresholds {
    /// Build thresholds from explicit cut points, rejecting unordered sets.
    pub fn new(low: f64, medium: f64, high: f64, critical: f64) -> Result<Self, SeverityError> {
        let thresholds = Self {
            low,
            medium,
            high,
            critical,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Cut points paired with their level, most severe first.
    fn cut_points(&self) -> [(f64, Level); 4] {
        [
            (self.critical, Level::Critical),
            (self.high, Level::High),
            (self.medium, Level::Medium),
            (self.low, Level::Low),
        ]
    }

    /// Check that cut points lie in `(0.0, 10.0]` and strictly ascend.
    pub fn validate(&self) -> Result<(), SeverityError> {
        let ascending = [self.low, self.medium, self.high, self.critical];

        if let Some(bad) = ascending
            .iter()
            .find(|v| !v.is_finite() || **v <= 0.0 || **v > CVSS_MAX)
        {
            return Err(SeverityError::InvalidThresholds(format!(
                "cut point {} is outside (0.0, 10.0]",
                bad
            )));
        }

        if ascending.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SeverityError::InvalidThresholds(format!(
                "cut points must strictly ascend (low {}, medium {}, high {}, critical {})",
                self.low, self.medium, self.high, self.critical
            )));
        }

        Ok(())
    }

    /// Map a CVSS score to its level.
    pub fn classify(&self, cvss: f64) -> Result<Level, SeverityError> {
        if !(CVSS_MIN..=CVSS_MAX).contains(&cvss) {
            return Err(SeverityError::OutOfRange(cvss));
        }

        if cvss < 0.0 {
            return Ok(Level::None);
        }

        Ok(self
            .cut_points()
            .into_iter()
            .find(|(cut, _)| cvss >= *cut)
            .map(|(_, level)| level)
            .unwrap_or(Level::None))
    }
}

/// Classify a score with the default thresholds.
pub fn classify(cvss: f64) -> Result<Level, SeverityError> {
    Thresholds::default().classify(cvss)
}

/// Fixed-size per-level counter.
///
/// Serializes as a map keyed by level name in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelCounts([usize; Level::COUNT]);

impl LevelCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, level: Level) -> usize {
        self.0[level.index()]
    }

    pub fn increment(&mut self, level: Level) {
        self.0[level.index()] += 1;
    }

    pub fn set(&mut self, level: Level, count: usize) {
        self.0[level.index()] = count;
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// `(level, count)` pairs, most severe first.
    pub fn iter(&self) -> impl Iterator<Item = (Level, usize)> + '_ {
        Level::ALL.into_iter().map(|level| (level, self.get(level)))
    }
}

impl std::ops::Index<Level> for LevelCounts {
    type Output = usize;

    fn index(&self, level: Level) -> &usize {
        &self.0[level.index()]
    }
}

impl Serialize for LevelCounts {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(Level::COUNT))?;
        for (level, count) in self.iter() {
            map.serialize_entry(level.as_str(), &count)?;
        }
        map.end()
    }
}
