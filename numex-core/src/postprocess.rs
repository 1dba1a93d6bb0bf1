//! Dedupe, sort and filter
//!
//! All three take a slice and return a fresh `Vec`; the input is never reordered in place.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Ordering applied to an extracted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    Off,
    NumericAsc,
    NumericDesc,
    MagnitudeAsc,
    MagnitudeDesc,
}

impl SortMode {
    /// Modes offered when the user is asked to pick one (everything but `Off`).
    pub const CHOICES: [SortMode; 4] = [
        SortMode::NumericAsc,
        SortMode::NumericDesc,
        SortMode::MagnitudeAsc,
        SortMode::MagnitudeDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Off => "off",
            SortMode::NumericAsc => "numeric-asc",
            SortMode::NumericDesc => "numeric-desc",
            SortMode::MagnitudeAsc => "magnitude-asc",
            SortMode::MagnitudeDesc => "magnitude-desc",
        }
    }

    /// Human readable name, as shown in a picker.
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Off => "Off",
            SortMode::NumericAsc => "Numeric Ascending",
            SortMode::NumericDesc => "Numeric Descending",
            SortMode::MagnitudeAsc => "Magnitude Ascending",
            SortMode::MagnitudeDesc => "Magnitude Descending",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(SortMode::Off),
            "numeric-asc" => Ok(SortMode::NumericAsc),
            "numeric-desc" => Ok(SortMode::NumericDesc),
            "magnitude-asc" => Ok(SortMode::MagnitudeAsc),
            "magnitude-desc" => Ok(SortMode::MagnitudeDesc),
            other => Err(format!(
                "unknown sort mode '{}' (expected off, numeric-asc, numeric-desc, magnitude-asc or magnitude-desc)",
                other
            )),
        }
    }
}

/// Sort a copy of `numbers`. The sort is stable: equal keys keep their input order, so
/// `[-2, 2]` stays `[-2, 2]` under either magnitude mode.
pub fn sort_numbers(numbers: &[f64], mode: SortMode) -> Vec<f64> {
    let mut sorted = numbers.to_vec();
    let by = |a: f64, b: f64| a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal);
    match mode {
        SortMode::Off => {}
        SortMode::NumericAsc => sorted.sort_by(|a, b| by(*a, *b)),
        SortMode::NumericDesc => sorted.sort_by(|a, b| by(*b, *a)),
        SortMode::MagnitudeAsc => sorted.sort_by(|a, b| by(a.abs(), b.abs())),
        SortMode::MagnitudeDesc => sorted.sort_by(|a, b| by(b.abs(), a.abs())),
    }
    sorted
}

/// Hash key under which `0.0` and `-0.0` collide and every other value is its own bit pattern.
pub(crate) fn value_key(n: f64) -> u64 {
    if n == 0.0 {
        0
    } else {
        n.to_bits()
    }
}

/// Keep the first occurrence of every distinct value, in input order.
pub fn dedupe_numbers(numbers: &[f64]) -> Vec<f64> {
    let mut seen = HashSet::with_capacity(numbers.len());
    numbers
        .iter()
        .copied()
        .filter(|n| seen.insert(value_key(*n)))
        .collect()
}

/// Keep values within `[min, max]`; either bound may be absent.
pub fn filter_numbers(numbers: &[f64], min: Option<f64>, max: Option<f64>) -> Vec<f64> {
    numbers
        .iter()
        .copied()
        .filter(|n| min.map_or(true, |min| *n >= min) && max.map_or(true, |max| *n <= max))
        .collect()
}
