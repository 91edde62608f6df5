//! Indicator trend models

use serde::{Deserialize, Serialize};

/// Endpoint differences smaller than this are reported as stable
pub const STABLE_DEAD_BAND: f64 = 0.05;

/// Differences within this of the dead band count as reaching it, so that
/// decimal steps like 0.30 to 0.35 are not lost to binary rounding
const DEAD_BAND_TOLERANCE: f64 = 1e-9;

/// Qualitative direction of an indicator over the lookback window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Increasing => write!(f, "Increasing"),
            Trend::Decreasing => write!(f, "Decreasing"),
            Trend::Stable => write!(f, "Stable"),
        }
    }
}

/// Classify a chronological series by comparing its endpoints.
///
/// This is a two-point comparison, not a fitted slope: only the first and
/// last values matter.
pub fn classify_trend(values: &[f64]) -> Trend {
    let (Some(first), Some(last)) = (values.first(), values.last()) else {
        return Trend::Stable;
    };
    if values.len() < 2 {
        return Trend::Stable;
    }

    let diff = last - first;
    if diff.abs() < STABLE_DEAD_BAND - DEAD_BAND_TOLERANCE {
        Trend::Stable
    } else if diff > 0.0 {
        Trend::Increasing
    } else {
        Trend::Decreasing
    }
}

/// Trend label for each indicator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndicatorTrends {
    pub vegetation: Trend,
    pub water: Trend,
    pub soil_moisture: Trend,
    pub water_level: Trend,
}
