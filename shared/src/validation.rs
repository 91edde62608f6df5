//! Validation utilities for the Flood Risk Assessment Platform

use rust_decimal::Decimal;

use crate::models::{Indicator, RiskThresholds, RiskWeights};

/// Tolerance when checking that scoring weights sum to one
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

// ============================================================================
// Coordinate Validations
// ============================================================================

/// Validate latitude is within [-90, 90]
pub fn validate_latitude(latitude: Decimal) -> Result<(), &'static str> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    Ok(())
}

/// Validate longitude is within [-180, 180]
pub fn validate_longitude(longitude: Decimal) -> Result<(), &'static str> {
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

// ============================================================================
// Indicator Validations
// ============================================================================

/// Validate a raw indicator value against the indicator's physical range
pub fn validate_indicator_value(indicator: Indicator, value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("Indicator value must be a finite number");
    }
    let (min, max) = indicator.valid_range();
    if value < min || value > max {
        return Err(match indicator {
            Indicator::Ndvi => "NDVI must be between -1 and 1",
            Indicator::Ndwi => "NDWI must be between -1 and 1",
            Indicator::SoilMoisture => "Soil moisture must be between 0 and 1",
            Indicator::WaterLevel => "Water level cannot be negative",
        });
    }
    Ok(())
}

// ============================================================================
// Scoring Configuration Validations
// ============================================================================

/// Validate scoring weights are non-negative and sum to 1
pub fn validate_weights(weights: &RiskWeights) -> Result<(), &'static str> {
    let parts = [weights.vegetation, weights.water, weights.soil];
    if parts.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err("Risk weights must be non-negative numbers");
    }
    if (parts.iter().sum::<f64>() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err("Risk weights must sum to 1.0");
    }
    Ok(())
}

/// Validate classification thresholds are ordered within (0, 1)
pub fn validate_thresholds(thresholds: &RiskThresholds) -> Result<(), &'static str> {
    if !(thresholds.medium > 0.0 && thresholds.high < 1.0) {
        return Err("Risk thresholds must lie strictly between 0 and 1");
    }
    if thresholds.medium >= thresholds.high {
        return Err("Medium risk threshold must be below the high risk threshold");
    }
    Ok(())
}
