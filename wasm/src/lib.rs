//! WebAssembly module for the Flood Risk Assessment Platform
//!
//! Provides client-side computation for:
//! - Flood risk scoring from indicator values
//! - Risk level and trend classification
//! - Coordinate validation before a request is sent

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str(concat!(
        "flood-risk-wasm ",
        env!("CARGO_PKG_VERSION")
    )));
}

/// Score a set of indicator values with the canonical model, as JSON
#[wasm_bindgen]
pub fn calculate_flood_risk(
    ndvi: Option<f64>,
    ndwi: Option<f64>,
    soil_moisture: Option<f64>,
) -> Result<String, JsValue> {
    let assessment = score_indicators(ndvi, ndwi, soil_moisture);
    serde_json::to_string(&assessment)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize assessment: {}", e)))
}

fn score_indicators(
    ndvi: Option<f64>,
    ndwi: Option<f64>,
    soil_moisture: Option<f64>,
) -> RiskAssessment {
    // Non-finite input from the page is treated as missing
    let reading = IndicatorReading {
        ndvi: ndvi.filter(|v| v.is_finite()),
        ndwi: ndwi.filter(|v| v.is_finite()),
        soil_moisture: soil_moisture.filter(|v| v.is_finite()),
        water_level: None,
    };
    ScoringModel::default().assess(&reading)
}

/// Classify a composite score with the canonical thresholds
#[wasm_bindgen]
pub fn classify_risk_score(score: f64) -> String {
    ScoringModel::default().classify(score).to_string()
}

/// Classify a chronological series by its endpoints
#[wasm_bindgen]
pub fn classify_indicator_trend(values: &[f64]) -> String {
    classify_trend(values).to_string()
}

/// Validate a coordinate pair
#[wasm_bindgen]
pub fn validate_coordinates(latitude: f64, longitude: f64) -> bool {
    Location::from_degrees(latitude, longitude).is_ok()
}

/// Vegetation contribution for an NDVI value
#[wasm_bindgen]
pub fn ndvi_risk_contribution(ndvi: f64) -> f64 {
    vegetation_contribution(ndvi)
}

/// Water contribution for an NDWI value
#[wasm_bindgen]
pub fn ndwi_risk_contribution(ndwi: f64) -> f64 {
    water_contribution(ndwi)
}

/// Soil contribution for a volumetric soil moisture fraction
#[wasm_bindgen]
pub fn soil_moisture_risk_contribution(soil_moisture: f64) -> f64 {
    soil_contribution(soil_moisture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_indicators() {
        let assessment = score_indicators(Some(-0.4), Some(0.6), Some(0.95));
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.confidence, 83.0);

        let unknown = score_indicators(None, Some(f64::NAN), None);
        assert_eq!(unknown.risk_level, RiskLevel::Unknown);
        assert_eq!(unknown.confidence, 0.0);
    }

    #[test]
    fn test_classify_risk_score() {
        assert_eq!(classify_risk_score(0.71), "HIGH");
        assert_eq!(classify_risk_score(0.7), "MEDIUM");
        assert_eq!(classify_risk_score(0.4), "LOW");
    }

    #[test]
    fn test_classify_indicator_trend() {
        assert_eq!(classify_indicator_trend(&[0.1, 0.3, 0.2]), "Increasing");
        assert_eq!(classify_indicator_trend(&[0.5]), "Stable");
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(-90.0, 180.0));
        assert!(!validate_coordinates(90.5, 0.0));
        assert!(!validate_coordinates(f64::NAN, 0.0));
    }

    #[test]
    fn test_contributions() {
        assert!((ndvi_risk_contribution(1.0) - 0.0).abs() < 1e-9);
        assert!((ndwi_risk_contribution(1.0) - 1.0).abs() < 1e-9);
        assert!((soil_moisture_risk_contribution(1.4) - 1.0).abs() < 1e-9);
    }
}
