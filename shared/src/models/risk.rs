//! Flood risk scoring models

use serde::{Deserialize, Serialize};

use super::indicator::{Indicator, IndicatorReading};

/// Vegetation contribution of a raw NDVI of 0
pub const NEUTRAL_VEGETATION: f64 = 0.5;
/// Water contribution of a raw NDWI of 0
pub const NEUTRAL_WATER: f64 = 0.5;
/// Soil contribution of a raw soil moisture of 0
pub const NEUTRAL_SOIL: f64 = 0.0;

/// Discrete flood risk level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// No indicator data was available; not a low-risk judgment
    Unknown,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Weights of each contribution in the composite score; must sum to 1
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskWeights {
    pub vegetation: f64,
    pub water: f64,
    pub soil: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            vegetation: 0.3,
            water: 0.3,
            soil: 0.4,
        }
    }
}

/// Score thresholds; both comparisons are strict (`score > threshold`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 0.7,
            medium: 0.4,
        }
    }
}

/// How partially missing scoring inputs affect the result
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingIndicatorPolicy {
    /// Missing contributions take their neutral value; confidence is untouched
    #[default]
    Neutral,
    /// As `Neutral`, but confidence is scaled by the share of known inputs
    DiscountConfidence,
}

/// Indicator values remapped to [0, 1], higher meaning higher flood risk
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Contributions {
    pub vegetation: Option<f64>,
    pub water: Option<f64>,
    pub soil: Option<f64>,
}

impl Contributions {
    pub fn known_count(&self) -> usize {
        [self.vegetation, self.water, self.soil]
            .iter()
            .filter(|c| c.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.known_count() == 0
    }
}

/// Lower vegetation means higher risk
pub fn vegetation_contribution(ndvi: f64) -> f64 {
    (1.0 - (ndvi + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Higher water content means higher risk
pub fn water_contribution(ndwi: f64) -> f64 {
    ((ndwi + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Soil moisture is already a [0, 1] wetness fraction
pub fn soil_contribution(soil_moisture: f64) -> f64 {
    soil_moisture.clamp(0.0, 1.0)
}

/// Map the scoring indicators of a reading onto risk contributions
pub fn normalize(reading: &IndicatorReading) -> Contributions {
    Contributions {
        vegetation: reading.ndvi.map(vegetation_contribution),
        water: reading.ndwi.map(water_contribution),
        soil: reading.soil_moisture.map(soil_contribution),
    }
}

/// Result of scoring one set of contributions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Percentage, one decimal place
    pub confidence: f64,
    /// Scoring indicators that were unknown and took their neutral value
    pub missing_indicators: Vec<Indicator>,
}

impl RiskAssessment {
    /// Sentinel for "no data at all"
    pub fn unknown() -> Self {
        Self {
            risk_score: 0.0,
            risk_level: RiskLevel::Unknown,
            confidence: 0.0,
            missing_indicators: Indicator::SCORED.to_vec(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.risk_level == RiskLevel::Unknown
    }
}

/// Fixed weighting and classification rules
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoringModel {
    pub weights: RiskWeights,
    pub thresholds: RiskThresholds,
    #[serde(default)]
    pub missing_policy: MissingIndicatorPolicy,
}

impl ScoringModel {
    pub fn new(
        weights: RiskWeights,
        thresholds: RiskThresholds,
        missing_policy: MissingIndicatorPolicy,
    ) -> Result<Self, &'static str> {
        crate::validation::validate_weights(&weights)?;
        crate::validation::validate_thresholds(&thresholds)?;
        Ok(Self {
            weights,
            thresholds,
            missing_policy,
        })
    }

    /// Classify a composite score; thresholds are exclusive
    pub fn classify(&self, score: f64) -> RiskLevel {
        if score > self.thresholds.high {
            RiskLevel::High
        } else if score > self.thresholds.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn composite_score(&self, contributions: &Contributions) -> f64 {
        let w = &self.weights;
        let score = w.vegetation * contributions.vegetation.unwrap_or(NEUTRAL_VEGETATION)
            + w.water * contributions.water.unwrap_or(NEUTRAL_WATER)
            + w.soil * contributions.soil.unwrap_or(NEUTRAL_SOIL);
        score.clamp(0.0, 1.0)
    }

    pub fn score(&self, contributions: &Contributions) -> RiskAssessment {
        if contributions.is_empty() {
            return RiskAssessment::unknown();
        }

        let risk_score = self.composite_score(contributions);
        let mut confidence = risk_score * 100.0;
        if self.missing_policy == MissingIndicatorPolicy::DiscountConfidence {
            confidence *= contributions.known_count() as f64 / Indicator::SCORED.len() as f64;
        }

        let missing_indicators = [
            (Indicator::Ndvi, contributions.vegetation),
            (Indicator::Ndwi, contributions.water),
            (Indicator::SoilMoisture, contributions.soil),
        ]
        .into_iter()
        .filter(|(_, c)| c.is_none())
        .map(|(i, _)| i)
        .collect();

        RiskAssessment {
            risk_score,
            risk_level: self.classify(risk_score),
            confidence: round_dp(confidence, 1),
            missing_indicators,
        }
    }

    /// Normalize and score a raw reading
    pub fn assess(&self, reading: &IndicatorReading) -> RiskAssessment {
        self.score(&normalize(reading))
    }
}

/// Round half away from zero to `places` decimal places
pub fn round_dp(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
