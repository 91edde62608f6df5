//! HTTP handlers for flood risk analysis

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{round_dp, Indicator, Location, RiskLevel, SampleOrigin, Trend};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{AssessmentQuery, FloodAssessment};
use crate::AppState;

/// Analysis request body
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(alias = "lat")]
    pub latitude: Decimal,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: Decimal,
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub assessment_id: Uuid,
    pub location: Location,
    pub coordinates: String,
    pub as_of: NaiveDate,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub confidence: f64,
    pub missing_indicators: Vec<Indicator>,
    pub vegetation: VegetationSummary,
    pub water: WaterSummary,
    pub soil_moisture: ValueSummary,
    pub water_level: ValueSummary,
    pub historical_data: HistoricalData,
}

#[derive(Debug, Serialize)]
pub struct VegetationSummary {
    pub ndvi: Option<f64>,
    pub trend: Trend,
}

#[derive(Debug, Serialize)]
pub struct WaterSummary {
    pub ndwi: Option<f64>,
    pub trend: Trend,
}

#[derive(Debug, Serialize)]
pub struct ValueSummary {
    pub value: Option<f64>,
    pub trend: Trend,
}

/// Column-oriented series for charting; `None` where a day has no value
#[derive(Debug, Serialize)]
pub struct HistoricalData {
    pub dates: Vec<NaiveDate>,
    pub ndvi: Vec<Option<f64>>,
    pub ndwi: Vec<Option<f64>>,
    pub soil_moisture: Vec<Option<f64>>,
    pub water_level: Vec<Option<f64>>,
    pub origin: Vec<SampleOrigin>,
}

impl From<FloodAssessment> for AnalyzeResponse {
    fn from(assessment: FloodAssessment) -> Self {
        let current = &assessment.current;
        let samples = assessment.history.samples();
        let column = |indicator: Indicator| -> Vec<Option<f64>> {
            samples
                .iter()
                .map(|s| s.get(indicator).map(|v| round_dp(v, 2)))
                .collect()
        };

        let historical_data = HistoricalData {
            dates: assessment.history.dates(),
            ndvi: column(Indicator::Ndvi),
            ndwi: column(Indicator::Ndwi),
            soil_moisture: column(Indicator::SoilMoisture),
            water_level: column(Indicator::WaterLevel),
            origin: samples.iter().map(|s| s.origin).collect(),
        };

        Self {
            assessment_id: assessment.assessment_id,
            location: assessment.location,
            coordinates: assessment.location.to_string(),
            as_of: assessment.as_of,
            risk_level: assessment.risk.risk_level,
            risk_score: round_dp(assessment.risk.risk_score, 2),
            confidence: assessment.risk.confidence,
            missing_indicators: assessment.risk.missing_indicators.clone(),
            vegetation: VegetationSummary {
                ndvi: current.ndvi.map(|v| round_dp(v, 2)),
                trend: assessment.trends.vegetation,
            },
            water: WaterSummary {
                ndwi: current.ndwi.map(|v| round_dp(v, 2)),
                trend: assessment.trends.water,
            },
            soil_moisture: ValueSummary {
                value: current.soil_moisture.map(|v| round_dp(v * 100.0, 1)),
                trend: assessment.trends.soil_moisture,
            },
            water_level: ValueSummary {
                value: current.water_level.map(|v| round_dp(v, 2)),
                trend: assessment.trends.water_level,
            },
            historical_data,
        }
    }
}

/// Assess flood risk for a point
pub async fn analyze_location(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> AppResult<Json<AnalyzeResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::ValidationError(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let assessment = state
        .assessment
        .assess(AssessmentQuery {
            latitude: request.latitude,
            longitude: request.longitude,
            as_of: request.as_of,
        })
        .await?;

    Ok(Json(assessment.into()))
}
