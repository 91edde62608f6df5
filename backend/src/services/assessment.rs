//! Flood risk assessment service
//!
//! Orchestrates one assessment per query: coordinate validation, current
//! window retrieval, scoring, history synthesis, and trend classification.
//! Only invalid coordinates or an unrepresentable date fail; every provider
//! problem degrades the result.

use chrono::{NaiveDate, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    DateRange, HistoricalSeries, IndicatorReading, IndicatorSample, IndicatorTrends, Location,
    RiskAssessment, SampleOrigin, ScoringModel,
};
use uuid::Uuid;

use super::history::HistorySynthesizer;
use super::indicator_source::{IndicatorSource, Retrieval, UnavailableReason};
use crate::config::AssessmentConfig;
use crate::error::{AppError, AppResult};

/// One assessment request
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentQuery {
    pub latitude: Decimal,
    pub longitude: Decimal,
    /// Observation date; today (UTC) when absent
    pub as_of: Option<NaiveDate>,
}

/// Complete assessment for a location
#[derive(Debug, Clone, Serialize)]
pub struct FloodAssessment {
    pub assessment_id: Uuid,
    pub location: Location,
    pub as_of: NaiveDate,
    /// Current-window values; fields are `None` when unavailable
    pub current: IndicatorSample,
    /// Set when the current window could not be retrieved at all
    pub current_unavailable: Option<UnavailableReason>,
    pub risk: RiskAssessment,
    pub trends: IndicatorTrends,
    pub history: HistoricalSeries,
}

/// Flood risk assessment service
#[derive(Clone)]
pub struct RiskAssessmentService {
    source: IndicatorSource,
    scoring: ScoringModel,
    config: AssessmentConfig,
}

impl RiskAssessmentService {
    /// Create a new RiskAssessmentService, rejecting invalid configuration
    pub fn new(source: IndicatorSource, config: AssessmentConfig) -> AppResult<Self> {
        config.validate()?;
        let scoring = config.scoring_model()?;
        Ok(Self {
            source,
            scoring,
            config,
        })
    }

    pub fn lookback_days(&self) -> u32 {
        self.config.lookback_days
    }

    /// Assess flood risk for a point
    pub async fn assess(&self, query: AssessmentQuery) -> AppResult<FloodAssessment> {
        let location = Location::new(query.latitude, query.longitude)?;
        let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
        self.check_as_of(as_of)?;
        let assessment_id = Uuid::new_v4();

        tracing::info!(%assessment_id, %location, %as_of, "Assessing flood risk");

        let window = DateRange::trailing(as_of, self.config.current_window_days);
        let (current, current_unavailable) = match self.source.fetch(&location, &window).await {
            Retrieval::Available(reading) => (reading, None),
            Retrieval::Unavailable(reason) => {
                tracing::warn!(
                    %assessment_id,
                    "Current indicators unavailable ({:?}); scoring without data",
                    reason
                );
                (IndicatorReading::default(), Some(reason))
            }
        };

        let risk = self.scoring.assess(&current);
        let current_origin = if current_unavailable.is_some() {
            SampleOrigin::Synthetic
        } else {
            SampleOrigin::Live
        };

        let mut rng = self.jitter_rng();
        let history = HistorySynthesizer::new(
            &self.source,
            self.config.lookback_days,
            self.config.jitter,
        )
        .build(&location, as_of, &current, &mut rng)
        .await;
        let trends = history.trends();

        tracing::info!(
            %assessment_id,
            risk_level = %risk.risk_level,
            confidence = risk.confidence,
            live_days = history.live_count(),
            synthetic_days = history.synthetic_count(),
            "Assessment complete"
        );

        Ok(FloodAssessment {
            assessment_id,
            location,
            as_of,
            current: current.into_sample(as_of, current_origin),
            current_unavailable,
            risk,
            trends,
            history,
        })
    }

    /// Every window for `as_of` must start on a representable date
    fn check_as_of(&self, as_of: NaiveDate) -> AppResult<()> {
        let span = self
            .config
            .lookback_days
            .max(self.config.current_window_days);
        if DateRange::checked_trailing(as_of, span).is_none() {
            return Err(AppError::Validation {
                field: "as_of".to_string(),
                message: format!("as_of {} is too early for a {}-day window", as_of, span),
            });
        }
        Ok(())
    }

    fn jitter_rng(&self) -> ChaCha8Rng {
        match self.config.jitter_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::ProviderError;
    use crate::services::history::JitterBounds;
    use crate::services::testing::{date, ScriptedProvider};
    use shared::{Indicator, RiskLevel, Trend};
    use std::str::FromStr;
    use std::sync::Arc;
    use std::time::Duration;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn reading(ndvi: f64, ndwi: f64, soil: f64) -> IndicatorReading {
        IndicatorReading {
            ndvi: Some(ndvi),
            ndwi: Some(ndwi),
            soil_moisture: Some(soil),
            water_level: Some(1.5),
        }
    }

    fn service(provider: Arc<ScriptedProvider>, config: AssessmentConfig) -> RiskAssessmentService {
        let source = IndicatorSource::new(provider, Duration::from_millis(100), 0);
        RiskAssessmentService::new(source, config).unwrap()
    }

    fn query(lat: &str, lng: &str) -> AssessmentQuery {
        AssessmentQuery {
            latitude: dec(lat),
            longitude: dec(lng),
            as_of: Some(date("2024-06-10")),
        }
    }

    #[tokio::test]
    async fn test_steady_conditions_score_low() {
        let provider = Arc::new(ScriptedProvider::constant(reading(0.6, -0.2, 0.3)));
        let service = service(provider.clone(), AssessmentConfig::default());

        let assessment = service.assess(query("0", "0")).await.unwrap();

        assert_eq!(assessment.risk.risk_level, RiskLevel::Low);
        assert_eq!(assessment.risk.confidence, 30.0);
        assert!(assessment.current_unavailable.is_none());
        assert_eq!(assessment.history.len(), 10);
        assert_eq!(assessment.history.live_count(), 10);
        assert_eq!(assessment.trends.vegetation, Trend::Stable);
        assert_eq!(assessment.trends.water_level, Trend::Stable);
        assert_eq!(assessment.current.origin, SampleOrigin::Live);
        // current window plus one query per historical day
        assert_eq!(provider.calls(), 11);
    }

    #[tokio::test]
    async fn test_invalid_latitude_rejected_before_retrieval() {
        let provider = Arc::new(ScriptedProvider::constant(reading(0.6, -0.2, 0.3)));
        let service = service(provider.clone(), AssessmentConfig::default());

        let result = service.assess(query("100", "0")).await;

        assert!(matches!(
            result,
            Err(AppError::Validation { ref field, .. }) if field == "latitude"
        ));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_longitude_rejected() {
        let provider = Arc::new(ScriptedProvider::constant(reading(0.6, -0.2, 0.3)));
        let service = service(provider.clone(), AssessmentConfig::default());

        assert!(service.assess(query("10", "-200")).await.is_err());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_as_of_too_early_rejected_before_retrieval() {
        let provider = Arc::new(ScriptedProvider::constant(reading(0.6, -0.2, 0.3)));
        let service = service(provider.clone(), AssessmentConfig::default());
        let earliest: NaiveDate = serde_json::from_str("\"-262143-01-01\"").unwrap();

        for as_of in [earliest, NaiveDate::MIN + chrono::Duration::days(9)] {
            let result = service
                .assess(AssessmentQuery {
                    as_of: Some(as_of),
                    ..query("0", "0")
                })
                .await;

            assert!(matches!(
                result,
                Err(AppError::Validation { ref field, .. }) if field == "as_of"
            ));
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_total_outage_is_unknown_not_error() {
        let provider = Arc::new(ScriptedProvider::failing(ProviderError::Request(
            "connection refused".to_string(),
        )));
        let service = service(provider, AssessmentConfig::default());

        let assessment = service.assess(query("-1.29", "36.82")).await.unwrap();

        assert_eq!(assessment.risk.risk_level, RiskLevel::Unknown);
        assert_eq!(assessment.risk.risk_score, 0.0);
        assert_eq!(assessment.risk.confidence, 0.0);
        assert!(assessment.current_unavailable.is_some());
        assert_eq!(assessment.current.origin, SampleOrigin::Synthetic);
        assert_eq!(assessment.current.ndvi, None);
        assert_eq!(assessment.history.len(), 10);
        assert!(assessment.history.values(Indicator::Ndvi).is_empty());
        assert_eq!(assessment.trends.vegetation, Trend::Stable);
    }

    #[tokio::test]
    async fn test_history_survives_failed_days() {
        let as_of = date("2024-06-10");
        let provider = Arc::new(
            ScriptedProvider::failing(ProviderError::NoData)
                .with_day(as_of, Ok(reading(0.2, 0.1, 0.5))),
        );
        let service = service(provider, AssessmentConfig::default());

        let assessment = service.assess(query("52.37", "4.89")).await.unwrap();

        assert_ne!(assessment.risk.risk_level, RiskLevel::Unknown);
        assert_eq!(assessment.history.len(), 10);
        assert_eq!(assessment.history.live_count(), 1);
        assert_eq!(assessment.history.synthetic_count(), 9);
        assert_eq!(assessment.history.dates().last(), Some(&as_of));
    }

    #[tokio::test]
    async fn test_rising_water_detected() {
        let as_of = date("2024-06-10");
        let oldest = date("2024-06-01");
        let provider = Arc::new(
            ScriptedProvider::constant(reading(0.3, 0.0, 0.4))
                .with_day(oldest, Ok(reading(0.3, -0.4, 0.1)))
                .with_day(as_of, Ok(reading(0.3, 0.2, 0.45))),
        );
        let service = service(provider, AssessmentConfig::default());

        let assessment = service.assess(query("13.75", "100.5")).await.unwrap();

        assert_eq!(assessment.trends.water, Trend::Increasing);
        assert_eq!(assessment.trends.soil_moisture, Trend::Increasing);
        assert_eq!(assessment.trends.vegetation, Trend::Stable);
    }

    #[tokio::test]
    async fn test_identical_responses_are_deterministic() {
        let provider = Arc::new(ScriptedProvider::constant(reading(0.1, 0.3, 0.6)));
        let service = service(provider, AssessmentConfig::default());

        let first = service.assess(query("10", "10")).await.unwrap();
        let second = service.assess(query("10", "10")).await.unwrap();

        assert_eq!(first.risk, second.risk);
        assert_eq!(first.history, second.history);
        assert_ne!(first.assessment_id, second.assessment_id);
    }

    #[tokio::test]
    async fn test_seeded_jitter_is_reproducible() {
        let as_of = date("2024-06-10");
        let provider = Arc::new(
            ScriptedProvider::failing(ProviderError::NoData)
                .with_day(as_of, Ok(reading(0.4, 0.0, 0.3))),
        );
        let config = AssessmentConfig {
            jitter_seed: Some(1234),
            jitter: JitterBounds::default(),
            ..Default::default()
        };
        let service = service(provider, config);

        let first = service.assess(query("10", "10")).await.unwrap();
        let second = service.assess(query("10", "10")).await.unwrap();

        assert_eq!(first.history, second.history);
        assert_eq!(first.risk.risk_level, second.risk.risk_level);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let provider = Arc::new(ScriptedProvider::constant(reading(0.1, 0.3, 0.6)));
        let source = IndicatorSource::new(provider, Duration::from_millis(100), 0);
        let config = AssessmentConfig {
            lookback_days: 0,
            ..Default::default()
        };

        assert!(RiskAssessmentService::new(source, config).is_err());
    }
}
