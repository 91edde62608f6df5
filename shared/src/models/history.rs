//! Historical indicator series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::indicator::{Indicator, IndicatorSample, SampleOrigin};
use super::trend::{classify_trend, IndicatorTrends, Trend};

/// Chronologically ordered samples over the lookback window
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoricalSeries {
    samples: Vec<IndicatorSample>,
}

impl HistoricalSeries {
    /// Build a series, ordering the samples by date
    pub fn new(mut samples: Vec<IndicatorSample>) -> Self {
        samples.sort_by_key(|s| s.date);
        Self { samples }
    }

    pub fn samples(&self) -> &[IndicatorSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.samples.iter().map(|s| s.date).collect()
    }

    /// Present values of one indicator, oldest first
    pub fn values(&self, indicator: Indicator) -> Vec<f64> {
        self.samples
            .iter()
            .filter_map(|s| s.get(indicator))
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.samples
            .iter()
            .filter(|s| s.origin == SampleOrigin::Live)
            .count()
    }

    pub fn synthetic_count(&self) -> usize {
        self.samples
            .iter()
            .filter(|s| s.origin == SampleOrigin::Synthetic)
            .count()
    }

    pub fn trend(&self, indicator: Indicator) -> Trend {
        classify_trend(&self.values(indicator))
    }

    pub fn trends(&self) -> IndicatorTrends {
        IndicatorTrends {
            vegetation: self.trend(Indicator::Ndvi),
            water: self.trend(Indicator::Ndwi),
            soil_moisture: self.trend(Indicator::SoilMoisture),
            water_level: self.trend(Indicator::WaterLevel),
        }
    }
}
