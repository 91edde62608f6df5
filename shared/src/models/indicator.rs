//! Environmental indicator models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Environmental indicators tracked per location
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// Normalized difference vegetation index, [-1, 1]
    Ndvi,
    /// Normalized difference water index, [-1, 1]
    Ndwi,
    /// Volumetric soil wetness fraction, [0, 1]
    SoilMoisture,
    /// Estimated surface water height in metres, >= 0
    WaterLevel,
}

impl Indicator {
    pub const ALL: [Indicator; 4] = [
        Indicator::Ndvi,
        Indicator::Ndwi,
        Indicator::SoilMoisture,
        Indicator::WaterLevel,
    ];

    /// Indicators that feed the composite risk score
    pub const SCORED: [Indicator; 3] = [
        Indicator::Ndvi,
        Indicator::Ndwi,
        Indicator::SoilMoisture,
    ];

    /// Physical range of the raw value (inclusive)
    pub fn valid_range(&self) -> (f64, f64) {
        match self {
            Indicator::Ndvi | Indicator::Ndwi => (-1.0, 1.0),
            Indicator::SoilMoisture => (0.0, 1.0),
            Indicator::WaterLevel => (0.0, f64::INFINITY),
        }
    }

    /// Clamp a value into the indicator's physical range
    pub fn clamp(&self, value: f64) -> f64 {
        let (min, max) = self.valid_range();
        value.clamp(min, max)
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Indicator::Ndvi => write!(f, "ndvi"),
            Indicator::Ndwi => write!(f, "ndwi"),
            Indicator::SoilMoisture => write!(f, "soil_moisture"),
            Indicator::WaterLevel => write!(f, "water_level"),
        }
    }
}

/// Partial indicator values returned by a provider for one window.
///
/// Every field is optional: `None` means "unknown", which is never the same as 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct IndicatorReading {
    pub ndvi: Option<f64>,
    pub ndwi: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub water_level: Option<f64>,
}

impl IndicatorReading {
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Ndvi => self.ndvi,
            Indicator::Ndwi => self.ndwi,
            Indicator::SoilMoisture => self.soil_moisture,
            Indicator::WaterLevel => self.water_level,
        }
    }

    pub fn set(&mut self, indicator: Indicator, value: Option<f64>) {
        match indicator {
            Indicator::Ndvi => self.ndvi = value,
            Indicator::Ndwi => self.ndwi = value,
            Indicator::SoilMoisture => self.soil_moisture = value,
            Indicator::WaterLevel => self.water_level = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Indicator::ALL.iter().all(|i| self.get(*i).is_none())
    }

    /// Indicators with no value in this reading
    pub fn missing(&self) -> Vec<Indicator> {
        Indicator::ALL
            .into_iter()
            .filter(|i| self.get(*i).is_none())
            .collect()
    }

    /// Overwrite values with those present in `other`
    pub fn merge_from(&mut self, other: &IndicatorReading) {
        for indicator in Indicator::ALL {
            if let Some(value) = other.get(indicator) {
                self.set(indicator, Some(value));
            }
        }
    }

    pub fn into_sample(self, date: NaiveDate, origin: SampleOrigin) -> IndicatorSample {
        IndicatorSample {
            date,
            ndvi: self.ndvi,
            ndwi: self.ndwi,
            soil_moisture: self.soil_moisture,
            water_level: self.water_level,
            origin,
        }
    }
}

/// Where a sample's values came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SampleOrigin {
    /// Every present value was retrieved from the provider
    Live,
    /// Live retrieval with jittered filler for the indicators the provider omitted
    Blended,
    /// Retrieval failed; all values are jittered from the last known reading
    Synthetic,
}

/// One dated observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorSample {
    pub date: NaiveDate,
    pub ndvi: Option<f64>,
    pub ndwi: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub water_level: Option<f64>,
    pub origin: SampleOrigin,
}

impl IndicatorSample {
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Ndvi => self.ndvi,
            Indicator::Ndwi => self.ndwi,
            Indicator::SoilMoisture => self.soil_moisture,
            Indicator::WaterLevel => self.water_level,
        }
    }
}
