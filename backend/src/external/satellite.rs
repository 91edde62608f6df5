//! Satellite indicator API client
//!
//! Fetches per-point vegetation and water indices (Sentinel-2 composites),
//! surface soil moisture, and surface-water occurrence from the indicator API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::{DateRange, IndicatorReading, Location};

use super::{IndicatorProvider, ProviderError};
use crate::config::ProviderConfig;
use crate::error::{AppError, AppResult};

/// Metres of water level per percentage point of surface-water occurrence
pub const WATER_LEVEL_PER_OCCURRENCE_PCT: f64 = 0.1;

/// Satellite indicator API client
#[derive(Clone)]
pub struct SatelliteIndicatorClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_cloud_percent: u8,
}

/// Indicator API response for one point and window
#[derive(Debug, Deserialize)]
struct IndicatorApiResponse {
    /// Clear images that matched the window and cloud filter
    image_count: u32,
    ndvi: Option<f64>,
    ndwi: Option<f64>,
    soil_moisture: Option<f64>,
    /// Percentage of observations in which the pixel was water
    water_occurrence: Option<f64>,
}

impl SatelliteIndicatorClient {
    /// Create a new client from provider configuration
    pub fn new(config: &ProviderConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            max_cloud_percent: config.max_cloud_percent,
        })
    }

    /// Fetch indicator values for a point over a date window
    pub async fn get_indicators(
        &self,
        location: &Location,
        window: &DateRange,
    ) -> Result<IndicatorReading, ProviderError> {
        let url = format!("{}/indicators", self.base_url);
        let start = window.start.format("%Y-%m-%d").to_string();
        let end = window.end.format("%Y-%m-%d").to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", location.latitude().to_string()),
                ("lon", location.longitude().to_string()),
                ("start", start),
                ("end", end),
                ("max_cloud", self.max_cloud_percent.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::NoData);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        parse_indicator_response(&body)
    }
}

#[async_trait]
impl IndicatorProvider for SatelliteIndicatorClient {
    async fn query(
        &self,
        location: &Location,
        window: &DateRange,
    ) -> Result<IndicatorReading, ProviderError> {
        self.get_indicators(location, window).await
    }

    fn name(&self) -> &str {
        "satellite"
    }
}

/// Decode an indicator API body into a reading
fn parse_indicator_response(body: &str) -> Result<IndicatorReading, ProviderError> {
    let data: IndicatorApiResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    let reading = convert_response(data);
    if reading.is_empty() {
        return Err(ProviderError::NoData);
    }
    Ok(reading)
}

/// Convert an API response to an indicator reading
fn convert_response(data: IndicatorApiResponse) -> IndicatorReading {
    // Without a clear image the spectral indices are meaningless
    let has_imagery = data.image_count > 0;

    IndicatorReading {
        ndvi: data.ndvi.filter(|_| has_imagery),
        ndwi: data.ndwi.filter(|_| has_imagery),
        soil_moisture: data.soil_moisture,
        water_level: data
            .water_occurrence
            .map(|occurrence| occurrence * WATER_LEVEL_PER_OCCURRENCE_PCT),
    }
}
