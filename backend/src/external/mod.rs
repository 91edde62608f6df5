//! External indicator providers

pub mod satellite;

use async_trait::async_trait;
use shared::{DateRange, IndicatorReading, Location};
use thiserror::Error;

pub use satellite::SatelliteIndicatorClient;

/// Failure of a single provider query
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("Indicator request failed: {0}")]
    Request(String),

    #[error("Indicator API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Malformed indicator payload: {0}")]
    Malformed(String),

    #[error("No indicator data for the requested window")]
    NoData,
}

impl ProviderError {
    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Request(_) => true,
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            ProviderError::Malformed(_) | ProviderError::NoData => false,
        }
    }
}

/// Backend that returns raw indicator values for a point and date window
#[async_trait]
pub trait IndicatorProvider: Send + Sync {
    async fn query(
        &self,
        location: &Location,
        window: &DateRange,
    ) -> Result<IndicatorReading, ProviderError>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}
