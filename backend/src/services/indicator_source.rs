//! Indicator retrieval with timeouts, a bounded retry, and payload sanitization

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use shared::{validate_indicator_value, DateRange, Indicator, IndicatorReading, Location};

use crate::external::{IndicatorProvider, ProviderError};

/// Outcome of one retrieval; failures are values, not errors
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    Available(IndicatorReading),
    Unavailable(UnavailableReason),
}

impl Retrieval {
    pub fn reading(&self) -> Option<&IndicatorReading> {
        match self {
            Retrieval::Available(reading) => Some(reading),
            Retrieval::Unavailable(_) => None,
        }
    }
}

/// Why a retrieval produced no data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum UnavailableReason {
    Timeout,
    NoData,
    Provider(String),
    Malformed(String),
}

impl From<ProviderError> for UnavailableReason {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NoData => UnavailableReason::NoData,
            ProviderError::Malformed(msg) => UnavailableReason::Malformed(msg),
            other => UnavailableReason::Provider(other.to_string()),
        }
    }
}

/// Read-only access to indicator values for a point and window
#[derive(Clone)]
pub struct IndicatorSource {
    provider: Arc<dyn IndicatorProvider>,
    timeout: Duration,
    retries: u32,
}

impl IndicatorSource {
    pub fn new(provider: Arc<dyn IndicatorProvider>, timeout: Duration, retries: u32) -> Self {
        Self {
            provider,
            timeout,
            retries,
        }
    }

    /// Retrieve indicators for one window; never fails
    pub async fn fetch(&self, location: &Location, window: &DateRange) -> Retrieval {
        let mut attempt = 0;
        loop {
            let reason = match tokio::time::timeout(
                self.timeout,
                self.provider.query(location, window),
            )
            .await
            {
                Ok(Ok(reading)) => {
                    let reading = sanitize(reading);
                    if reading.is_empty() {
                        return Retrieval::Unavailable(UnavailableReason::NoData);
                    }
                    return Retrieval::Available(reading);
                }
                Ok(Err(err)) if !err.is_transient() => {
                    tracing::debug!(
                        provider = self.provider.name(),
                        start = %window.start,
                        end = %window.end,
                        "Indicator retrieval unavailable: {}",
                        err
                    );
                    return Retrieval::Unavailable(err.into());
                }
                Ok(Err(err)) => UnavailableReason::from(err),
                Err(_) => UnavailableReason::Timeout,
            };

            if attempt >= self.retries {
                tracing::warn!(
                    provider = self.provider.name(),
                    start = %window.start,
                    end = %window.end,
                    attempts = attempt + 1,
                    "Indicator retrieval failed: {:?}",
                    reason
                );
                return Retrieval::Unavailable(reason);
            }
            attempt += 1;
            tracing::debug!(
                provider = self.provider.name(),
                attempt,
                "Retrying indicator retrieval after {:?}",
                reason
            );
        }
    }
}

/// Drop values that are non-finite or outside their indicator's range
fn sanitize(mut reading: IndicatorReading) -> IndicatorReading {
    for indicator in Indicator::ALL {
        if let Some(value) = reading.get(indicator) {
            if let Err(msg) = validate_indicator_value(indicator, value) {
                tracing::warn!(%indicator, value, "Discarding provider value: {}", msg);
                reading.set(indicator, None);
            }
        }
    }
    reading
}
