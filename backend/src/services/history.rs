//! Historical series synthesis
//!
//! Builds a fixed-length daily series for the lookback window. Each day gets
//! its own live retrieval; days the provider cannot serve are filled by
//! jittering the most recent known values, so the series length never depends
//! on provider availability.

use chrono::{Duration, NaiveDate};
use futures::future::join_all;
use rand::Rng;
use serde::Deserialize;
use shared::{
    DateRange, HistoricalSeries, Indicator, IndicatorReading, Location, SampleOrigin,
};

use super::indicator_source::{IndicatorSource, Retrieval};

/// Maximum absolute jitter applied to each indicator when synthesizing
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct JitterBounds {
    pub ndvi: f64,
    pub ndwi: f64,
    pub soil_moisture: f64,
    pub water_level: f64,
}

impl Default for JitterBounds {
    fn default() -> Self {
        Self {
            ndvi: 0.1,
            ndwi: 0.1,
            soil_moisture: 0.05,
            water_level: 0.5,
        }
    }
}

impl JitterBounds {
    pub fn bound(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Ndvi => self.ndvi,
            Indicator::Ndwi => self.ndwi,
            Indicator::SoilMoisture => self.soil_moisture,
            Indicator::WaterLevel => self.water_level,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        let all_valid = Indicator::ALL.iter().all(|i| {
            let b = self.bound(*i);
            b.is_finite() && b >= 0.0
        });
        if !all_valid {
            return Err("Jitter bounds must be non-negative numbers");
        }
        Ok(())
    }

    /// Add uniform noise in [-bound, bound], staying inside the physical range
    pub fn perturb<R: Rng>(&self, indicator: Indicator, value: f64, rng: &mut R) -> f64 {
        let bound = self.bound(indicator);
        if bound <= 0.0 {
            return value;
        }
        indicator.clamp(value + rng.gen_range(-bound..=bound))
    }
}

/// Builds the lookback series for one query
pub struct HistorySynthesizer<'a> {
    source: &'a IndicatorSource,
    lookback_days: u32,
    jitter: JitterBounds,
}

impl<'a> HistorySynthesizer<'a> {
    pub fn new(source: &'a IndicatorSource, lookback_days: u32, jitter: JitterBounds) -> Self {
        Self {
            source,
            lookback_days,
            jitter,
        }
    }

    /// Build the series ending on `end`, seeded with the current reading
    pub async fn build<R: Rng + Send>(
        &self,
        location: &Location,
        end: NaiveDate,
        current: &IndicatorReading,
        rng: &mut R,
    ) -> HistoricalSeries {
        let days = lookback_days(end, self.lookback_days);

        // join_all keeps results in request order
        let retrievals = join_all(days.iter().map(|day| self.fetch_day(location, *day))).await;

        let series = synthesize(&days, &retrievals, current, &self.jitter, rng);
        tracing::debug!(
            days = series.len(),
            live = series.live_count(),
            synthetic = series.synthetic_count(),
            "Historical series built"
        );
        series
    }

    async fn fetch_day(&self, location: &Location, day: NaiveDate) -> Retrieval {
        self.source
            .fetch(location, &DateRange::single_day(day))
            .await
    }
}

/// `count` consecutive days ending on `end`, most recent first, stopping at
/// the earliest representable date
pub fn lookback_days(end: NaiveDate, count: u32) -> Vec<NaiveDate> {
    (0..i64::from(count))
        .map_while(|offset| end.checked_sub_signed(Duration::days(offset)))
        .collect()
}

/// Combine per-day retrievals into a series.
///
/// `days` and `retrievals` run most-recent-first. The baseline starts as the
/// current reading and picks up every live value on the way back in time, so
/// a synthetic day is always jittered from the nearest later known value. A day
/// without a retrieval entry is treated as unavailable.
pub fn synthesize<R: Rng>(
    days: &[NaiveDate],
    retrievals: &[Retrieval],
    current: &IndicatorReading,
    jitter: &JitterBounds,
    rng: &mut R,
) -> HistoricalSeries {
    let mut baseline = *current;
    let mut samples = Vec::with_capacity(days.len());

    for (index, day) in days.iter().enumerate() {
        let sample = match retrievals.get(index).and_then(Retrieval::reading) {
            Some(live) => {
                let mut values = *live;
                let mut filled = false;
                for indicator in live.missing() {
                    if let Some(known) = baseline.get(indicator) {
                        values.set(indicator, Some(jitter.perturb(indicator, known, rng)));
                        filled = true;
                    }
                }
                baseline.merge_from(live);

                let origin = if filled {
                    SampleOrigin::Blended
                } else {
                    SampleOrigin::Live
                };
                values.into_sample(*day, origin)
            }
            None => {
                let mut values = IndicatorReading::default();
                for indicator in Indicator::ALL {
                    let value = baseline
                        .get(indicator)
                        .map(|known| jitter.perturb(indicator, known, rng));
                    values.set(indicator, value);
                }
                values.into_sample(*day, SampleOrigin::Synthetic)
            }
        };
        samples.push(sample);
    }

    HistoricalSeries::new(samples)
}
