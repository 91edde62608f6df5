//! In-memory indicator provider for deterministic service tests

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{DateRange, IndicatorReading, Location};

use crate::external::{IndicatorProvider, ProviderError};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

pub fn location() -> Location {
    Location::new(Decimal::from_str("-1.2921").unwrap(), Decimal::from_str("36.8219").unwrap())
        .unwrap()
}

/// Provider answering from a script keyed by window end date
pub struct ScriptedProvider {
    default: Result<IndicatorReading, ProviderError>,
    by_end_date: HashMap<NaiveDate, Result<IndicatorReading, ProviderError>>,
    delay: Option<Duration>,
    delay_by_end_date: HashMap<NaiveDate, Duration>,
    calls: AtomicUsize,
    windows: Mutex<Vec<DateRange>>,
    completed: Mutex<Vec<NaiveDate>>,
}

impl ScriptedProvider {
    /// Every query returns the same reading
    pub fn constant(reading: IndicatorReading) -> Self {
        Self::with_default(Ok(reading))
    }

    /// Every query fails with the same error
    pub fn failing(err: ProviderError) -> Self {
        Self::with_default(Err(err))
    }

    fn with_default(default: Result<IndicatorReading, ProviderError>) -> Self {
        Self {
            default,
            by_end_date: HashMap::new(),
            delay: None,
            delay_by_end_date: HashMap::new(),
            calls: AtomicUsize::new(0),
            windows: Mutex::new(Vec::new()),
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Override the answer for windows ending on `day`
    pub fn with_day(
        mut self,
        day: NaiveDate,
        response: Result<IndicatorReading, ProviderError>,
    ) -> Self {
        self.by_end_date.insert(day, response);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Delay answers for windows ending on `day`, overriding `with_delay`
    pub fn with_day_delay(mut self, day: NaiveDate, delay: Duration) -> Self {
        self.delay_by_end_date.insert(day, delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Windows queried so far, in call order
    pub fn windows(&self) -> Vec<DateRange> {
        self.windows.lock().unwrap().clone()
    }

    /// End dates of answered windows, in completion order
    pub fn completed(&self) -> Vec<NaiveDate> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndicatorProvider for ScriptedProvider {
    async fn query(
        &self,
        _location: &Location,
        window: &DateRange,
    ) -> Result<IndicatorReading, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.windows.lock().unwrap().push(*window);

        let delay = self
            .delay_by_end_date
            .get(&window.end)
            .copied()
            .or(self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.lock().unwrap().push(window.end);

        self.by_end_date
            .get(&window.end)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
