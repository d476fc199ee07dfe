use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Location, PrayerTimings};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Status(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Prayer calculation failed: {0}")]
    Calculation(String),
}

/// Source of one day's prayer times for a location.
#[async_trait]
pub trait PrayerTimeProvider: Send + Sync {
    async fn fetch(&self, date: NaiveDate, location: &Location)
        -> Result<PrayerTimings, ProviderError>;

    fn name(&self) -> &'static str;
}
