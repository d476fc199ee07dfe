//! Aladhan timings API client
//!
//! `GET {base}/timings/DD-MM-YYYY?latitude=..&longitude=..&method=..`

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::models::{Location, PrayerTimings};
use crate::prayer_times::provider::{PrayerTimeProvider, ProviderError};

const USER_AGENT: &str = concat!("adzan/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct TimingsResponse {
    data: TimingsData,
}

#[derive(Debug, Deserialize)]
struct TimingsData {
    /// Name → "HH:MM". Also carries Sunrise, Imsak, Midnight etc.
    timings: HashMap<String, String>,
}

pub struct AladhanClient {
    http_client: reqwest::Client,
    base_url: String,
    method: u8,
}

impl AladhanClient {
    pub fn new(base_url: &str, method: u8, timeout: Duration) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            method,
        })
    }

    fn timings_url(&self, date: NaiveDate, location: &Location) -> String {
        format!(
            "{}/timings/{}?latitude={}&longitude={}&method={}",
            self.base_url,
            date.format("%d-%m-%Y"),
            location.lat,
            location.lon,
            self.method
        )
    }
}

fn parse_timings(date: NaiveDate, body: &str) -> Result<PrayerTimings, ProviderError> {
    let parsed: TimingsResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    Ok(PrayerTimings::from_raw(date, &parsed.data.timings))
}

#[async_trait]
impl PrayerTimeProvider for AladhanClient {
    async fn fetch(
        &self,
        date: NaiveDate,
        location: &Location,
    ) -> Result<PrayerTimings, ProviderError> {
        let url = self.timings_url(date, location);
        log::debug!("Requesting prayer times: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let timings = parse_timings(date, &body)?;

        log::info!(
            "Retrieved {} prayer times for {} at {}",
            timings.iter().count(),
            date,
            location.display()
        );
        Ok(timings)
    }

    fn name(&self) -> &'static str {
        "aladhan"
    }
}
