//! Location resolution: configured device coordinates, then IP lookup, then
//! the built-in default. A resolved location is reused for a short window.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::config::settings::LocationConfig;
use crate::models::{Location, LocationSource};

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Lookup returned no coordinates")]
    NoCoordinates,

    #[error("Parse error: {0}")]
    Parse(String),
}

#[async_trait]
pub trait LocationLookup: Send + Sync {
    async fn lookup(&self) -> Result<Location, GeoError>;
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
}

/// IP based lookup against an ipapi.co compatible endpoint.
pub struct IpLocator {
    http_client: reqwest::Client,
    url: String,
}

impl IpLocator {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, GeoError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeoError::Network(e.to_string()))?;
        Ok(Self {
            http_client,
            url: url.to_string(),
        })
    }
}

fn parse_ip_response(body: &str) -> Result<Location, GeoError> {
    let parsed: IpApiResponse =
        serde_json::from_str(body).map_err(|e| GeoError::Parse(e.to_string()))?;
    match (parsed.latitude, parsed.longitude) {
        (Some(lat), Some(lon)) => {
            let mut location = Location::new(lat, lon, LocationSource::IpLookup);
            location.name = parsed.city;
            Ok(location)
        }
        _ => Err(GeoError::NoCoordinates),
    }
}

#[async_trait]
impl LocationLookup for IpLocator {
    async fn lookup(&self) -> Result<Location, GeoError> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| GeoError::Network(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| GeoError::Network(e.to_string()))?;
        parse_ip_response(&body)
    }
}

pub struct Geolocator {
    device: Option<Location>,
    ip: Option<Box<dyn LocationLookup>>,
    cache_ttl: Duration,
    cache: Mutex<Option<(Instant, Location)>>,
}

impl Geolocator {
    pub fn new(
        device: Option<Location>,
        ip: Option<Box<dyn LocationLookup>>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            device,
            ip,
            cache_ttl,
            cache: Mutex::new(None),
        }
    }

    pub fn from_config(config: &LocationConfig) -> Self {
        let device = config
            .device_coordinates()
            .map(|(lat, lon)| Location::new(lat, lon, LocationSource::Device).named(&config.name));

        let ip: Option<Box<dyn LocationLookup>> = if config.ip_lookup {
            match IpLocator::new(
                &config.ip_lookup_url,
                Duration::from_secs(config.lookup_timeout_secs),
            ) {
                Ok(locator) => Some(Box::new(locator)),
                Err(e) => {
                    log::warn!("IP lookup disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self::new(device, ip, Duration::from_secs(config.cache_secs))
    }

    fn cached(&self) -> Option<Location> {
        let guard = self.cache.lock().ok()?;
        match guard.as_ref() {
            Some((at, location)) if at.elapsed() < self.cache_ttl => Some(location.clone()),
            _ => None,
        }
    }

    fn remember(&self, location: &Location) {
        if let Ok(mut guard) = self.cache.lock() {
            *guard = Some((Instant::now(), location.clone()));
        }
    }

    /// Never fails; the last resort is the default location.
    pub async fn resolve(&self) -> Location {
        if let Some(location) = self.cached() {
            log::debug!("Reusing cached location {}", location.display());
            return location;
        }

        let location = if let Some(device) = &self.device {
            device.clone()
        } else if let Some(ip) = &self.ip {
            match ip.lookup().await {
                Ok(location) => location,
                Err(e) => {
                    log::warn!("IP location lookup failed, using default: {}", e);
                    Location::default()
                }
            }
        } else {
            Location::default()
        };

        log::info!(
            "Location resolved via {}: {} ({:.4}, {:.4})",
            location.source.as_str(),
            location.display(),
            location.lat,
            location.lon
        );
        self.remember(&location);
        location
    }
}
