use serde::{Deserialize, Serialize};

/// Jakarta city center, used when nothing better is known.
pub const DEFAULT_LATITUDE: f64 = -6.2088;
pub const DEFAULT_LONGITUDE: f64 = 106.8456;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Device,
    IpLookup,
    Default,
}

impl LocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSource::Device => "device",
            LocationSource::IpLookup => "ip lookup",
            LocationSource::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub name: Option<String>,
    pub source: LocationSource,
}

impl Location {
    pub fn new(lat: f64, lon: f64, source: LocationSource) -> Self {
        Self {
            lat,
            lon,
            name: None,
            source,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Place name if known, otherwise the coordinates.
    pub fn display(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{:.4}, {:.4}", self.lat, self.lon),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE, LocationSource::Default).named("Jakarta")
    }
}
