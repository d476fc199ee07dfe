pub mod aladhan;
pub mod calculator;
pub mod geolocation;
pub mod provider;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::config::settings::ProviderConfig;

pub use geolocation::Geolocator;
pub use provider::{PrayerTimeProvider, ProviderError};

/// Build the provider selected by `provider.source`.
pub fn provider_from_config(config: &ProviderConfig) -> Result<Arc<dyn PrayerTimeProvider>> {
    match config.source.as_str() {
        "offline" => Ok(Arc::new(calculator::OfflineCalculator::new(
            &config.calc_method,
            &config.madhab,
        )?)),
        _ => Ok(Arc::new(aladhan::AladhanClient::new(
            &config.base_url,
            config.method,
            Duration::from_secs(config.timeout_secs),
        )?)),
    }
}
