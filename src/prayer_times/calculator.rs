use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use salah::prelude::*;

use crate::models::{Location, PrayerName, PrayerTimings};
use crate::prayer_times::provider::{PrayerTimeProvider, ProviderError};

/// Computes prayer times locally instead of asking the remote API.
pub struct OfflineCalculator {
    pub method_str: String,
    pub madhab_str: String,
}

impl OfflineCalculator {
    pub fn new(method: &str, madhab: &str) -> anyhow::Result<Self> {
        // Validate method + madhab early
        parse_method(method)?;
        parse_madhab(madhab)?;
        Ok(Self {
            method_str: method.to_string(),
            madhab_str: madhab.to_string(),
        })
    }

    pub fn compute_times(
        &self,
        date: NaiveDate,
        location: &Location,
    ) -> Result<PrayerTimings, ProviderError> {
        let coords = Coordinates::new(location.lat, location.lon);
        let method =
            parse_method(&self.method_str).map_err(|e| ProviderError::Calculation(e.to_string()))?;
        let madhab =
            parse_madhab(&self.madhab_str).map_err(|e| ProviderError::Calculation(e.to_string()))?;
        let params = Configuration::with(method, madhab);

        let times = PrayerSchedule::new()
            .on(date)
            .for_location(coords)
            .with_configuration(params)
            .calculate()
            .map_err(|e| ProviderError::Calculation(e.to_string()))?;

        let to_local = |utc: chrono::DateTime<chrono::Utc>| -> NaiveTime {
            let t = utc.with_timezone(&Local).time();
            // Drop seconds so offline times line up with the API's HH:MM.
            NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
        };

        Ok(PrayerTimings::new(date)
            .with(PrayerName::Fajr, to_local(times.time(Prayer::Fajr)))
            .with(PrayerName::Dhuhr, to_local(times.time(Prayer::Dhuhr)))
            .with(PrayerName::Asr, to_local(times.time(Prayer::Asr)))
            .with(PrayerName::Maghrib, to_local(times.time(Prayer::Maghrib)))
            .with(PrayerName::Isha, to_local(times.time(Prayer::Isha))))
    }
}

#[async_trait]
impl PrayerTimeProvider for OfflineCalculator {
    async fn fetch(
        &self,
        date: NaiveDate,
        location: &Location,
    ) -> Result<PrayerTimings, ProviderError> {
        self.compute_times(date, location)
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

fn parse_method(s: &str) -> anyhow::Result<Method> {
    match s {
        "MuslimWorldLeague" => Ok(Method::MuslimWorldLeague),
        "Egyptian" => Ok(Method::Egyptian),
        "Karachi" => Ok(Method::Karachi),
        "UmmAlQura" => Ok(Method::UmmAlQura),
        "Dubai" => Ok(Method::Dubai),
        "MoonsightingCommittee" => Ok(Method::MoonsightingCommittee),
        "NorthAmerica" => Ok(Method::NorthAmerica),
        "Kuwait" => Ok(Method::Kuwait),
        "Qatar" => Ok(Method::Qatar),
        "Singapore" => Ok(Method::Singapore),
        "Tehran" => Ok(Method::Tehran),
        "Turkey" => Ok(Method::Turkey),
        "Other" => Ok(Method::Other),
        _ => Err(anyhow::anyhow!("Unknown calculation method: '{}'", s)),
    }
}

fn parse_madhab(s: &str) -> anyhow::Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow::anyhow!("Unknown madhab: '{}'", s)),
    }
}

pub const CALC_METHODS: &[&str] = &[
    "MuslimWorldLeague",
    "Egyptian",
    "Karachi",
    "UmmAlQura",
    "Dubai",
    "MoonsightingCommittee",
    "NorthAmerica",
    "Kuwait",
    "Qatar",
    "Singapore",
    "Tehran",
    "Turkey",
    "Other",
];

pub const MADHABS: &[&str] = &["Hanafi", "Shafi", "Shafi'i"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocationSource;

    #[test]
    fn rejects_unknown_method() {
        assert!(OfflineCalculator::new("Mars", "Shafi").is_err());
        assert!(OfflineCalculator::new("Singapore", "Maliki").is_err());
    }

    #[test]
    fn computes_all_five_in_order() {
        let calc = OfflineCalculator::new("Singapore", "Shafi").unwrap();
        let loc = Location::new(-6.2088, 106.8456, LocationSource::Default);
        let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let timings = calc.compute_times(date, &loc).unwrap();

        let names: Vec<PrayerName> = timings.iter().map(|(p, _)| p).collect();
        assert_eq!(names, PrayerName::ALL.to_vec());
        assert_eq!(timings.date, date);
    }
}
