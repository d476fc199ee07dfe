use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub const ALL: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    /// Key used by the timings API.
    pub fn api_key(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }

    /// Indonesian label shown in the dashboard and notifications.
    pub fn label(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Subuh",
            PrayerName::Dhuhr => "Dzuhur",
            PrayerName::Asr => "Ashar",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isya",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse the leading `HH:MM` of a timing string. Trailing text such as a
/// timezone tag (`"04:30 (WIB)"`) is ignored.
pub fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    let (h, rest) = raw.split_once(':')?;
    let m: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if m.len() != 2 {
        return None;
    }
    let hour: u32 = h.trim().parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Local prayer times for one day. A missing entry means that prayer is not
/// scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerTimings {
    pub date: NaiveDate,
    times: [Option<NaiveTime>; 5],
}

impl PrayerTimings {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            times: [None; 5],
        }
    }

    pub fn with(mut self, prayer: PrayerName, time: NaiveTime) -> Self {
        self.set(prayer, time);
        self
    }

    pub fn set(&mut self, prayer: PrayerName, time: NaiveTime) {
        self.times[prayer.index()] = Some(time);
    }

    pub fn get(&self, prayer: PrayerName) -> Option<NaiveTime> {
        self.times[prayer.index()]
    }

    /// Present entries in fixed prayer order.
    pub fn iter(&self) -> impl Iterator<Item = (PrayerName, NaiveTime)> + '_ {
        PrayerName::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|t| (p, t)))
    }

    /// Build from a provider's name → "HH:MM" map. Only the five prayer keys
    /// are consumed; unparsable values are dropped with a warning.
    pub fn from_raw(date: NaiveDate, raw: &HashMap<String, String>) -> Self {
        let mut timings = Self::new(date);
        for prayer in PrayerName::ALL {
            let Some(value) = raw.get(prayer.api_key()) else {
                continue;
            };
            match parse_hhmm(value) {
                Some(t) => timings.set(prayer, t),
                None => log::warn!("Ignoring unparsable {} timing {:?}", prayer.api_key(), value),
            }
        }
        timings
    }
}
