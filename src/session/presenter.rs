//! View models for the countdown, schedule table and date label. Pure
//! functions of state and time so they can be tested without a terminal.

use chrono::{DateTime, Local, TimeZone};

use crate::models::{PrayerName, PrayerTimings};
use crate::schedule::computer::{next_occurrence, next_upcoming};
use crate::session::ScheduleState;
use crate::utils::format::{format_countdown, format_time};
use crate::utils::hijri::hijri_string;

pub const UNAVAILABLE_LABEL: &str = "jadwal tidak tersedia";
pub const LOADING_LABEL: &str = "memuat jadwal…";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPrayerView {
    Loading,
    Unavailable,
    NoTimings,
    Upcoming {
        prayer: PrayerName,
        time: String,
        countdown: String,
    },
}

pub fn next_prayer_view<Tz: TimeZone>(
    state: ScheduleState,
    timings: Option<&PrayerTimings>,
    now: &DateTime<Tz>,
) -> NextPrayerView {
    match state {
        ScheduleState::Loading => return NextPrayerView::Loading,
        ScheduleState::Unavailable => return NextPrayerView::Unavailable,
        ScheduleState::Ready => {}
    }
    let Some(timings) = timings else {
        return NextPrayerView::NoTimings;
    };
    match next_upcoming(timings, now) {
        Some((prayer, at)) => NextPrayerView::Upcoming {
            prayer,
            time: format_time(at.time()),
            countdown: format_countdown(at - now.clone()),
        },
        None => NextPrayerView::NoTimings,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub prayer: PrayerName,
    pub time: Option<String>,
    /// Today's time for this prayer is already behind us.
    pub passed: bool,
    pub is_next: bool,
}

/// One row per prayer in fixed order; missing timings show as `None`.
pub fn schedule_rows<Tz: TimeZone>(timings: Option<&PrayerTimings>, now: &DateTime<Tz>) -> Vec<ScheduleRow> {
    let next = timings.and_then(|t| next_upcoming(t, now)).map(|(p, _)| p);
    PrayerName::ALL
        .into_iter()
        .map(|prayer| {
            let time = timings.and_then(|t| t.get(prayer));
            let passed = time
                .and_then(|t| next_occurrence(t, now))
                .is_some_and(|at| at.date_naive() != now.date_naive());
            ScheduleRow {
                prayer,
                time: time.map(format_time),
                passed,
                is_next: next == Some(prayer),
            }
        })
        .collect()
}

const DAY_NAMES: [&str; 7] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu"];
const MONTH_NAMES: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

/// "Kamis, 15 Oktober 2026 · 3 Rabiul Akhir 1448 H"
pub fn date_label(now: &DateTime<Local>, hijri_offset: i32) -> String {
    use chrono::Datelike;
    let date = now.date_naive();
    let gregorian = format!(
        "{}, {} {} {}",
        DAY_NAMES[date.weekday().num_days_from_monday() as usize],
        date.day(),
        MONTH_NAMES[date.month0() as usize],
        date.year()
    );
    match hijri_string(date, hijri_offset) {
        Some(hijri) => format!("{} · {}", gregorian, hijri),
        None => gregorian,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, NaiveTime};

    fn at(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 15, h, m, s)
            .unwrap()
    }

    fn timings() -> PrayerTimings {
        PrayerTimings::new(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())
            .with(PrayerName::Fajr, NaiveTime::from_hms_opt(4, 30, 0).unwrap())
            .with(PrayerName::Dhuhr, NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    }

    #[test]
    fn countdown_to_next_prayer() {
        let view = next_prayer_view(ScheduleState::Ready, Some(&timings()), &at(5, 0, 30));
        assert_eq!(
            view,
            NextPrayerView::Upcoming {
                prayer: PrayerName::Dhuhr,
                time: "12:00".into(),
                countdown: "6j 59m".into(),
            }
        );
    }

    #[test]
    fn unavailable_wins_over_stale_timings() {
        let view = next_prayer_view(ScheduleState::Unavailable, Some(&timings()), &at(5, 0, 0));
        assert_eq!(view, NextPrayerView::Unavailable);
        let view = next_prayer_view(ScheduleState::Loading, None, &at(5, 0, 0));
        assert_eq!(view, NextPrayerView::Loading);
    }

    #[test]
    fn rows_mark_passed_and_next() {
        let rows = schedule_rows(Some(&timings()), &at(5, 0, 0));
        assert_eq!(rows.len(), 5);
        assert!(rows[0].passed);
        assert!(!rows[0].is_next);
        assert!(rows[1].is_next);
        assert!(!rows[1].passed);
        assert_eq!(rows[2].time, None);
    }

    #[test]
    fn date_label_in_indonesian() {
        let now = Local.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).single().unwrap();
        assert!(date_label(&now, 0).starts_with("Kamis, 15 Oktober 2026"));
    }
}
