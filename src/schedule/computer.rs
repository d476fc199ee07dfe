//! Turns a day's `HH:MM` timings into absolute fire instants.
//!
//! Every instant produced here is strictly after the `now` it was computed
//! from. A prayer whose time today is not after `now` rolls to tomorrow.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone};

use crate::models::{PrayerName, PrayerTimings};

pub const DEFAULT_PRE_ALARM_LEAD: Duration = Duration::minutes(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PreAlarm(PrayerName),
    Adhan(PrayerName),
    MidnightRefetch,
}

#[derive(Debug, Clone)]
pub struct ScheduledEvent<Tz: TimeZone = Local> {
    pub at: DateTime<Tz>,
    pub kind: EventKind,
}

fn local_instant<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(time)).earliest()
}

/// Today's instant at `time`, or tomorrow's when today's is not after `now`.
pub fn next_occurrence<Tz: TimeZone>(time: NaiveTime, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let today = now.date_naive();
    match local_instant(&tz, today, time) {
        Some(at) if at > *now => Some(at),
        _ => local_instant(&tz, today.succ_opt()?, time),
    }
}

/// First local midnight after `now`.
pub fn next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let tomorrow = now.date_naive().succ_opt()?;
    // Zones whose DST switch skips midnight start the day at 01:00.
    local_instant(&tz, tomorrow, NaiveTime::MIN)
        .or_else(|| local_instant(&tz, tomorrow, NaiveTime::from_hms_opt(1, 0, 0)?))
}

/// Pre-alarm and adhan events for every present prayer plus one midnight
/// refetch, sorted by fire time.
pub fn compute_schedule<Tz: TimeZone>(
    timings: &PrayerTimings,
    now: &DateTime<Tz>,
    pre_alarm_lead: Duration,
) -> Vec<ScheduledEvent<Tz>> {
    let mut events = Vec::with_capacity(11);

    for (prayer, time) in timings.iter() {
        let Some(adhan) = next_occurrence(time, now) else {
            log::warn!("No local instant for {} at {}", prayer.api_key(), time);
            continue;
        };
        let pre_alarm = adhan.clone() - pre_alarm_lead;
        if pre_alarm > *now {
            events.push(ScheduledEvent {
                at: pre_alarm,
                kind: EventKind::PreAlarm(prayer),
            });
        }
        events.push(ScheduledEvent {
            at: adhan,
            kind: EventKind::Adhan(prayer),
        });
    }

    match next_midnight(now) {
        Some(at) => events.push(ScheduledEvent {
            at,
            kind: EventKind::MidnightRefetch,
        }),
        None => log::warn!("Could not determine next midnight after {}", now.naive_local()),
    }

    events.sort_by(|a, b| a.at.cmp(&b.at));
    events
}

/// The soonest upcoming prayer. Ties go to the earlier prayer in the fixed
/// order.
pub fn next_upcoming<Tz: TimeZone>(
    timings: &PrayerTimings,
    now: &DateTime<Tz>,
) -> Option<(PrayerName, DateTime<Tz>)> {
    let mut best: Option<(PrayerName, DateTime<Tz>)> = None;
    for (prayer, time) in timings.iter() {
        let Some(at) = next_occurrence(time, now) else {
            continue;
        };
        let sooner = best.as_ref().is_none_or(|(_, current)| at < *current);
        if sooner {
            best = Some((prayer, at));
        }
    }
    best
}
