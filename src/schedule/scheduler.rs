//! Pending one-shot timers for the current schedule.
//!
//! Each timer runs as its own task and posts a [`Fired`] message back to the
//! session loop. `reschedule` cancels everything first, so at most one
//! schedule is ever live. Deliveries carry the generation they were created
//! under; receivers drop any whose generation is no longer current.

use chrono::{DateTime, Local};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::schedule::computer::ScheduledEvent;

#[derive(Debug, Clone)]
pub struct Fired {
    pub generation: u64,
    pub event: ScheduledEvent,
}

struct PendingTimer {
    event: ScheduledEvent,
    delivered: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

pub struct EventScheduler<M> {
    generation: u64,
    pending: Vec<PendingTimer>,
    tx: UnboundedSender<M>,
    wrap: fn(Fired) -> M,
}

impl<M: Send + 'static> EventScheduler<M> {
    pub fn new(tx: UnboundedSender<M>, wrap: fn(Fired) -> M) -> Self {
        Self {
            generation: 0,
            pending: Vec::new(),
            tx,
            wrap,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Timers that have not delivered yet.
    pub fn pending(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.pending
            .iter()
            .filter(|p| !p.delivered.load(Ordering::SeqCst))
            .map(|p| &p.event)
    }

    /// Abort every pending timer and invalidate anything already queued.
    /// Safe to call repeatedly.
    pub fn cancel_all(&mut self) {
        for timer in self.pending.drain(..) {
            timer.handle.abort();
        }
        self.generation += 1;
    }

    /// Replace the live schedule with `events`. Returns the new generation.
    pub fn reschedule(&mut self, events: Vec<ScheduledEvent>, now: DateTime<Local>) -> u64 {
        self.cancel_all();
        let generation = self.generation;

        for event in events {
            let delay = (event.at - now).to_std().unwrap_or_default();
            let delivered = Arc::new(AtomicBool::new(false));
            let handle = {
                let delivered = delivered.clone();
                let tx = self.tx.clone();
                let wrap = self.wrap;
                let fired = Fired {
                    generation,
                    event: event.clone(),
                };
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if !delivered.swap(true, Ordering::SeqCst) {
                        let _ = tx.send(wrap(fired));
                    }
                })
            };
            self.pending.push(PendingTimer {
                event,
                delivered,
                handle,
            });
        }

        log::info!(
            "Scheduled {} events (generation {})",
            self.pending.len(),
            generation
        );
        generation
    }

    /// Deliver every timer whose wall-clock instant has passed but whose task
    /// has not woken yet, e.g. after a suspend or a clock jump.
    pub fn fire_overdue(&mut self, now: DateTime<Local>) -> usize {
        let mut fired = 0;
        for timer in &self.pending {
            if timer.event.at <= now && !timer.delivered.swap(true, Ordering::SeqCst) {
                timer.handle.abort();
                let _ = self.tx.send((self.wrap)(Fired {
                    generation: self.generation,
                    event: timer.event.clone(),
                }));
                fired += 1;
            }
        }
        self.pending.retain(|t| !t.delivered.load(Ordering::SeqCst));
        if fired > 0 {
            log::warn!("Delivered {} overdue events late", fired);
        }
        fired
    }
}

impl<M> Drop for EventScheduler<M> {
    fn drop(&mut self) {
        for timer in self.pending.drain(..) {
            timer.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;
    use crate::schedule::computer::EventKind;
    use chrono::{Duration, TimeZone};
    use tokio::sync::mpsc;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 15, 5, 0, 0).single().unwrap()
    }

    fn event(minutes: i64, kind: EventKind) -> ScheduledEvent {
        ScheduledEvent {
            at: now() + Duration::minutes(minutes),
            kind,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_in_wall_clock_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = EventScheduler::new(tx, |f| f);
        scheduler.reschedule(
            vec![
                event(20, EventKind::Adhan(PrayerName::Dhuhr)),
                event(10, EventKind::PreAlarm(PrayerName::Dhuhr)),
            ],
            now(),
        );

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.event.kind, EventKind::PreAlarm(PrayerName::Dhuhr));
        assert_eq!(second.event.kind, EventKind::Adhan(PrayerName::Dhuhr));
        assert!(scheduler.is_current(first.generation));
        assert_eq!(scheduler.pending().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_supersedes_previous_schedule() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = EventScheduler::new(tx, |f| f);
        scheduler.reschedule(
            vec![
                event(5, EventKind::Adhan(PrayerName::Fajr)),
                event(30, EventKind::Adhan(PrayerName::Dhuhr)),
            ],
            now(),
        );
        let second = scheduler.reschedule(vec![event(60, EventKind::Adhan(PrayerName::Asr))], now());

        let mut delivered = Vec::new();
        while let Ok(Some(f)) = tokio::time::timeout(std::time::Duration::from_secs(2 * 3600), rx.recv()).await {
            delivered.push(f);
        }
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].generation, second);
        assert_eq!(delivered[0].event.kind, EventKind::Adhan(PrayerName::Asr));
    }

    #[tokio::test(start_paused = true)]
    async fn queued_delivery_from_old_generation_is_stale() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = EventScheduler::new(tx, |f| f);
        scheduler.reschedule(vec![event(0, EventKind::Adhan(PrayerName::Fajr))], now());
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        assert_eq!(scheduler.pending().count(), 0);

        // Delivered into the channel but not yet handled.
        scheduler.reschedule(vec![], now());
        let stale = rx.recv().await.unwrap();
        assert!(!scheduler.is_current(stale.generation));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_is_idempotent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = EventScheduler::new(tx, |f| f);
        scheduler.reschedule(vec![event(1, EventKind::MidnightRefetch)], now());
        scheduler.cancel_all();
        scheduler.cancel_all();
        assert_eq!(scheduler.pending().count(), 0);
        let got = tokio::time::timeout(std::time::Duration::from_secs(600), rx.recv()).await;
        assert!(got.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn overdue_events_fire_once_after_clock_jump() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = EventScheduler::new(tx, |f| f);
        scheduler.reschedule(
            vec![
                event(30, EventKind::Adhan(PrayerName::Fajr)),
                event(90, EventKind::Adhan(PrayerName::Dhuhr)),
            ],
            now(),
        );

        // Wall clock jumps 45 minutes while the runtime clock stands still.
        assert_eq!(scheduler.fire_overdue(now() + Duration::minutes(45)), 1);
        assert_eq!(scheduler.fire_overdue(now() + Duration::minutes(45)), 0);
        let late = rx.recv().await.unwrap();
        assert_eq!(late.event.kind, EventKind::Adhan(PrayerName::Fajr));
        assert_eq!(scheduler.pending().count(), 1);
    }
}
