//! The live reminder session.
//!
//! `Session` owns every piece of mutable state: location, timings, pending
//! timers, retry bookkeeping, music and cues. It is driven from a single
//! loop; background work (lookups, fetches, timers) runs as tasks that only
//! post [`SessionEvent`]s back and never touch the session directly.

pub mod presenter;

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::mpsc::UnboundedSender;

use crate::audio::backend::AudioOutputs;
use crate::audio::{CuePlayer, DuckController, DuckKind, MusicPlayer, MusicStream};
use crate::config::AppConfig;
use crate::models::{Banner, Location, Notification, NotificationIcon, PrayerTimings, Track};
use crate::prayer_times::{Geolocator, PrayerTimeProvider, ProviderError};
use crate::schedule::{
    Clock, EventKind, EventScheduler, Fired, RetryController, RetryDue, RetryOutcome, RetryPolicy,
    compute_schedule,
};

#[derive(Debug)]
pub enum SessionEvent {
    LocationResolved {
        cycle: u64,
        location: Location,
    },
    FetchFinished {
        cycle: u64,
        attempt: u32,
        result: Result<PrayerTimings, ProviderError>,
    },
    RetryDue(RetryDue),
    Fired(Fired),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    Loading,
    Ready,
    Unavailable,
}

/// Collaborators a session is built from.
pub struct SessionDeps {
    pub clock: Arc<dyn Clock>,
    pub provider: Arc<dyn PrayerTimeProvider>,
    pub geolocator: Arc<Geolocator>,
    pub audio: AudioOutputs,
}

pub struct Session {
    clock: Arc<dyn Clock>,
    provider: Arc<dyn PrayerTimeProvider>,
    geolocator: Arc<Geolocator>,
    tx: UnboundedSender<SessionEvent>,

    location: Location,
    timings: Option<PrayerTimings>,
    state: ScheduleState,
    pre_alarm_lead: Duration,

    scheduler: EventScheduler<SessionEvent>,
    retry: RetryController<SessionEvent>,
    ducks: DuckController,
    music: MusicPlayer,
    cues: Box<dyn CuePlayer>,
    banner: Banner,
}

impl Session {
    pub fn new(config: &AppConfig, deps: SessionDeps, tx: UnboundedSender<SessionEvent>) -> Self {
        let SessionDeps {
            clock,
            provider,
            geolocator,
            audio,
        } = deps;

        Self {
            clock,
            provider,
            geolocator,
            scheduler: EventScheduler::new(tx.clone(), SessionEvent::Fired),
            retry: RetryController::new(
                RetryPolicy::from_config(&config.retry),
                tx.clone(),
                SessionEvent::RetryDue,
            ),
            tx,
            location: Location::default(),
            timings: None,
            state: ScheduleState::Loading,
            pre_alarm_lead: Duration::minutes(config.alerts.pre_alarm_minutes as i64),
            ducks: DuckController::new(config.alerts.pre_alarm_minutes),
            music: MusicPlayer::new(audio.music, config.music.volume),
            cues: audio.cues,
            banner: Banner::default(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn timings(&self) -> Option<&PrayerTimings> {
        self.timings.as_ref()
    }

    pub fn state(&self) -> ScheduleState {
        self.state
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn dismiss_notification(&mut self) {
        self.banner.dismiss();
    }

    pub fn music(&self) -> &MusicPlayer {
        &self.music
    }

    pub fn music_mut(&mut self) -> &mut MusicPlayer {
        &mut self.music
    }

    pub fn add_tracks(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.music.add_tracks(tracks);
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Local> {
        self.clock.now()
    }

    /// Resolve the location, then fetch. Starts a new fetch cycle.
    pub fn refresh_location(&mut self) {
        let cycle = self.retry.begin_cycle();
        log::info!("Refreshing location (cycle {})", cycle);
        let geolocator = self.geolocator.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let location = geolocator.resolve().await;
            let _ = tx.send(SessionEvent::LocationResolved { cycle, location });
        });
    }

    /// Fetch for the current location. Starts a new fetch cycle.
    pub fn refetch(&mut self) {
        let cycle = self.retry.begin_cycle();
        log::info!("Refetching prayer times (cycle {})", cycle);
        self.spawn_fetch(cycle, 0);
    }

    fn spawn_fetch(&mut self, cycle: u64, attempt: u32) {
        let date = self.clock.now().date_naive();
        let provider = self.provider.clone();
        let location = self.location.clone();
        let tx = self.tx.clone();
        log::info!(
            "Fetching prayer times for {} via {} (cycle {}, attempt {})",
            date,
            provider.name(),
            cycle,
            attempt
        );
        tokio::spawn(async move {
            let result = provider.fetch(date, &location).await;
            let _ = tx.send(SessionEvent::FetchFinished {
                cycle,
                attempt,
                result,
            });
        });
    }

    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::LocationResolved { cycle, location } => {
                if !self.retry.is_current(cycle) {
                    log::debug!("Dropping location from stale cycle {}", cycle);
                    return;
                }
                self.location = location;
                self.spawn_fetch(cycle, 0);
            }
            SessionEvent::FetchFinished {
                cycle,
                attempt,
                result,
            } => {
                if !self.retry.is_current(cycle) {
                    log::debug!("Dropping fetch result from stale cycle {}", cycle);
                    return;
                }
                match result {
                    Ok(timings) => self.apply_timings(cycle, timings),
                    Err(e) => self.fetch_failed(cycle, attempt, e),
                }
            }
            SessionEvent::RetryDue(due) => {
                if !self.retry.is_current(due.cycle) {
                    log::debug!("Dropping retry from stale cycle {}", due.cycle);
                    return;
                }
                self.spawn_fetch(due.cycle, due.attempt);
            }
            SessionEvent::Fired(fired) => {
                if !self.scheduler.is_current(fired.generation) {
                    log::debug!("Dropping {:?} from superseded schedule", fired.event.kind);
                    return;
                }
                self.on_fired(fired.event.kind);
            }
        }
    }

    fn apply_timings(&mut self, cycle: u64, timings: PrayerTimings) {
        self.retry.on_success(cycle);
        let now = self.clock.now();
        let events = compute_schedule(&timings, &now, self.pre_alarm_lead);
        self.scheduler.reschedule(events, now);
        self.timings = Some(timings);
        self.state = ScheduleState::Ready;
    }

    fn fetch_failed(&mut self, cycle: u64, attempt: u32, error: ProviderError) {
        log::warn!(
            "Prayer time fetch failed (cycle {}, attempt {}): {}",
            cycle,
            attempt,
            error
        );
        self.state = ScheduleState::Unavailable;
        match self.retry.on_failure(cycle, attempt) {
            RetryOutcome::Scheduled { attempt, delay } => {
                log::info!("Retry {} in {:?}", attempt, delay);
            }
            RetryOutcome::Exhausted => {
                log::error!("Giving up on prayer times until the next refresh or midnight");
                self.rearm_midnight();
            }
            RetryOutcome::Stale => {}
        }
    }

    /// Keep the midnight refetch armed after a terminal failure. Events from
    /// the last good timings stay scheduled alongside it.
    fn rearm_midnight(&mut self) {
        let now = self.clock.now();
        let timings = self
            .timings
            .clone()
            .unwrap_or_else(|| PrayerTimings::new(now.date_naive()));
        let events = compute_schedule(&timings, &now, self.pre_alarm_lead);
        self.scheduler.reschedule(events, now);
    }

    fn on_fired(&mut self, kind: EventKind) {
        log::info!("Event fired: {:?}", kind);
        let (duck, prayer) = match kind {
            EventKind::PreAlarm(prayer) => (DuckKind::PreAlarm, prayer),
            EventKind::Adhan(prayer) => (DuckKind::Adhan, prayer),
            EventKind::MidnightRefetch => {
                self.refetch();
                return;
            }
        };
        let note = self
            .ducks
            .start_duck(duck, prayer, &mut self.music, self.cues.as_mut());
        self.banner.show(note);
    }

    /// Once-a-second housekeeping: late timers, cue completion, track end.
    pub fn tick(&mut self) {
        self.scheduler.fire_overdue(self.clock.now());
        if let Some(token) = self.cues.poll_ended() {
            self.ducks.finish_duck(token, &mut self.music);
        }
        self.music.poll_track_end();
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.banner.show(Notification::new(NotificationIcon::Info, message));
    }

    /// Cancel all timers and silence everything.
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.retry.cancel();
        self.cues.stop();
        self.music.pause();
        log::info!("Session torn down");
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &EventScheduler<SessionEvent> {
        &self.scheduler
    }

    #[cfg(test)]
    pub(crate) fn retry(&self) -> &RetryController<SessionEvent> {
        &self.retry
    }
}
