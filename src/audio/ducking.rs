//! Pauses the music around a cue and puts it back afterwards.
//!
//! Only the latest duck can complete: each `start_duck` issues a new token
//! and a completion carrying any other token is ignored.

use crate::audio::{CuePlayer, MAX_VOLUME, MusicStream};
use crate::models::{Notification, NotificationIcon, PrayerName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuckKind {
    PreAlarm,
    Adhan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuckToken(u64);

/// Music state captured when a duck starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioDuckState {
    pub was_playing_before_duck: bool,
    pub saved_volume: f32,
}

pub struct DuckController {
    issued: u64,
    active: Option<(DuckToken, AudioDuckState)>,
    pre_alarm_minutes: u32,
}

impl DuckController {
    pub fn new(pre_alarm_minutes: u32) -> Self {
        Self {
            issued: 0,
            active: None,
            pre_alarm_minutes,
        }
    }

    pub fn active(&self) -> Option<(DuckToken, AudioDuckState)> {
        self.active
    }

    pub fn notification(&self, kind: DuckKind, prayer: PrayerName) -> Notification {
        match kind {
            DuckKind::PreAlarm => Notification::new(
                NotificationIcon::Alarm,
                format!("{} menit lagi waktu {}", self.pre_alarm_minutes, prayer.label()),
            ),
            DuckKind::Adhan => Notification::new(
                NotificationIcon::Adhan,
                format!("Waktu sholat {}", prayer.label()),
            ),
        }
    }

    pub fn start_duck(
        &mut self,
        kind: DuckKind,
        prayer: PrayerName,
        music: &mut dyn MusicStream,
        cues: &mut dyn CuePlayer,
    ) -> Notification {
        // A superseded duck never completes, so its snapshot moves over.
        let state = match self.active.take() {
            Some((_, carried)) => carried,
            None => AudioDuckState {
                was_playing_before_duck: music.is_playing(),
                saved_volume: music.volume(),
            },
        };

        if music.is_playing() {
            music.pause();
        }
        music.set_volume(MAX_VOLUME);

        self.issued += 1;
        let token = DuckToken(self.issued);
        self.active = Some((token, state));
        log::info!("Duck {:?} for {} started ({:?})", kind, prayer.api_key(), state);

        if let Err(e) = cues.play(kind, token) {
            log::warn!("Cue {:?} could not play: {}", kind, e);
            self.finish_duck(token, music);
        }

        self.notification(kind, prayer)
    }

    /// Restore the music for `token`. Returns false when the token is not the
    /// active duck.
    pub fn finish_duck(&mut self, token: DuckToken, music: &mut dyn MusicStream) -> bool {
        let state = match self.active {
            Some((active, state)) if active == token => state,
            _ => {
                log::debug!("Ignoring completion of superseded duck {:?}", token);
                return false;
            }
        };
        self.active = None;

        music.set_volume(state.saved_volume);
        if state.was_playing_before_duck {
            music.resume();
        }
        log::info!("Duck {:?} finished, music restored", token);
        true
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::audio::AudioError;

    #[derive(Debug, Default)]
    pub struct FakeMusic {
        pub playing: bool,
        pub volume: f32,
        pub resumes: usize,
    }

    impl MusicStream for FakeMusic {
        fn is_playing(&self) -> bool {
            self.playing
        }
        fn volume(&self) -> f32 {
            self.volume
        }
        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }
        fn pause(&mut self) {
            self.playing = false;
        }
        fn resume(&mut self) {
            self.playing = true;
            self.resumes += 1;
        }
    }

    #[derive(Debug, Default)]
    pub struct FakeCues {
        pub playing: Option<(DuckKind, DuckToken)>,
        pub ended: Option<DuckToken>,
        pub fail: bool,
        pub started: Vec<DuckKind>,
    }

    impl FakeCues {
        /// Let the current cue run to its end.
        pub fn finish(&mut self) {
            if let Some((_, token)) = self.playing.take() {
                self.ended = Some(token);
            }
        }
    }

    impl CuePlayer for FakeCues {
        fn play(&mut self, kind: DuckKind, token: DuckToken) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError::Unavailable);
            }
            self.started.push(kind);
            self.playing = Some((kind, token));
            Ok(())
        }
        fn poll_ended(&mut self) -> Option<DuckToken> {
            self.ended.take()
        }
        fn stop(&mut self) {
            self.playing = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FakeCues, FakeMusic};
    use super::*;

    #[test]
    fn adhan_duck_restores_volume_and_playback() {
        let mut music = FakeMusic {
            playing: true,
            volume: 0.7,
            ..Default::default()
        };
        let mut cues = FakeCues::default();
        let mut ducks = DuckController::new(10);

        let note = ducks.start_duck(DuckKind::Adhan, PrayerName::Maghrib, &mut music, &mut cues);
        assert!(!music.playing);
        assert_eq!(music.volume, MAX_VOLUME);
        assert_eq!(note.icon, NotificationIcon::Adhan);
        assert_eq!(note.message, "Waktu sholat Maghrib");

        cues.finish();
        let token = cues.poll_ended().unwrap();
        assert!(ducks.finish_duck(token, &mut music));
        assert!(music.playing);
        assert!((music.volume - 0.7).abs() < f32::EPSILON);
        assert!(ducks.active().is_none());
    }

    #[test]
    fn paused_music_stays_paused() {
        let mut music = FakeMusic {
            playing: false,
            volume: 0.3,
            ..Default::default()
        };
        let mut cues = FakeCues::default();
        let mut ducks = DuckController::new(10);

        let note = ducks.start_duck(DuckKind::PreAlarm, PrayerName::Fajr, &mut music, &mut cues);
        assert_eq!(note.message, "10 menit lagi waktu Subuh");
        assert_eq!(note.icon, NotificationIcon::Alarm);

        cues.finish();
        let token = cues.poll_ended().unwrap();
        ducks.finish_duck(token, &mut music);
        assert!(!music.playing);
        assert_eq!(music.resumes, 0);
        assert!((music.volume - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn last_duck_wins() {
        let mut music = FakeMusic {
            playing: true,
            volume: 0.5,
            ..Default::default()
        };
        let mut cues = FakeCues::default();
        let mut ducks = DuckController::new(10);

        ducks.start_duck(DuckKind::PreAlarm, PrayerName::Isha, &mut music, &mut cues);
        let first = ducks.active().unwrap().0;
        ducks.start_duck(DuckKind::Adhan, PrayerName::Isha, &mut music, &mut cues);

        // The interrupted cue's completion is ignored.
        assert!(!ducks.finish_duck(first, &mut music));
        assert!(!music.playing);

        cues.finish();
        let second = cues.poll_ended().unwrap();
        assert!(ducks.finish_duck(second, &mut music));
        assert!(music.playing);
        assert!((music.volume - 0.5).abs() < f32::EPSILON);
        assert_eq!(music.resumes, 1);
    }

    #[test]
    fn cue_failure_restores_immediately() {
        let mut music = FakeMusic {
            playing: true,
            volume: 0.8,
            ..Default::default()
        };
        let mut cues = FakeCues {
            fail: true,
            ..Default::default()
        };
        let mut ducks = DuckController::new(10);

        ducks.start_duck(DuckKind::Adhan, PrayerName::Asr, &mut music, &mut cues);
        assert!(music.playing);
        assert!((music.volume - 0.8).abs() < f32::EPSILON);
        assert!(ducks.active().is_none());
    }
}
