use std::io;
use std::path::Path;

use crate::audio::{MusicStream, PlaybackBackend};
use crate::models::{Playlist, Track};

pub const VOLUME_STEP: f32 = 0.1;
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "m4a"];

const FINISHED_LABEL: &str = "—  selesai  —";
const EMPTY_LABEL: &str = "belum ada lagu";

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// A single file becomes one track; a directory contributes its audio files
/// in name order.
pub fn tracks_from_path(path: &Path) -> io::Result<Vec<Track>> {
    let meta = std::fs::metadata(path)?;
    if !meta.is_dir() {
        return Ok(vec![Track::from_path(path)]);
    }
    let mut files: Vec<_> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_audio_file(p))
        .collect();
    files.sort();
    Ok(files.iter().map(Track::from_path).collect())
}

/// One key-press step, rounded to hundredths so repeated steps do not drift.
fn step_volume(volume: f32, step: f32) -> f32 {
    ((volume + step) * 100.0).round() / 100.0
}

/// Playlist playback over a single-track backend.
pub struct MusicPlayer {
    backend: Box<dyn PlaybackBackend>,
    playlist: Playlist,
    playing: bool,
    volume: f32,
    finished: bool,
}

impl MusicPlayer {
    pub fn new(backend: Box<dyn PlaybackBackend>, volume: f32) -> Self {
        Self {
            backend,
            playlist: Playlist::default(),
            playing: false,
            volume: volume.clamp(0.0, 1.0),
            finished: false,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Label for the player widget.
    pub fn track_label(&self) -> &str {
        if self.finished {
            return FINISHED_LABEL;
        }
        match self.playlist.current() {
            Some(track) => &track.display_name,
            None => EMPTY_LABEL,
        }
    }

    /// Append tracks; start the first one when nothing is loaded yet.
    pub fn add_tracks(&mut self, tracks: impl IntoIterator<Item = Track>) {
        let mut added = 0;
        for track in tracks {
            self.playlist.push(track);
            added += 1;
        }
        log::info!("Added {} tracks, playlist has {}", added, self.playlist.len());
        if added > 0 && !self.playing && !self.backend.is_loaded() {
            self.play_track(0);
        }
    }

    pub fn play_track(&mut self, index: usize) {
        let Some(track) = self.playlist.select(index).cloned() else {
            return;
        };
        self.finished = false;
        match self.backend.load(&track.source, self.volume) {
            Ok(()) => {
                self.playing = true;
                log::info!("Playing {}", track.display_name);
            }
            Err(e) => {
                self.playing = false;
                log::warn!("Could not play {}: {}", track.display_name, e);
            }
        }
    }

    pub fn toggle(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        if self.playing {
            self.pause();
        } else if self.backend.is_loaded() {
            self.resume();
        } else {
            self.play_track(0);
        }
    }

    pub fn next(&mut self) {
        if let Some(i) = self.playlist.current_index() {
            if self.playlist.has_next() {
                self.play_track(i + 1);
            }
        }
    }

    pub fn prev(&mut self) {
        if let Some(i) = self.playlist.current_index() {
            if self.playlist.has_prev() {
                self.play_track(i - 1);
            }
        }
    }

    pub fn volume_up(&mut self) {
        self.set_volume(step_volume(self.volume, VOLUME_STEP));
    }

    pub fn volume_down(&mut self) {
        self.set_volume(step_volume(self.volume, -VOLUME_STEP));
    }

    /// Advance past a track that played to its end. Called on the UI tick.
    pub fn poll_track_end(&mut self) {
        if !self.playing || !self.backend.is_finished() {
            return;
        }
        if self.playlist.has_next() {
            if let Some(i) = self.playlist.current_index() {
                self.play_track(i + 1);
            }
        } else {
            self.playing = false;
            self.finished = true;
            log::info!("Playlist finished");
        }
    }
}

impl MusicStream for MusicPlayer {
    fn is_playing(&self) -> bool {
        self.playing
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.backend.set_volume(self.volume);
    }

    fn pause(&mut self) {
        if self.playing {
            self.backend.pause();
            self.playing = false;
        }
    }

    fn resume(&mut self) {
        if self.playlist.current().is_none() || !self.backend.is_loaded() {
            return;
        }
        match self.backend.play() {
            Ok(()) => self.playing = true,
            Err(e) => log::warn!("Could not resume music: {}", e),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::audio::AudioError;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    #[derive(Debug, Default)]
    pub struct BackendLog {
        pub loaded: Vec<PathBuf>,
        pub volume: f32,
        pub paused: bool,
        pub finished: bool,
        pub fail_load: bool,
    }

    /// Backend whose state is shared with the test through `log`.
    #[derive(Clone, Default)]
    pub struct FakeBackend {
        pub log: Rc<RefCell<BackendLog>>,
    }

    impl PlaybackBackend for FakeBackend {
        fn load(&mut self, source: &Path, volume: f32) -> Result<(), AudioError> {
            let mut log = self.log.borrow_mut();
            if log.fail_load {
                return Err(AudioError::Decode(source.to_path_buf()));
            }
            log.loaded.push(source.to_path_buf());
            log.volume = volume;
            log.paused = false;
            log.finished = false;
            Ok(())
        }
        fn play(&mut self) -> Result<(), AudioError> {
            self.log.borrow_mut().paused = false;
            Ok(())
        }
        fn pause(&mut self) {
            self.log.borrow_mut().paused = true;
        }
        fn set_volume(&mut self, volume: f32) {
            self.log.borrow_mut().volume = volume;
        }
        fn is_loaded(&self) -> bool {
            !self.log.borrow().loaded.is_empty()
        }
        fn is_finished(&self) -> bool {
            self.log.borrow().finished
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeBackend;
    use super::*;
    use crate::audio::ducking::testing::FakeCues;
    use crate::audio::{CuePlayer, DuckController, DuckKind};
    use crate::models::PrayerName;
    use std::path::PathBuf;

    fn player() -> (MusicPlayer, FakeBackend) {
        let backend = FakeBackend::default();
        (MusicPlayer::new(Box::new(backend.clone()), 1.0), backend)
    }

    fn tracks(names: &[&str]) -> Vec<Track> {
        names.iter().map(Track::from_path).collect()
    }

    #[test]
    fn adding_tracks_autostarts_first() {
        let (mut player, backend) = player();
        player.add_tracks(tracks(&["a.mp3", "b.mp3"]));
        assert!(player.is_playing());
        assert_eq!(player.track_label(), "a.mp3");
        assert_eq!(backend.log.borrow().loaded, vec![PathBuf::from("a.mp3")]);

        // A second batch does not restart playback.
        player.add_tracks(tracks(&["c.mp3"]));
        assert_eq!(backend.log.borrow().loaded.len(), 1);
        assert_eq!(player.playlist().len(), 3);
    }

    #[test]
    fn auto_advances_then_finishes() {
        let (mut player, backend) = player();
        player.add_tracks(tracks(&["a.mp3", "b.mp3"]));

        backend.log.borrow_mut().finished = true;
        player.poll_track_end();
        assert_eq!(player.track_label(), "b.mp3");
        assert!(player.is_playing());

        backend.log.borrow_mut().finished = true;
        player.poll_track_end();
        assert!(!player.is_playing());
        assert_eq!(player.track_label(), FINISHED_LABEL);
    }

    #[test]
    fn next_prev_stay_in_bounds() {
        let (mut player, _backend) = player();
        player.add_tracks(tracks(&["a.mp3", "b.mp3"]));
        player.prev();
        assert_eq!(player.playlist().current_index(), Some(0));
        player.next();
        player.next();
        assert_eq!(player.playlist().current_index(), Some(1));
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let (mut player, backend) = player();
        player.toggle();
        assert!(!player.is_playing());

        player.add_tracks(tracks(&["a.mp3"]));
        player.toggle();
        assert!(!player.is_playing());
        assert!(backend.log.borrow().paused);
        player.toggle();
        assert!(player.is_playing());
        assert!(!backend.log.borrow().paused);
    }

    #[test]
    fn failed_load_does_not_mark_playing() {
        let (mut player, backend) = player();
        backend.log.borrow_mut().fail_load = true;
        player.add_tracks(tracks(&["broken.mp3"]));
        assert!(!player.is_playing());
    }

    #[test]
    fn directory_contributes_sorted_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mp3", "a.FLAC", "cover.jpg"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let found = tracks_from_path(dir.path()).unwrap();
        let names: Vec<&str> = found.iter().map(|t| t.display_name.as_str()).collect();
        assert_eq!(names, vec!["a.FLAC", "b.mp3"]);

        let single = tracks_from_path(&dir.path().join("cover.jpg")).unwrap();
        assert_eq!(single.len(), 1);
        assert!(tracks_from_path(&dir.path().join("missing.mp3")).is_err());
    }

    #[test]
    fn volume_steps_are_clamped() {
        let (mut player, backend) = player();
        player.volume_up();
        assert_eq!(player.volume(), 1.0);
        for _ in 0..3 {
            player.volume_down();
        }
        assert!((player.volume() - 0.7).abs() < 1e-6);
        assert!((backend.log.borrow().volume - 0.7).abs() < 1e-6);
    }

    #[test]
    fn duck_restores_an_off_step_volume_exactly() {
        let backend = FakeBackend::default();
        let mut player = MusicPlayer::new(Box::new(backend.clone()), 0.735);
        player.add_tracks(tracks(&["a.mp3"]));
        let mut cues = FakeCues::default();
        let mut ducks = DuckController::new(10);

        ducks.start_duck(DuckKind::Adhan, PrayerName::Asr, &mut player, &mut cues);
        assert_eq!(player.volume(), 1.0);

        cues.finish();
        let token = cues.poll_ended().unwrap();
        assert!(ducks.finish_duck(token, &mut player));
        assert_eq!(player.volume(), 0.735);
        assert_eq!(backend.log.borrow().volume, 0.735);
        assert!(player.is_playing());
    }
}
